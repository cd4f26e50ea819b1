use anyhow::anyhow;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::{
    domain::value_objects::enums::{order_statuses::OrderStatus, order_types::OrderType},
    infra::db::postgres::schema::orders,
};

#[derive(Debug, Clone)]
pub struct OrderEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Nil uuid for recharge orders.
    pub plan_id: Uuid,
    pub payment_method_id: Option<Uuid>,
    pub trade_no: String,
    pub order_type: OrderType,
    /// A `Period` key, or the `recharge` sentinel.
    pub period: String,
    pub total_amount: i32,
    /// Coupon discount for subscription orders; wallet bonus for recharge
    /// orders.
    pub discount_amount: i32,
    /// `None` means no handling fee applies, which is distinct from a fee
    /// that computed to zero.
    pub handling_amount: Option<i32>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderEntity {
    /// Amount the provider must confirm. Recharge bonuses are credited on
    /// top of the paid amount, never subtracted from the charge.
    pub fn payable_amount(&self) -> i32 {
        let fee = self.handling_amount.unwrap_or(0);
        match self.order_type {
            OrderType::Subscription => self.total_amount + fee - self.discount_amount,
            OrderType::Recharge => self.total_amount + fee,
        }
    }
}

/// Raw row used for Diesel queries; status and type are validated into their
/// closed enums on the way out.
#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = orders)]
pub struct OrderRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_id: Uuid,
    pub payment_method_id: Option<Uuid>,
    pub trade_no: String,
    pub order_type: String,
    pub period: String,
    pub total_amount: i32,
    pub discount_amount: i32,
    pub handling_amount: Option<i32>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for OrderEntity {
    type Error = anyhow::Error;

    fn try_from(value: OrderRow) -> Result<Self, Self::Error> {
        let order_type = OrderType::from_str(&value.order_type)
            .ok_or_else(|| anyhow!("unknown order type: {}", value.order_type))?;
        let status = OrderStatus::from_str(&value.status)
            .ok_or_else(|| anyhow!("unknown order status: {}", value.status))?;

        Ok(Self {
            id: value.id,
            user_id: value.user_id,
            plan_id: value.plan_id,
            payment_method_id: value.payment_method_id,
            trade_no: value.trade_no,
            order_type,
            period: value.period,
            total_amount: value.total_amount,
            discount_amount: value.discount_amount,
            handling_amount: value.handling_amount,
            status,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = orders)]
pub struct InsertOrderEntity {
    pub user_id: Uuid,
    pub plan_id: Uuid,
    pub trade_no: String,
    pub order_type: String,
    pub period: String,
    pub total_amount: i32,
    pub discount_amount: i32,
    pub status: String,
}
