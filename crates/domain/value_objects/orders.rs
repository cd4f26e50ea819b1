use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::orders::OrderEntity,
    value_objects::enums::{order_statuses::OrderStatus, order_types::OrderType},
};

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub plan_id: Uuid,
    pub period: String,
    pub coupon_code: Option<String>,
    /// Guest checkout registers inline through the user directory.
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateOrderResponse {
    pub trade_no: String,
}

#[derive(Debug, Deserialize)]
pub struct CancelOrderRequest {
    pub trade_no: String,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub trade_no: String,
    pub method_id: Uuid,
    /// Provider-specific client token (card tokens and the like), passed
    /// through untouched.
    pub token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OrderStatusResponse {
    pub status: OrderStatus,
}

#[derive(Debug, Deserialize)]
pub struct FulfillmentRequest {
    pub trade_no: String,
}

#[derive(Debug, Serialize)]
pub struct OrderDto {
    pub trade_no: String,
    pub plan_id: Uuid,
    pub order_type: OrderType,
    pub period: String,
    pub total_amount: i32,
    pub discount_amount: i32,
    pub handling_amount: Option<i32>,
    pub payment_method_id: Option<Uuid>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl From<OrderEntity> for OrderDto {
    fn from(value: OrderEntity) -> Self {
        Self {
            trade_no: value.trade_no,
            plan_id: value.plan_id,
            order_type: value.order_type,
            period: value.period,
            total_amount: value.total_amount,
            discount_amount: value.discount_amount,
            handling_amount: value.handling_amount,
            payment_method_id: value.payment_method_id,
            status: value.status,
            created_at: value.created_at,
        }
    }
}
