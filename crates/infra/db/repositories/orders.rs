use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{
    Connection, insert_into,
    prelude::*,
    result::{DatabaseErrorKind, Error as DieselError},
    update,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::orders::{InsertOrderEntity, OrderEntity, OrderRow},
        repositories::orders::{OrderInsertError, OrderRepository},
        value_objects::enums::{order_statuses::OrderStatus, order_types::OrderType},
    },
    infra::db::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{app_users, orders},
    },
};

/// Unique index on the externally visible trade number; backstops the
/// random generator.
const TRADE_NO_IDX: &str = "orders_trade_no_key";
/// Partial unique index on (user_id, order_type) WHERE status = 'pending';
/// enforces the one-pending-order-per-family rule under concurrent inserts.
const PENDING_FAMILY_IDX: &str = "orders_one_pending_per_user_family";

pub struct OrderPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl OrderPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

fn classify_insert_error(err: DieselError, order_type: OrderType) -> OrderInsertError {
    if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info) = err {
        match info.constraint_name() {
            Some(TRADE_NO_IDX) => return OrderInsertError::DuplicateTradeNo,
            Some(PENDING_FAMILY_IDX) => {
                return OrderInsertError::PendingOrderExists(order_type);
            }
            _ => {}
        }
    }
    OrderInsertError::Other(err.into())
}

#[async_trait]
impl OrderRepository for OrderPostgres {
    async fn insert_pending_order(
        &self,
        order: InsertOrderEntity,
    ) -> Result<OrderEntity, OrderInsertError> {
        let mut conn = Arc::clone(&self.db_pool)
            .get()
            .map_err(anyhow::Error::from)?;
        let order_type =
            OrderType::from_str(&order.order_type).unwrap_or(OrderType::Subscription);

        let row = insert_into(orders::table)
            .values(&order)
            .returning(OrderRow::as_returning())
            .get_result::<OrderRow>(&mut conn)
            .map_err(|err| classify_insert_error(err, order_type))?;

        OrderEntity::try_from(row).map_err(OrderInsertError::Other)
    }

    async fn find_by_trade_no(&self, trade_no: &str) -> Result<Option<OrderEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = orders::table
            .filter(orders::trade_no.eq(trade_no))
            .select(OrderRow::as_select())
            .first::<OrderRow>(&mut conn)
            .optional()?;

        row.map(OrderEntity::try_from).transpose()
    }

    async fn find_user_order(
        &self,
        user_id: Uuid,
        trade_no: &str,
    ) -> Result<Option<OrderEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = orders::table
            .filter(orders::trade_no.eq(trade_no))
            .filter(orders::user_id.eq(user_id))
            .select(OrderRow::as_select())
            .first::<OrderRow>(&mut conn)
            .optional()?;

        row.map(OrderEntity::try_from).transpose()
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<OrderEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = orders::table
            .filter(orders::user_id.eq(user_id))
            .order(orders::created_at.desc())
            .select(OrderRow::as_select())
            .load::<OrderRow>(&mut conn)?;

        rows.into_iter().map(OrderEntity::try_from).collect()
    }

    async fn bind_payment_method_if_pending(
        &self,
        trade_no: &str,
        payment_method_id: Uuid,
        handling_amount: Option<i32>,
    ) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let updated = update(orders::table)
            .filter(orders::trade_no.eq(trade_no))
            .filter(orders::status.eq(OrderStatus::Pending.as_str()))
            .set((
                orders::payment_method_id.eq(Some(payment_method_id)),
                orders::handling_amount.eq(handling_amount),
                orders::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;

        Ok(updated == 1)
    }

    async fn mark_paid_if_pending(&self, trade_no: &str) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let updated = update(orders::table)
            .filter(orders::trade_no.eq(trade_no))
            .filter(orders::status.eq(OrderStatus::Pending.as_str()))
            .set((
                orders::status.eq(OrderStatus::Paid.as_str()),
                orders::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;

        Ok(updated == 1)
    }

    async fn mark_paid_and_credit_if_pending(
        &self,
        trade_no: &str,
        credit_minor: i32,
    ) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        // Status flip and wallet credit must land together; the conditional
        // update decides the winner when confirmations race.
        let credited = conn.transaction::<bool, DieselError, _>(|conn| {
            let owner = orders::table
                .filter(orders::trade_no.eq(trade_no))
                .filter(orders::status.eq(OrderStatus::Pending.as_str()))
                .select(orders::user_id)
                .first::<Uuid>(conn)
                .optional()?;

            let Some(user_id) = owner else {
                return Ok(false);
            };

            let updated = update(orders::table)
                .filter(orders::trade_no.eq(trade_no))
                .filter(orders::status.eq(OrderStatus::Pending.as_str()))
                .set((
                    orders::status.eq(OrderStatus::Paid.as_str()),
                    orders::updated_at.eq(Utc::now()),
                ))
                .execute(conn)?;

            if updated == 0 {
                return Ok(false);
            }

            update(app_users::table)
                .filter(app_users::id.eq(user_id))
                .set(app_users::balance_minor.eq(app_users::balance_minor + credit_minor))
                .execute(conn)?;

            Ok(true)
        })?;

        Ok(credited)
    }

    async fn mark_discounted_if_pending(&self, trade_no: &str) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let updated = update(orders::table)
            .filter(orders::trade_no.eq(trade_no))
            .filter(orders::status.eq(OrderStatus::Pending.as_str()))
            .set((
                orders::status.eq(OrderStatus::Discounted.as_str()),
                orders::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;

        Ok(updated == 1)
    }

    async fn mark_fulfilled_if_paid(&self, trade_no: &str) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let updated = update(orders::table)
            .filter(orders::trade_no.eq(trade_no))
            .filter(orders::status.eq(OrderStatus::Paid.as_str()))
            .set((
                orders::status.eq(OrderStatus::Fulfilled.as_str()),
                orders::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;

        Ok(updated == 1)
    }

    async fn cancel_if_pending(&self, user_id: Uuid, trade_no: &str) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let updated = update(orders::table)
            .filter(orders::trade_no.eq(trade_no))
            .filter(orders::user_id.eq(user_id))
            .filter(orders::status.eq(OrderStatus::Pending.as_str()))
            .set((
                orders::status.eq(OrderStatus::Cancelled.as_str()),
                orders::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;

        Ok(updated == 1)
    }
}
