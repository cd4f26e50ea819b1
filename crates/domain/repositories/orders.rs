use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{
    entities::orders::{InsertOrderEntity, OrderEntity},
    value_objects::enums::order_types::OrderType,
};

/// Typed outcome of the guarded pending-order insert. Both business
/// variants map to unique indexes, so the checks hold under concurrent
/// creation without a read-then-write.
#[derive(Debug, Error)]
pub enum OrderInsertError {
    #[error("trade number already exists")]
    DuplicateTradeNo,
    #[error("user already has a pending {0} order")]
    PendingOrderExists(OrderType),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// All mutations are conditional single-row updates returning whether the
/// row actually moved; that is the whole concurrency story for order state.
#[async_trait]
#[automock]
pub trait OrderRepository {
    async fn insert_pending_order(
        &self,
        order: InsertOrderEntity,
    ) -> Result<OrderEntity, OrderInsertError>;

    async fn find_by_trade_no(&self, trade_no: &str) -> Result<Option<OrderEntity>>;

    async fn find_user_order(
        &self,
        user_id: Uuid,
        trade_no: &str,
    ) -> Result<Option<OrderEntity>>;

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<OrderEntity>>;

    /// Records the chosen method and its fee ahead of the provider call.
    async fn bind_payment_method_if_pending(
        &self,
        trade_no: &str,
        payment_method_id: Uuid,
        handling_amount: Option<i32>,
    ) -> Result<bool>;

    async fn mark_paid_if_pending(&self, trade_no: &str) -> Result<bool>;

    /// Flips the order to paid and credits the owner's wallet in one
    /// transaction; the order status is the only record of the credit.
    async fn mark_paid_and_credit_if_pending(
        &self,
        trade_no: &str,
        credit_minor: i32,
    ) -> Result<bool>;

    async fn mark_discounted_if_pending(&self, trade_no: &str) -> Result<bool>;

    async fn mark_fulfilled_if_paid(&self, trade_no: &str) -> Result<bool>;

    async fn cancel_if_pending(&self, user_id: Uuid, trade_no: &str) -> Result<bool>;
}
