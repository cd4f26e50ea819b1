use std::sync::Arc;

use crates::domain::{
    entities::orders::{InsertOrderEntity, OrderEntity},
    repositories::{
        coupons::CouponRepository,
        orders::{OrderInsertError, OrderRepository},
        plans::PlanRepository,
        users::UserDirectory,
    },
    value_objects::{
        enums::{order_statuses::OrderStatus, order_types::OrderType, periods::Period},
        orders::OrderDto,
    },
};
use rand::{RngCore, rngs::OsRng};
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::{
    coupons::{CouponError, CouponUseCase},
    pricing::PricingCalculator,
};

const TRADE_NO_ATTEMPTS: u32 = 3;

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("subscription plan does not exist")]
    PlanNotFound,
    #[error("plan has no price for the requested period")]
    InvalidPeriod,
    #[error(transparent)]
    Coupon(#[from] CouponError),
    #[error("an unpaid order of the same kind already exists")]
    PendingOrderExists,
    #[error("order does not exist")]
    OrderNotFound,
    #[error("order is no longer pending")]
    InvalidTransition,
    #[error("order could not be created")]
    CreationFailed,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl OrderError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            OrderError::PlanNotFound | OrderError::OrderNotFound => StatusCode::NOT_FOUND,
            OrderError::InvalidPeriod | OrderError::PendingOrderExists => StatusCode::BAD_REQUEST,
            OrderError::Coupon(coupon_error) => coupon_error.status_code(),
            OrderError::InvalidTransition => StatusCode::CONFLICT,
            OrderError::CreationFailed | OrderError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Who is buying: an authenticated user, or a guest registering inline
/// through the user directory.
#[derive(Debug, Clone)]
pub enum OrderIdentity {
    User(Uuid),
    Guest { email: String, password: String },
}

pub struct OrderUseCase<O, P, C, U>
where
    O: OrderRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    C: CouponRepository + Send + Sync + 'static,
    U: UserDirectory + Send + Sync + 'static,
{
    order_repo: Arc<O>,
    plan_repo: Arc<P>,
    coupons: CouponUseCase<C>,
    user_directory: Arc<U>,
    pricing: Arc<PricingCalculator>,
}

impl<O, P, C, U> OrderUseCase<O, P, C, U>
where
    O: OrderRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    C: CouponRepository + Send + Sync + 'static,
    U: UserDirectory + Send + Sync + 'static,
{
    pub fn new(
        order_repo: Arc<O>,
        plan_repo: Arc<P>,
        coupons: CouponUseCase<C>,
        user_directory: Arc<U>,
        pricing: Arc<PricingCalculator>,
    ) -> Self {
        Self {
            order_repo,
            plan_repo,
            coupons,
            user_directory,
            pricing,
        }
    }

    /// Builds a pending subscription order. A rejected coupon fails the
    /// whole creation; it never degrades to "no discount".
    pub async fn create_order(
        &self,
        identity: OrderIdentity,
        plan_id: Uuid,
        period_key: &str,
        coupon_code: Option<&str>,
    ) -> Result<OrderEntity, OrderError> {
        let period = Period::from_str(period_key).ok_or_else(|| {
            warn!(%plan_id, period_key, "orders: unknown billing period");
            OrderError::InvalidPeriod
        })?;

        let plan = self
            .plan_repo
            .find_active_plan_by_id(plan_id)
            .await
            .map_err(OrderError::Internal)?
            .ok_or_else(|| {
                warn!(%plan_id, "orders: plan not found");
                OrderError::PlanNotFound
            })?;

        let total_amount = self
            .pricing
            .price_for(&plan, period)
            .map_err(|_| OrderError::InvalidPeriod)?;

        let discount_amount = match coupon_code {
            Some(code) => {
                let descriptor = self.coupons.check(code, plan_id, period).await?;
                self.pricing.discount_for(total_amount, &descriptor)
            }
            None => 0,
        };

        let user_id = self.resolve_identity(identity).await?;

        let order = insert_pending_with_retries(self.order_repo.as_ref(), |trade_no| {
            InsertOrderEntity {
                user_id,
                plan_id,
                trade_no,
                order_type: OrderType::Subscription.to_string(),
                period: period.as_str().to_string(),
                total_amount,
                discount_amount,
                status: OrderStatus::Pending.to_string(),
            }
        })
        .await
        .map_err(|err| match err {
            OrderInsertError::DuplicateTradeNo => {
                error!(%user_id, "orders: exhausted trade number attempts");
                OrderError::CreationFailed
            }
            OrderInsertError::PendingOrderExists(order_type) => {
                warn!(%user_id, order_type = %order_type, "orders: pending order already exists");
                OrderError::PendingOrderExists
            }
            OrderInsertError::Other(db_error) => {
                error!(%user_id, db_error = ?db_error, "orders: failed to insert order");
                OrderError::Internal(db_error)
            }
        })?;

        info!(
            %user_id,
            %plan_id,
            period = %period,
            total_amount,
            discount_amount,
            trade_no = %order.trade_no,
            pricing_version = self.pricing.config_version(),
            "orders: pending order created"
        );

        Ok(order)
    }

    pub async fn list_orders(&self, user_id: Uuid) -> Result<Vec<OrderDto>, OrderError> {
        let orders = self
            .order_repo
            .list_for_user(user_id)
            .await
            .map_err(OrderError::Internal)?;

        Ok(orders.into_iter().map(OrderDto::from).collect())
    }

    pub async fn order_status(
        &self,
        user_id: Uuid,
        trade_no: &str,
    ) -> Result<OrderStatus, OrderError> {
        let order = self
            .order_repo
            .find_user_order(user_id, trade_no)
            .await
            .map_err(OrderError::Internal)?
            .ok_or(OrderError::OrderNotFound)?;

        Ok(order.status)
    }

    pub async fn cancel_order(&self, user_id: Uuid, trade_no: &str) -> Result<(), OrderError> {
        let order = self
            .order_repo
            .find_user_order(user_id, trade_no)
            .await
            .map_err(OrderError::Internal)?
            .ok_or(OrderError::OrderNotFound)?;

        if !order.status.can_transition_to(OrderStatus::Cancelled) {
            warn!(
                %user_id,
                trade_no,
                status = %order.status,
                "orders: cancel attempted on non-pending order"
            );
            return Err(OrderError::InvalidTransition);
        }

        let cancelled = self
            .order_repo
            .cancel_if_pending(user_id, trade_no)
            .await
            .map_err(OrderError::Internal)?;

        if !cancelled {
            // Lost the race against a confirmation; surface as a state error.
            return Err(OrderError::InvalidTransition);
        }

        info!(%user_id, trade_no, "orders: order cancelled");

        Ok(())
    }

    async fn resolve_identity(&self, identity: OrderIdentity) -> Result<Uuid, OrderError> {
        match identity {
            OrderIdentity::User(user_id) => Ok(user_id),
            OrderIdentity::Guest { email, password } => self
                .user_directory
                .resolve_or_register(&email, &password)
                .await
                .map_err(|err| {
                    error!(error = ?err, "orders: guest registration failed");
                    OrderError::Internal(err)
                }),
        }
    }
}

/// Inserts a pending order, regenerating the trade number on a detected
/// collision. Exhausting the attempts surfaces the final
/// `DuplicateTradeNo` to the caller.
pub(crate) async fn insert_pending_with_retries<O>(
    order_repo: &O,
    make_insert: impl Fn(String) -> InsertOrderEntity,
) -> Result<OrderEntity, OrderInsertError>
where
    O: OrderRepository + Send + Sync,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        let insert = make_insert(generate_trade_no());

        match order_repo.insert_pending_order(insert).await {
            Ok(order) => return Ok(order),
            Err(OrderInsertError::DuplicateTradeNo) if attempt < TRADE_NO_ATTEMPTS => {
                warn!(attempt, "orders: trade number collision, regenerating");
            }
            Err(err) => return Err(err),
        }
    }
}

/// 128 unpredictable bits, hex encoded. Nothing sequential or guessable;
/// the unique index backstops the negligible collision case.
fn generate_trade_no() -> String {
    let mut rng = OsRng;
    format!("{:016x}{:016x}", rng.next_u64(), rng.next_u64())
}
