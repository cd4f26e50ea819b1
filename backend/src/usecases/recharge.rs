use std::sync::Arc;

use crates::domain::{
    entities::orders::InsertOrderEntity,
    repositories::orders::{OrderInsertError, OrderRepository},
    value_objects::{
        enums::{
            order_statuses::OrderStatus,
            order_types::OrderType,
            periods::RECHARGE_PERIOD,
        },
        plans::RECHARGE_PLAN_ID,
        recharge::{BonusTierDto, CreateRechargeResponse},
    },
};
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::{orders::insert_pending_with_retries, pricing::PricingCalculator};

#[derive(Debug, Error)]
pub enum RechargeError {
    #[error("recharge amount is out of bounds")]
    AmountOutOfRange,
    #[error("an unpaid recharge order already exists")]
    PendingOrderExists,
    #[error("order could not be created")]
    CreationFailed,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl RechargeError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            RechargeError::AmountOutOfRange => StatusCode::UNPROCESSABLE_ENTITY,
            RechargeError::PendingOrderExists => StatusCode::BAD_REQUEST,
            RechargeError::CreationFailed | RechargeError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

pub struct RechargeUseCase<O>
where
    O: OrderRepository + Send + Sync + 'static,
{
    order_repo: Arc<O>,
    pricing: Arc<PricingCalculator>,
}

impl<O> RechargeUseCase<O>
where
    O: OrderRepository + Send + Sync + 'static,
{
    pub fn new(order_repo: Arc<O>, pricing: Arc<PricingCalculator>) -> Self {
        Self {
            order_repo,
            pricing,
        }
    }

    /// Builds a pending wallet top-up order. The tier bonus is stored in the
    /// discount column and credited on top of the paid amount at
    /// confirmation; it never reduces the charge.
    pub async fn create_recharge(
        &self,
        user_id: Uuid,
        amount_minor: i32,
    ) -> Result<CreateRechargeResponse, RechargeError> {
        if amount_minor < self.pricing.recharge_min()
            || amount_minor > self.pricing.recharge_max()
        {
            warn!(%user_id, amount_minor, "recharge: amount out of bounds");
            return Err(RechargeError::AmountOutOfRange);
        }

        let bonus_minor = self.pricing.recharge_bonus(amount_minor);

        let order = insert_pending_with_retries(self.order_repo.as_ref(), |trade_no| {
            InsertOrderEntity {
                user_id,
                plan_id: RECHARGE_PLAN_ID,
                trade_no,
                order_type: OrderType::Recharge.to_string(),
                period: RECHARGE_PERIOD.to_string(),
                total_amount: amount_minor,
                discount_amount: bonus_minor,
                status: OrderStatus::Pending.to_string(),
            }
        })
        .await
        .map_err(|err| match err {
            OrderInsertError::DuplicateTradeNo => {
                error!(%user_id, "recharge: exhausted trade number attempts");
                RechargeError::CreationFailed
            }
            OrderInsertError::PendingOrderExists(_) => {
                warn!(%user_id, "recharge: pending recharge order already exists");
                RechargeError::PendingOrderExists
            }
            OrderInsertError::Other(db_error) => {
                error!(%user_id, db_error = ?db_error, "recharge: failed to insert order");
                RechargeError::Internal(db_error)
            }
        })?;

        info!(
            %user_id,
            amount_minor,
            bonus_minor,
            trade_no = %order.trade_no,
            pricing_version = self.pricing.config_version(),
            "recharge: pending order created"
        );

        Ok(CreateRechargeResponse {
            trade_no: order.trade_no,
            amount: amount_minor,
            bonus: bonus_minor,
            total: amount_minor + bonus_minor,
        })
    }

    /// Tier listing for the storefront, lowest threshold first.
    pub fn bonus_tiers(&self) -> Vec<BonusTierDto> {
        let mut tiers: Vec<BonusTierDto> = self
            .pricing
            .bonus_tiers()
            .iter()
            .map(|tier| BonusTierDto {
                threshold: tier.threshold_minor,
                bonus: tier.bonus_minor,
            })
            .collect();

        tiers.sort_by_key(|tier| tier.threshold);
        tiers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crates::domain::{
        entities::orders::OrderEntity,
        repositories::orders::MockOrderRepository,
        value_objects::pricing::PricingConfig,
    };

    fn entity_from_insert(insert: &InsertOrderEntity) -> OrderEntity {
        let now = chrono::Utc::now();
        OrderEntity {
            id: Uuid::new_v4(),
            user_id: insert.user_id,
            plan_id: insert.plan_id,
            payment_method_id: None,
            trade_no: insert.trade_no.clone(),
            order_type: OrderType::from_str(&insert.order_type).unwrap(),
            period: insert.period.clone(),
            total_amount: insert.total_amount,
            discount_amount: insert.discount_amount,
            handling_amount: None,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    fn usecase(order_repo: MockOrderRepository) -> RechargeUseCase<MockOrderRepository> {
        RechargeUseCase::new(
            Arc::new(order_repo),
            Arc::new(PricingCalculator::new(PricingConfig::default())),
        )
    }

    #[tokio::test]
    async fn recharge_of_50000_stores_bonus_as_discount() {
        let user_id = Uuid::new_v4();

        let mut order_repo = MockOrderRepository::new();
        order_repo
            .expect_insert_pending_order()
            .withf(|insert| {
                insert.plan_id == RECHARGE_PLAN_ID
                    && insert.period == RECHARGE_PERIOD
                    && insert.order_type == "recharge"
                    && insert.total_amount == 50_000
                    && insert.discount_amount == 20_000
            })
            .returning(|insert| {
                let order = entity_from_insert(&insert);
                Box::pin(async move { Ok(order) })
            });

        let response = usecase(order_repo)
            .create_recharge(user_id, 50_000)
            .await
            .unwrap();

        assert_eq!(response.amount, 50_000);
        assert_eq!(response.bonus, 20_000);
        assert_eq!(response.total, 70_000);
    }

    #[tokio::test]
    async fn amounts_outside_bounds_are_rejected_without_insert() {
        let mut order_repo = MockOrderRepository::new();
        order_repo.expect_insert_pending_order().never();
        let usecase = usecase(order_repo);

        let below = usecase.create_recharge(Uuid::new_v4(), 999).await;
        assert!(matches!(below, Err(RechargeError::AmountOutOfRange)));

        let above = usecase.create_recharge(Uuid::new_v4(), 1_000_001).await;
        assert!(matches!(above, Err(RechargeError::AmountOutOfRange)));
    }

    #[tokio::test]
    async fn bounds_are_inclusive() {
        let mut order_repo = MockOrderRepository::new();
        order_repo
            .expect_insert_pending_order()
            .times(2)
            .returning(|insert| {
                let order = entity_from_insert(&insert);
                Box::pin(async move { Ok(order) })
            });
        let usecase = usecase(order_repo);

        assert!(usecase.create_recharge(Uuid::new_v4(), 1_000).await.is_ok());
        assert!(
            usecase
                .create_recharge(Uuid::new_v4(), 1_000_000)
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn pending_recharge_conflict_is_surfaced() {
        let mut order_repo = MockOrderRepository::new();
        order_repo.expect_insert_pending_order().returning(|_| {
            Box::pin(async { Err(OrderInsertError::PendingOrderExists(OrderType::Recharge)) })
        });

        let result = usecase(order_repo)
            .create_recharge(Uuid::new_v4(), 10_000)
            .await;

        assert!(matches!(result, Err(RechargeError::PendingOrderExists)));
    }

    #[tokio::test]
    async fn small_amounts_get_no_bonus() {
        let mut order_repo = MockOrderRepository::new();
        order_repo
            .expect_insert_pending_order()
            .withf(|insert| insert.total_amount == 9_999 && insert.discount_amount == 0)
            .returning(|insert| {
                let order = entity_from_insert(&insert);
                Box::pin(async move { Ok(order) })
            });

        let response = usecase(order_repo)
            .create_recharge(Uuid::new_v4(), 9_999)
            .await
            .unwrap();

        assert_eq!(response.bonus, 0);
        assert_eq!(response.total, 9_999);
    }

    #[test]
    fn bonus_tiers_are_listed_lowest_first() {
        let usecase = usecase(MockOrderRepository::new());
        let tiers = usecase.bonus_tiers();

        assert_eq!(tiers.first().map(|t| t.threshold), Some(10_000));
        assert_eq!(tiers.last().map(|t| t.threshold), Some(200_000));
        assert!(tiers.windows(2).all(|w| w[0].threshold < w[1].threshold));
    }
}
