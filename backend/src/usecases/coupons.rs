use std::sync::Arc;

use chrono::Utc;
use crates::domain::{
    repositories::coupons::CouponRepository,
    value_objects::{coupons::DiscountDescriptor, enums::periods::Period},
};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CouponError {
    #[error("coupon code cannot be empty")]
    EmptyCode,
    #[error("coupon does not exist")]
    NotFound,
    #[error("coupon is outside its validity window")]
    OutsideValidityWindow,
    #[error("coupon has no remaining redemptions")]
    Exhausted,
    #[error("coupon is not applicable to this plan")]
    PlanNotEligible,
    #[error("coupon is not applicable to this billing period")]
    PeriodNotEligible,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CouponError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            CouponError::EmptyCode => StatusCode::UNPROCESSABLE_ENTITY,
            CouponError::NotFound => StatusCode::NOT_FOUND,
            CouponError::OutsideValidityWindow
            | CouponError::Exhausted
            | CouponError::PlanNotEligible
            | CouponError::PeriodNotEligible => StatusCode::BAD_REQUEST,
            CouponError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub struct CouponUseCase<C>
where
    C: CouponRepository + Send + Sync + 'static,
{
    coupon_repo: Arc<C>,
}

impl<C> CouponUseCase<C>
where
    C: CouponRepository + Send + Sync + 'static,
{
    pub fn new(coupon_repo: Arc<C>) -> Self {
        Self { coupon_repo }
    }

    /// Validates a coupon against a plan and period without consuming a
    /// redemption; usage counters only move when an order is paid, so an
    /// abandoned order never holds a coupon slot.
    pub async fn check(
        &self,
        code: &str,
        plan_id: Uuid,
        period: Period,
    ) -> Result<DiscountDescriptor, CouponError> {
        if code.trim().is_empty() {
            return Err(CouponError::EmptyCode);
        }

        let coupon = self
            .coupon_repo
            .find_by_code(code)
            .await
            .map_err(CouponError::Internal)?
            .ok_or_else(|| {
                warn!(code, "coupons: unknown coupon code");
                CouponError::NotFound
            })?;

        let now = Utc::now();
        if now < coupon.started_at || now > coupon.ended_at {
            warn!(code, "coupons: coupon outside validity window");
            return Err(CouponError::OutsideValidityWindow);
        }

        if matches!(coupon.limit_use, Some(remaining) if remaining <= 0) {
            warn!(code, "coupons: coupon fully redeemed");
            return Err(CouponError::Exhausted);
        }

        if let Some(plan_ids) = &coupon.limit_plan_ids {
            if !plan_ids.contains(&plan_id) {
                return Err(CouponError::PlanNotEligible);
            }
        }

        if let Some(periods) = &coupon.limit_periods {
            if !periods.contains(&period) {
                return Err(CouponError::PeriodNotEligible);
            }
        }

        info!(code, %plan_id, period = %period, "coupons: coupon accepted");

        Ok(DiscountDescriptor::from(&coupon))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use crates::domain::{
        entities::coupons::CouponEntity,
        repositories::coupons::MockCouponRepository,
        value_objects::enums::coupon_kinds::CouponKind,
    };
    use mockall::predicate::eq;

    fn sample_coupon(code: &str) -> CouponEntity {
        let now = Utc::now();
        CouponEntity {
            id: Uuid::new_v4(),
            code: code.to_string(),
            name: "Half off".to_string(),
            kind: CouponKind::Percentage,
            value: 50,
            limit_plan_ids: None,
            limit_periods: None,
            limit_use: None,
            limit_use_with_user: None,
            started_at: now - Duration::days(1),
            ended_at: now + Duration::days(30),
            created_at: now - Duration::days(1),
        }
    }

    #[tokio::test]
    async fn rejects_empty_code_without_storage_lookup() {
        let mut coupon_repo = MockCouponRepository::new();
        coupon_repo.expect_find_by_code().never();

        let usecase = CouponUseCase::new(Arc::new(coupon_repo));
        let result = usecase.check("  ", Uuid::new_v4(), Period::Month).await;

        assert!(matches!(result, Err(CouponError::EmptyCode)));
    }

    #[tokio::test]
    async fn rejects_unknown_code() {
        let mut coupon_repo = MockCouponRepository::new();
        coupon_repo
            .expect_find_by_code()
            .with(eq("NOPE"))
            .returning(|_| Box::pin(async { Ok(None) }));

        let usecase = CouponUseCase::new(Arc::new(coupon_repo));
        let result = usecase.check("NOPE", Uuid::new_v4(), Period::Month).await;

        assert!(matches!(result, Err(CouponError::NotFound)));
    }

    #[tokio::test]
    async fn rejects_expired_coupon() {
        let mut coupon = sample_coupon("OLD");
        coupon.started_at = Utc::now() - Duration::days(60);
        coupon.ended_at = Utc::now() - Duration::days(30);

        let mut coupon_repo = MockCouponRepository::new();
        coupon_repo.expect_find_by_code().returning(move |_| {
            let coupon = coupon.clone();
            Box::pin(async move { Ok(Some(coupon)) })
        });

        let usecase = CouponUseCase::new(Arc::new(coupon_repo));
        let result = usecase.check("OLD", Uuid::new_v4(), Period::Month).await;

        assert!(matches!(result, Err(CouponError::OutsideValidityWindow)));
    }

    #[tokio::test]
    async fn rejects_exhausted_coupon() {
        let mut coupon = sample_coupon("GONE");
        coupon.limit_use = Some(0);

        let mut coupon_repo = MockCouponRepository::new();
        coupon_repo.expect_find_by_code().returning(move |_| {
            let coupon = coupon.clone();
            Box::pin(async move { Ok(Some(coupon)) })
        });

        let usecase = CouponUseCase::new(Arc::new(coupon_repo));
        let result = usecase.check("GONE", Uuid::new_v4(), Period::Month).await;

        assert!(matches!(result, Err(CouponError::Exhausted)));
    }

    #[tokio::test]
    async fn rejects_plan_outside_allow_list() {
        let allowed_plan = Uuid::new_v4();
        let other_plan = Uuid::new_v4();

        let mut coupon = sample_coupon("PLANONLY");
        coupon.limit_plan_ids = Some(vec![allowed_plan]);

        let mut coupon_repo = MockCouponRepository::new();
        coupon_repo.expect_find_by_code().returning(move |_| {
            let coupon = coupon.clone();
            Box::pin(async move { Ok(Some(coupon)) })
        });

        let usecase = CouponUseCase::new(Arc::new(coupon_repo));
        let result = usecase.check("PLANONLY", other_plan, Period::Month).await;

        assert!(matches!(result, Err(CouponError::PlanNotEligible)));
    }

    #[tokio::test]
    async fn rejects_period_outside_allow_list() {
        let mut coupon = sample_coupon("YEARLY");
        coupon.limit_periods = Some(vec![Period::Year]);

        let mut coupon_repo = MockCouponRepository::new();
        coupon_repo.expect_find_by_code().returning(move |_| {
            let coupon = coupon.clone();
            Box::pin(async move { Ok(Some(coupon)) })
        });

        let usecase = CouponUseCase::new(Arc::new(coupon_repo));
        let result = usecase.check("YEARLY", Uuid::new_v4(), Period::Month).await;

        assert!(matches!(result, Err(CouponError::PeriodNotEligible)));
    }

    #[tokio::test]
    async fn accepts_eligible_coupon_and_returns_descriptor() {
        let plan_id = Uuid::new_v4();

        let mut coupon = sample_coupon("SAVE50");
        coupon.limit_plan_ids = Some(vec![plan_id]);
        coupon.limit_periods = Some(vec![Period::Month, Period::Year]);

        let mut coupon_repo = MockCouponRepository::new();
        coupon_repo
            .expect_find_by_code()
            .with(eq("SAVE50"))
            .returning(move |_| {
                let coupon = coupon.clone();
                Box::pin(async move { Ok(Some(coupon)) })
            });

        let usecase = CouponUseCase::new(Arc::new(coupon_repo));
        let descriptor = usecase
            .check("SAVE50", plan_id, Period::Month)
            .await
            .unwrap();

        assert_eq!(descriptor.kind, CouponKind::Percentage);
        assert_eq!(descriptor.value, 50);
        assert_eq!(descriptor.limit_plan_ids, Some(vec![plan_id]));
        assert_eq!(
            descriptor.limit_periods,
            Some(vec![Period::Month, Period::Year])
        );
    }
}
