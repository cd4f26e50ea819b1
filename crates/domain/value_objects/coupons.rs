use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::coupons::CouponEntity,
    value_objects::enums::{coupon_kinds::CouponKind, periods::Period},
};

/// What a validated coupon grants, detached from the coupon row so pricing
/// never has to reach back into storage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiscountDescriptor {
    pub kind: CouponKind,
    pub value: i32,
    pub limit_plan_ids: Option<Vec<Uuid>>,
    pub limit_periods: Option<Vec<Period>>,
}

impl From<&CouponEntity> for DiscountDescriptor {
    fn from(value: &CouponEntity) -> Self {
        Self {
            kind: value.kind,
            value: value.value,
            limit_plan_ids: value.limit_plan_ids.clone(),
            limit_periods: value.limit_periods.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CheckCouponRequest {
    pub code: String,
    pub plan_id: Uuid,
    pub period: String,
}
