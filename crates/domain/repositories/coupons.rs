use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::coupons::CouponEntity;

#[async_trait]
#[automock]
pub trait CouponRepository {
    /// Case-sensitive code lookup. Validation never mutates usage counters;
    /// redemption accounting happens when an order is paid.
    async fn find_by_code(&self, code: &str) -> Result<Option<CouponEntity>>;
}
