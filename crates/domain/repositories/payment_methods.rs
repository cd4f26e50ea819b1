use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::payment_methods::PaymentMethodEntity;

#[async_trait]
#[automock]
pub trait PaymentMethodRepository {
    async fn list_enabled(&self) -> Result<Vec<PaymentMethodEntity>>;
    async fn find_enabled_by_id(&self, method_id: Uuid)
    -> Result<Option<PaymentMethodEntity>>;
}
