use serde::Serialize;
use uuid::Uuid;

use crate::domain::entities::payment_methods::PaymentMethodEntity;

/// Storefront view of an enabled payment method. Fee columns are exposed so
/// the client can preview the final payable amount before checkout.
#[derive(Debug, Serialize)]
pub struct PaymentMethodDto {
    pub id: Uuid,
    pub name: String,
    pub provider: String,
    pub icon: Option<String>,
    pub handling_fee_fixed: i32,
    pub handling_fee_percent_bps: i32,
    pub sort: i32,
}

impl From<PaymentMethodEntity> for PaymentMethodDto {
    fn from(value: PaymentMethodEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            provider: value.provider,
            icon: value.icon,
            handling_fee_fixed: value.handling_fee_fixed,
            handling_fee_percent_bps: value.handling_fee_percent_bps,
            sort: value.sort,
        }
    }
}
