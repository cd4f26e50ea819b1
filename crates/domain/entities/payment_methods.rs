use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infra::db::postgres::schema::payment_methods;

/// Administrator-managed payment channel. Read-only from the order
/// subsystem's perspective.
#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = payment_methods)]
pub struct PaymentMethodEntity {
    pub id: Uuid,
    pub name: String,
    pub provider: String,
    pub icon: Option<String>,
    pub handling_fee_fixed: i32,
    /// Percent fee in basis points, so fee arithmetic stays integral.
    pub handling_fee_percent_bps: i32,
    pub enable: bool,
    pub sort: i32,
    pub created_at: DateTime<Utc>,
}
