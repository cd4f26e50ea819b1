use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::{
    domain::value_objects::enums::periods::Period, infra::db::postgres::schema::plans,
};

#[derive(Debug, Clone)]
pub struct PlanEntity {
    pub id: Uuid,
    pub name: String,
    pub content: Option<String>,
    pub tags: Vec<String>,
    pub month_price: Option<i32>,
    pub quarter_price: Option<i32>,
    pub half_year_price: Option<i32>,
    pub year_price: Option<i32>,
    pub two_year_price: Option<i32>,
    pub three_year_price: Option<i32>,
    pub onetime_price: Option<i32>,
    pub reset_price: Option<i32>,
    pub is_active: bool,
    pub sort: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PlanEntity {
    /// Configured price for a billing period. `None` means the plan does not
    /// sell that period at all.
    pub fn price_for(&self, period: Period) -> Option<i32> {
        match period {
            Period::Month => self.month_price,
            Period::Quarter => self.quarter_price,
            Period::HalfYear => self.half_year_price,
            Period::Year => self.year_price,
            Period::TwoYear => self.two_year_price,
            Period::ThreeYear => self.three_year_price,
            Period::Onetime => self.onetime_price,
            Period::ResetTraffic => self.reset_price,
        }
    }
}

/// Raw row used for Diesel queries. Tags stay as JSON and are parsed into a
/// plain string list; they only drive storefront grouping.
#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = plans)]
pub struct PlanRow {
    pub id: Uuid,
    pub name: String,
    pub content: Option<String>,
    pub tags: Option<serde_json::Value>,
    pub month_price: Option<i32>,
    pub quarter_price: Option<i32>,
    pub half_year_price: Option<i32>,
    pub year_price: Option<i32>,
    pub two_year_price: Option<i32>,
    pub three_year_price: Option<i32>,
    pub onetime_price: Option<i32>,
    pub reset_price: Option<i32>,
    pub is_active: bool,
    pub sort: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PlanRow> for PlanEntity {
    fn from(value: PlanRow) -> Self {
        let tags = value
            .tags
            .and_then(|tags| serde_json::from_value(tags).ok())
            .unwrap_or_default();

        Self {
            id: value.id,
            name: value.name,
            content: value.content,
            tags,
            month_price: value.month_price,
            quarter_price: value.quarter_price,
            half_year_price: value.half_year_price,
            year_price: value.year_price,
            two_year_price: value.two_year_price,
            three_year_price: value.three_year_price,
            onetime_price: value.onetime_price,
            reset_price: value.reset_price,
            is_active: value.is_active,
            sort: value.sort,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}
