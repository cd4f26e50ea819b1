use serde::Serialize;
use uuid::Uuid;

use crate::domain::entities::plans::PlanEntity;

/// Fixed UUID recorded as the plan id on recharge orders, which are not
/// tied to any purchasable plan.
pub const RECHARGE_PLAN_ID: Uuid = Uuid::nil();

#[derive(Debug, Serialize)]
pub struct PlanDto {
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
}

impl From<PlanEntity> for PlanDto {
    fn from(value: PlanEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            content: value.content,
            tags: value.tags,
            month_price: value.month_price,
            quarter_price: value.quarter_price,
            half_year_price: value.half_year_price,
            year_price: value.year_price,
            two_year_price: value.two_year_price,
            three_year_price: value.three_year_price,
            onetime_price: value.onetime_price,
            reset_price: value.reset_price,
        }
    }
}
