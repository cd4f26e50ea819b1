use anyhow::anyhow;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::{
    domain::value_objects::enums::{coupon_kinds::CouponKind, periods::Period},
    infra::db::postgres::schema::coupons,
};

#[derive(Debug, Clone)]
pub struct CouponEntity {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub kind: CouponKind,
    pub value: i32,
    /// Allow-list of plan ids; `None` means any plan.
    pub limit_plan_ids: Option<Vec<Uuid>>,
    /// Allow-list of billing periods; `None` means any period.
    pub limit_periods: Option<Vec<Period>>,
    /// Remaining global redemptions; `None` means unlimited.
    pub limit_use: Option<i32>,
    pub limit_use_with_user: Option<i32>,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Raw row used for Diesel queries. Allow-lists are jsonb; unlike plan tags
/// they gate money, so parse failures are errors rather than defaults.
#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = coupons)]
pub struct CouponRow {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub kind: String,
    pub value: i32,
    pub limit_plan_ids: Option<serde_json::Value>,
    pub limit_periods: Option<serde_json::Value>,
    pub limit_use: Option<i32>,
    pub limit_use_with_user: Option<i32>,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<CouponRow> for CouponEntity {
    type Error = anyhow::Error;

    fn try_from(value: CouponRow) -> Result<Self, Self::Error> {
        let kind = CouponKind::from_str(&value.kind)
            .ok_or_else(|| anyhow!("unknown coupon kind: {}", value.kind))?;
        let limit_plan_ids = value
            .limit_plan_ids
            .map(serde_json::from_value)
            .transpose()?;
        let limit_periods = value
            .limit_periods
            .map(serde_json::from_value)
            .transpose()?;

        Ok(Self {
            id: value.id,
            code: value.code,
            name: value.name,
            kind,
            value: value.value,
            limit_plan_ids,
            limit_periods,
            limit_use: value.limit_use,
            limit_use_with_user: value.limit_use_with_user,
            started_at: value.started_at,
            ended_at: value.ended_at,
            created_at: value.created_at,
        })
    }
}
