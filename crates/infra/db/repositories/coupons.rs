use anyhow::Result;
use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;

use crate::{
    domain::{
        entities::coupons::{CouponEntity, CouponRow},
        repositories::coupons::CouponRepository,
    },
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::coupons},
};

pub struct CouponPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl CouponPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl CouponRepository for CouponPostgres {
    async fn find_by_code(&self, code: &str) -> Result<Option<CouponEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = coupons::table
            .filter(coupons::code.eq(code))
            .select(CouponRow::as_select())
            .first::<CouponRow>(&mut conn)
            .optional()?;

        row.map(CouponEntity::try_from).transpose()
    }
}
