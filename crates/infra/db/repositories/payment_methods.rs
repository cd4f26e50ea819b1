use anyhow::Result;
use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::payment_methods::PaymentMethodEntity,
        repositories::payment_methods::PaymentMethodRepository,
    },
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::payment_methods},
};

pub struct PaymentMethodPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PaymentMethodPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PaymentMethodRepository for PaymentMethodPostgres {
    async fn list_enabled(&self) -> Result<Vec<PaymentMethodEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = payment_methods::table
            .filter(payment_methods::enable.eq(true))
            .order(payment_methods::sort.asc())
            .select(PaymentMethodEntity::as_select())
            .load::<PaymentMethodEntity>(&mut conn)?;

        Ok(results)
    }

    async fn find_enabled_by_id(
        &self,
        method_id: Uuid,
    ) -> Result<Option<PaymentMethodEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = payment_methods::table
            .filter(payment_methods::id.eq(method_id))
            .filter(payment_methods::enable.eq(true))
            .select(PaymentMethodEntity::as_select())
            .first::<PaymentMethodEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }
}
