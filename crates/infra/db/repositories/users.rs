use anyhow::Result;
use async_trait::async_trait;
use diesel::{insert_into, prelude::*};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::app_users::{AppUserEntity, InsertAppUserEntity},
        repositories::users::UserDirectory,
    },
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::app_users},
};

pub struct UserPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl UserPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl UserDirectory for UserPostgres {
    /// Get-or-create by email. Credential handling stays with the identity
    /// service; this subsystem only needs the stable id.
    async fn resolve_or_register(&self, email: &str, _password: &str) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        if let Some(existing) = app_users::table
            .filter(app_users::email.eq(email))
            .select(AppUserEntity::as_select())
            .first::<AppUserEntity>(&mut conn)
            .optional()?
        {
            return Ok(existing.id);
        }

        let user_id = insert_into(app_users::table)
            .values(&InsertAppUserEntity {
                email: email.to_string(),
                status: "active".to_string(),
            })
            .on_conflict(app_users::email)
            .do_update()
            .set(app_users::email.eq(email))
            .returning(app_users::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(user_id)
    }
}
