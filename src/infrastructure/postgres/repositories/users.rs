use anyhow::Result;
use async_trait::async_trait;
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::Double;
use diesel::update;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{entities::users::UserEntity, repositories::users::UserRepository},
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::users},
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
impl UserRepository for UserPostgres {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = users::table
            .filter(users::user_id.eq(user_id))
            .select(UserEntity::as_select())
            .first::<UserEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn adjust_storage_used(&self, user_id: Uuid, delta_mb: f64) -> Result<f64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        // Single conditional update so concurrent adjustments serialize on
        // the row; the ledger never drops below zero.
        let updated = update(users::table.filter(users::user_id.eq(user_id)))
            .set(users::storage_used_mb.eq(sql::<Double>("GREATEST(storage_used_mb + ")
                .bind::<Double, _>(delta_mb)
                .sql(", 0)")))
            .returning(users::storage_used_mb)
            .get_result::<f64>(&mut conn)?;

        Ok(updated)
    }
}
