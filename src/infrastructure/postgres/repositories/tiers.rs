use anyhow::Result;
use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;

use crate::{
    domain::{entities::tiers::TierEntity, repositories::tiers::TierRepository},
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::tiers},
};

pub struct TierPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl TierPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl TierRepository for TierPostgres {
    async fn find_by_id(&self, tier_id: i32) -> Result<Option<TierEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = tiers::table
            .filter(tiers::tier_id.eq(tier_id))
            .select(TierEntity::as_select())
            .first::<TierEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }
}
