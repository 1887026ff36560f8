use anyhow::Result;
use async_trait::async_trait;
use diesel::insert_into;
use diesel::prelude::*;
use std::sync::Arc;

use crate::{
    domain::{
        entities::ai_usage_logs::InsertAiUsageLogEntity,
        repositories::ai_usage_logs::AiUsageLogRepository,
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::ai_usage_logs},
};

pub struct AiUsageLogPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl AiUsageLogPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl AiUsageLogRepository for AiUsageLogPostgres {
    async fn record(&self, entry: InsertAiUsageLogEntity) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        insert_into(ai_usage_logs::table)
            .values(&entry)
            .execute(&mut conn)?;

        Ok(())
    }
}
