use anyhow::Result;
use async_trait::async_trait;
use diesel::insert_into;
use diesel::prelude::*;
use std::sync::Arc;

use crate::{
    domain::{
        entities::audit_logs::InsertAuditLogEntity, repositories::audit_logs::AuditLogRepository,
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::audit_logs},
};

pub struct AuditLogPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl AuditLogPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl AuditLogRepository for AuditLogPostgres {
    async fn record(&self, entry: InsertAuditLogEntity) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        insert_into(audit_logs::table)
            .values(&entry)
            .execute(&mut conn)?;

        Ok(())
    }
}
