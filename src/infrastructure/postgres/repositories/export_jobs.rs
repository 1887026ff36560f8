use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::{insert_into, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::export_jobs::{ExportJobEntity, InsertExportJobEntity},
        repositories::export_jobs::ExportJobRepository,
        value_objects::enums::export_statuses::ExportStatus,
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::export_jobs},
};

pub struct ExportJobPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl ExportJobPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl ExportJobRepository for ExportJobPostgres {
    async fn insert(&self, entity: InsertExportJobEntity) -> Result<ExportJobEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(export_jobs::table)
            .values(&entity)
            .returning(ExportJobEntity::as_returning())
            .get_result::<ExportJobEntity>(&mut conn)?;

        Ok(result)
    }

    async fn find_by_id(&self, export_id: Uuid) -> Result<Option<ExportJobEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = export_jobs::table
            .filter(export_jobs::export_id.eq(export_id))
            .select(ExportJobEntity::as_select())
            .first::<ExportJobEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn mark_processing(&self, export_id: Uuid) -> Result<ExportJobEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = update(export_jobs::table.filter(export_jobs::export_id.eq(export_id)))
            .set(export_jobs::status.eq(ExportStatus::Processing.to_string()))
            .returning(ExportJobEntity::as_returning())
            .get_result::<ExportJobEntity>(&mut conn)?;

        Ok(result)
    }

    async fn mark_done(
        &self,
        export_id: Uuid,
        file_path: String,
        completed_at: DateTime<Utc>,
    ) -> Result<ExportJobEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = update(export_jobs::table.filter(export_jobs::export_id.eq(export_id)))
            .set((
                export_jobs::status.eq(ExportStatus::Done.to_string()),
                export_jobs::file_path.eq(file_path),
                export_jobs::completed_at.eq(completed_at),
            ))
            .returning(ExportJobEntity::as_returning())
            .get_result::<ExportJobEntity>(&mut conn)?;

        Ok(result)
    }

    async fn mark_failed(
        &self,
        export_id: Uuid,
        error_message: String,
        completed_at: DateTime<Utc>,
    ) -> Result<ExportJobEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = update(export_jobs::table.filter(export_jobs::export_id.eq(export_id)))
            .set((
                export_jobs::status.eq(ExportStatus::Failed.to_string()),
                export_jobs::error_message.eq(error_message),
                export_jobs::completed_at.eq(completed_at),
            ))
            .returning(ExportJobEntity::as_returning())
            .get_result::<ExportJobEntity>(&mut conn)?;

        Ok(result)
    }
}
