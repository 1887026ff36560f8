use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::export_jobs::{ExportJobEntity, InsertExportJobEntity};

#[async_trait]
#[automock]
pub trait ExportJobRepository {
    async fn insert(&self, entity: InsertExportJobEntity) -> Result<ExportJobEntity>;

    async fn find_by_id(&self, export_id: Uuid) -> Result<Option<ExportJobEntity>>;

    async fn mark_processing(&self, export_id: Uuid) -> Result<ExportJobEntity>;

    async fn mark_done(
        &self,
        export_id: Uuid,
        file_path: String,
        completed_at: DateTime<Utc>,
    ) -> Result<ExportJobEntity>;

    async fn mark_failed(
        &self,
        export_id: Uuid,
        error_message: String,
        completed_at: DateTime<Utc>,
    ) -> Result<ExportJobEntity>;
}
