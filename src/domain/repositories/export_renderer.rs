use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::export_jobs::ExportJobEntity;

/// External document-rendering collaborator. Produces the artifact for a job
/// and returns the storage path it was written to.
#[async_trait]
#[automock]
pub trait ExportRenderer {
    async fn render(&self, job: ExportJobEntity) -> Result<String>;
}
