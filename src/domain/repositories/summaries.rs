use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::summaries::{InsertSummaryEntity, SummaryEntity};

#[async_trait]
#[automock]
pub trait SummaryRepository {
    /// Highest version number already assigned for the recording, 0 if none.
    async fn max_version_no(&self, recording_id: Uuid) -> Result<i32>;

    /// Clears `is_latest` on every existing summary of the recording and
    /// inserts the new one in a single transaction. Version-uniqueness races
    /// surface as a retryable `VersionConflict` error.
    async fn create_version(&self, entity: InsertSummaryEntity) -> Result<SummaryEntity>;

    async fn exists_for_recording(&self, recording_id: Uuid) -> Result<bool>;
}
