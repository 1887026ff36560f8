use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::recordings::{InsertRecordingEntity, RecordingDetailsChangeset, RecordingEntity},
    value_objects::recordings::{Pagination, RecordingListFilter},
};

#[async_trait]
#[automock]
pub trait RecordingRepository {
    async fn insert(&self, entity: InsertRecordingEntity) -> Result<RecordingEntity>;

    async fn find_by_id(&self, recording_id: Uuid) -> Result<Option<RecordingEntity>>;

    /// Count of all recordings owned by the user, trashed included; trashed
    /// recordings still occupy quota until hard-deleted.
    async fn count_by_user(&self, user_id: Uuid) -> Result<i64>;

    async fn mark_uploaded(
        &self,
        recording_id: Uuid,
        file_path: String,
        original_file_name: Option<String>,
        file_size_mb: f64,
        duration_seconds: f64,
    ) -> Result<RecordingEntity>;

    async fn update_details(
        &self,
        recording_id: Uuid,
        changeset: RecordingDetailsChangeset,
    ) -> Result<RecordingEntity>;

    async fn set_trashed(
        &self,
        recording_id: Uuid,
        trashed: bool,
        deleted_at: Option<DateTime<Utc>>,
    ) -> Result<RecordingEntity>;

    /// Removes the row; child rows cascade at the database level.
    async fn delete(&self, recording_id: Uuid) -> Result<()>;

    /// Page of recordings for one owner plus the total count matching the
    /// filter, newest first.
    async fn list(
        &self,
        user_id: Uuid,
        filter: RecordingListFilter,
        pagination: Pagination,
    ) -> Result<(Vec<RecordingEntity>, i64)>;

    /// Admin-scoped read: every recording of the given user, newest first.
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<RecordingEntity>>;
}
