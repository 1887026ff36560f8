use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::{
    transcript_segments::{InsertTranscriptSegmentEntity, TranscriptSegmentEntity},
    transcripts::{InsertTranscriptEntity, TranscriptEntity},
};

#[async_trait]
#[automock]
pub trait TranscriptRepository {
    /// Highest version number already assigned for the recording, 0 if none.
    async fn max_version_no(&self, recording_id: Uuid) -> Result<i32>;

    /// Deactivates every existing transcript of the recording and inserts the
    /// new one in a single transaction. Losing the race on the
    /// `(recording_id, version_no)` uniqueness constraint yields a
    /// [`VersionConflict`](crate::domain::value_objects::versioning::VersionConflict)
    /// error the caller can retry on.
    async fn create_version(&self, entity: InsertTranscriptEntity) -> Result<TranscriptEntity>;

    async fn find_active_by_recording(
        &self,
        recording_id: Uuid,
    ) -> Result<Option<TranscriptEntity>>;

    async fn exists_for_recording(&self, recording_id: Uuid) -> Result<bool>;

    async fn insert_segments(&self, segments: Vec<InsertTranscriptSegmentEntity>) -> Result<()>;

    /// Full segment list of a transcript, ordered by `sequence`.
    async fn list_segments(&self, transcript_id: Uuid) -> Result<Vec<TranscriptSegmentEntity>>;
}
