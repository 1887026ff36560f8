use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::recording_speakers::InsertRecordingSpeakerEntity;

#[async_trait]
#[automock]
pub trait RecordingSpeakerRepository {
    /// Labels already registered for the recording.
    async fn list_labels(&self, recording_id: Uuid) -> Result<Vec<String>>;

    async fn insert_many(&self, speakers: Vec<InsertRecordingSpeakerEntity>) -> Result<()>;
}
