use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::value_objects::transcription::EngineSegment;

/// External speech-to-text collaborator. Failures are engine failures, never
/// retried by the core.
#[async_trait]
#[automock]
pub trait TranscriptionEngine {
    async fn transcribe(&self, audio: Vec<u8>, file_extension: String)
    -> Result<Vec<EngineSegment>>;
}
