use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::value_objects::summaries::SummaryStructure;

#[async_trait]
#[automock]
pub trait SummarizationEngine {
    async fn summarize(&self, transcript_text: String, style: String) -> Result<SummaryStructure>;
}
