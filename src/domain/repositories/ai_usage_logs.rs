use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::ai_usage_logs::InsertAiUsageLogEntity;

#[async_trait]
#[automock]
pub trait AiUsageLogRepository {
    async fn record(&self, entry: InsertAiUsageLogEntity) -> Result<()>;
}
