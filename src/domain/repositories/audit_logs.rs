use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::audit_logs::InsertAuditLogEntity;

/// Append-only audit sink. Callers treat writes as best-effort and must not
/// fail their own operation when `record` errors.
#[async_trait]
#[automock]
pub trait AuditLogRepository {
    async fn record(&self, entry: InsertAuditLogEntity) -> Result<()>;
}
