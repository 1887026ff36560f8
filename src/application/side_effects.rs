use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

use crate::domain::{
    entities::audit_logs::InsertAuditLogEntity,
    repositories::audit_logs::AuditLogRepository,
    value_objects::enums::audit_actions::AuditAction,
};

/// Marks a side write as best-effort: a failure is logged and swallowed, the
/// parent operation continues. Used for audit logs, AI-usage logs, the
/// storage ledger, and storage-object cleanup during hard delete.
pub fn best_effort<T>(context: &str, result: anyhow::Result<T>) {
    if let Err(err) = result {
        warn!(error = ?err, "{} failed (non-fatal)", context);
    }
}

/// Audit sink wrapper carrying the best-effort contract, so call sites can't
/// accidentally turn an audit failure into a user-facing error.
pub struct AuditRecorder<A>
where
    A: AuditLogRepository + Send + Sync + 'static,
{
    audit_log_repository: Arc<A>,
}

impl<A> AuditRecorder<A>
where
    A: AuditLogRepository + Send + Sync + 'static,
{
    pub fn new(audit_log_repository: Arc<A>) -> Self {
        Self {
            audit_log_repository,
        }
    }

    pub async fn record(
        &self,
        user_id: Option<Uuid>,
        action: AuditAction,
        resource_type: &str,
        resource_id: Option<String>,
        details: Option<String>,
    ) {
        let entry = InsertAuditLogEntity {
            user_id,
            action_type: action.to_string(),
            resource_type: resource_type.to_string(),
            resource_id,
            status: "SUCCESS".to_string(),
            details,
            created_at: chrono::Utc::now(),
        };

        best_effort(
            "audit log write",
            self.audit_log_repository.record(entry).await,
        );
    }
}
