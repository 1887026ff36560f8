use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::audit_logs;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = audit_logs)]
#[diesel(primary_key(log_id))]
pub struct AuditLogEntity {
    pub log_id: i64,
    pub user_id: Option<Uuid>,
    pub action_type: String,
    pub resource_type: String,
    pub resource_id: Option<String>,
    pub status: String,
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = audit_logs)]
pub struct InsertAuditLogEntity {
    pub user_id: Option<Uuid>,
    pub action_type: String,
    pub resource_type: String,
    pub resource_id: Option<String>,
    pub status: String,
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}
