use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::export_jobs;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = export_jobs)]
#[diesel(primary_key(export_id))]
pub struct ExportJobEntity {
    pub export_id: Uuid,
    pub user_id: Uuid,
    pub recording_id: Uuid,
    pub export_type: String,
    pub status: String,
    pub file_path: Option<String>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = export_jobs)]
pub struct InsertExportJobEntity {
    pub user_id: Uuid,
    pub recording_id: Uuid,
    pub export_type: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}
