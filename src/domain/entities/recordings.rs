use chrono::{DateTime, Utc};
use diesel::{AsChangeset, prelude::*};
use uuid::Uuid;

use crate::infrastructure::postgres::schema::recordings;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = recordings)]
#[diesel(primary_key(recording_id))]
pub struct RecordingEntity {
    pub recording_id: Uuid,
    pub user_id: Uuid,
    pub folder_id: Option<Uuid>,
    pub title: String,
    pub file_path: Option<String>,
    pub original_file_name: Option<String>,
    pub duration_seconds: Option<f64>,
    pub file_size_mb: Option<f64>,
    pub source_type: String,
    pub status: String,
    pub is_pinned: bool,
    pub is_trashed: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = recordings)]
pub struct InsertRecordingEntity {
    pub user_id: Uuid,
    pub folder_id: Option<Uuid>,
    pub title: String,
    pub source_type: String,
    pub status: String,
    pub is_pinned: bool,
    pub is_trashed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update issued by `update_details`. `folder_id` is doubly optional
/// so a recording can be moved out of its folder (`Some(None)`).
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = recordings)]
pub struct RecordingDetailsChangeset {
    pub title: Option<String>,
    pub folder_id: Option<Option<Uuid>>,
    pub is_pinned: Option<bool>,
    pub updated_at: DateTime<Utc>,
}
