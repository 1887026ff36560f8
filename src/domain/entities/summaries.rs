use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::summaries;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = summaries)]
#[diesel(primary_key(summary_id))]
pub struct SummaryEntity {
    pub summary_id: Uuid,
    pub recording_id: Uuid,
    pub version_no: i32,
    pub type_: String,
    pub summary_style: String,
    pub content_structure: serde_json::Value,
    pub is_latest: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = summaries)]
pub struct InsertSummaryEntity {
    pub recording_id: Uuid,
    pub version_no: i32,
    pub type_: String,
    pub summary_style: String,
    pub content_structure: serde_json::Value,
    pub is_latest: bool,
    pub created_at: DateTime<Utc>,
}
