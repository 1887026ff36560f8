use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::transcripts;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = transcripts)]
#[diesel(primary_key(transcript_id))]
pub struct TranscriptEntity {
    pub transcript_id: Uuid,
    pub recording_id: Uuid,
    pub version_no: i32,
    pub type_: String,
    pub language: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = transcripts)]
pub struct InsertTranscriptEntity {
    pub recording_id: Uuid,
    pub version_no: i32,
    pub type_: String,
    pub language: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
