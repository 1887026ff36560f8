use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::recording_speakers;

/// One row per distinct speaker label discovered across all transcripts of a
/// recording. `display_name` starts equal to the label and may be renamed.
#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = recording_speakers)]
#[diesel(primary_key(speaker_id))]
pub struct RecordingSpeakerEntity {
    pub speaker_id: Uuid,
    pub recording_id: Uuid,
    pub speaker_label: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = recording_speakers)]
pub struct InsertRecordingSpeakerEntity {
    pub recording_id: Uuid,
    pub speaker_label: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}
