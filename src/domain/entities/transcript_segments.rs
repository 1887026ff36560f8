use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::transcript_segments;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = transcript_segments)]
#[diesel(primary_key(segment_id))]
pub struct TranscriptSegmentEntity {
    pub segment_id: Uuid,
    pub transcript_id: Uuid,
    pub sequence: i32,
    pub start_time: f64,
    pub end_time: f64,
    pub content: String,
    pub speaker_label: String,
    pub confidence: f64,
    pub is_user_edited: bool,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = transcript_segments)]
pub struct InsertTranscriptSegmentEntity {
    pub transcript_id: Uuid,
    pub sequence: i32,
    pub start_time: f64,
    pub end_time: f64,
    pub content: String,
    pub speaker_label: String,
    pub confidence: f64,
    pub is_user_edited: bool,
}
