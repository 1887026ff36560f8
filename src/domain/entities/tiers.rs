use diesel::prelude::*;

use crate::infrastructure::postgres::schema::tiers;

/// Quota policy attached to a user. A user without a tier is unlimited.
#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = tiers)]
#[diesel(primary_key(tier_id))]
pub struct TierEntity {
    pub tier_id: i32,
    pub name: String,
    pub max_storage_mb: i64,
    pub max_recordings: i32,
    pub max_duration_per_recording_sec: i32,
    pub max_ai_minutes_monthly: Option<i32>,
    pub allow_diarization: bool,
    pub allow_summarization: bool,
}
