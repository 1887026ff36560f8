use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::ai_usage_logs;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = ai_usage_logs)]
#[diesel(primary_key(usage_id))]
pub struct AiUsageLogEntity {
    pub usage_id: i64,
    pub user_id: Option<Uuid>,
    pub recording_id: Option<Uuid>,
    pub action_type: String,
    pub duration_seconds: Option<f64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = ai_usage_logs)]
pub struct InsertAiUsageLogEntity {
    pub user_id: Option<Uuid>,
    pub recording_id: Option<Uuid>,
    pub action_type: String,
    pub duration_seconds: Option<f64>,
    pub created_at: DateTime<Utc>,
}
