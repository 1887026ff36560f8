use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::users;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = users)]
#[diesel(primary_key(user_id))]
pub struct UserEntity {
    pub user_id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub tier_id: Option<i32>,
    pub role: String,
    pub is_active: bool,
    pub storage_used_mb: f64,
    pub created_at: DateTime<Utc>,
}
