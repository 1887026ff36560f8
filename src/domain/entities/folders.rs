use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::folders;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = folders)]
#[diesel(primary_key(folder_id))]
pub struct FolderEntity {
    pub folder_id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub parent_folder_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}
