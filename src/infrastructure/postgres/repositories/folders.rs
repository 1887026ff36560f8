use anyhow::Result;
use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{entities::folders::FolderEntity, repositories::folders::FolderRepository},
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::folders},
};

pub struct FolderPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl FolderPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl FolderRepository for FolderPostgres {
    async fn find_by_id(&self, folder_id: Uuid) -> Result<Option<FolderEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = folders::table
            .filter(folders::folder_id.eq(folder_id))
            .select(FolderEntity::as_select())
            .first::<FolderEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }
}
