use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::{delete, insert_into, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::recordings::{
            InsertRecordingEntity, RecordingDetailsChangeset, RecordingEntity,
        },
        repositories::recordings::RecordingRepository,
        value_objects::{
            enums::recording_statuses::RecordingStatus,
            recordings::{Pagination, RecordingListFilter},
        },
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{recording_tags, recordings},
    },
};

pub struct RecordingPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl RecordingPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }

    fn filtered<'a>(
        user_id: Uuid,
        filter: &'a RecordingListFilter,
    ) -> recordings::BoxedQuery<'a, diesel::pg::Pg> {
        let mut query = recordings::table
            .filter(recordings::user_id.eq(user_id))
            .filter(recordings::is_trashed.eq(filter.trashed))
            .into_boxed();

        if let Some(folder_id) = filter.folder_id {
            query = query.filter(recordings::folder_id.eq(folder_id));
        }

        if let Some(search) = &filter.search {
            query = query.filter(recordings::title.ilike(format!("%{}%", search)));
        }

        if let Some(tag) = &filter.tag {
            query = query.filter(
                recordings::recording_id.eq_any(
                    recording_tags::table
                        .filter(recording_tags::tag.eq(tag))
                        .select(recording_tags::recording_id),
                ),
            );
        }

        query
    }
}

#[async_trait]
impl RecordingRepository for RecordingPostgres {
    async fn insert(&self, entity: InsertRecordingEntity) -> Result<RecordingEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(recordings::table)
            .values(&entity)
            .returning(RecordingEntity::as_returning())
            .get_result::<RecordingEntity>(&mut conn)?;

        Ok(result)
    }

    async fn find_by_id(&self, recording_id: Uuid) -> Result<Option<RecordingEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = recordings::table
            .filter(recordings::recording_id.eq(recording_id))
            .select(RecordingEntity::as_select())
            .first::<RecordingEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn count_by_user(&self, user_id: Uuid) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = recordings::table
            .filter(recordings::user_id.eq(user_id))
            .count()
            .get_result::<i64>(&mut conn)?;

        Ok(result)
    }

    async fn mark_uploaded(
        &self,
        recording_id: Uuid,
        file_path: String,
        original_file_name: Option<String>,
        file_size_mb: f64,
        duration_seconds: f64,
    ) -> Result<RecordingEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = update(recordings::table.filter(recordings::recording_id.eq(recording_id)))
            .set((
                recordings::file_path.eq(file_path),
                recordings::original_file_name.eq(original_file_name),
                recordings::file_size_mb.eq(file_size_mb),
                recordings::duration_seconds.eq(duration_seconds),
                recordings::status.eq(RecordingStatus::Processed.to_string()),
                recordings::updated_at.eq(Utc::now()),
            ))
            .returning(RecordingEntity::as_returning())
            .get_result::<RecordingEntity>(&mut conn)?;

        Ok(result)
    }

    async fn update_details(
        &self,
        recording_id: Uuid,
        changeset: RecordingDetailsChangeset,
    ) -> Result<RecordingEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = update(recordings::table.filter(recordings::recording_id.eq(recording_id)))
            .set(&changeset)
            .returning(RecordingEntity::as_returning())
            .get_result::<RecordingEntity>(&mut conn)?;

        Ok(result)
    }

    async fn set_trashed(
        &self,
        recording_id: Uuid,
        trashed: bool,
        deleted_at: Option<DateTime<Utc>>,
    ) -> Result<RecordingEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = update(recordings::table.filter(recordings::recording_id.eq(recording_id)))
            .set((
                recordings::is_trashed.eq(trashed),
                recordings::deleted_at.eq(deleted_at),
                recordings::updated_at.eq(Utc::now()),
            ))
            .returning(RecordingEntity::as_returning())
            .get_result::<RecordingEntity>(&mut conn)?;

        Ok(result)
    }

    async fn delete(&self, recording_id: Uuid) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        delete(recordings::table.filter(recordings::recording_id.eq(recording_id)))
            .execute(&mut conn)?;

        Ok(())
    }

    async fn list(
        &self,
        user_id: Uuid,
        filter: RecordingListFilter,
        pagination: Pagination,
    ) -> Result<(Vec<RecordingEntity>, i64)> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let total = Self::filtered(user_id, &filter)
            .count()
            .get_result::<i64>(&mut conn)?;

        let page = Self::filtered(user_id, &filter)
            .select(RecordingEntity::as_select())
            .order(recordings::created_at.desc())
            .limit(pagination.page_size)
            .offset(pagination.offset())
            .load::<RecordingEntity>(&mut conn)?;

        Ok((page, total))
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<RecordingEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = recordings::table
            .filter(recordings::user_id.eq(user_id))
            .select(RecordingEntity::as_select())
            .order(recordings::created_at.desc())
            .load::<RecordingEntity>(&mut conn)?;

        Ok(results)
    }
}
