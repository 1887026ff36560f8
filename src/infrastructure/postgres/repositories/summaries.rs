use anyhow::Result;
use async_trait::async_trait;
use diesel::dsl::max;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::{Connection, insert_into, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::summaries::{InsertSummaryEntity, SummaryEntity},
        repositories::summaries::SummaryRepository,
        value_objects::versioning::VersionConflict,
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::summaries},
};

pub struct SummaryPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl SummaryPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SummaryRepository for SummaryPostgres {
    async fn max_version_no(&self, recording_id: Uuid) -> Result<i32> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = summaries::table
            .filter(summaries::recording_id.eq(recording_id))
            .select(max(summaries::version_no))
            .first::<Option<i32>>(&mut conn)?;

        Ok(result.unwrap_or(0))
    }

    async fn create_version(&self, entity: InsertSummaryEntity) -> Result<SummaryEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = conn.transaction::<SummaryEntity, DieselError, _>(|tx| {
            update(summaries::table.filter(summaries::recording_id.eq(entity.recording_id)))
                .set(summaries::is_latest.eq(false))
                .execute(tx)?;

            insert_into(summaries::table)
                .values(&entity)
                .returning(SummaryEntity::as_returning())
                .get_result::<SummaryEntity>(tx)
        });

        match result {
            Ok(summary) => Ok(summary),
            Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                Err(anyhow::Error::new(VersionConflict))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn exists_for_recording(&self, recording_id: Uuid) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let count = summaries::table
            .filter(summaries::recording_id.eq(recording_id))
            .count()
            .get_result::<i64>(&mut conn)?;

        Ok(count > 0)
    }
}
