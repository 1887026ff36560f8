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
        entities::{
            transcript_segments::{InsertTranscriptSegmentEntity, TranscriptSegmentEntity},
            transcripts::{InsertTranscriptEntity, TranscriptEntity},
        },
        repositories::transcripts::TranscriptRepository,
        value_objects::versioning::VersionConflict,
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{transcript_segments, transcripts},
    },
};

pub struct TranscriptPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl TranscriptPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl TranscriptRepository for TranscriptPostgres {
    async fn max_version_no(&self, recording_id: Uuid) -> Result<i32> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = transcripts::table
            .filter(transcripts::recording_id.eq(recording_id))
            .select(max(transcripts::version_no))
            .first::<Option<i32>>(&mut conn)?;

        Ok(result.unwrap_or(0))
    }

    async fn create_version(&self, entity: InsertTranscriptEntity) -> Result<TranscriptEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = conn.transaction::<TranscriptEntity, DieselError, _>(|tx| {
            update(
                transcripts::table.filter(transcripts::recording_id.eq(entity.recording_id)),
            )
            .set(transcripts::is_active.eq(false))
            .execute(tx)?;

            insert_into(transcripts::table)
                .values(&entity)
                .returning(TranscriptEntity::as_returning())
                .get_result::<TranscriptEntity>(tx)
        });

        match result {
            Ok(transcript) => Ok(transcript),
            // The (recording_id, version_no) unique index lost a race;
            // surfaced as a typed conflict so callers can re-read and retry.
            Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                Err(anyhow::Error::new(VersionConflict))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn find_active_by_recording(
        &self,
        recording_id: Uuid,
    ) -> Result<Option<TranscriptEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = transcripts::table
            .filter(transcripts::recording_id.eq(recording_id))
            .filter(transcripts::is_active.eq(true))
            .select(TranscriptEntity::as_select())
            .first::<TranscriptEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn exists_for_recording(&self, recording_id: Uuid) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let count = transcripts::table
            .filter(transcripts::recording_id.eq(recording_id))
            .count()
            .get_result::<i64>(&mut conn)?;

        Ok(count > 0)
    }

    async fn insert_segments(&self, segments: Vec<InsertTranscriptSegmentEntity>) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        insert_into(transcript_segments::table)
            .values(&segments)
            .execute(&mut conn)?;

        Ok(())
    }

    async fn list_segments(&self, transcript_id: Uuid) -> Result<Vec<TranscriptSegmentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = transcript_segments::table
            .filter(transcript_segments::transcript_id.eq(transcript_id))
            .select(TranscriptSegmentEntity::as_select())
            .order(transcript_segments::sequence.asc())
            .load::<TranscriptSegmentEntity>(&mut conn)?;

        Ok(results)
    }
}
