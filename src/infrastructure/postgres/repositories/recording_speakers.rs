use anyhow::Result;
use async_trait::async_trait;
use diesel::insert_into;
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::recording_speakers::InsertRecordingSpeakerEntity,
        repositories::recording_speakers::RecordingSpeakerRepository,
    },
    infrastructure::postgres::{postgres_connection::PgPoolSquad, schema::recording_speakers},
};

pub struct RecordingSpeakerPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl RecordingSpeakerPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl RecordingSpeakerRepository for RecordingSpeakerPostgres {
    async fn list_labels(&self, recording_id: Uuid) -> Result<Vec<String>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = recording_speakers::table
            .filter(recording_speakers::recording_id.eq(recording_id))
            .select(recording_speakers::speaker_label)
            .order(recording_speakers::speaker_label.asc())
            .load::<String>(&mut conn)?;

        Ok(results)
    }

    async fn insert_many(&self, speakers: Vec<InsertRecordingSpeakerEntity>) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        insert_into(recording_speakers::table)
            .values(&speakers)
            .execute(&mut conn)?;

        Ok(())
    }
}
