use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::application::{
    errors::{CoreError, CoreResult},
    side_effects::best_effort,
};
use crate::domain::{
    entities::{
        ai_usage_logs::InsertAiUsageLogEntity,
        recording_speakers::InsertRecordingSpeakerEntity,
        transcript_segments::InsertTranscriptSegmentEntity,
        transcripts::{InsertTranscriptEntity, TranscriptEntity},
    },
    repositories::{
        ai_usage_logs::AiUsageLogRepository, object_storage::ObjectStorage,
        recording_speakers::RecordingSpeakerRepository, recordings::RecordingRepository,
        transcription_engine::TranscriptionEngine, transcripts::TranscriptRepository,
    },
    value_objects::{
        enums::{recording_statuses::RecordingStatus, transcript_types::TranscriptType},
        transcription::EngineSegment,
        versioning::VersionConflict,
    },
};

/// The original pipeline does not detect language; transcripts are tagged
/// with this fixed code. Detection is unresolved product intent.
const TRANSCRIPT_LANGUAGE: &str = "vi";

const DEFAULT_SEGMENT_CONFIDENCE: f64 = 1.0;

#[derive(Debug, Clone, Serialize)]
pub struct TranscriptDto {
    pub transcript_id: Uuid,
    pub recording_id: Uuid,
    pub version_no: i32,
    #[serde(rename = "type")]
    pub type_: String,
    pub language: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<TranscriptEntity> for TranscriptDto {
    fn from(value: TranscriptEntity) -> Self {
        Self {
            transcript_id: value.transcript_id,
            recording_id: value.recording_id,
            version_no: value.version_no,
            type_: value.type_,
            language: value.language,
            is_active: value.is_active,
            created_at: value.created_at,
        }
    }
}

pub struct TranscriptionUseCase<R, TR, SP, ST, E, AI>
where
    R: RecordingRepository + Send + Sync + 'static,
    TR: TranscriptRepository + Send + Sync + 'static,
    SP: RecordingSpeakerRepository + Send + Sync + 'static,
    ST: ObjectStorage + Send + Sync + 'static,
    E: TranscriptionEngine + Send + Sync + 'static,
    AI: AiUsageLogRepository + Send + Sync + 'static,
{
    recording_repository: Arc<R>,
    transcript_repository: Arc<TR>,
    speaker_repository: Arc<SP>,
    object_storage: Arc<ST>,
    engine: Arc<E>,
    ai_usage_repository: Arc<AI>,
}

impl<R, TR, SP, ST, E, AI> TranscriptionUseCase<R, TR, SP, ST, E, AI>
where
    R: RecordingRepository + Send + Sync + 'static,
    TR: TranscriptRepository + Send + Sync + 'static,
    SP: RecordingSpeakerRepository + Send + Sync + 'static,
    ST: ObjectStorage + Send + Sync + 'static,
    E: TranscriptionEngine + Send + Sync + 'static,
    AI: AiUsageLogRepository + Send + Sync + 'static,
{
    pub fn new(
        recording_repository: Arc<R>,
        transcript_repository: Arc<TR>,
        speaker_repository: Arc<SP>,
        object_storage: Arc<ST>,
        engine: Arc<E>,
        ai_usage_repository: Arc<AI>,
    ) -> Self {
        Self {
            recording_repository,
            transcript_repository,
            speaker_repository,
            object_storage,
            engine,
            ai_usage_repository,
        }
    }

    pub async fn transcribe(&self, user_id: Uuid, recording_id: Uuid) -> CoreResult<TranscriptDto> {
        let recording = self
            .recording_repository
            .find_by_id(recording_id)
            .await?
            .ok_or(CoreError::NotFound("recording"))?;

        if recording.user_id != user_id {
            return Err(CoreError::NotAuthorized("recording"));
        }

        if recording.status != RecordingStatus::Processed.to_string() {
            return Err(CoreError::InvalidState(format!(
                "recording is not processed yet (status {})",
                recording.status
            )));
        }

        let file_path = recording.file_path.clone().ok_or_else(|| {
            CoreError::InvalidState("recording has no audio file path".to_string())
        })?;

        let audio = self
            .object_storage
            .download(file_path.clone())
            .await?
            .ok_or(CoreError::NotFound("audio object"))?;

        let file_extension = file_path
            .rsplit('.')
            .next()
            .unwrap_or_default()
            .to_string();

        let segments = self
            .engine
            .transcribe(audio, file_extension)
            .await
            .map_err(|err| CoreError::EngineFailure(format!("transcription failed: {err:#}")))?;

        let transcript = self.allocate_version(recording_id).await?;

        self.transcript_repository
            .insert_segments(build_segment_rows(transcript.transcript_id, &segments))
            .await?;

        self.register_new_speakers(recording_id, &segments).await?;

        info!(
            %recording_id,
            transcript_id = %transcript.transcript_id,
            version_no = transcript.version_no,
            segments = segments.len(),
            "transcription stored"
        );

        best_effort(
            "AI usage log for transcription",
            self.ai_usage_repository
                .record(InsertAiUsageLogEntity {
                    user_id: Some(recording.user_id),
                    recording_id: Some(recording_id),
                    action_type: "TRANSCRIPTION".to_string(),
                    duration_seconds: recording.duration_seconds,
                    created_at: Utc::now(),
                })
                .await,
        );

        Ok(TranscriptDto::from(transcript))
    }

    /// Deactivate-then-insert runs inside the repository transaction; the
    /// `(recording_id, version_no)` uniqueness constraint closes the race
    /// between two concurrent transcribe calls, retried once here.
    async fn allocate_version(&self, recording_id: Uuid) -> CoreResult<TranscriptEntity> {
        for attempt in 0..2 {
            let next_version = self
                .transcript_repository
                .max_version_no(recording_id)
                .await?
                + 1;

            let result = self
                .transcript_repository
                .create_version(InsertTranscriptEntity {
                    recording_id,
                    version_no: next_version,
                    type_: TranscriptType::AiOriginal.to_string(),
                    language: TRANSCRIPT_LANGUAGE.to_string(),
                    is_active: true,
                    created_at: Utc::now(),
                })
                .await;

            match result {
                Ok(transcript) => return Ok(transcript),
                Err(err) if attempt == 0 && err.downcast_ref::<VersionConflict>().is_some() => {
                    continue;
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(CoreError::Internal(anyhow::anyhow!(
            "transcript version allocation kept conflicting"
        )))
    }

    async fn register_new_speakers(
        &self,
        recording_id: Uuid,
        segments: &[EngineSegment],
    ) -> CoreResult<()> {
        let existing = self.speaker_repository.list_labels(recording_id).await?;

        let mut new_speakers = Vec::new();
        for segment in segments {
            let label = &segment.speaker_label;
            if existing.iter().any(|known| known == label)
                || already_pending(&new_speakers, label)
            {
                continue;
            }
            new_speakers.push(InsertRecordingSpeakerEntity {
                recording_id,
                speaker_label: label.clone(),
                display_name: label.clone(),
                created_at: Utc::now(),
            });
        }

        if !new_speakers.is_empty() {
            self.speaker_repository.insert_many(new_speakers).await?;
        }

        Ok(())
    }
}

fn already_pending(pending: &[InsertRecordingSpeakerEntity], label: &str) -> bool {
    pending.iter().any(|entry| entry.speaker_label == label)
}

fn build_segment_rows(
    transcript_id: Uuid,
    segments: &[EngineSegment],
) -> Vec<InsertTranscriptSegmentEntity> {
    segments
        .iter()
        .enumerate()
        .map(|(index, segment)| InsertTranscriptSegmentEntity {
            transcript_id,
            // Sequence follows engine output order, not chronological order.
            sequence: index as i32 + 1,
            start_time: segment.start_time,
            end_time: segment.end_time,
            content: segment.content.clone(),
            speaker_label: segment.speaker_label.clone(),
            confidence: segment.confidence.unwrap_or(DEFAULT_SEGMENT_CONFIDENCE),
            is_user_edited: false,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        entities::recordings::RecordingEntity,
        repositories::{
            ai_usage_logs::MockAiUsageLogRepository, object_storage::MockObjectStorage,
            recording_speakers::MockRecordingSpeakerRepository,
            recordings::MockRecordingRepository, transcription_engine::MockTranscriptionEngine,
            transcripts::MockTranscriptRepository,
        },
    };
    use mockall::predicate::eq;

    fn processed_recording(recording_id: Uuid, user_id: Uuid) -> RecordingEntity {
        let now = Utc::now();
        RecordingEntity {
            recording_id,
            user_id,
            folder_id: None,
            title: "Standup".to_string(),
            file_path: Some("owner/standup.m4a".to_string()),
            original_file_name: Some("standup.m4a".to_string()),
            duration_seconds: Some(900.0),
            file_size_mb: Some(12.0),
            source_type: "RECORDED".to_string(),
            status: RecordingStatus::Processed.to_string(),
            is_pinned: false,
            is_trashed: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn engine_segment(start: f64, end: f64, speaker: &str, content: &str) -> EngineSegment {
        EngineSegment {
            start_time: start,
            end_time: end,
            content: content.to_string(),
            speaker_label: speaker.to_string(),
            confidence: None,
        }
    }

    fn stored_transcript(recording_id: Uuid, version_no: i32) -> TranscriptEntity {
        TranscriptEntity {
            transcript_id: Uuid::new_v4(),
            recording_id,
            version_no,
            type_: TranscriptType::AiOriginal.to_string(),
            language: TRANSCRIPT_LANGUAGE.to_string(),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    struct Mocks {
        recording_repo: MockRecordingRepository,
        transcript_repo: MockTranscriptRepository,
        speaker_repo: MockRecordingSpeakerRepository,
        storage: MockObjectStorage,
        engine: MockTranscriptionEngine,
        ai_usage_repo: MockAiUsageLogRepository,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                recording_repo: MockRecordingRepository::new(),
                transcript_repo: MockTranscriptRepository::new(),
                speaker_repo: MockRecordingSpeakerRepository::new(),
                storage: MockObjectStorage::new(),
                engine: MockTranscriptionEngine::new(),
                ai_usage_repo: MockAiUsageLogRepository::new(),
            }
        }

        fn allow_ai_usage(&mut self) {
            self.ai_usage_repo
                .expect_record()
                .returning(|_| Box::pin(async { Ok(()) }));
        }

        fn into_usecase(
            self,
        ) -> TranscriptionUseCase<
            MockRecordingRepository,
            MockTranscriptRepository,
            MockRecordingSpeakerRepository,
            MockObjectStorage,
            MockTranscriptionEngine,
            MockAiUsageLogRepository,
        > {
            TranscriptionUseCase::new(
                Arc::new(self.recording_repo),
                Arc::new(self.transcript_repo),
                Arc::new(self.speaker_repo),
                Arc::new(self.storage),
                Arc::new(self.engine),
                Arc::new(self.ai_usage_repo),
            )
        }
    }

    #[tokio::test]
    async fn rejects_recording_that_is_not_processed() {
        let owner = Uuid::new_v4();
        let recording_id = Uuid::new_v4();
        let mut mocks = Mocks::new();

        mocks
            .recording_repo
            .expect_find_by_id()
            .returning(move |recording_id| {
                Box::pin(async move {
                    let mut recording = processed_recording(recording_id, owner);
                    recording.status = RecordingStatus::Uploading.to_string();
                    recording.file_path = None;
                    Ok(Some(recording))
                })
            });

        let usecase = mocks.into_usecase();
        let denied = usecase.transcribe(owner, recording_id).await.unwrap_err();
        assert!(matches!(denied, CoreError::InvalidState(_)));
    }

    #[tokio::test]
    async fn foreign_recording_is_not_authorized() {
        let owner = Uuid::new_v4();
        let recording_id = Uuid::new_v4();
        let mut mocks = Mocks::new();

        mocks
            .recording_repo
            .expect_find_by_id()
            .returning(move |recording_id| {
                Box::pin(async move { Ok(Some(processed_recording(recording_id, owner))) })
            });

        let usecase = mocks.into_usecase();
        let denied = usecase
            .transcribe(Uuid::new_v4(), recording_id)
            .await
            .unwrap_err();
        assert!(matches!(denied, CoreError::NotAuthorized(_)));
    }

    #[tokio::test]
    async fn missing_audio_object_is_not_found() {
        let owner = Uuid::new_v4();
        let recording_id = Uuid::new_v4();
        let mut mocks = Mocks::new();

        mocks
            .recording_repo
            .expect_find_by_id()
            .returning(move |recording_id| {
                Box::pin(async move { Ok(Some(processed_recording(recording_id, owner))) })
            });
        mocks
            .storage
            .expect_download()
            .returning(|_| Box::pin(async { Ok(None) }));

        let usecase = mocks.into_usecase();
        let denied = usecase.transcribe(owner, recording_id).await.unwrap_err();
        assert!(matches!(denied, CoreError::NotFound("audio object")));
    }

    #[tokio::test]
    async fn engine_error_surfaces_as_engine_failure() {
        let owner = Uuid::new_v4();
        let recording_id = Uuid::new_v4();
        let mut mocks = Mocks::new();

        mocks
            .recording_repo
            .expect_find_by_id()
            .returning(move |recording_id| {
                Box::pin(async move { Ok(Some(processed_recording(recording_id, owner))) })
            });
        mocks
            .storage
            .expect_download()
            .returning(|_| Box::pin(async { Ok(Some(vec![0u8; 16])) }));
        mocks
            .engine
            .expect_transcribe()
            .returning(|_, _| Box::pin(async { Err(anyhow::anyhow!("model overloaded")) }));

        let usecase = mocks.into_usecase();
        let denied = usecase.transcribe(owner, recording_id).await.unwrap_err();
        assert!(matches!(denied, CoreError::EngineFailure(_)));
    }

    #[tokio::test]
    async fn sequence_follows_engine_order_not_timestamps() {
        let owner = Uuid::new_v4();
        let recording_id = Uuid::new_v4();
        let mut mocks = Mocks::new();

        mocks
            .recording_repo
            .expect_find_by_id()
            .returning(move |recording_id| {
                Box::pin(async move { Ok(Some(processed_recording(recording_id, owner))) })
            });
        mocks
            .storage
            .expect_download()
            .with(eq("owner/standup.m4a".to_string()))
            .returning(|_| Box::pin(async { Ok(Some(vec![0u8; 16])) }));
        mocks
            .engine
            .expect_transcribe()
            .withf(|_, file_extension| file_extension.as_str() == "m4a")
            .returning(|_, _| {
                Box::pin(async {
                    Ok(vec![
                        engine_segment(5.0, 6.0, "SPEAKER_1", "middle"),
                        engine_segment(0.0, 1.0, "SPEAKER_1", "first"),
                        engine_segment(10.0, 11.0, "SPEAKER_1", "last"),
                    ])
                })
            });
        mocks
            .transcript_repo
            .expect_max_version_no()
            .returning(|_| Box::pin(async { Ok(0) }));
        mocks
            .transcript_repo
            .expect_create_version()
            .withf(|entity| entity.version_no == 1 && entity.is_active)
            .returning(|entity| {
                Box::pin(async move { Ok(stored_transcript(entity.recording_id, entity.version_no)) })
            });
        mocks
            .transcript_repo
            .expect_insert_segments()
            .withf(|segments| {
                segments.len() == 3
                    && segments
                        .iter()
                        .map(|segment| segment.sequence)
                        .collect::<Vec<_>>()
                        == vec![1, 2, 3]
                    && segments[0].start_time == 5.0
                    && segments[1].start_time == 0.0
                    && segments[2].start_time == 10.0
                    && segments.iter().all(|segment| segment.confidence == 1.0)
            })
            .returning(|_| Box::pin(async { Ok(()) }));
        mocks
            .speaker_repo
            .expect_list_labels()
            .returning(|_| Box::pin(async { Ok(Vec::new()) }));
        mocks
            .speaker_repo
            .expect_insert_many()
            .withf(|speakers| speakers.len() == 1 && speakers[0].speaker_label == "SPEAKER_1")
            .returning(|_| Box::pin(async { Ok(()) }));
        mocks.allow_ai_usage();

        let usecase = mocks.into_usecase();
        let transcript = usecase.transcribe(owner, recording_id).await.unwrap();

        assert_eq!(transcript.version_no, 1);
        assert!(transcript.is_active);
        assert_eq!(transcript.type_, "AI_ORIGINAL");
    }

    #[tokio::test]
    async fn retranscribe_registers_only_unknown_speakers() {
        let owner = Uuid::new_v4();
        let recording_id = Uuid::new_v4();
        let mut mocks = Mocks::new();

        mocks
            .recording_repo
            .expect_find_by_id()
            .returning(move |recording_id| {
                Box::pin(async move { Ok(Some(processed_recording(recording_id, owner))) })
            });
        mocks
            .storage
            .expect_download()
            .returning(|_| Box::pin(async { Ok(Some(vec![0u8; 16])) }));
        mocks.engine.expect_transcribe().returning(|_, _| {
            Box::pin(async {
                Ok(vec![
                    engine_segment(0.0, 1.0, "SPEAKER_1", "hello again"),
                    engine_segment(1.0, 2.0, "SPEAKER_3", "new voice"),
                ])
            })
        });
        mocks
            .transcript_repo
            .expect_max_version_no()
            .returning(|_| Box::pin(async { Ok(1) }));
        mocks
            .transcript_repo
            .expect_create_version()
            .withf(|entity| entity.version_no == 2)
            .returning(|entity| {
                Box::pin(async move { Ok(stored_transcript(entity.recording_id, entity.version_no)) })
            });
        mocks
            .transcript_repo
            .expect_insert_segments()
            .returning(|_| Box::pin(async { Ok(()) }));
        mocks.speaker_repo.expect_list_labels().returning(|_| {
            Box::pin(async { Ok(vec!["SPEAKER_1".to_string(), "SPEAKER_2".to_string()]) })
        });
        // SPEAKER_1 is already registered (possibly renamed); only SPEAKER_3
        // may be inserted.
        mocks
            .speaker_repo
            .expect_insert_many()
            .withf(|speakers| {
                speakers.len() == 1
                    && speakers[0].speaker_label == "SPEAKER_3"
                    && speakers[0].display_name == "SPEAKER_3"
            })
            .returning(|_| Box::pin(async { Ok(()) }));
        mocks.allow_ai_usage();

        let usecase = mocks.into_usecase();
        let transcript = usecase.transcribe(owner, recording_id).await.unwrap();
        assert_eq!(transcript.version_no, 2);
    }

    #[tokio::test]
    async fn version_conflict_is_retried_once() {
        let owner = Uuid::new_v4();
        let recording_id = Uuid::new_v4();
        let mut mocks = Mocks::new();

        mocks
            .recording_repo
            .expect_find_by_id()
            .returning(move |recording_id| {
                Box::pin(async move { Ok(Some(processed_recording(recording_id, owner))) })
            });
        mocks
            .storage
            .expect_download()
            .returning(|_| Box::pin(async { Ok(Some(vec![0u8; 16])) }));
        mocks.engine.expect_transcribe().returning(|_, _| {
            Box::pin(async { Ok(vec![engine_segment(0.0, 1.0, "SPEAKER_1", "hi")]) })
        });

        let mut version_calls = 0;
        mocks
            .transcript_repo
            .expect_max_version_no()
            .times(2)
            .returning(move |_| {
                version_calls += 1;
                let version = version_calls;
                Box::pin(async move { Ok(version) })
            });
        let mut create_calls = 0;
        mocks
            .transcript_repo
            .expect_create_version()
            .times(2)
            .returning(move |entity| {
                create_calls += 1;
                let lost_race = create_calls == 1;
                Box::pin(async move {
                    if lost_race {
                        Err(anyhow::Error::new(VersionConflict))
                    } else {
                        Ok(stored_transcript(entity.recording_id, entity.version_no))
                    }
                })
            });
        mocks
            .transcript_repo
            .expect_insert_segments()
            .returning(|_| Box::pin(async { Ok(()) }));
        mocks
            .speaker_repo
            .expect_list_labels()
            .returning(|_| Box::pin(async { Ok(vec!["SPEAKER_1".to_string()]) }));
        mocks.allow_ai_usage();

        let usecase = mocks.into_usecase();
        let transcript = usecase.transcribe(owner, recording_id).await.unwrap();
        assert_eq!(transcript.version_no, 3);
    }

    #[tokio::test]
    async fn ai_usage_log_failure_does_not_fail_transcription() {
        let owner = Uuid::new_v4();
        let recording_id = Uuid::new_v4();
        let mut mocks = Mocks::new();

        mocks
            .recording_repo
            .expect_find_by_id()
            .returning(move |recording_id| {
                Box::pin(async move { Ok(Some(processed_recording(recording_id, owner))) })
            });
        mocks
            .storage
            .expect_download()
            .returning(|_| Box::pin(async { Ok(Some(vec![0u8; 16])) }));
        mocks.engine.expect_transcribe().returning(|_, _| {
            Box::pin(async { Ok(vec![engine_segment(0.0, 1.0, "SPEAKER_1", "hi")]) })
        });
        mocks
            .transcript_repo
            .expect_max_version_no()
            .returning(|_| Box::pin(async { Ok(0) }));
        mocks.transcript_repo.expect_create_version().returning(|entity| {
            Box::pin(async move { Ok(stored_transcript(entity.recording_id, entity.version_no)) })
        });
        mocks
            .transcript_repo
            .expect_insert_segments()
            .returning(|_| Box::pin(async { Ok(()) }));
        mocks
            .speaker_repo
            .expect_list_labels()
            .returning(|_| Box::pin(async { Ok(vec!["SPEAKER_1".to_string()]) }));
        mocks
            .ai_usage_repo
            .expect_record()
            .returning(|_| Box::pin(async { Err(anyhow::anyhow!("usage table unavailable")) }));

        let usecase = mocks.into_usecase();
        assert!(usecase.transcribe(owner, recording_id).await.is_ok());
    }
}
