use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::application::{
    errors::{CoreError, CoreResult},
    side_effects::{AuditRecorder, best_effort},
};
use crate::domain::{
    entities::{
        ai_usage_logs::InsertAiUsageLogEntity,
        summaries::{InsertSummaryEntity, SummaryEntity},
        transcript_segments::TranscriptSegmentEntity,
    },
    repositories::{
        ai_usage_logs::AiUsageLogRepository, audit_logs::AuditLogRepository,
        recordings::RecordingRepository, summaries::SummaryRepository,
        summarization_engine::SummarizationEngine, transcripts::TranscriptRepository,
    },
    value_objects::{
        enums::{audit_actions::AuditAction, summary_types::SummaryType},
        summaries::SummaryStructure,
        versioning::VersionConflict,
    },
};

#[derive(Debug, Clone, Serialize)]
pub struct SummaryDto {
    pub summary_id: Uuid,
    pub recording_id: Uuid,
    pub version_no: i32,
    #[serde(rename = "type")]
    pub type_: String,
    pub summary_style: String,
    pub content_structure: serde_json::Value,
    pub is_latest: bool,
    pub created_at: DateTime<Utc>,
}

impl From<SummaryEntity> for SummaryDto {
    fn from(value: SummaryEntity) -> Self {
        Self {
            summary_id: value.summary_id,
            recording_id: value.recording_id,
            version_no: value.version_no,
            type_: value.type_,
            summary_style: value.summary_style,
            content_structure: value.content_structure,
            is_latest: value.is_latest,
            created_at: value.created_at,
        }
    }
}

pub struct SummarizationUseCase<R, TR, SU, E, AI, A>
where
    R: RecordingRepository + Send + Sync + 'static,
    TR: TranscriptRepository + Send + Sync + 'static,
    SU: SummaryRepository + Send + Sync + 'static,
    E: SummarizationEngine + Send + Sync + 'static,
    AI: AiUsageLogRepository + Send + Sync + 'static,
    A: AuditLogRepository + Send + Sync + 'static,
{
    recording_repository: Arc<R>,
    transcript_repository: Arc<TR>,
    summary_repository: Arc<SU>,
    engine: Arc<E>,
    ai_usage_repository: Arc<AI>,
    audit: Arc<AuditRecorder<A>>,
}

impl<R, TR, SU, E, AI, A> SummarizationUseCase<R, TR, SU, E, AI, A>
where
    R: RecordingRepository + Send + Sync + 'static,
    TR: TranscriptRepository + Send + Sync + 'static,
    SU: SummaryRepository + Send + Sync + 'static,
    E: SummarizationEngine + Send + Sync + 'static,
    AI: AiUsageLogRepository + Send + Sync + 'static,
    A: AuditLogRepository + Send + Sync + 'static,
{
    pub fn new(
        recording_repository: Arc<R>,
        transcript_repository: Arc<TR>,
        summary_repository: Arc<SU>,
        engine: Arc<E>,
        ai_usage_repository: Arc<AI>,
        audit: Arc<AuditRecorder<A>>,
    ) -> Self {
        Self {
            recording_repository,
            transcript_repository,
            summary_repository,
            engine,
            ai_usage_repository,
            audit,
        }
    }

    pub async fn summarize(
        &self,
        user_id: Uuid,
        recording_id: Uuid,
        summary_style: String,
    ) -> CoreResult<SummaryDto> {
        let recording = self
            .recording_repository
            .find_by_id(recording_id)
            .await?
            .ok_or(CoreError::NotFound("recording"))?;

        if recording.user_id != user_id {
            return Err(CoreError::NotAuthorized("recording"));
        }

        let transcript = self
            .transcript_repository
            .find_active_by_recording(recording_id)
            .await?
            .ok_or_else(|| {
                CoreError::InvalidState("no active transcript for recording".to_string())
            })?;

        let segments = self
            .transcript_repository
            .list_segments(transcript.transcript_id)
            .await?;

        let transcript_text = flatten_segments(&segments);

        // Summarization failures are soft: keep the fallback structure and
        // still persist a versioned summary.
        let structure = match self
            .engine
            .summarize(transcript_text, summary_style.clone())
            .await
        {
            Ok(structure) => structure,
            Err(err) => {
                warn!(%recording_id, error = ?err, "summarization engine failed, storing fallback");
                SummaryStructure::error_fallback()
            }
        };

        let summary = self
            .allocate_version(recording_id, summary_style, structure)
            .await?;

        info!(
            %recording_id,
            summary_id = %summary.summary_id,
            version_no = summary.version_no,
            "summary stored"
        );

        best_effort(
            "AI usage log for summarization",
            self.ai_usage_repository
                .record(InsertAiUsageLogEntity {
                    user_id: Some(user_id),
                    recording_id: Some(recording_id),
                    action_type: "SUMMARIZATION".to_string(),
                    duration_seconds: None,
                    created_at: Utc::now(),
                })
                .await,
        );

        self.audit
            .record(
                Some(user_id),
                AuditAction::GenerateSummary,
                "summary",
                Some(summary.summary_id.to_string()),
                None,
            )
            .await;

        Ok(SummaryDto::from(summary))
    }

    async fn allocate_version(
        &self,
        recording_id: Uuid,
        summary_style: String,
        structure: SummaryStructure,
    ) -> CoreResult<SummaryEntity> {
        let content_structure =
            serde_json::to_value(&structure).map_err(|err| CoreError::Internal(err.into()))?;

        for attempt in 0..2 {
            let next_version = self.summary_repository.max_version_no(recording_id).await? + 1;

            let result = self
                .summary_repository
                .create_version(InsertSummaryEntity {
                    recording_id,
                    version_no: next_version,
                    type_: SummaryType::AiGenerated.to_string(),
                    summary_style: summary_style.clone(),
                    content_structure: content_structure.clone(),
                    is_latest: true,
                    created_at: Utc::now(),
                })
                .await;

            match result {
                Ok(summary) => return Ok(summary),
                Err(err) if attempt == 0 && err.downcast_ref::<VersionConflict>().is_some() => {
                    continue;
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(CoreError::Internal(anyhow::anyhow!(
            "summary version allocation kept conflicting"
        )))
    }
}

/// Exact text handed to the summarization engine: one `speaker: content`
/// line per segment, in segment order.
fn flatten_segments(segments: &[TranscriptSegmentEntity]) -> String {
    segments
        .iter()
        .map(|segment| format!("{}: {}", segment.speaker_label, segment.content))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        entities::{recordings::RecordingEntity, transcripts::TranscriptEntity},
        repositories::{
            ai_usage_logs::MockAiUsageLogRepository, audit_logs::MockAuditLogRepository,
            recordings::MockRecordingRepository, summaries::MockSummaryRepository,
            summarization_engine::MockSummarizationEngine, transcripts::MockTranscriptRepository,
        },
    };

    fn processed_recording(recording_id: Uuid, user_id: Uuid) -> RecordingEntity {
        let now = Utc::now();
        RecordingEntity {
            recording_id,
            user_id,
            folder_id: None,
            title: "Planning".to_string(),
            file_path: Some("owner/planning.m4a".to_string()),
            original_file_name: Some("planning.m4a".to_string()),
            duration_seconds: Some(1800.0),
            file_size_mb: Some(25.0),
            source_type: "RECORDED".to_string(),
            status: "PROCESSED".to_string(),
            is_pinned: false,
            is_trashed: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn active_transcript(recording_id: Uuid) -> TranscriptEntity {
        TranscriptEntity {
            transcript_id: Uuid::new_v4(),
            recording_id,
            version_no: 1,
            type_: "AI_ORIGINAL".to_string(),
            language: "vi".to_string(),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn segment(sequence: i32, speaker: &str, content: &str) -> TranscriptSegmentEntity {
        TranscriptSegmentEntity {
            segment_id: Uuid::new_v4(),
            transcript_id: Uuid::new_v4(),
            sequence,
            start_time: f64::from(sequence),
            end_time: f64::from(sequence) + 1.0,
            content: content.to_string(),
            speaker_label: speaker.to_string(),
            confidence: 1.0,
            is_user_edited: false,
        }
    }

    fn stored_summary(entity: InsertSummaryEntity) -> SummaryEntity {
        SummaryEntity {
            summary_id: Uuid::new_v4(),
            recording_id: entity.recording_id,
            version_no: entity.version_no,
            type_: entity.type_,
            summary_style: entity.summary_style,
            content_structure: entity.content_structure,
            is_latest: entity.is_latest,
            created_at: entity.created_at,
        }
    }

    struct Mocks {
        recording_repo: MockRecordingRepository,
        transcript_repo: MockTranscriptRepository,
        summary_repo: MockSummaryRepository,
        engine: MockSummarizationEngine,
        ai_usage_repo: MockAiUsageLogRepository,
        audit_repo: MockAuditLogRepository,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                recording_repo: MockRecordingRepository::new(),
                transcript_repo: MockTranscriptRepository::new(),
                summary_repo: MockSummaryRepository::new(),
                engine: MockSummarizationEngine::new(),
                ai_usage_repo: MockAiUsageLogRepository::new(),
                audit_repo: MockAuditLogRepository::new(),
            }
        }

        fn owned_recording(&mut self, owner: Uuid) {
            self.recording_repo
                .expect_find_by_id()
                .returning(move |recording_id| {
                    Box::pin(async move { Ok(Some(processed_recording(recording_id, owner))) })
                });
        }

        fn allow_side_writes(&mut self) {
            self.ai_usage_repo
                .expect_record()
                .returning(|_| Box::pin(async { Ok(()) }));
            self.audit_repo
                .expect_record()
                .returning(|_| Box::pin(async { Ok(()) }));
        }

        fn into_usecase(
            self,
        ) -> SummarizationUseCase<
            MockRecordingRepository,
            MockTranscriptRepository,
            MockSummaryRepository,
            MockSummarizationEngine,
            MockAiUsageLogRepository,
            MockAuditLogRepository,
        > {
            SummarizationUseCase::new(
                Arc::new(self.recording_repo),
                Arc::new(self.transcript_repo),
                Arc::new(self.summary_repo),
                Arc::new(self.engine),
                Arc::new(self.ai_usage_repo),
                Arc::new(AuditRecorder::new(Arc::new(self.audit_repo))),
            )
        }
    }

    #[test]
    fn flattening_joins_speaker_and_content_lines() {
        let segments = vec![
            segment(1, "SPEAKER_1", "Hello"),
            segment(2, "SPEAKER_2", "Hi there"),
        ];

        assert_eq!(
            flatten_segments(&segments),
            "SPEAKER_1: Hello\nSPEAKER_2: Hi there"
        );
    }

    #[tokio::test]
    async fn foreign_recording_is_not_authorized() {
        let mut mocks = Mocks::new();
        mocks.owned_recording(Uuid::new_v4());

        let usecase = mocks.into_usecase();
        let denied = usecase
            .summarize(Uuid::new_v4(), Uuid::new_v4(), "MEETING".to_string())
            .await
            .unwrap_err();

        assert!(matches!(denied, CoreError::NotAuthorized(_)));
    }

    #[tokio::test]
    async fn missing_active_transcript_is_a_precondition_failure() {
        let owner = Uuid::new_v4();
        let mut mocks = Mocks::new();
        mocks.owned_recording(owner);
        mocks
            .transcript_repo
            .expect_find_active_by_recording()
            .returning(|_| Box::pin(async { Ok(None) }));

        let usecase = mocks.into_usecase();
        let denied = usecase
            .summarize(owner, Uuid::new_v4(), "MEETING".to_string())
            .await
            .unwrap_err();

        assert!(matches!(denied, CoreError::InvalidState(_)));
        assert!(denied.to_string().contains("no active transcript"));
    }

    #[tokio::test]
    async fn summarize_hands_flattened_text_to_the_engine() {
        let owner = Uuid::new_v4();
        let recording_id = Uuid::new_v4();
        let mut mocks = Mocks::new();

        mocks.owned_recording(owner);
        mocks
            .transcript_repo
            .expect_find_active_by_recording()
            .returning(|recording_id| {
                Box::pin(async move { Ok(Some(active_transcript(recording_id))) })
            });
        mocks.transcript_repo.expect_list_segments().returning(|_| {
            Box::pin(async {
                Ok(vec![
                    segment(1, "SPEAKER_1", "Hello"),
                    segment(2, "SPEAKER_2", "Hi there"),
                ])
            })
        });
        mocks
            .engine
            .expect_summarize()
            .withf(|text, style| {
                text.as_str() == "SPEAKER_1: Hello\nSPEAKER_2: Hi there"
                    && style.as_str() == "MEETING"
            })
            .returning(|_, _| {
                Box::pin(async {
                    Ok(SummaryStructure {
                        overview: "Short greeting.".to_string(),
                        key_points: vec!["Greetings exchanged".to_string()],
                        action_items: Vec::new(),
                    })
                })
            });
        mocks
            .summary_repo
            .expect_max_version_no()
            .returning(|_| Box::pin(async { Ok(0) }));
        mocks
            .summary_repo
            .expect_create_version()
            .withf(|entity| {
                entity.version_no == 1 && entity.is_latest && entity.type_ == "AI_GENERATED"
            })
            .returning(|entity| Box::pin(async move { Ok(stored_summary(entity)) }));
        mocks.allow_side_writes();

        let usecase = mocks.into_usecase();
        let summary = usecase
            .summarize(owner, recording_id, "MEETING".to_string())
            .await
            .unwrap();

        assert_eq!(summary.version_no, 1);
        assert!(summary.is_latest);
        assert_eq!(
            summary.content_structure["overview"],
            serde_json::json!("Short greeting.")
        );
    }

    #[tokio::test]
    async fn engine_failure_stores_fallback_summary() {
        let owner = Uuid::new_v4();
        let recording_id = Uuid::new_v4();
        let mut mocks = Mocks::new();

        mocks.owned_recording(owner);
        mocks
            .transcript_repo
            .expect_find_active_by_recording()
            .returning(|recording_id| {
                Box::pin(async move { Ok(Some(active_transcript(recording_id))) })
            });
        mocks
            .transcript_repo
            .expect_list_segments()
            .returning(|_| Box::pin(async { Ok(vec![segment(1, "SPEAKER_1", "Hello")]) }));
        mocks
            .engine
            .expect_summarize()
            .returning(|_, _| Box::pin(async { Err(anyhow::anyhow!("model error")) }));
        mocks
            .summary_repo
            .expect_max_version_no()
            .returning(|_| Box::pin(async { Ok(2) }));
        mocks
            .summary_repo
            .expect_create_version()
            .withf(|entity| {
                entity.version_no == 3
                    && entity.content_structure["overview"]
                        == serde_json::json!("Error generating summary.")
                    && entity.content_structure["key_points"]
                        .as_array()
                        .is_some_and(|points| points.is_empty())
            })
            .returning(|entity| Box::pin(async move { Ok(stored_summary(entity)) }));
        mocks.allow_side_writes();

        let usecase = mocks.into_usecase();
        let summary = usecase
            .summarize(owner, recording_id, "MEETING".to_string())
            .await
            .unwrap();

        assert_eq!(summary.version_no, 3);
    }

    #[tokio::test]
    async fn version_conflict_is_retried_once() {
        let owner = Uuid::new_v4();
        let recording_id = Uuid::new_v4();
        let mut mocks = Mocks::new();

        mocks.owned_recording(owner);
        mocks
            .transcript_repo
            .expect_find_active_by_recording()
            .returning(|recording_id| {
                Box::pin(async move { Ok(Some(active_transcript(recording_id))) })
            });
        mocks
            .transcript_repo
            .expect_list_segments()
            .returning(|_| Box::pin(async { Ok(vec![segment(1, "SPEAKER_1", "Hello")]) }));
        mocks.engine.expect_summarize().returning(|_, _| {
            Box::pin(async {
                Ok(SummaryStructure {
                    overview: "Ok".to_string(),
                    key_points: Vec::new(),
                    action_items: Vec::new(),
                })
            })
        });
        let mut version_calls = 0;
        mocks
            .summary_repo
            .expect_max_version_no()
            .times(2)
            .returning(move |_| {
                version_calls += 1;
                let version = version_calls;
                Box::pin(async move { Ok(version) })
            });
        let mut create_calls = 0;
        mocks
            .summary_repo
            .expect_create_version()
            .times(2)
            .returning(move |entity| {
                create_calls += 1;
                let lost_race = create_calls == 1;
                Box::pin(async move {
                    if lost_race {
                        Err(anyhow::Error::new(VersionConflict))
                    } else {
                        Ok(stored_summary(entity))
                    }
                })
            });
        mocks.allow_side_writes();

        let usecase = mocks.into_usecase();
        let summary = usecase
            .summarize(owner, recording_id, "MEETING".to_string())
            .await
            .unwrap();

        assert_eq!(summary.version_no, 3);
    }
}
