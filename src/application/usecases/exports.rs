use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

use crate::application::{
    errors::{CoreError, CoreResult},
    side_effects::AuditRecorder,
};
use crate::domain::{
    entities::{
        export_jobs::{ExportJobEntity, InsertExportJobEntity},
        recordings::RecordingEntity,
    },
    repositories::{
        audit_logs::AuditLogRepository, export_jobs::ExportJobRepository,
        export_renderer::ExportRenderer, object_storage::ObjectStorage,
        recordings::RecordingRepository, summaries::SummaryRepository,
        transcripts::TranscriptRepository,
    },
    value_objects::enums::{
        audit_actions::AuditAction, export_statuses::ExportStatus, export_types::ExportType,
        recording_statuses::RecordingStatus,
    },
};

const DOWNLOAD_URL_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone, Serialize)]
pub struct ExportJobDto {
    pub export_id: Uuid,
    pub recording_id: Uuid,
    pub export_type: String,
    pub status: String,
    pub error_message: Option<String>,
    pub download_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl ExportJobDto {
    fn from_entity(entity: ExportJobEntity, download_url: Option<String>) -> Self {
        Self {
            export_id: entity.export_id,
            recording_id: entity.recording_id,
            export_type: entity.export_type,
            status: entity.status,
            error_message: entity.error_message,
            download_url,
            created_at: entity.created_at,
            completed_at: entity.completed_at,
        }
    }
}

pub struct ExportsUseCase<R, EJ, TR, SU, RD, ST, A>
where
    R: RecordingRepository + Send + Sync + 'static,
    EJ: ExportJobRepository + Send + Sync + 'static,
    TR: TranscriptRepository + Send + Sync + 'static,
    SU: SummaryRepository + Send + Sync + 'static,
    RD: ExportRenderer + Send + Sync + 'static,
    ST: ObjectStorage + Send + Sync + 'static,
    A: AuditLogRepository + Send + Sync + 'static,
{
    recording_repository: Arc<R>,
    export_job_repository: Arc<EJ>,
    transcript_repository: Arc<TR>,
    summary_repository: Arc<SU>,
    renderer: Arc<RD>,
    object_storage: Arc<ST>,
    audit: Arc<AuditRecorder<A>>,
}

impl<R, EJ, TR, SU, RD, ST, A> ExportsUseCase<R, EJ, TR, SU, RD, ST, A>
where
    R: RecordingRepository + Send + Sync + 'static,
    EJ: ExportJobRepository + Send + Sync + 'static,
    TR: TranscriptRepository + Send + Sync + 'static,
    SU: SummaryRepository + Send + Sync + 'static,
    RD: ExportRenderer + Send + Sync + 'static,
    ST: ObjectStorage + Send + Sync + 'static,
    A: AuditLogRepository + Send + Sync + 'static,
{
    pub fn new(
        recording_repository: Arc<R>,
        export_job_repository: Arc<EJ>,
        transcript_repository: Arc<TR>,
        summary_repository: Arc<SU>,
        renderer: Arc<RD>,
        object_storage: Arc<ST>,
        audit: Arc<AuditRecorder<A>>,
    ) -> Self {
        Self {
            recording_repository,
            export_job_repository,
            transcript_repository,
            summary_repository,
            renderer,
            object_storage,
            audit,
        }
    }

    /// Validates the request and records a PENDING job. Content
    /// preconditions are re-checked here so an impossible job is rejected
    /// before anything is persisted.
    pub async fn create(
        &self,
        user_id: Uuid,
        recording_id: Uuid,
        raw_export_type: &str,
    ) -> CoreResult<ExportJobDto> {
        let export_type = ExportType::try_from(raw_export_type)
            .map_err(|err| CoreError::Validation(err.to_string()))?;

        let recording = self.find_owned(user_id, recording_id).await?;

        if recording.status != RecordingStatus::Processed.to_string() {
            return Err(CoreError::InvalidState(format!(
                "recording is {}, only processed recordings can be exported",
                recording.status
            )));
        }

        if export_type.requires_transcript()
            && !self
                .transcript_repository
                .exists_for_recording(recording_id)
                .await?
        {
            return Err(CoreError::InvalidState(
                "recording has no transcript to export".to_string(),
            ));
        }

        if export_type.requires_summary()
            && !self
                .summary_repository
                .exists_for_recording(recording_id)
                .await?
        {
            return Err(CoreError::InvalidState(
                "recording has no summary to export".to_string(),
            ));
        }

        let job = self
            .export_job_repository
            .insert(InsertExportJobEntity {
                user_id,
                recording_id,
                export_type: export_type.to_string(),
                status: ExportStatus::Pending.to_string(),
                created_at: Utc::now(),
            })
            .await?;

        info!(export_id = %job.export_id, %recording_id, export_type = %export_type, "export job queued");

        self.audit
            .record(
                Some(user_id),
                AuditAction::CreateExport,
                "export_job",
                Some(job.export_id.to_string()),
                Some(format!("type={}", export_type)),
            )
            .await;

        Ok(ExportJobDto::from_entity(job, None))
    }

    /// Drives a queued job to a terminal state. Renderer failures land in
    /// FAILED with the message preserved; they never propagate.
    pub async fn process(&self, export_id: Uuid) -> CoreResult<()> {
        let job = self.export_job_repository.mark_processing(export_id).await?;

        match self.renderer.render(job).await {
            Ok(file_path) => {
                self.export_job_repository
                    .mark_done(export_id, file_path, Utc::now())
                    .await?;
                info!(%export_id, "export job completed");
            }
            Err(err) => {
                warn!(%export_id, error = ?err, "export rendering failed");
                self.export_job_repository
                    .mark_failed(export_id, err.to_string(), Utc::now())
                    .await?;
            }
        }

        Ok(())
    }

    pub async fn get(&self, user_id: Uuid, export_id: Uuid) -> CoreResult<ExportJobDto> {
        let job = self
            .export_job_repository
            .find_by_id(export_id)
            .await?
            .ok_or(CoreError::NotFound("export job"))?;

        if job.user_id != user_id {
            return Err(CoreError::NotAuthorized("export job"));
        }

        let download_url = match (&job.status, &job.file_path) {
            (status, Some(file_path)) if status == &ExportStatus::Done.to_string() => Some(
                self.object_storage
                    .presign_download(file_path.clone(), DOWNLOAD_URL_TTL)
                    .await?,
            ),
            _ => None,
        };

        Ok(ExportJobDto::from_entity(job, download_url))
    }

    async fn find_owned(&self, user_id: Uuid, recording_id: Uuid) -> CoreResult<RecordingEntity> {
        let recording = self
            .recording_repository
            .find_by_id(recording_id)
            .await?
            .ok_or(CoreError::NotFound("recording"))?;

        if recording.user_id != user_id {
            return Err(CoreError::NotAuthorized("recording"));
        }

        Ok(recording)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::{
        audit_logs::MockAuditLogRepository, export_jobs::MockExportJobRepository,
        export_renderer::MockExportRenderer, object_storage::MockObjectStorage,
        recordings::MockRecordingRepository, summaries::MockSummaryRepository,
        transcripts::MockTranscriptRepository,
    };

    fn processed_recording(recording_id: Uuid, user_id: Uuid) -> RecordingEntity {
        RecordingEntity {
            recording_id,
            user_id,
            folder_id: None,
            title: "Weekly sync".to_string(),
            file_path: Some(format!("{}/audio.m4a", user_id)),
            original_file_name: Some("audio.m4a".to_string()),
            duration_seconds: Some(600.0),
            file_size_mb: Some(12.0),
            source_type: "RECORDED".to_string(),
            status: "PROCESSED".to_string(),
            is_pinned: false,
            is_trashed: false,
            deleted_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn stored_job(entity: InsertExportJobEntity) -> ExportJobEntity {
        ExportJobEntity {
            export_id: Uuid::new_v4(),
            user_id: entity.user_id,
            recording_id: entity.recording_id,
            export_type: entity.export_type,
            status: entity.status,
            file_path: None,
            error_message: None,
            created_at: entity.created_at,
            completed_at: None,
        }
    }

    fn pending_job(export_id: Uuid, user_id: Uuid, export_type: &str) -> ExportJobEntity {
        ExportJobEntity {
            export_id,
            user_id,
            recording_id: Uuid::new_v4(),
            export_type: export_type.to_string(),
            status: "PENDING".to_string(),
            file_path: None,
            error_message: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    struct Mocks {
        recording_repo: MockRecordingRepository,
        export_job_repo: MockExportJobRepository,
        transcript_repo: MockTranscriptRepository,
        summary_repo: MockSummaryRepository,
        renderer: MockExportRenderer,
        object_storage: MockObjectStorage,
        audit_repo: MockAuditLogRepository,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                recording_repo: MockRecordingRepository::new(),
                export_job_repo: MockExportJobRepository::new(),
                transcript_repo: MockTranscriptRepository::new(),
                summary_repo: MockSummaryRepository::new(),
                renderer: MockExportRenderer::new(),
                object_storage: MockObjectStorage::new(),
                audit_repo: MockAuditLogRepository::new(),
            }
        }

        fn allow_audit(&mut self) {
            self.audit_repo
                .expect_record()
                .returning(|_| Box::pin(async { Ok(()) }));
        }

        fn into_usecase(
            self,
        ) -> ExportsUseCase<
            MockRecordingRepository,
            MockExportJobRepository,
            MockTranscriptRepository,
            MockSummaryRepository,
            MockExportRenderer,
            MockObjectStorage,
            MockAuditLogRepository,
        > {
            ExportsUseCase::new(
                Arc::new(self.recording_repo),
                Arc::new(self.export_job_repo),
                Arc::new(self.transcript_repo),
                Arc::new(self.summary_repo),
                Arc::new(self.renderer),
                Arc::new(self.object_storage),
                Arc::new(AuditRecorder::new(Arc::new(self.audit_repo))),
            )
        }
    }

    #[tokio::test]
    async fn unknown_export_type_is_rejected_before_any_lookup() {
        let usecase = Mocks::new().into_usecase();

        let denied = usecase
            .create(Uuid::new_v4(), Uuid::new_v4(), "TRANSCRIPT_ODT")
            .await
            .unwrap_err();

        assert!(matches!(denied, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn summary_export_without_summary_records_no_job() {
        let user_id = Uuid::new_v4();
        let recording_id = Uuid::new_v4();
        let mut mocks = Mocks::new();

        mocks
            .recording_repo
            .expect_find_by_id()
            .returning(move |recording_id| {
                Box::pin(async move { Ok(Some(processed_recording(recording_id, user_id))) })
            });
        mocks
            .summary_repo
            .expect_exists_for_recording()
            .returning(|_| Box::pin(async { Ok(false) }));
        mocks.export_job_repo.expect_insert().times(0);

        let usecase = mocks.into_usecase();
        let denied = usecase
            .create(user_id, recording_id, "SUMMARY_PDF")
            .await
            .unwrap_err();

        assert!(matches!(denied, CoreError::InvalidState(_)));
        assert!(denied.to_string().contains("no summary"));
    }

    #[tokio::test]
    async fn full_zip_requires_both_transcript_and_summary() {
        let user_id = Uuid::new_v4();
        let mut mocks = Mocks::new();

        mocks
            .recording_repo
            .expect_find_by_id()
            .returning(move |recording_id| {
                Box::pin(async move { Ok(Some(processed_recording(recording_id, user_id))) })
            });
        mocks
            .transcript_repo
            .expect_exists_for_recording()
            .returning(|_| Box::pin(async { Ok(true) }));
        mocks
            .summary_repo
            .expect_exists_for_recording()
            .returning(|_| Box::pin(async { Ok(false) }));
        mocks.export_job_repo.expect_insert().times(0);

        let usecase = mocks.into_usecase();
        let denied = usecase
            .create(user_id, Uuid::new_v4(), "FULL_ZIP")
            .await
            .unwrap_err();

        assert!(matches!(denied, CoreError::InvalidState(_)));
    }

    #[tokio::test]
    async fn create_queues_a_pending_job() {
        let user_id = Uuid::new_v4();
        let recording_id = Uuid::new_v4();
        let mut mocks = Mocks::new();

        mocks
            .recording_repo
            .expect_find_by_id()
            .returning(move |recording_id| {
                Box::pin(async move { Ok(Some(processed_recording(recording_id, user_id))) })
            });
        mocks
            .transcript_repo
            .expect_exists_for_recording()
            .returning(|_| Box::pin(async { Ok(true) }));
        mocks
            .export_job_repo
            .expect_insert()
            .withf(|entity| entity.status == "PENDING" && entity.export_type == "TRANSCRIPT_PDF")
            .returning(|entity| Box::pin(async move { Ok(stored_job(entity)) }));
        mocks.allow_audit();

        let usecase = mocks.into_usecase();
        let job = usecase
            .create(user_id, recording_id, "TRANSCRIPT_PDF")
            .await
            .unwrap();

        assert_eq!(job.status, "PENDING");
        assert!(job.download_url.is_none());
    }

    #[tokio::test]
    async fn export_on_uploading_recording_is_rejected() {
        let user_id = Uuid::new_v4();
        let mut mocks = Mocks::new();

        mocks
            .recording_repo
            .expect_find_by_id()
            .returning(move |recording_id| {
                Box::pin(async move {
                    let mut recording = processed_recording(recording_id, user_id);
                    recording.status = "UPLOADING".to_string();
                    Ok(Some(recording))
                })
            });
        mocks.export_job_repo.expect_insert().times(0);

        let usecase = mocks.into_usecase();
        let denied = usecase
            .create(user_id, Uuid::new_v4(), "TRANSCRIPT_PDF")
            .await
            .unwrap_err();

        assert!(matches!(denied, CoreError::InvalidState(_)));
    }

    #[tokio::test]
    async fn process_marks_done_with_rendered_path() {
        let export_id = Uuid::new_v4();
        let mut mocks = Mocks::new();

        mocks
            .export_job_repo
            .expect_mark_processing()
            .with(mockall::predicate::eq(export_id))
            .returning(|export_id| {
                Box::pin(async move {
                    let mut job = pending_job(export_id, Uuid::new_v4(), "TRANSCRIPT_PDF");
                    job.status = "PROCESSING".to_string();
                    Ok(job)
                })
            });
        mocks
            .renderer
            .expect_render()
            .returning(|job| {
                Box::pin(async move { Ok(format!("{}/{}.pdf", job.user_id, job.export_id)) })
            });
        mocks
            .export_job_repo
            .expect_mark_done()
            .withf(|_, file_path, _| file_path.ends_with(".pdf"))
            .returning(|export_id, file_path, completed_at| {
                Box::pin(async move {
                    let mut job = pending_job(export_id, Uuid::new_v4(), "TRANSCRIPT_PDF");
                    job.status = "DONE".to_string();
                    job.file_path = Some(file_path);
                    job.completed_at = Some(completed_at);
                    Ok(job)
                })
            });

        let usecase = mocks.into_usecase();
        usecase.process(export_id).await.unwrap();
    }

    #[tokio::test]
    async fn renderer_failure_marks_job_failed() {
        let export_id = Uuid::new_v4();
        let mut mocks = Mocks::new();

        mocks
            .export_job_repo
            .expect_mark_processing()
            .returning(|export_id| {
                Box::pin(async move {
                    let mut job = pending_job(export_id, Uuid::new_v4(), "SUMMARY_DOCX");
                    job.status = "PROCESSING".to_string();
                    Ok(job)
                })
            });
        mocks
            .renderer
            .expect_render()
            .returning(|_| Box::pin(async { Err(anyhow::anyhow!("render service unreachable")) }));
        mocks
            .export_job_repo
            .expect_mark_failed()
            .withf(|_, error_message, _| error_message.contains("unreachable"))
            .returning(|export_id, error_message, completed_at| {
                Box::pin(async move {
                    let mut job = pending_job(export_id, Uuid::new_v4(), "SUMMARY_DOCX");
                    job.status = "FAILED".to_string();
                    job.error_message = Some(error_message);
                    job.completed_at = Some(completed_at);
                    Ok(job)
                })
            });

        let usecase = mocks.into_usecase();
        usecase.process(export_id).await.unwrap();
    }

    #[tokio::test]
    async fn get_presigns_download_only_when_done() {
        let user_id = Uuid::new_v4();
        let export_id = Uuid::new_v4();
        let mut mocks = Mocks::new();

        mocks
            .export_job_repo
            .expect_find_by_id()
            .returning(move |export_id| {
                Box::pin(async move {
                    let mut job = pending_job(export_id, user_id, "TRANSCRIPT_PDF");
                    job.status = "DONE".to_string();
                    job.file_path = Some("exports/report.pdf".to_string());
                    job.completed_at = Some(Utc::now());
                    Ok(Some(job))
                })
            });
        mocks
            .object_storage
            .expect_presign_download()
            .withf(|path, ttl| path.as_str() == "exports/report.pdf" && *ttl == DOWNLOAD_URL_TTL)
            .returning(|path, _| {
                Box::pin(async move { Ok(format!("https://storage.example/{}", path)) })
            });

        let usecase = mocks.into_usecase();
        let job = usecase.get(user_id, export_id).await.unwrap();

        assert_eq!(
            job.download_url.as_deref(),
            Some("https://storage.example/exports/report.pdf")
        );
    }

    #[tokio::test]
    async fn get_hides_other_users_jobs() {
        let mut mocks = Mocks::new();

        mocks
            .export_job_repo
            .expect_find_by_id()
            .returning(|export_id| {
                Box::pin(
                    async move { Ok(Some(pending_job(export_id, Uuid::new_v4(), "FULL_ZIP"))) },
                )
            });

        let usecase = mocks.into_usecase();
        let denied = usecase
            .get(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();

        assert!(matches!(denied, CoreError::NotAuthorized(_)));
    }
}
