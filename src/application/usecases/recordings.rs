use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::application::{
    errors::{CoreError, CoreResult},
    side_effects::{AuditRecorder, best_effort},
    usecases::{
        quota::QuotaEvaluator, storage_ledger::StorageLedger, tier_resolver::TierResolver,
    },
};
use crate::domain::{
    entities::{
        recordings::{InsertRecordingEntity, RecordingDetailsChangeset, RecordingEntity},
        users::UserEntity,
    },
    repositories::{
        audit_logs::AuditLogRepository, folders::FolderRepository,
        object_storage::ObjectStorage, recordings::RecordingRepository, tiers::TierRepository,
        users::UserRepository,
    },
    value_objects::{
        enums::{
            audit_actions::AuditAction, recording_statuses::RecordingStatus,
            source_types::SourceType, user_roles::UserRole,
        },
        recordings::{Pagination, RecordingListFilter},
    },
};

#[derive(Debug, Clone, Serialize)]
pub struct RecordingDto {
    pub recording_id: Uuid,
    pub user_id: Uuid,
    pub folder_id: Option<Uuid>,
    pub title: String,
    pub file_path: Option<String>,
    pub original_file_name: Option<String>,
    pub duration_seconds: Option<f64>,
    pub file_size_mb: Option<f64>,
    pub source_type: String,
    pub status: String,
    pub is_pinned: bool,
    pub is_trashed: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<RecordingEntity> for RecordingDto {
    fn from(value: RecordingEntity) -> Self {
        Self {
            recording_id: value.recording_id,
            user_id: value.user_id,
            folder_id: value.folder_id,
            title: value.title,
            file_path: value.file_path,
            original_file_name: value.original_file_name,
            duration_seconds: value.duration_seconds,
            file_size_mb: value.file_size_mb,
            source_type: value.source_type,
            status: value.status,
            is_pinned: value.is_pinned,
            is_trashed: value.is_trashed,
            deleted_at: value.deleted_at,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateRecordingInput {
    pub folder_id: Option<Uuid>,
    pub title: String,
    pub source_type: SourceType,
}

#[derive(Debug, Clone)]
pub struct CompleteUploadInput {
    pub file_path: String,
    pub file_size_mb: f64,
    pub duration_seconds: f64,
    pub original_file_name: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateRecordingInput {
    pub title: Option<String>,
    /// `Some(None)` moves the recording out of its folder.
    pub folder_id: Option<Option<Uuid>>,
    pub is_pinned: Option<bool>,
}

pub struct RecordingsUseCase<R, F, U, T, A, S>
where
    R: RecordingRepository + Send + Sync + 'static,
    F: FolderRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    T: TierRepository + Send + Sync + 'static,
    A: AuditLogRepository + Send + Sync + 'static,
    S: ObjectStorage + Send + Sync + 'static,
{
    recording_repository: Arc<R>,
    folder_repository: Arc<F>,
    user_repository: Arc<U>,
    tier_resolver: Arc<TierResolver<T>>,
    storage_ledger: Arc<StorageLedger<U>>,
    audit: Arc<AuditRecorder<A>>,
    object_storage: Arc<S>,
}

impl<R, F, U, T, A, S> RecordingsUseCase<R, F, U, T, A, S>
where
    R: RecordingRepository + Send + Sync + 'static,
    F: FolderRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    T: TierRepository + Send + Sync + 'static,
    A: AuditLogRepository + Send + Sync + 'static,
    S: ObjectStorage + Send + Sync + 'static,
{
    pub fn new(
        recording_repository: Arc<R>,
        folder_repository: Arc<F>,
        user_repository: Arc<U>,
        tier_resolver: Arc<TierResolver<T>>,
        storage_ledger: Arc<StorageLedger<U>>,
        audit: Arc<AuditRecorder<A>>,
        object_storage: Arc<S>,
    ) -> Self {
        Self {
            recording_repository,
            folder_repository,
            user_repository,
            tier_resolver,
            storage_ledger,
            audit,
            object_storage,
        }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        input: CreateRecordingInput,
    ) -> CoreResult<RecordingDto> {
        if input.title.trim().is_empty() {
            return Err(CoreError::Validation("title must not be empty".to_string()));
        }

        if let Some(folder_id) = input.folder_id {
            let folder = self
                .folder_repository
                .find_by_id(folder_id)
                .await?
                .ok_or(CoreError::NotFound("folder"))?;
            if folder.user_id != user_id {
                return Err(CoreError::NotAuthorized("folder"));
            }
        }

        let user = self.load_user(user_id).await?;
        let tier = self.tier_resolver.resolve_for_user(&user).await?;
        let recording_count = self.recording_repository.count_by_user(user_id).await?;
        QuotaEvaluator::check_create(tier.as_ref(), recording_count, user.storage_used_mb)?;

        let now = Utc::now();
        let recording = self
            .recording_repository
            .insert(InsertRecordingEntity {
                user_id,
                folder_id: input.folder_id,
                title: input.title,
                source_type: input.source_type.to_string(),
                status: RecordingStatus::Uploading.to_string(),
                is_pinned: false,
                is_trashed: false,
                created_at: now,
                updated_at: now,
            })
            .await?;

        info!(%user_id, recording_id = %recording.recording_id, "recording created");
        self.audit
            .record(
                Some(user_id),
                AuditAction::CreateRecording,
                "recording",
                Some(recording.recording_id.to_string()),
                None,
            )
            .await;

        Ok(RecordingDto::from(recording))
    }

    pub async fn complete_upload(
        &self,
        user_id: Uuid,
        recording_id: Uuid,
        input: CompleteUploadInput,
    ) -> CoreResult<RecordingDto> {
        if input.file_path.trim().is_empty() {
            return Err(CoreError::Validation(
                "file_path must not be empty".to_string(),
            ));
        }
        if input.file_size_mb < 0.0 || input.duration_seconds < 0.0 {
            return Err(CoreError::Validation(
                "file size and duration must not be negative".to_string(),
            ));
        }

        let recording = self.find_owned(user_id, recording_id).await?;
        if recording.status != RecordingStatus::Uploading.to_string() {
            return Err(CoreError::InvalidState(format!(
                "recording is not awaiting upload (status {})",
                recording.status
            )));
        }

        let user = self.load_user(user_id).await?;
        let tier = self.tier_resolver.resolve_for_user(&user).await?;
        QuotaEvaluator::check_upload(
            tier.as_ref(),
            user.storage_used_mb,
            input.file_size_mb,
            input.duration_seconds,
        )?;

        let updated = self
            .recording_repository
            .mark_uploaded(
                recording_id,
                input.file_path,
                input.original_file_name,
                input.file_size_mb,
                input.duration_seconds,
            )
            .await?;

        best_effort(
            "storage ledger increase after upload",
            self.storage_ledger
                .increase(user_id, input.file_size_mb)
                .await
                .map(|_| ()),
        );

        info!(%user_id, %recording_id, size_mb = input.file_size_mb, "upload completed");
        self.audit
            .record(
                Some(user_id),
                AuditAction::Upload,
                "recording",
                Some(recording_id.to_string()),
                None,
            )
            .await;

        Ok(RecordingDto::from(updated))
    }

    pub async fn update_details(
        &self,
        user_id: Uuid,
        recording_id: Uuid,
        input: UpdateRecordingInput,
    ) -> CoreResult<RecordingDto> {
        if input.title.is_none() && input.folder_id.is_none() && input.is_pinned.is_none() {
            return Err(CoreError::Validation(
                "no fields provided for update".to_string(),
            ));
        }

        let recording = self.find_owned(user_id, recording_id).await?;

        if let Some(Some(folder_id)) = input.folder_id {
            let folder = self
                .folder_repository
                .find_by_id(folder_id)
                .await?
                .ok_or(CoreError::NotFound("folder"))?;
            if folder.user_id != user_id {
                return Err(CoreError::NotAuthorized("folder"));
            }
        }

        let diff = describe_changes(&recording, &input);

        let updated = self
            .recording_repository
            .update_details(
                recording_id,
                RecordingDetailsChangeset {
                    title: input.title,
                    folder_id: input.folder_id,
                    is_pinned: input.is_pinned,
                    updated_at: Utc::now(),
                },
            )
            .await?;

        if let Some(diff) = diff {
            self.audit
                .record(
                    Some(user_id),
                    AuditAction::UpdateRecording,
                    "recording",
                    Some(recording_id.to_string()),
                    Some(diff),
                )
                .await;
        }

        Ok(RecordingDto::from(updated))
    }

    /// Idempotent: trashing an already-trashed recording succeeds without
    /// touching the row again.
    pub async fn soft_delete(&self, user_id: Uuid, recording_id: Uuid) -> CoreResult<()> {
        let recording = self.find_owned(user_id, recording_id).await?;
        if recording.is_trashed {
            return Ok(());
        }

        self.recording_repository
            .set_trashed(recording_id, true, Some(Utc::now()))
            .await?;

        self.audit
            .record(
                Some(user_id),
                AuditAction::SoftDeleteRecording,
                "recording",
                Some(recording_id.to_string()),
                None,
            )
            .await;

        Ok(())
    }

    /// Idempotent: restoring a recording that is not trashed returns it
    /// unchanged.
    pub async fn restore(&self, user_id: Uuid, recording_id: Uuid) -> CoreResult<RecordingDto> {
        let recording = self.find_owned(user_id, recording_id).await?;
        if !recording.is_trashed {
            return Ok(RecordingDto::from(recording));
        }

        let restored = self
            .recording_repository
            .set_trashed(recording_id, false, None)
            .await?;

        self.audit
            .record(
                Some(user_id),
                AuditAction::RestoreRecording,
                "recording",
                Some(recording_id.to_string()),
                None,
            )
            .await;

        Ok(RecordingDto::from(restored))
    }

    pub async fn hard_delete(&self, user_id: Uuid, recording_id: Uuid) -> CoreResult<()> {
        let recording = self.find_owned(user_id, recording_id).await?;

        // Storage cleanup first; a dangling object is preferable to a row
        // pointing at nothing, and its failure must not block the delete.
        if let Some(file_path) = recording.file_path.clone() {
            best_effort(
                "audio object removal during hard delete",
                self.object_storage.remove(file_path).await,
            );
        }

        self.recording_repository.delete(recording_id).await?;

        if let Some(file_size_mb) = recording.file_size_mb {
            best_effort(
                "storage ledger decrease after hard delete",
                self.storage_ledger
                    .decrease(user_id, file_size_mb)
                    .await
                    .map(|_| ()),
            );
        }

        info!(%user_id, %recording_id, "recording hard-deleted");
        self.audit
            .record(
                Some(user_id),
                AuditAction::HardDeleteRecording,
                "recording",
                Some(recording_id.to_string()),
                None,
            )
            .await;

        Ok(())
    }

    pub async fn list(
        &self,
        user_id: Uuid,
        filter: RecordingListFilter,
        pagination: Pagination,
    ) -> CoreResult<(Vec<RecordingDto>, i64)> {
        let (recordings, total) = self
            .recording_repository
            .list(user_id, filter, pagination)
            .await?;

        Ok((
            recordings.into_iter().map(RecordingDto::from).collect(),
            total,
        ))
    }

    /// Admin-scoped read of another user's recordings. The caller's role is
    /// resolved from its user row, not trusted from the request.
    pub async fn list_for_user_as_admin(
        &self,
        caller_id: Uuid,
        target_user_id: Uuid,
    ) -> CoreResult<Vec<RecordingDto>> {
        let caller = self.load_user(caller_id).await?;
        if caller.role != UserRole::Admin.to_string() {
            return Err(CoreError::NotAuthorized("recordings"));
        }

        let recordings = self.recording_repository.list_by_user(target_user_id).await?;
        Ok(recordings.into_iter().map(RecordingDto::from).collect())
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

    async fn load_user(&self, user_id: Uuid) -> CoreResult<UserEntity> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(CoreError::NotFound("user"))
    }
}

/// Human-readable diff for the audit trail, `None` when nothing actually
/// changes.
fn describe_changes(recording: &RecordingEntity, input: &UpdateRecordingInput) -> Option<String> {
    let mut changes = Vec::new();

    if let Some(title) = &input.title {
        if *title != recording.title {
            changes.push(format!("title: '{}' -> '{}'", recording.title, title));
        }
    }
    if let Some(folder_id) = &input.folder_id {
        if *folder_id != recording.folder_id {
            changes.push(format!(
                "folder: {} -> {}",
                format_folder(recording.folder_id),
                format_folder(*folder_id)
            ));
        }
    }
    if let Some(is_pinned) = input.is_pinned {
        if is_pinned != recording.is_pinned {
            changes.push(format!(
                "pinned: {} -> {}",
                recording.is_pinned, is_pinned
            ));
        }
    }

    if changes.is_empty() {
        None
    } else {
        Some(changes.join("; "))
    }
}

fn format_folder(folder_id: Option<Uuid>) -> String {
    folder_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "none".to_string())
}
