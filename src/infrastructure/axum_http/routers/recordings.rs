use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    application::{
        side_effects::AuditRecorder,
        usecases::{
            recordings::{
                CompleteUploadInput, CreateRecordingInput, RecordingsUseCase,
                UpdateRecordingInput,
            },
            storage_ledger::StorageLedger,
            tier_resolver::TierResolver,
        },
    },
    domain::{
        repositories::{
            audit_logs::AuditLogRepository, folders::FolderRepository,
            object_storage::ObjectStorage, recordings::RecordingRepository,
            tiers::TierRepository, users::UserRepository,
        },
        value_objects::{
            enums::source_types::SourceType,
            recordings::{Pagination, RecordingListFilter},
        },
    },
    infrastructure::{
        axum_http::auth::AuthUser,
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{
                audit_logs::AuditLogPostgres, folders::FolderPostgres,
                recordings::RecordingPostgres, tiers::TierPostgres, users::UserPostgres,
            },
        },
        storages::supabase_storage::SupabaseStorageClient,
    },
};

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct CreateRecordingRequest {
    pub title: String,
    pub folder_id: Option<Uuid>,
    pub source_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompleteUploadRequest {
    pub file_path: String,
    pub file_size_mb: f64,
    pub duration_seconds: f64,
    pub original_file_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRecordingRequest {
    pub title: Option<String>,
    /// Present-but-null moves the recording out of its folder; an absent
    /// field leaves it alone.
    #[serde(default, deserialize_with = "present_folder_id")]
    pub folder_id: Option<Option<Uuid>>,
    pub is_pinned: Option<bool>,
}

fn present_folder_id<'de, D>(deserializer: D) -> Result<Option<Option<Uuid>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    serde::Deserialize::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize)]
pub struct ListRecordingsQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub folder_id: Option<Uuid>,
    pub trashed: Option<bool>,
    pub search: Option<String>,
    pub tag: Option<String>,
}

pub fn routes(db_pool: Arc<PgPoolSquad>, storage: Arc<SupabaseStorageClient>) -> Router {
    let recording_repository = Arc::new(RecordingPostgres::new(Arc::clone(&db_pool)));
    let folder_repository = Arc::new(FolderPostgres::new(Arc::clone(&db_pool)));
    let user_repository = Arc::new(UserPostgres::new(Arc::clone(&db_pool)));
    let tier_repository = Arc::new(TierPostgres::new(Arc::clone(&db_pool)));
    let audit_repository = Arc::new(AuditLogPostgres::new(Arc::clone(&db_pool)));

    let usecase = RecordingsUseCase::new(
        recording_repository,
        folder_repository,
        Arc::clone(&user_repository),
        Arc::new(TierResolver::new(tier_repository)),
        Arc::new(StorageLedger::new(user_repository)),
        Arc::new(AuditRecorder::new(audit_repository)),
        storage,
    );

    Router::new()
        .route("/", post(create).get(list))
        .route("/:recording_id", patch(update).delete(soft_delete))
        .route("/:recording_id/complete-upload", post(complete_upload))
        .route("/:recording_id/restore", post(restore))
        .route("/:recording_id/permanent", delete(hard_delete))
        .with_state(Arc::new(usecase))
}

pub async fn create<R, F, U, T, A, S>(
    State(usecase): State<Arc<RecordingsUseCase<R, F, U, T, A, S>>>,
    AuthUser { user_id, .. }: AuthUser,
    Json(payload): Json<CreateRecordingRequest>,
) -> impl IntoResponse
where
    R: RecordingRepository + Send + Sync + 'static,
    F: FolderRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    T: TierRepository + Send + Sync + 'static,
    A: AuditLogRepository + Send + Sync + 'static,
    S: ObjectStorage + Send + Sync + 'static,
{
    let source_type = match payload.source_type.as_deref() {
        None => SourceType::default(),
        Some(raw) => match SourceType::try_from(raw) {
            Ok(source_type) => source_type,
            Err(err) => return (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
        },
    };

    let input = CreateRecordingInput {
        folder_id: payload.folder_id,
        title: payload.title,
        source_type,
    };

    match usecase.create(user_id, input).await {
        Ok(recording) => (StatusCode::CREATED, Json(recording)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn complete_upload<R, F, U, T, A, S>(
    State(usecase): State<Arc<RecordingsUseCase<R, F, U, T, A, S>>>,
    AuthUser { user_id, .. }: AuthUser,
    Path(recording_id): Path<Uuid>,
    Json(payload): Json<CompleteUploadRequest>,
) -> impl IntoResponse
where
    R: RecordingRepository + Send + Sync + 'static,
    F: FolderRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    T: TierRepository + Send + Sync + 'static,
    A: AuditLogRepository + Send + Sync + 'static,
    S: ObjectStorage + Send + Sync + 'static,
{
    let input = CompleteUploadInput {
        file_path: payload.file_path,
        file_size_mb: payload.file_size_mb,
        duration_seconds: payload.duration_seconds,
        original_file_name: payload.original_file_name,
    };

    match usecase.complete_upload(user_id, recording_id, input).await {
        Ok(recording) => Json(recording).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn update<R, F, U, T, A, S>(
    State(usecase): State<Arc<RecordingsUseCase<R, F, U, T, A, S>>>,
    AuthUser { user_id, .. }: AuthUser,
    Path(recording_id): Path<Uuid>,
    Json(payload): Json<UpdateRecordingRequest>,
) -> impl IntoResponse
where
    R: RecordingRepository + Send + Sync + 'static,
    F: FolderRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    T: TierRepository + Send + Sync + 'static,
    A: AuditLogRepository + Send + Sync + 'static,
    S: ObjectStorage + Send + Sync + 'static,
{
    let input = UpdateRecordingInput {
        title: payload.title,
        folder_id: payload.folder_id,
        is_pinned: payload.is_pinned,
    };

    match usecase.update_details(user_id, recording_id, input).await {
        Ok(recording) => Json(recording).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn soft_delete<R, F, U, T, A, S>(
    State(usecase): State<Arc<RecordingsUseCase<R, F, U, T, A, S>>>,
    AuthUser { user_id, .. }: AuthUser,
    Path(recording_id): Path<Uuid>,
) -> impl IntoResponse
where
    R: RecordingRepository + Send + Sync + 'static,
    F: FolderRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    T: TierRepository + Send + Sync + 'static,
    A: AuditLogRepository + Send + Sync + 'static,
    S: ObjectStorage + Send + Sync + 'static,
{
    match usecase.soft_delete(user_id, recording_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn restore<R, F, U, T, A, S>(
    State(usecase): State<Arc<RecordingsUseCase<R, F, U, T, A, S>>>,
    AuthUser { user_id, .. }: AuthUser,
    Path(recording_id): Path<Uuid>,
) -> impl IntoResponse
where
    R: RecordingRepository + Send + Sync + 'static,
    F: FolderRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    T: TierRepository + Send + Sync + 'static,
    A: AuditLogRepository + Send + Sync + 'static,
    S: ObjectStorage + Send + Sync + 'static,
{
    match usecase.restore(user_id, recording_id).await {
        Ok(recording) => Json(recording).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn hard_delete<R, F, U, T, A, S>(
    State(usecase): State<Arc<RecordingsUseCase<R, F, U, T, A, S>>>,
    AuthUser { user_id, .. }: AuthUser,
    Path(recording_id): Path<Uuid>,
) -> impl IntoResponse
where
    R: RecordingRepository + Send + Sync + 'static,
    F: FolderRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    T: TierRepository + Send + Sync + 'static,
    A: AuditLogRepository + Send + Sync + 'static,
    S: ObjectStorage + Send + Sync + 'static,
{
    match usecase.hard_delete(user_id, recording_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn list<R, F, U, T, A, S>(
    State(usecase): State<Arc<RecordingsUseCase<R, F, U, T, A, S>>>,
    AuthUser { user_id, .. }: AuthUser,
    Query(query): Query<ListRecordingsQuery>,
) -> impl IntoResponse
where
    R: RecordingRepository + Send + Sync + 'static,
    F: FolderRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    T: TierRepository + Send + Sync + 'static,
    A: AuditLogRepository + Send + Sync + 'static,
    S: ObjectStorage + Send + Sync + 'static,
{
    let page = query.page.unwrap_or(1);
    let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
    if page <= 0 || page_size <= 0 {
        return (
            StatusCode::BAD_REQUEST,
            "page and page_size must be positive".to_string(),
        )
            .into_response();
    }
    if page_size > MAX_PAGE_SIZE {
        return (
            StatusCode::BAD_REQUEST,
            format!("page_size must be <= {}", MAX_PAGE_SIZE),
        )
            .into_response();
    }

    let filter = RecordingListFilter {
        folder_id: query.folder_id,
        trashed: query.trashed.unwrap_or(false),
        search: query.search,
        tag: query.tag,
    };

    match usecase
        .list(user_id, filter, Pagination { page, page_size })
        .await
    {
        Ok((recordings, total)) => {
            ([("X-Total-Count", total.to_string())], Json(recordings)).into_response()
        }
        Err(err) => err.into_response(),
    }
}
