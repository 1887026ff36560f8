use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use tracing::error;
use uuid::Uuid;

use crate::{
    application::{side_effects::AuditRecorder, usecases::exports::ExportsUseCase},
    domain::repositories::{
        audit_logs::AuditLogRepository, export_jobs::ExportJobRepository,
        export_renderer::ExportRenderer, object_storage::ObjectStorage,
        recordings::RecordingRepository, summaries::SummaryRepository,
        transcripts::TranscriptRepository,
    },
    infrastructure::{
        axum_http::auth::AuthUser,
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{
                audit_logs::AuditLogPostgres, export_jobs::ExportJobPostgres,
                recordings::RecordingPostgres, summaries::SummaryPostgres,
                transcripts::TranscriptPostgres,
            },
        },
        rendering::render_service::RenderServiceClient,
        storages::supabase_storage::SupabaseStorageClient,
    },
};

#[derive(Debug, Deserialize)]
pub struct CreateExportRequest {
    pub recording_id: Uuid,
    pub export_type: String,
}

pub fn routes(
    db_pool: Arc<PgPoolSquad>,
    storage: Arc<SupabaseStorageClient>,
    renderer: Arc<RenderServiceClient>,
) -> Router {
    let usecase = ExportsUseCase::new(
        Arc::new(RecordingPostgres::new(Arc::clone(&db_pool))),
        Arc::new(ExportJobPostgres::new(Arc::clone(&db_pool))),
        Arc::new(TranscriptPostgres::new(Arc::clone(&db_pool))),
        Arc::new(SummaryPostgres::new(Arc::clone(&db_pool))),
        renderer,
        storage,
        Arc::new(AuditRecorder::new(Arc::new(AuditLogPostgres::new(
            Arc::clone(&db_pool),
        )))),
    );

    Router::new()
        .route("/", post(create))
        .route("/:export_id", get(get_job))
        .with_state(Arc::new(usecase))
}

pub async fn create<R, EJ, TR, SU, RD, ST, A>(
    State(usecase): State<Arc<ExportsUseCase<R, EJ, TR, SU, RD, ST, A>>>,
    AuthUser { user_id, .. }: AuthUser,
    Json(payload): Json<CreateExportRequest>,
) -> impl IntoResponse
where
    R: RecordingRepository + Send + Sync + 'static,
    EJ: ExportJobRepository + Send + Sync + 'static,
    TR: TranscriptRepository + Send + Sync + 'static,
    SU: SummaryRepository + Send + Sync + 'static,
    RD: ExportRenderer + Send + Sync + 'static,
    ST: ObjectStorage + Send + Sync + 'static,
    A: AuditLogRepository + Send + Sync + 'static,
{
    match usecase
        .create(user_id, payload.recording_id, &payload.export_type)
        .await
    {
        Ok(job) => {
            // Rendering happens off the request path; poll the job for its
            // terminal state and download URL.
            let export_id = job.export_id;
            let worker = Arc::clone(&usecase);
            tokio::spawn(async move {
                if let Err(err) = worker.process(export_id).await {
                    error!(%export_id, error = ?err, "export job processing failed");
                }
            });

            (StatusCode::ACCEPTED, Json(job)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub async fn get_job<R, EJ, TR, SU, RD, ST, A>(
    State(usecase): State<Arc<ExportsUseCase<R, EJ, TR, SU, RD, ST, A>>>,
    AuthUser { user_id, .. }: AuthUser,
    Path(export_id): Path<Uuid>,
) -> impl IntoResponse
where
    R: RecordingRepository + Send + Sync + 'static,
    EJ: ExportJobRepository + Send + Sync + 'static,
    TR: TranscriptRepository + Send + Sync + 'static,
    SU: SummaryRepository + Send + Sync + 'static,
    RD: ExportRenderer + Send + Sync + 'static,
    ST: ObjectStorage + Send + Sync + 'static,
    A: AuditLogRepository + Send + Sync + 'static,
{
    match usecase.get(user_id, export_id).await {
        Ok(job) => Json(job).into_response(),
        Err(err) => err.into_response(),
    }
}
