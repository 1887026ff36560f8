use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use uuid::Uuid;

use crate::{
    application::usecases::transcription::TranscriptionUseCase,
    domain::repositories::{
        ai_usage_logs::AiUsageLogRepository, object_storage::ObjectStorage,
        recording_speakers::RecordingSpeakerRepository, recordings::RecordingRepository,
        transcription_engine::TranscriptionEngine, transcripts::TranscriptRepository,
    },
    infrastructure::{
        axum_http::auth::AuthUser,
        engines::gemini::GeminiClient,
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{
                ai_usage_logs::AiUsageLogPostgres, recording_speakers::RecordingSpeakerPostgres,
                recordings::RecordingPostgres, transcripts::TranscriptPostgres,
            },
        },
        storages::supabase_storage::SupabaseStorageClient,
    },
};

pub fn routes(
    db_pool: Arc<PgPoolSquad>,
    storage: Arc<SupabaseStorageClient>,
    gemini: Arc<GeminiClient>,
) -> Router {
    let usecase = TranscriptionUseCase::new(
        Arc::new(RecordingPostgres::new(Arc::clone(&db_pool))),
        Arc::new(TranscriptPostgres::new(Arc::clone(&db_pool))),
        Arc::new(RecordingSpeakerPostgres::new(Arc::clone(&db_pool))),
        storage,
        gemini,
        Arc::new(AiUsageLogPostgres::new(Arc::clone(&db_pool))),
    );

    Router::new()
        .route("/:recording_id/transcribe", post(transcribe))
        .with_state(Arc::new(usecase))
}

pub async fn transcribe<R, TR, SP, ST, E, AI>(
    State(usecase): State<Arc<TranscriptionUseCase<R, TR, SP, ST, E, AI>>>,
    AuthUser { user_id, .. }: AuthUser,
    Path(recording_id): Path<Uuid>,
) -> impl IntoResponse
where
    R: RecordingRepository + Send + Sync + 'static,
    TR: TranscriptRepository + Send + Sync + 'static,
    SP: RecordingSpeakerRepository + Send + Sync + 'static,
    ST: ObjectStorage + Send + Sync + 'static,
    E: TranscriptionEngine + Send + Sync + 'static,
    AI: AiUsageLogRepository + Send + Sync + 'static,
{
    match usecase.transcribe(user_id, recording_id).await {
        Ok(transcript) => (StatusCode::CREATED, Json(transcript)).into_response(),
        Err(err) => err.into_response(),
    }
}
