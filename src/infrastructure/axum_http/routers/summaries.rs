use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    application::{
        side_effects::AuditRecorder, usecases::summarization::SummarizationUseCase,
    },
    domain::repositories::{
        ai_usage_logs::AiUsageLogRepository, audit_logs::AuditLogRepository,
        recordings::RecordingRepository, summaries::SummaryRepository,
        summarization_engine::SummarizationEngine, transcripts::TranscriptRepository,
    },
    infrastructure::{
        axum_http::auth::AuthUser,
        engines::gemini::GeminiClient,
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{
                ai_usage_logs::AiUsageLogPostgres, audit_logs::AuditLogPostgres,
                recordings::RecordingPostgres, summaries::SummaryPostgres,
                transcripts::TranscriptPostgres,
            },
        },
    },
};

const DEFAULT_SUMMARY_STYLE: &str = "MEETING";

#[derive(Debug, Deserialize, Default)]
pub struct SummarizeRequest {
    pub summary_style: Option<String>,
}

pub fn routes(db_pool: Arc<PgPoolSquad>, gemini: Arc<GeminiClient>) -> Router {
    let usecase = SummarizationUseCase::new(
        Arc::new(RecordingPostgres::new(Arc::clone(&db_pool))),
        Arc::new(TranscriptPostgres::new(Arc::clone(&db_pool))),
        Arc::new(SummaryPostgres::new(Arc::clone(&db_pool))),
        gemini,
        Arc::new(AiUsageLogPostgres::new(Arc::clone(&db_pool))),
        Arc::new(AuditRecorder::new(Arc::new(AuditLogPostgres::new(
            Arc::clone(&db_pool),
        )))),
    );

    Router::new()
        .route("/:recording_id/summarize", post(summarize))
        .with_state(Arc::new(usecase))
}

pub async fn summarize<R, TR, SU, E, AI, A>(
    State(usecase): State<Arc<SummarizationUseCase<R, TR, SU, E, AI, A>>>,
    AuthUser { user_id, .. }: AuthUser,
    Path(recording_id): Path<Uuid>,
    payload: Option<Json<SummarizeRequest>>,
) -> impl IntoResponse
where
    R: RecordingRepository + Send + Sync + 'static,
    TR: TranscriptRepository + Send + Sync + 'static,
    SU: SummaryRepository + Send + Sync + 'static,
    E: SummarizationEngine + Send + Sync + 'static,
    AI: AiUsageLogRepository + Send + Sync + 'static,
    A: AuditLogRepository + Send + Sync + 'static,
{
    let summary_style = payload
        .and_then(|Json(request)| request.summary_style)
        .unwrap_or_else(|| DEFAULT_SUMMARY_STYLE.to_string());

    match usecase.summarize(user_id, recording_id, summary_style).await {
        Ok(summary) => (StatusCode::CREATED, Json(summary)).into_response(),
        Err(err) => err.into_response(),
    }
}
