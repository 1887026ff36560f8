use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};
use uuid::Uuid;

use crate::{
    application::{
        side_effects::AuditRecorder,
        usecases::{
            recordings::RecordingsUseCase, storage_ledger::StorageLedger,
            tier_resolver::TierResolver,
        },
    },
    domain::repositories::{
        audit_logs::AuditLogRepository, folders::FolderRepository,
        object_storage::ObjectStorage, recordings::RecordingRepository, tiers::TierRepository,
        users::UserRepository,
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

pub fn routes(db_pool: Arc<PgPoolSquad>, storage: Arc<SupabaseStorageClient>) -> Router {
    let user_repository = Arc::new(UserPostgres::new(Arc::clone(&db_pool)));

    let usecase = RecordingsUseCase::new(
        Arc::new(RecordingPostgres::new(Arc::clone(&db_pool))),
        Arc::new(FolderPostgres::new(Arc::clone(&db_pool))),
        Arc::clone(&user_repository),
        Arc::new(TierResolver::new(Arc::new(TierPostgres::new(Arc::clone(
            &db_pool,
        ))))),
        Arc::new(StorageLedger::new(user_repository)),
        Arc::new(AuditRecorder::new(Arc::new(AuditLogPostgres::new(
            Arc::clone(&db_pool),
        )))),
        storage,
    );

    Router::new()
        .route("/users/:user_id/recordings", get(list_user_recordings))
        .with_state(Arc::new(usecase))
}

/// Caller role is read from the users table, never trusted from the token.
pub async fn list_user_recordings<R, F, U, T, A, S>(
    State(usecase): State<Arc<RecordingsUseCase<R, F, U, T, A, S>>>,
    AuthUser { user_id, .. }: AuthUser,
    Path(target_user_id): Path<Uuid>,
) -> impl IntoResponse
where
    R: RecordingRepository + Send + Sync + 'static,
    F: FolderRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    T: TierRepository + Send + Sync + 'static,
    A: AuditLogRepository + Send + Sync + 'static,
    S: ObjectStorage + Send + Sync + 'static,
{
    match usecase.list_for_user_as_admin(user_id, target_user_id).await {
        Ok(recordings) => Json(recordings).into_response(),
        Err(err) => err.into_response(),
    }
}
