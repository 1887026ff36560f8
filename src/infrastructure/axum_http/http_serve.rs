use anyhow::Result;
use axum::{Router, http::Method, routing::get};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

use crate::{
    config::config_model::DotEnvyConfig,
    infrastructure::{
        axum_http::{default_routers, routers},
        engines::gemini::GeminiClient,
        postgres::postgres_connection::PgPoolSquad,
        rendering::render_service::RenderServiceClient,
        storages::supabase_storage::SupabaseStorageClient,
    },
};

pub async fn start(
    config: Arc<DotEnvyConfig>,
    db_pool: Arc<PgPoolSquad>,
    storage: Arc<SupabaseStorageClient>,
    gemini: Arc<GeminiClient>,
    renderer: Arc<RenderServiceClient>,
) -> Result<()> {
    let recordings_routes = routers::recordings::routes(Arc::clone(&db_pool), Arc::clone(&storage))
        .merge(routers::transcripts::routes(
            Arc::clone(&db_pool),
            Arc::clone(&storage),
            Arc::clone(&gemini),
        ))
        .merge(routers::summaries::routes(
            Arc::clone(&db_pool),
            Arc::clone(&gemini),
        ));

    let app = Router::new()
        .fallback(default_routers::not_found)
        .nest("/api/v1/recordings", recordings_routes)
        .nest(
            "/api/v1/exports",
            routers::export_jobs::routes(
                Arc::clone(&db_pool),
                Arc::clone(&storage),
                Arc::clone(&renderer),
            ),
        )
        .nest(
            "/api/v1/admin",
            routers::admin::routes(Arc::clone(&db_pool), Arc::clone(&storage)),
        )
        .route("/api/v1/health-check", get(default_routers::health_check))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.backend_server.timeout,
        )))
        .layer(RequestBodyLimitLayer::new(
            (config.backend_server.body_limit * 1024 * 1024).try_into()?,
        ))
        .layer(
            CorsLayer::new()
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PATCH,
                    Method::PUT,
                    Method::DELETE,
                ])
                .allow_origin(Any),
        )
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.backend_server.port));
    let listener = TcpListener::bind(addr).await?;

    info!("Server is running on port {}", config.backend_server.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");
    };

    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received ctrl+C signal"),
        _ = terminate => info!("Received terminate signal"),
    }
}
