use anyhow::Result;
use meeting_vault::config::config_loader;
use meeting_vault::infrastructure::axum_http::http_serve;
use meeting_vault::infrastructure::engines::gemini::GeminiClient;
use meeting_vault::infrastructure::postgres::postgres_connection;
use meeting_vault::infrastructure::rendering::render_service::RenderServiceClient;
use meeting_vault::infrastructure::storages::supabase_storage::SupabaseStorageClient;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        error!("Backend exited with error: {}", error);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let dotenvy_env = config_loader::load()?;
    info!("ENV has been loaded");

    let postgres_pool = postgres_connection::establish_connection(&dotenvy_env.database.url)?;
    info!("Postgres connection has been established");

    let storage = Arc::new(SupabaseStorageClient::new(dotenvy_env.storage.clone()).await?);
    info!("Supabase storage client is ready");

    let gemini = Arc::new(GeminiClient::new(dotenvy_env.gemini.clone())?);
    let renderer = Arc::new(RenderServiceClient::new(
        dotenvy_env.render_service.clone(),
        Arc::clone(&storage),
    )?);

    http_serve::start(
        Arc::new(dotenvy_env),
        Arc::new(postgres_pool),
        storage,
        gemini,
        renderer,
    )
    .await?;

    Ok(())
}
