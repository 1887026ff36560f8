use anyhow::{Ok, Result};

use super::config_model::DotEnvyConfig;

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let backend_server = super::config_model::BackendServer {
        port: std::env::var("SERVER_PORT_BACKEND")
            .expect("SERVER_PORT_BACKEND is invalid")
            .parse()?,
        body_limit: std::env::var("SERVER_BODY_LIMIT")
            .expect("SERVER_BODY_LIMIT is invalid")
            .parse()?,
        timeout: std::env::var("SERVER_TIMEOUT")
            .expect("SERVER_TIMEOUT is invalid")
            .parse()?,
    };

    let database = super::config_model::Database {
        url: std::env::var("DATABASE_URL").expect("DATABASE_URL is invalid"),
    };

    let supabase = super::config_model::Supabase {
        jwt_secret: std::env::var("SUPABASE_JWT_SECRET").expect("SUPABASE_JWT_SECRET is invalid"),
    };

    let storage = super::config_model::StorageConfig {
        endpoint: std::env::var("SUPABASE_S3_ENDPOINT").unwrap_or_else(|_| {
            let project_url =
                std::env::var("SUPABASE_PROJECT_URL").expect("SUPABASE_PROJECT_URL is invalid");
            format!("{}/storage/v1/s3", project_url.trim_end_matches('/'))
        }),
        region: std::env::var("SUPABASE_S3_REGION").expect("SUPABASE_S3_REGION is invalid"),
        recordings_bucket: std::env::var("SUPABASE_RECORDINGS_BUCKET")
            .unwrap_or_else(|_| "recordings".to_string()),
        exports_bucket: std::env::var("SUPABASE_EXPORTS_BUCKET")
            .unwrap_or_else(|_| "exports".to_string()),
        access_key: std::env::var("SUPABASE_S3_ACCESS_KEY_ID")
            .expect("SUPABASE_S3_ACCESS_KEY_ID is invalid"),
        secret_key: std::env::var("SUPABASE_S3_SECRET_ACCESS_KEY")
            .expect("SUPABASE_S3_SECRET_ACCESS_KEY is invalid"),
    };

    let gemini = super::config_model::GeminiConfig {
        api_key: std::env::var("GEMINI_API_KEY").expect("GEMINI_API_KEY is invalid"),
        model: std::env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-2.5-flash-lite".to_string()),
    };

    let render_service = super::config_model::RenderServiceConfig {
        base_url: std::env::var("RENDER_SERVICE_URL").expect("RENDER_SERVICE_URL is invalid"),
        timeout_secs: std::env::var("RENDER_SERVICE_TIMEOUT")
            .unwrap_or_else(|_| "120".to_string())
            .parse()?,
    };

    Ok(DotEnvyConfig {
        backend_server,
        database,
        supabase,
        storage,
        gemini,
        render_service,
    })
}
