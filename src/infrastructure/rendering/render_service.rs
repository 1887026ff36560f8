use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::error;

use crate::config::config_model::RenderServiceConfig;
use crate::domain::{
    entities::export_jobs::ExportJobEntity,
    repositories::{export_renderer::ExportRenderer, object_storage::ObjectStorage},
    value_objects::enums::export_types::ExportType,
};
use crate::infrastructure::storages::supabase_storage::SupabaseStorageClient;

/// Client for the document-rendering sidecar. The sidecar turns a recording's
/// transcript or summary into a PDF/DOCX/ZIP artifact and streams the bytes
/// back; this client stores them and reports the storage path.
pub struct RenderServiceClient {
    http: reqwest::Client,
    base_url: String,
    storage: Arc<SupabaseStorageClient>,
}

impl RenderServiceClient {
    pub fn new(config: RenderServiceConfig, storage: Arc<SupabaseStorageClient>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to build render service http client")?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            storage,
        })
    }
}

#[async_trait]
impl ExportRenderer for RenderServiceClient {
    async fn render(&self, job: ExportJobEntity) -> Result<String> {
        let export_type = ExportType::try_from(job.export_type.as_str())?;

        let resp = self
            .http
            .post(format!("{}/render", self.base_url))
            .json(&serde_json::json!({
                "export_id": job.export_id,
                "recording_id": job.recording_id,
                "user_id": job.user_id,
                "export_type": job.export_type,
            }))
            .send()
            .await
            .context("render service request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();

            error!(
                status = %status,
                response_body = %body,
                export_id = %job.export_id,
                "render service request failed"
            );

            anyhow::bail!("render service returned status {}", status);
        }

        let bytes = resp
            .bytes()
            .await
            .context("failed to read rendered document body")?
            .to_vec();

        let file_path = format!(
            "{}/{}.{}",
            job.user_id,
            job.export_id,
            export_type.file_extension()
        );
        let content_type = mime_guess::from_ext(export_type.file_extension())
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        self.storage
            .upload(file_path, bytes, content_type)
            .await
            .context("failed to store rendered export artifact")
    }
}
