use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_s3::{
    error::{ProvideErrorMetadata, SdkError},
    presigning::PresigningConfig,
    primitives::ByteStream,
};

use crate::config::config_model::StorageConfig;
use crate::domain::repositories::object_storage::ObjectStorage;

use super::s3::{S3Config, build_s3_client};

/// Supabase Storage via its S3-compatible API:
/// https://supabase.com/docs/guides/storage/s3/compatibility
///
/// Two buckets are involved: recording audio lives in the recordings bucket,
/// rendered export artifacts in the exports bucket. Reads and removals
/// resolve against the recordings bucket; uploads and presigned downloads
/// against the exports bucket.
pub struct SupabaseStorageClient {
    client: aws_sdk_s3::Client,
    recordings_bucket: String,
    exports_bucket: String,
}

impl SupabaseStorageClient {
    pub async fn new(config: StorageConfig) -> Result<Self> {
        let client = build_s3_client(&S3Config::new(
            config.endpoint,
            config.region,
            config.access_key,
            config.secret_key,
        ))
        .await
        .context("failed to build Supabase s3 client")?;

        Ok(Self {
            client,
            recordings_bucket: config.recordings_bucket,
            exports_bucket: config.exports_bucket,
        })
    }
}

#[async_trait]
impl ObjectStorage for SupabaseStorageClient {
    async fn upload(&self, path: String, bytes: Vec<u8>, content_type: String) -> Result<String> {
        let body = ByteStream::from(bytes);

        self.client
            .put_object()
            .bucket(&self.exports_bucket)
            .key(&path)
            .body(body)
            .content_type(content_type)
            .send()
            .await
            .map_err(|err| {
                anyhow::anyhow!(
                    "failed to upload to Supabase Storage (code {}) [bucket={}, key={}]",
                    err.code().unwrap_or("unknown"),
                    self.exports_bucket,
                    path
                )
            })?;

        Ok(path)
    }

    async fn download(&self, path: String) -> Result<Option<Vec<u8>>> {
        let response = self
            .client
            .get_object()
            .bucket(&self.recordings_bucket)
            .key(&path)
            .send()
            .await;

        let object = match response {
            Ok(object) => object,
            Err(SdkError::ServiceError(service_err)) if service_err.err().is_no_such_key() => {
                return Ok(None);
            }
            Err(err) => {
                return Err(anyhow::Error::new(err)).with_context(|| {
                    format!(
                        "failed to download Supabase Storage object [bucket={}, key={}]",
                        self.recordings_bucket, path
                    )
                });
            }
        };

        let bytes = object
            .body
            .collect()
            .await
            .context("failed to read Supabase Storage object body")?
            .into_bytes()
            .to_vec();

        Ok(Some(bytes))
    }

    async fn remove(&self, path: String) -> Result<()> {
        self.client
            .delete_object()
            .bucket(&self.recordings_bucket)
            .key(&path)
            .send()
            .await
            .map_err(|err| {
                anyhow::anyhow!(
                    "failed to delete Supabase Storage object (code {}) [bucket={}, key={}]",
                    err.code().unwrap_or("unknown"),
                    self.recordings_bucket,
                    path
                )
            })?;

        Ok(())
    }

    async fn presign_download(&self, path: String, ttl: Duration) -> Result<String> {
        let presigned = self
            .client
            .get_object()
            .bucket(&self.exports_bucket)
            .key(&path)
            .presigned(
                PresigningConfig::expires_in(ttl)
                    .context("invalid presigned URL expiry")?,
            )
            .await
            .with_context(|| {
                format!(
                    "failed to presign Supabase Storage download [bucket={}, key={}]",
                    self.exports_bucket, path
                )
            })?;

        Ok(presigned.uri().to_string())
    }
}
