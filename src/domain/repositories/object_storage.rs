use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use std::time::Duration;

/// Object-store collaborator. Paths are bucket-relative keys; which bucket a
/// key resolves to is the implementation's concern.
#[async_trait]
#[automock]
pub trait ObjectStorage {
    async fn upload(&self, path: String, bytes: Vec<u8>, content_type: String) -> Result<String>;

    /// `Ok(None)` means the object does not exist, which callers treat
    /// differently from a transport failure.
    async fn download(&self, path: String) -> Result<Option<Vec<u8>>>;

    async fn remove(&self, path: String) -> Result<()>;

    /// Time-limited signed download URL. Never persisted.
    async fn presign_download(&self, path: String, ttl: Duration) -> Result<String>;
}
