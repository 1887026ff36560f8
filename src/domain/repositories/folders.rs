use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::folders::FolderEntity;

#[async_trait]
#[automock]
pub trait FolderRepository {
    async fn find_by_id(&self, folder_id: Uuid) -> Result<Option<FolderEntity>>;
}
