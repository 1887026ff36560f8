use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::users::UserEntity;

#[async_trait]
#[automock]
pub trait UserRepository {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserEntity>>;

    /// Applies `delta_mb` to the running storage total in a single statement,
    /// clamped at zero. Returns the new total.
    async fn adjust_storage_used(&self, user_id: Uuid, delta_mb: f64) -> Result<f64>;
}
