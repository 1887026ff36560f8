use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::tiers::TierEntity;

#[async_trait]
#[automock]
pub trait TierRepository {
    async fn find_by_id(&self, tier_id: i32) -> Result<Option<TierEntity>>;
}
