use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::{
    entities::{tiers::TierEntity, users::UserEntity},
    repositories::tiers::TierRepository,
};

/// Resolves the effective quota tier for a user. No tier assigned means
/// unlimited; a dangling `tier_id` is logged and also treated as unlimited so
/// a deleted tier row can't lock users out of uploads.
pub struct TierResolver<T>
where
    T: TierRepository + Send + Sync + 'static,
{
    tier_repository: Arc<T>,
}

impl<T> TierResolver<T>
where
    T: TierRepository + Send + Sync + 'static,
{
    pub fn new(tier_repository: Arc<T>) -> Self {
        Self { tier_repository }
    }

    pub async fn resolve_for_user(&self, user: &UserEntity) -> Result<Option<TierEntity>> {
        let Some(tier_id) = user.tier_id else {
            debug!(user_id = %user.user_id, "tier_resolver: user has no tier, unlimited");
            return Ok(None);
        };

        let tier = self.tier_repository.find_by_id(tier_id).await?;
        if tier.is_none() {
            warn!(
                user_id = %user.user_id,
                tier_id,
                "tier_resolver: assigned tier does not exist, treating as unlimited"
            );
        }

        Ok(tier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::tiers::MockTierRepository;
    use chrono::Utc;
    use mockall::predicate::eq;
    use uuid::Uuid;

    fn sample_user(tier_id: Option<i32>) -> UserEntity {
        UserEntity {
            user_id: Uuid::new_v4(),
            email: "user@example.com".to_string(),
            full_name: None,
            tier_id,
            role: "USER".to_string(),
            is_active: true,
            storage_used_mb: 0.0,
            created_at: Utc::now(),
        }
    }

    fn sample_tier() -> TierEntity {
        TierEntity {
            tier_id: 7,
            name: "Pro".to_string(),
            max_storage_mb: 10_000,
            max_recordings: 500,
            max_duration_per_recording_sec: 14_400,
            max_ai_minutes_monthly: Some(600),
            allow_diarization: true,
            allow_summarization: true,
        }
    }

    #[tokio::test]
    async fn user_without_tier_resolves_to_none() {
        let tier_repo = MockTierRepository::new();
        let resolver = TierResolver::new(Arc::new(tier_repo));

        let tier = resolver.resolve_for_user(&sample_user(None)).await.unwrap();
        assert!(tier.is_none());
    }

    #[tokio::test]
    async fn assigned_tier_is_loaded() {
        let mut tier_repo = MockTierRepository::new();
        tier_repo
            .expect_find_by_id()
            .with(eq(7))
            .returning(|_| Box::pin(async { Ok(Some(sample_tier())) }));

        let resolver = TierResolver::new(Arc::new(tier_repo));
        let tier = resolver
            .resolve_for_user(&sample_user(Some(7)))
            .await
            .unwrap();

        assert_eq!(tier.unwrap().tier_id, 7);
    }

    #[tokio::test]
    async fn dangling_tier_id_resolves_to_none() {
        let mut tier_repo = MockTierRepository::new();
        tier_repo
            .expect_find_by_id()
            .with(eq(42))
            .returning(|_| Box::pin(async { Ok(None) }));

        let resolver = TierResolver::new(Arc::new(tier_repo));
        let tier = resolver
            .resolve_for_user(&sample_user(Some(42)))
            .await
            .unwrap();

        assert!(tier.is_none());
    }
}
