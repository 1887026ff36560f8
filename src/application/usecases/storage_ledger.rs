use anyhow::Result;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::domain::repositories::users::UserRepository;

/// Running storage-usage bookkeeping on the user row. Updates are a single
/// conditional statement clamped at zero, so concurrent uploads and deletes
/// cannot drive the total negative. Callers wrap ledger updates in
/// `best_effort`: an inaccurate total is an accepted, logged inconsistency
/// and never aborts the parent operation.
pub struct StorageLedger<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    user_repository: Arc<U>,
}

impl<U> StorageLedger<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    pub fn new(user_repository: Arc<U>) -> Self {
        Self { user_repository }
    }

    pub async fn increase(&self, user_id: Uuid, delta_mb: f64) -> Result<f64> {
        let new_total = self
            .user_repository
            .adjust_storage_used(user_id, delta_mb)
            .await?;
        debug!(%user_id, delta_mb, new_total, "storage ledger increased");
        Ok(new_total)
    }

    pub async fn decrease(&self, user_id: Uuid, delta_mb: f64) -> Result<f64> {
        let new_total = self
            .user_repository
            .adjust_storage_used(user_id, -delta_mb)
            .await?;
        debug!(%user_id, delta_mb, new_total, "storage ledger decreased");
        Ok(new_total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::users::MockUserRepository;
    use mockall::predicate::eq;

    #[tokio::test]
    async fn increase_passes_positive_delta() {
        let user_id = Uuid::new_v4();

        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_adjust_storage_used()
            .with(eq(user_id), eq(25.5))
            .returning(|_, _| Box::pin(async { Ok(125.5) }));

        let ledger = StorageLedger::new(Arc::new(user_repo));
        assert_eq!(ledger.increase(user_id, 25.5).await.unwrap(), 125.5);
    }

    #[tokio::test]
    async fn decrease_negates_delta_and_repository_clamps_at_zero() {
        let user_id = Uuid::new_v4();

        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_adjust_storage_used()
            .with(eq(user_id), eq(-300.0))
            .returning(|_, _| Box::pin(async { Ok(0.0) }));

        let ledger = StorageLedger::new(Arc::new(user_repo));
        assert_eq!(ledger.decrease(user_id, 300.0).await.unwrap(), 0.0);
    }
}
