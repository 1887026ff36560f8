use crate::application::errors::{CoreError, CoreResult};
use crate::domain::entities::tiers::TierEntity;

/// Tier-based quota checks. `tier = None` means the user has no tier
/// assigned and every check passes; that is deliberate policy, not an
/// omission.
pub struct QuotaEvaluator;

impl QuotaEvaluator {
    /// Checks run when a recording row is created: recording count plus a
    /// coarse storage pre-check (the real file size is not known yet).
    pub fn check_create(
        tier: Option<&TierEntity>,
        current_recording_count: i64,
        current_storage_used_mb: f64,
    ) -> CoreResult<()> {
        let Some(tier) = tier else {
            return Ok(());
        };

        if current_recording_count >= i64::from(tier.max_recordings) {
            return Err(CoreError::QuotaExceeded(format!(
                "max recordings quota exceeded: limit {}, current {}",
                tier.max_recordings, current_recording_count
            )));
        }

        if current_storage_used_mb >= tier.max_storage_mb as f64 {
            return Err(CoreError::QuotaExceeded(format!(
                "storage quota exhausted: limit {} MB, used {:.2} MB",
                tier.max_storage_mb, current_storage_used_mb
            )));
        }

        Ok(())
    }

    /// Checks run when the upload completes and the real size and duration
    /// are known.
    pub fn check_upload(
        tier: Option<&TierEntity>,
        current_storage_used_mb: f64,
        incoming_file_size_mb: f64,
        incoming_duration_seconds: f64,
    ) -> CoreResult<()> {
        let Some(tier) = tier else {
            return Ok(());
        };

        if current_storage_used_mb + incoming_file_size_mb > tier.max_storage_mb as f64 {
            return Err(CoreError::QuotaExceeded(format!(
                "storage quota exceeded: limit {} MB, used {:.2} MB, incoming {:.2} MB",
                tier.max_storage_mb, current_storage_used_mb, incoming_file_size_mb
            )));
        }

        if incoming_duration_seconds > f64::from(tier.max_duration_per_recording_sec) {
            return Err(CoreError::QuotaExceeded(format!(
                "recording duration {:.0}s exceeds per-recording limit of {}s",
                incoming_duration_seconds, tier.max_duration_per_recording_sec
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tier_with_limits(max_storage_mb: i64, max_recordings: i32, max_duration_sec: i32) -> TierEntity {
        TierEntity {
            tier_id: 1,
            name: "Basic".to_string(),
            max_storage_mb,
            max_recordings,
            max_duration_per_recording_sec: max_duration_sec,
            max_ai_minutes_monthly: None,
            allow_diarization: true,
            allow_summarization: true,
        }
    }

    #[test]
    fn no_tier_passes_every_check() {
        assert!(QuotaEvaluator::check_create(None, i64::MAX, f64::MAX).is_ok());
        assert!(QuotaEvaluator::check_upload(None, f64::MAX, f64::MAX, f64::MAX).is_ok());
    }

    #[test]
    fn denies_create_at_recording_count_limit() {
        let tier = tier_with_limits(1000, 2, 3600);

        assert!(QuotaEvaluator::check_create(Some(&tier), 1, 0.0).is_ok());

        let denied = QuotaEvaluator::check_create(Some(&tier), 2, 0.0).unwrap_err();
        assert!(matches!(denied, CoreError::QuotaExceeded(_)));
        assert!(denied.to_string().contains("max recordings"));
    }

    #[test]
    fn denies_create_when_storage_already_full() {
        let tier = tier_with_limits(100, 10, 3600);

        let denied = QuotaEvaluator::check_create(Some(&tier), 0, 100.0).unwrap_err();
        assert!(matches!(denied, CoreError::QuotaExceeded(_)));
    }

    #[test]
    fn upload_denial_reports_limit_and_usage() {
        let tier = tier_with_limits(100, 10, 3600);

        let denied = QuotaEvaluator::check_upload(Some(&tier), 90.0, 20.0, 60.0).unwrap_err();
        let message = denied.to_string();
        assert!(message.contains("100 MB"));
        assert!(message.contains("90.00 MB"));
    }

    #[test]
    fn upload_at_exact_storage_limit_is_allowed() {
        let tier = tier_with_limits(100, 10, 3600);

        assert!(QuotaEvaluator::check_upload(Some(&tier), 90.0, 10.0, 60.0).is_ok());
    }

    #[test]
    fn denies_upload_over_duration_limit() {
        let tier = tier_with_limits(1000, 10, 1800);

        let denied = QuotaEvaluator::check_upload(Some(&tier), 0.0, 1.0, 1801.0).unwrap_err();
        assert!(matches!(denied, CoreError::QuotaExceeded(_)));
    }
}
