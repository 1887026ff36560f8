use thiserror::Error;

/// Raised by transcript/summary repositories when an insert loses the race on
/// the `(recording_id, version_no)` uniqueness constraint. Orchestrators
/// recompute the version and retry once on this marker.
#[derive(Debug, Error)]
#[error("version number conflict for recording")]
pub struct VersionConflict;
