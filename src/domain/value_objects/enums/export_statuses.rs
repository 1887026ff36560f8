use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// PENDING -> PROCESSING -> {DONE, FAILED}. DONE and FAILED are terminal.
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ExportStatus {
    #[default]
    Pending,
    Processing,
    Done,
    Failed,
}

impl Display for ExportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = match self {
            ExportStatus::Pending => "PENDING",
            ExportStatus::Processing => "PROCESSING",
            ExportStatus::Done => "DONE",
            ExportStatus::Failed => "FAILED",
        };
        write!(f, "{}", status)
    }
}
