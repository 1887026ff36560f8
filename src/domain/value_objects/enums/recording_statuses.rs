use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum RecordingStatus {
    #[default]
    Uploading,
    Processed,
    Error,
}

impl Display for RecordingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = match self {
            RecordingStatus::Uploading => "UPLOADING",
            RecordingStatus::Processed => "PROCESSED",
            RecordingStatus::Error => "ERROR",
        };
        write!(f, "{}", status)
    }
}

impl TryFrom<&str> for RecordingStatus {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, anyhow::Error> {
        match value {
            "UPLOADING" => Ok(RecordingStatus::Uploading),
            "PROCESSED" => Ok(RecordingStatus::Processed),
            "ERROR" => Ok(RecordingStatus::Error),
            other => Err(anyhow::anyhow!("unknown recording status: {}", other)),
        }
    }
}
