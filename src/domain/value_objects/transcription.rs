use serde::{Deserialize, Serialize};

/// One speaker-attributed span as returned by the transcription engine.
/// Order in the returned list is authoritative; stored `sequence` follows it,
/// not the timestamps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineSegment {
    pub start_time: f64,
    pub end_time: f64,
    pub content: String,
    pub speaker_label: String,
    #[serde(default)]
    pub confidence: Option<f64>,
}
