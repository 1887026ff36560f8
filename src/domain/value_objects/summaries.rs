use serde::{Deserialize, Serialize};

/// Structured result of the summarization engine. Stored verbatim as the
/// summary's `content_structure`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SummaryStructure {
    pub overview: String,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub action_items: Vec<String>,
}

impl SummaryStructure {
    /// Fallback persisted when the engine fails. Summarization failures are
    /// soft: the caller still gets a versioned summary row.
    pub fn error_fallback() -> Self {
        Self {
            overview: "Error generating summary.".to_string(),
            key_points: Vec::new(),
            action_items: Vec::new(),
        }
    }
}
