use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum TranscriptType {
    #[default]
    AiOriginal,
    UserEdited,
    Regenerated,
}

impl Display for TranscriptType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let transcript_type = match self {
            TranscriptType::AiOriginal => "AI_ORIGINAL",
            TranscriptType::UserEdited => "USER_EDITED",
            TranscriptType::Regenerated => "REGENERATED",
        };
        write!(f, "{}", transcript_type)
    }
}
