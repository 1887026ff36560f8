use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum SummaryType {
    #[default]
    AiGenerated,
    UserEdited,
}

impl Display for SummaryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let summary_type = match self {
            SummaryType::AiGenerated => "AI_GENERATED",
            SummaryType::UserEdited => "USER_EDITED",
        };
        write!(f, "{}", summary_type)
    }
}
