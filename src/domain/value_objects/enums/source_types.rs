use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum SourceType {
    #[default]
    Recorded,
    Imported,
}

impl Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let source_type = match self {
            SourceType::Recorded => "RECORDED",
            SourceType::Imported => "IMPORTED",
        };
        write!(f, "{}", source_type)
    }
}

impl TryFrom<&str> for SourceType {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "RECORDED" => Ok(SourceType::Recorded),
            "IMPORTED" => Ok(SourceType::Imported),
            other => Err(anyhow::anyhow!("unknown source type: {}", other)),
        }
    }
}
