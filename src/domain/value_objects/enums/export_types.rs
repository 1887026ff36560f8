use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum ExportType {
    TranscriptPdf,
    TranscriptDocx,
    SummaryPdf,
    SummaryDocx,
    FullZip,
}

impl ExportType {
    /// Whether the rendered artifact includes transcript content.
    pub fn requires_transcript(&self) -> bool {
        matches!(
            self,
            ExportType::TranscriptPdf | ExportType::TranscriptDocx | ExportType::FullZip
        )
    }

    /// Whether the rendered artifact includes summary content.
    pub fn requires_summary(&self) -> bool {
        matches!(
            self,
            ExportType::SummaryPdf | ExportType::SummaryDocx | ExportType::FullZip
        )
    }

    pub fn file_extension(&self) -> &'static str {
        match self {
            ExportType::TranscriptPdf | ExportType::SummaryPdf => "pdf",
            ExportType::TranscriptDocx | ExportType::SummaryDocx => "docx",
            ExportType::FullZip => "zip",
        }
    }
}

impl Display for ExportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let export_type = match self {
            ExportType::TranscriptPdf => "TRANSCRIPT_PDF",
            ExportType::TranscriptDocx => "TRANSCRIPT_DOCX",
            ExportType::SummaryPdf => "SUMMARY_PDF",
            ExportType::SummaryDocx => "SUMMARY_DOCX",
            ExportType::FullZip => "FULL_ZIP",
        };
        write!(f, "{}", export_type)
    }
}

impl TryFrom<&str> for ExportType {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "TRANSCRIPT_PDF" => Ok(ExportType::TranscriptPdf),
            "TRANSCRIPT_DOCX" => Ok(ExportType::TranscriptDocx),
            "SUMMARY_PDF" => Ok(ExportType::SummaryPdf),
            "SUMMARY_DOCX" => Ok(ExportType::SummaryDocx),
            "FULL_ZIP" => Ok(ExportType::FullZip),
            other => Err(anyhow::anyhow!("unsupported export type: {}", other)),
        }
    }
}
