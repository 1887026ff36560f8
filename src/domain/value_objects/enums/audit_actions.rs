use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum AuditAction {
    CreateRecording,
    Upload,
    UpdateRecording,
    SoftDeleteRecording,
    RestoreRecording,
    HardDeleteRecording,
    GenerateSummary,
    CreateExport,
}

impl Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let action = match self {
            AuditAction::CreateRecording => "CREATE_RECORDING",
            AuditAction::Upload => "UPLOAD",
            AuditAction::UpdateRecording => "UPDATE_RECORDING",
            AuditAction::SoftDeleteRecording => "SOFT_DELETE_RECORDING",
            AuditAction::RestoreRecording => "RESTORE_RECORDING",
            AuditAction::HardDeleteRecording => "HARD_DELETE_RECORDING",
            AuditAction::GenerateSummary => "GENERATE_SUMMARY",
            AuditAction::CreateExport => "CREATE_EXPORT",
        };
        write!(f, "{}", action)
    }
}
