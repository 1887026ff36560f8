pub mod audit_actions;
pub mod export_statuses;
pub mod export_types;
pub mod recording_statuses;
pub mod source_types;
pub mod summary_types;
pub mod transcript_types;
pub mod user_roles;
