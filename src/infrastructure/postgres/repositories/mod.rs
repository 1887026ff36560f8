pub mod ai_usage_logs;
pub mod audit_logs;
pub mod export_jobs;
pub mod folders;
pub mod recording_speakers;
pub mod recordings;
pub mod summaries;
pub mod tiers;
pub mod transcripts;
pub mod users;
