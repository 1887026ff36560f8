pub mod ai_usage_logs;
pub mod audit_logs;
pub mod export_jobs;
pub mod export_renderer;
pub mod folders;
pub mod object_storage;
pub mod recording_speakers;
pub mod recordings;
pub mod summaries;
pub mod summarization_engine;
pub mod tiers;
pub mod transcription_engine;
pub mod transcripts;
pub mod users;
