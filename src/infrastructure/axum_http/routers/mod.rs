pub mod admin;
pub mod export_jobs;
pub mod recordings;
pub mod summaries;
pub mod transcripts;
