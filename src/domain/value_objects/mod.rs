pub mod enums;
pub mod recordings;
pub mod summaries;
pub mod transcription;
pub mod versioning;
