pub mod exports;
pub mod quota;
pub mod recordings;
pub mod storage_ledger;
pub mod summarization;
pub mod tier_resolver;
pub mod transcription;
