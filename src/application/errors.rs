use thiserror::Error;

/// Use-case level failure taxonomy. Repository and collaborator errors enter
/// as `Internal` via `?` unless a use case maps them to something more
/// specific first.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("not authorized to access this {0}")]
    NotAuthorized(&'static str),

    #[error("{0}")]
    InvalidState(String),

    #[error("{0}")]
    QuotaExceeded(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    EngineFailure(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;
