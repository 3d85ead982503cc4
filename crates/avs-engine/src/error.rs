use thiserror::Error;

/// Failures surfaced to callers of the analytics operations.
///
/// Generation problems never appear here; they are absorbed by the
/// deterministic fallbacks (see [`GenerationError`]).
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no mentions found for {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl From<avs_core::CoreError> for EngineError {
    fn from(e: avs_core::CoreError) -> Self {
        EngineError::InvalidInput(e.to_string())
    }
}

/// Why a text-generation call produced nothing usable.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("generator returned status {0}")]
    Status(u16),

    #[error("generator timed out after {0} ms")]
    Timeout(u128),

    #[error("generator returned empty text")]
    Empty,

    #[error("could not parse generator output: {0}")]
    Parse(String),

    #[error("text generation is disabled")]
    Disabled,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
