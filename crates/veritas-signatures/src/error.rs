//! Signature store error types.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors a signature store may report. Callers treat all of them as
/// non-fatal.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("Signature store unavailable: {0}")]
    Unavailable(String),

    #[error("Signature store lock poisoned during {0}")]
    Poisoned(&'static str),
}

impl StoreError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}
