//! Error types for physics fitting and checks.

use thiserror::Error;
use veritas_models::CheckStatus;

/// Result type for physics operations.
pub type PhysicsResult<T> = Result<T, PhysicsError>;

/// Errors that can occur while fitting or checking.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    #[error("Fit did not converge: {message}")]
    FitError { message: String, iterations: usize },

    #[error("Degenerate samples: {0}")]
    DegenerateSamples(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Invalid measurement: {0}")]
    InvalidMeasurement(String),
}

impl PhysicsError {
    /// Create a fit failure error.
    pub fn fit_error(message: impl Into<String>, iterations: usize) -> Self {
        Self::FitError {
            message: message.into(),
            iterations,
        }
    }

    pub fn degenerate(message: impl Into<String>) -> Self {
        Self::DegenerateSamples(message.into())
    }

    pub fn insufficient(message: impl Into<String>) -> Self {
        Self::InsufficientData(message.into())
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidMeasurement(message.into())
    }

    /// Status a check reports when it hits this error.
    ///
    /// Fitting problems, including degenerate samples, are FIT_ERROR and
    /// surface as ERROR; a check that declines to run reports INSUFFICIENT_DATA.
    pub fn status(&self) -> CheckStatus {
        match self {
            PhysicsError::FitError { .. }
            | PhysicsError::DegenerateSamples(_)
            | PhysicsError::InvalidMeasurement(_) => CheckStatus::Error,
            PhysicsError::InsufficientData(_) => CheckStatus::InsufficientData,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(PhysicsError::fit_error("x", 3).status(), CheckStatus::Error);
        assert_eq!(PhysicsError::degenerate("x").status(), CheckStatus::Error);
        assert_eq!(
            PhysicsError::insufficient("x").status(),
            CheckStatus::InsufficientData
        );
    }
}
