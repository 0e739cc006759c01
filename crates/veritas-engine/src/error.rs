//! Engine error types.
//!
//! These cover misuse of the session API only. Physics and store failures
//! degrade into results and never surface here.

use thiserror::Error;
use veritas_models::SessionState;

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("Session {0} has no pending question")]
    NoPendingQuestion(String),

    #[error("Session {0} already produced a verdict")]
    SessionClosed(String),

    #[error("Session {0} is awaiting an answer to a pending question")]
    QuestionAlreadyPending(String),

    #[error("Invalid observation: {0}")]
    InvalidObservation(String),
}

impl EngineError {
    pub fn invalid_observation(msg: impl Into<String>) -> Self {
        Self::InvalidObservation(msg.into())
    }

    /// Error for an operation attempted in the wrong session state.
    pub(crate) fn for_state(session_id: &str, state: SessionState) -> Option<Self> {
        match state {
            SessionState::Completed => Some(Self::SessionClosed(session_id.to_string())),
            SessionState::AwaitingClarification => {
                Some(Self::QuestionAlreadyPending(session_id.to_string()))
            }
            SessionState::Created => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_state() {
        assert_eq!(EngineError::for_state("s", SessionState::Created), None);
        assert_eq!(
            EngineError::for_state("s", SessionState::Completed),
            Some(EngineError::SessionClosed("s".to_string()))
        );
        assert!(matches!(
            EngineError::for_state("s", SessionState::AwaitingClarification),
            Some(EngineError::QuestionAlreadyPending(_))
        ));
    }

    #[test]
    fn test_error_display() {
        let err = EngineError::invalid_observation("Deceleration must be finite");
        assert_eq!(
            err.to_string(),
            "Invalid observation: Deceleration must be finite"
        );
    }
}
