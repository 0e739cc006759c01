//! Stage events emitted while a session runs.
//!
//! Events are recorded synchronously in emission order; a transport may
//! drain them and choose how to pace or render them.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ambiguity::QuestionKind;
use crate::check::CheckResult;
use crate::verdict::Verdict;

/// Stage event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum StageEventType {
    Log,
    Progress,
    CheckCompleted,
    PhysicsUpdate,
    Interrogation,
    Clarified,
    Verdict,
}

impl StageEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageEventType::Log => "log",
            StageEventType::Progress => "progress",
            StageEventType::CheckCompleted => "check_completed",
            StageEventType::PhysicsUpdate => "physics_update",
            StageEventType::Interrogation => "interrogation",
            StageEventType::Clarified => "clarified",
            StageEventType::Verdict => "verdict",
        }
    }
}

/// Stage event envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StageEvent {
    /// Log message with timestamp
    Log {
        message: String,
        timestamp: DateTime<Utc>,
    },

    /// Progress update (0-100)
    Progress { value: u8, stage: String },

    /// One check finished
    CheckCompleted { result: CheckResult },

    /// Measured gravity against the reference constant
    PhysicsUpdate {
        gravity: f64,
        expected: f64,
        deviation: f64,
    },

    /// A question is pending
    Interrogation {
        question_kind: QuestionKind,
        question: String,
    },

    /// A pending question was answered and re-scored
    Clarified {
        question_kind: QuestionKind,
        is_fake: bool,
        confidence: f64,
    },

    /// Verdict emitted
    Verdict {
        verdict: Verdict,
        confidence: f64,
        violations: u32,
        total_checks: u32,
    },
}

impl StageEvent {
    /// Create a log event.
    pub fn log(message: impl Into<String>) -> Self {
        StageEvent::Log {
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a progress event.
    pub fn progress(value: u8, stage: impl Into<String>) -> Self {
        StageEvent::Progress {
            value: value.min(100),
            stage: stage.into(),
        }
    }

    /// Get the event type.
    pub fn event_type(&self) -> StageEventType {
        match self {
            StageEvent::Log { .. } => StageEventType::Log,
            StageEvent::Progress { .. } => StageEventType::Progress,
            StageEvent::CheckCompleted { .. } => StageEventType::CheckCompleted,
            StageEvent::PhysicsUpdate { .. } => StageEventType::PhysicsUpdate,
            StageEvent::Interrogation { .. } => StageEventType::Interrogation,
            StageEvent::Clarified { .. } => StageEventType::Clarified,
            StageEvent::Verdict { .. } => StageEventType::Verdict,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization() {
        let ev = StageEvent::log("Hello");
        let json = serde_json::to_string(&ev).unwrap();
        assert!(json.contains("\"type\":\"log\""));
        assert!(json.contains("\"message\":\"Hello\""));
    }

    #[test]
    fn test_progress_clamps() {
        let ev = StageEvent::progress(150, "fitting");
        if let StageEvent::Progress { value, .. } = ev {
            assert_eq!(value, 100);
        } else {
            panic!("Expected Progress event");
        }
    }

    #[test]
    fn test_event_type() {
        let ev = StageEvent::Verdict {
            verdict: Verdict::Authentic,
            confidence: 90.0,
            violations: 0,
            total_checks: 1,
        };
        assert_eq!(ev.event_type().as_str(), "verdict");
    }
}
