//! Result of re-scoring a check with human-supplied context.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ambiguity::QuestionKind;

/// Re-scored outcome for one answered question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ClarificationOutcome {
    pub question_kind: QuestionKind,

    /// Answer exactly as the human typed it
    pub user_answer: String,

    /// False when the answer matched no key and the default was used
    pub answer_recognized: bool,

    #[serde(rename = "is_fake")]
    pub is_violation: bool,

    /// Confidence in `is_violation`, 0-1
    pub confidence: f64,

    /// Discrete logical statements in emission order, ending with a VERDICT line
    pub reasoning_steps: Vec<String>,
}

impl ClarificationOutcome {
    /// Alias for `is_violation`, matching the wire name.
    pub fn is_fake(&self) -> bool {
        self.is_violation
    }

    /// The closing verdict line.
    pub fn verdict_line(&self) -> Option<&str> {
        self.reasoning_steps
            .last()
            .map(String::as_str)
            .filter(|s| s.starts_with("VERDICT:"))
    }
}
