//! Verdicts and the response envelopes returned to a transport.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ambiguity::{Implication, QuestionKind};
use crate::check::CheckResult;
use crate::session::SessionId;
use crate::signature::SignatureEntry;

/// Final authenticity classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Authentic,
    Synthetic,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Authentic => "AUTHENTIC",
            Verdict::Synthetic => "SYNTHETIC",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What one `analyze` or `clarify` call hands back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnalysisResponse {
    /// A question must be answered before a verdict can be trusted
    InterrogationRequired {
        session_id: SessionId,
        question_kind: QuestionKind,
        question_text: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        implications: Vec<Implication>,
        partial_results: Vec<CheckResult>,
    },

    /// Verdict emitted; the session is terminated
    Completed {
        session_id: SessionId,
        verdict: Verdict,
        /// Confidence in the verdict, 0-100
        confidence: f64,
        results: Vec<CheckResult>,
        /// Only present after clarification
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        reasoning_steps: Vec<String>,
        /// One structural line per violated check
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        findings: Vec<String>,
        /// Advisory matches from the signature store
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        prior_matches: Vec<SignatureEntry>,
    },
}

impl AnalysisResponse {
    pub fn session_id(&self) -> &SessionId {
        match self {
            AnalysisResponse::InterrogationRequired { session_id, .. } => session_id,
            AnalysisResponse::Completed { session_id, .. } => session_id,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, AnalysisResponse::Completed { .. })
    }

    pub fn verdict(&self) -> Option<Verdict> {
        match self {
            AnalysisResponse::Completed { verdict, .. } => Some(*verdict),
            AnalysisResponse::InterrogationRequired { .. } => None,
        }
    }

    pub fn confidence(&self) -> Option<f64> {
        match self {
            AnalysisResponse::Completed { confidence, .. } => Some(*confidence),
            AnalysisResponse::InterrogationRequired { .. } => None,
        }
    }

    pub fn question_kind(&self) -> Option<QuestionKind> {
        match self {
            AnalysisResponse::InterrogationRequired { question_kind, .. } => Some(*question_kind),
            AnalysisResponse::Completed { .. } => None,
        }
    }

    /// Check results carried by either variant.
    pub fn results(&self) -> &[CheckResult] {
        match self {
            AnalysisResponse::InterrogationRequired {
                partial_results, ..
            } => partial_results,
            AnalysisResponse::Completed { results, .. } => results,
        }
    }

    pub fn reasoning_steps(&self) -> &[String] {
        match self {
            AnalysisResponse::Completed {
                reasoning_steps, ..
            } => reasoning_steps,
            AnalysisResponse::InterrogationRequired { .. } => &[],
        }
    }
}
