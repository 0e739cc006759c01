//! Structured session logging.
//!
//! Every event carries the session id and declared motion so a log line can
//! be joined back to its observation without the surrounding span.

use tracing::{info, warn, Span};
use veritas_models::{CheckResult, ClarificationOutcome, MotionType, QuestionKind, SessionId};

use crate::aggregator::Aggregation;

/// Counts over one batch of check results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct CheckTally {
    pub passed: usize,
    pub violated: usize,
    pub undetermined: usize,
}

impl CheckTally {
    pub(crate) fn of(results: &[CheckResult]) -> Self {
        results.iter().fold(Self::default(), |mut tally, r| {
            if r.is_violation() {
                tally.violated += 1;
            } else if r.is_pass() {
                tally.passed += 1;
            } else {
                tally.undetermined += 1;
            }
            tally
        })
    }
}

/// Logger bound to one session and one engine call.
#[derive(Debug, Clone)]
pub struct SessionLogger {
    session_id: String,
    motion_type: MotionType,
    operation: &'static str,
}

impl SessionLogger {
    /// `operation` names the engine call, "analysis" or "clarification".
    pub fn new(session_id: &SessionId, motion_type: MotionType, operation: &'static str) -> Self {
        Self {
            session_id: session_id.to_string(),
            motion_type,
            operation,
        }
    }

    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "session",
            session_id = %self.session_id,
            motion_type = self.motion_type.as_str(),
            operation = self.operation
        )
    }

    /// Summary of the direct checks, plus one warning per check that could not run.
    pub fn log_checks(&self, results: &[CheckResult]) {
        let tally = CheckTally::of(results);
        info!(
            session_id = %self.session_id,
            motion_type = self.motion_type.as_str(),
            checks = results.len(),
            passed = tally.passed,
            violated = tally.violated,
            undetermined = tally.undetermined,
            "Physics checks evaluated"
        );
        for r in results.iter().filter(|r| !r.status.is_determined()) {
            warn!(
                session_id = %self.session_id,
                check = r.check.as_str(),
                status = r.status.as_str(),
                reason = r.message.as_deref().unwrap_or(""),
                "Check degraded"
            );
        }
    }

    pub fn log_question(&self, kind: QuestionKind, triggered: &[QuestionKind]) {
        info!(
            session_id = %self.session_id,
            question_kind = kind.as_str(),
            triggered = triggered.len(),
            "Awaiting clarification"
        );
    }

    pub fn log_answer(&self, outcome: &ClarificationOutcome) {
        if outcome.answer_recognized {
            info!(
                session_id = %self.session_id,
                question_kind = outcome.question_kind.as_str(),
                is_fake = outcome.is_fake(),
                confidence = outcome.confidence,
                "Clarification resolved"
            );
        } else {
            warn!(
                session_id = %self.session_id,
                question_kind = outcome.question_kind.as_str(),
                answer = %outcome.user_answer,
                "Answer matched no known key, default assumed"
            );
        }
    }

    pub fn log_verdict(&self, aggregation: &Aggregation) {
        info!(
            session_id = %self.session_id,
            motion_type = self.motion_type.as_str(),
            verdict = aggregation.verdict.as_str(),
            confidence = aggregation.confidence,
            violations = aggregation.violations,
            total_checks = aggregation.total_checks,
            prior_matches = aggregation.prior_matches.len(),
            "Verdict reached"
        );
    }
}
