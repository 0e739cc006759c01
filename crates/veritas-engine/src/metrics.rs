//! Engine metrics.
//!
//! No recorder is installed here; a host process decides where these go.

use metrics::counter;
use veritas_models::{QuestionKind, Verdict};

/// Metric names as constants for consistency.
pub mod names {
    pub const INTERROGATIONS_TOTAL: &str = "veritas_interrogations_total";
    pub const VERDICTS_TOTAL: &str = "veritas_verdicts_total";
    pub const SIGNATURE_STORE_FAILURES_TOTAL: &str = "veritas_signature_store_failures_total";
}

/// Record a question surfaced to the user.
pub fn record_interrogation(kind: QuestionKind) {
    let labels = [("kind", kind.as_str().to_string())];
    counter!(names::INTERROGATIONS_TOTAL, &labels).increment(1);
}

/// Record a final verdict.
pub fn record_verdict(verdict: Verdict) {
    let labels = [("verdict", verdict.as_str().to_string())];
    counter!(names::VERDICTS_TOTAL, &labels).increment(1);
}

/// Record a swallowed signature store failure.
pub fn record_store_failure(op: &str) {
    let labels = [("op", op.to_string())];
    counter!(names::SIGNATURE_STORE_FAILURES_TOTAL, &labels).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_metric_names_are_unique() {
        let all = [
            veritas_physics::library::CHECKS_TOTAL,
            veritas_physics::fitter::FIT_ITERATIONS,
            names::INTERROGATIONS_TOTAL,
            names::VERDICTS_TOTAL,
            names::SIGNATURE_STORE_FAILURES_TOTAL,
        ];
        let unique: HashSet<&str> = all.iter().copied().collect();
        assert_eq!(unique.len(), all.len());
        assert!(all.iter().all(|n| n.starts_with("veritas_")));
    }
}
