//! Combines check results into one verdict.

use tracing::{debug, info, warn};
use veritas_models::{
    CheckKind, CheckResult, MotionType, SessionId, SignatureEntry, SignaturePattern,
    SimilarityKey, Verdict,
};
use veritas_signatures::SignatureStore;

use crate::config::EngineConfig;
use crate::metrics;

/// Base SYNTHETIC confidence before the violation ratio is added.
const SYNTHETIC_BASE: f64 = 50.0;
/// Weight of the violation ratio.
const SYNTHETIC_RATIO_WEIGHT: f64 = 30.0;
/// Bonus when the motion classifier flags the physics as implausible.
const IMPLAUSIBLE_BONUS: f64 = 20.0;
const CONFIDENCE_CAP: f64 = 99.9;

/// SYNTHETIC confidence: `min(50 + ratio·30 + bonus, 99.9)`.
pub fn synthetic_confidence(violations: u32, total_checks: u32, implausible: bool) -> f64 {
    let ratio = if total_checks == 0 {
        0.0
    } else {
        f64::from(violations) / f64::from(total_checks)
    };
    let bonus = if implausible { IMPLAUSIBLE_BONUS } else { 0.0 };
    (SYNTHETIC_BASE + ratio * SYNTHETIC_RATIO_WEIGHT + bonus).min(CONFIDENCE_CAP)
}

/// Aggregated verdict for one session.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    pub verdict: Verdict,
    pub confidence: f64,
    pub violations: u32,
    /// Results that reached PASS or VIOLATION
    pub total_checks: u32,
    /// One structural line per violated check, or a single all-passed line
    pub findings: Vec<String>,
    /// Advisory matches from the signature store
    pub prior_matches: Vec<SignatureEntry>,
}

/// Verdict aggregator with the signature store as a side channel.
///
/// Store failures are logged and counted, never returned.
pub struct VerdictAggregator<'a> {
    store: &'a dyn SignatureStore,
    config: &'a EngineConfig,
}

impl<'a> VerdictAggregator<'a> {
    pub fn new(store: &'a dyn SignatureStore, config: &'a EngineConfig) -> Self {
        Self { store, config }
    }

    pub fn aggregate(
        &self,
        session_id: &SessionId,
        motion_type: MotionType,
        results: &[CheckResult],
        implausible: bool,
    ) -> Aggregation {
        let determined: Vec<&CheckResult> =
            results.iter().filter(|r| r.status.is_determined()).collect();
        let violated: Vec<&CheckResult> =
            determined.iter().copied().filter(|r| r.is_violation()).collect();
        let total_checks = determined.len() as u32;
        let violations = violated.len() as u32;

        let skipped = results.len() - determined.len();
        if skipped > 0 {
            debug!(
                session_id = %session_id,
                skipped = skipped,
                "Results without PASS/VIOLATION excluded from verdict"
            );
        }

        let aggregation = if violations > 0 {
            let prior_matches = self.lookup_prior(session_id, motion_type, &violated);
            self.record(session_id, motion_type, &violated, total_checks);
            Aggregation {
                verdict: Verdict::Synthetic,
                confidence: synthetic_confidence(violations, total_checks, implausible),
                violations,
                total_checks,
                findings: violated.iter().copied().map(finding).collect(),
                prior_matches,
            }
        } else {
            let confidence = determined
                .iter()
                .filter(|r| r.is_pass())
                .map(|r| r.confidence)
                .reduce(f64::min)
                .unwrap_or(self.config.authentic_baseline);
            Aggregation {
                verdict: Verdict::Authentic,
                confidence,
                violations,
                total_checks,
                findings: vec![format!(
                    "ALL CHECKS PASSED: {} of {} determined checks consistent with physics",
                    total_checks, total_checks
                )],
                prior_matches: Vec::new(),
            }
        };

        info!(
            session_id = %session_id,
            verdict = %aggregation.verdict,
            confidence = aggregation.confidence,
            violations = violations,
            total_checks = total_checks,
            "Verdict aggregated"
        );
        metrics::record_verdict(aggregation.verdict);
        aggregation
    }

    fn lookup_prior(
        &self,
        session_id: &SessionId,
        motion_type: MotionType,
        violated: &[&CheckResult],
    ) -> Vec<SignatureEntry> {
        let Some(primary) = violated.first() else {
            return Vec::new();
        };

        let mut key = SimilarityKey::new()
            .with_pattern(SignaturePattern::for_check(primary.check))
            .with_motion_type(motion_type);
        for r in violated {
            if let Some((name, value)) = similarity_parameter(r) {
                key = key.with_parameter(name, value);
            }
        }

        match self.store.lookup(&key, self.config.signature_top_k) {
            Ok(matches) => {
                debug!(
                    session_id = %session_id,
                    store = self.store.name(),
                    matches = matches.len(),
                    "Prior signature lookup"
                );
                matches
            }
            Err(e) => {
                warn!(
                    session_id = %session_id,
                    store = self.store.name(),
                    error = %e,
                    "Signature lookup failed, continuing without prior matches"
                );
                metrics::record_store_failure("lookup");
                Vec::new()
            }
        }
    }

    fn record(
        &self,
        session_id: &SessionId,
        motion_type: MotionType,
        violated: &[&CheckResult],
        total_checks: u32,
    ) {
        if !self.config.record_signatures {
            return;
        }
        let Some(primary) = violated.first() else {
            return;
        };

        let kinds: Vec<&str> = violated.iter().map(|r| r.check.as_str()).collect();
        let mut entry = SignatureEntry::new(
            SignaturePattern::for_check(primary.check),
            format!(
                "{} of {} checks violated ({}) in {} motion",
                violated.len(),
                total_checks,
                kinds.join(", "),
                motion_type
            ),
        )
        .with_motion_type(motion_type)
        .with_parameter("violations", violated.len() as f64)
        .with_parameter("total_checks", f64::from(total_checks));
        for r in violated {
            if let Some((name, value)) = similarity_parameter(r) {
                entry = entry.with_parameter(name, value);
            }
        }

        let entry_id = entry.id.clone();
        match self.store.append(entry) {
            Ok(()) => debug!(
                session_id = %session_id,
                signature_id = %entry_id,
                "Recorded violation signature"
            ),
            Err(e) => {
                warn!(
                    session_id = %session_id,
                    store = self.store.name(),
                    error = %e,
                    "Failed to record violation signature"
                );
                metrics::record_store_failure("append");
            }
        }
    }
}

/// Parameter a violated result contributes to similarity keys and entries.
fn similarity_parameter(result: &CheckResult) -> Option<(&'static str, f64)> {
    let measured = result.measured?;
    match result.check {
        CheckKind::Gravity | CheckKind::Pendulum => Some(("gravity", measured)),
        CheckKind::Shadow => Some(("shadow_variance", measured)),
        CheckKind::Momentum => result
            .deviation
            .map(|d| ("momentum_error", d.abs())),
        CheckKind::Material => Some(("impact_velocity", measured)),
        CheckKind::Projectile => result.deviation.map(|d| ("arc_error", d.abs())),
        CheckKind::Deceleration => Some(("deceleration_g", measured)),
    }
}

fn unit(check: CheckKind) -> &'static str {
    match check {
        CheckKind::Gravity | CheckKind::Pendulum => "m/s²",
        CheckKind::Momentum => "kg·m/s",
        CheckKind::Shadow => "deg²",
        CheckKind::Material => "m/s",
        CheckKind::Projectile => "m",
        CheckKind::Deceleration => "g",
    }
}

/// Structural finding line for a violated result.
fn finding(result: &CheckResult) -> String {
    match (result.measured, result.expected) {
        (Some(measured), Some(expected)) => {
            let unit = unit(result.check);
            format!(
                "{}: measured {:.2} {} vs expected {:.2} {}",
                result.check.as_str(),
                measured,
                unit,
                expected,
                unit
            )
        }
        _ => format!("{}: violation", result.check.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veritas_models::CheckStatus;
    use veritas_physics::checks::evaluate_gravity;
    use veritas_signatures::{InMemorySignatureStore, StoreError, StoreResult, StoreStats};

    struct FailingStore;

    impl SignatureStore for FailingStore {
        fn lookup(&self, _: &SimilarityKey, _: usize) -> StoreResult<Vec<SignatureEntry>> {
            Err(StoreError::unavailable("offline"))
        }

        fn append(&self, _: SignatureEntry) -> StoreResult<()> {
            Err(StoreError::unavailable("offline"))
        }

        fn stats(&self) -> StoreResult<StoreStats> {
            Err(StoreError::unavailable("offline"))
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    fn pass(confidence: f64) -> CheckResult {
        CheckResult::evaluated(CheckKind::Shadow, false, 1.0, 15.0, confidence)
    }

    #[test]
    fn test_synthetic_confidence() {
        assert_eq!(synthetic_confidence(1, 1, false), 80.0);
        assert_eq!(synthetic_confidence(1, 2, false), 65.0);
        assert_eq!(synthetic_confidence(2, 2, true), 99.9);
        assert_eq!(synthetic_confidence(1, 4, true), 77.5);
    }

    #[test]
    fn test_single_violation_verdict() {
        let store = InMemorySignatureStore::with_known_signatures();
        let config = EngineConfig::default();
        let results = vec![evaluate_gravity(CheckKind::Gravity, 100.0)];
        let agg = VerdictAggregator::new(&store, &config).aggregate(
            &SessionId::new(),
            MotionType::FreeFall,
            &results,
            false,
        );
        assert_eq!(agg.verdict, Verdict::Synthetic);
        assert_eq!(agg.confidence, 80.0);
        assert_eq!(
            agg.findings,
            vec!["GRAVITY: measured 100.00 m/s² vs expected 9.81 m/s²"]
        );
        // sora_v1_gravity matches on pattern and motion type
        assert_eq!(agg.prior_matches[0].id, "sora_v1_gravity");
        assert_eq!(store.stats().unwrap().recorded_signatures, 1);
    }

    #[test]
    fn test_authentic_uses_weakest_pass() {
        let store = InMemorySignatureStore::new();
        let config = EngineConfig::default();
        let results = vec![
            pass(88.0),
            pass(80.0),
            CheckResult::error(CheckKind::Gravity, "fit failed"),
        ];
        let agg = VerdictAggregator::new(&store, &config).aggregate(
            &SessionId::new(),
            MotionType::Other,
            &results,
            false,
        );
        assert_eq!(agg.verdict, Verdict::Authentic);
        assert_eq!(agg.confidence, 80.0);
        assert_eq!(agg.total_checks, 2);
        assert_eq!(store.stats().unwrap().recorded_signatures, 0);
        assert!(agg.findings[0].starts_with("ALL CHECKS PASSED"));
    }

    #[test]
    fn test_no_determined_checks_uses_baseline() {
        let store = InMemorySignatureStore::new();
        let config = EngineConfig::default();
        let results = vec![CheckResult::insufficient(CheckKind::Shadow, "one angle")];
        let agg = VerdictAggregator::new(&store, &config).aggregate(
            &SessionId::new(),
            MotionType::Other,
            &results,
            true,
        );
        assert_eq!(agg.verdict, Verdict::Authentic);
        assert_eq!(agg.confidence, 90.0);
        assert_eq!(agg.total_checks, 0);
    }

    #[test]
    fn test_store_failure_does_not_change_verdict() {
        let config = EngineConfig::default();
        let results = vec![evaluate_gravity(CheckKind::Gravity, 100.0), pass(80.0)];
        let agg = VerdictAggregator::new(&FailingStore, &config).aggregate(
            &SessionId::new(),
            MotionType::FreeFall,
            &results,
            true,
        );
        assert_eq!(agg.verdict, Verdict::Synthetic);
        assert_eq!(agg.confidence, 85.0);
        assert!(agg.prior_matches.is_empty());
    }

    #[test]
    fn test_recording_can_be_disabled() {
        let store = InMemorySignatureStore::new();
        let config = EngineConfig::default().with_signature_recording(false);
        let results = vec![evaluate_gravity(CheckKind::Gravity, 3.0)];
        VerdictAggregator::new(&store, &config).aggregate(
            &SessionId::new(),
            MotionType::FreeFall,
            &results,
            false,
        );
        assert_eq!(store.stats().unwrap().recorded_signatures, 0);
        assert_eq!(results[0].status, CheckStatus::Violation);
    }
}
