//! Gravity check: fitted acceleration against Earth gravity.

use tracing::warn;
use veritas_models::{CheckKind, CheckResult, TrajectorySamples};

use super::degrade;
use crate::constants::{EARTH_GRAVITY, GRAVITY_TOLERANCE};
use crate::fitter::KinematicFitter;

/// Confidence heuristic shared by the gravity and pendulum checks.
///
/// `error` is the absolute difference from Earth gravity. A pass loses ten
/// points per m/s² of error; a violation gains two and caps at 99.9, so a
/// violation never scores below a pass.
pub fn gravity_confidence(error: f64, violated: bool) -> f64 {
    if violated {
        (95.0 + 2.0 * error).min(99.9)
    } else {
        95.0 - 10.0 * error
    }
}

/// Score a measured gravity value against Earth gravity.
pub fn evaluate_gravity(check: CheckKind, measured_g: f64) -> CheckResult {
    let error = (measured_g - EARTH_GRAVITY).abs();
    let violated = error > GRAVITY_TOLERANCE;
    CheckResult::evaluated(
        check,
        violated,
        measured_g,
        EARTH_GRAVITY,
        gravity_confidence(error, violated),
    )
    .with_detail("absolute_error", error)
}

/// Fit the trajectory and check its acceleration.
pub fn check_gravity(fitter: &KinematicFitter, samples: &TrajectorySamples) -> CheckResult {
    match fitter.fit(samples) {
        Ok(fit) => evaluate_gravity(CheckKind::Gravity, fit.acceleration)
            .with_detail("initial_velocity", fit.initial_velocity)
            .with_detail("initial_height", fit.initial_height)
            .with_detail("residual_rms", fit.residual_rms),
        Err(e) => {
            warn!(error = %e, "Gravity check could not fit trajectory");
            degrade(CheckKind::Gravity, &e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veritas_models::CheckStatus;

    fn trajectory(a: f64) -> TrajectorySamples {
        let t: Vec<f64> = (0..15).map(|i| i as f64 * 0.04).collect();
        let y = t.iter().map(|&ti| 20.0 - 0.5 * a * ti * ti).collect();
        TrajectorySamples::new(t, y)
    }

    #[test]
    fn test_pass_iff_within_tolerance() {
        let fitter = KinematicFitter::new();
        for &(a, expected) in &[
            (9.81, CheckStatus::Pass),
            (8.5, CheckStatus::Pass),
            (11.2, CheckStatus::Pass),
            (8.0, CheckStatus::Violation),
            (11.5, CheckStatus::Violation),
            (1.62, CheckStatus::Violation),
        ] {
            let result = check_gravity(&fitter, &trajectory(a));
            assert_eq!(result.status, expected, "a = {}", a);
        }
    }

    #[test]
    fn test_confidence_formula() {
        let pass = evaluate_gravity(CheckKind::Gravity, 10.31);
        assert!((pass.confidence - 90.0).abs() < 1e-9);

        let violation = evaluate_gravity(CheckKind::Gravity, 12.81);
        assert!((violation.confidence - 99.9).abs() < 1e-9);

        let mild = evaluate_gravity(CheckKind::Gravity, 11.41);
        assert!((mild.confidence - 98.2).abs() < 1e-9);
    }

    #[test]
    fn test_violation_confidence_never_below_pass() {
        let mut worst_violation = f64::MAX;
        let mut best_pass = f64::MIN;
        for i in 0..400 {
            let g = i as f64 * 0.05;
            let r = evaluate_gravity(CheckKind::Gravity, g);
            if r.is_violation() {
                worst_violation = worst_violation.min(r.confidence);
            } else {
                best_pass = best_pass.max(r.confidence);
            }
        }
        assert!(worst_violation >= best_pass);
    }

    #[test]
    fn test_fit_failure_becomes_error_result() {
        let samples = TrajectorySamples::new(vec![0.0, 0.0, 0.0], vec![1.0, 2.0, 3.0]);
        let result = check_gravity(&KinematicFitter::new(), &samples);
        assert_eq!(result.status, CheckStatus::Error);
        assert!(result.message.is_some());
    }
}
