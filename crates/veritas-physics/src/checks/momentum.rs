//! Momentum conservation check for two-body collisions.

use veritas_models::{CheckKind, CheckResult, MomentumMeasurement};

use super::degrade;
use crate::constants::{MOMENTUM_ABSOLUTE_TOLERANCE, MOMENTUM_RELATIVE_TOLERANCE};
use crate::error::PhysicsError;

const CONFIDENCE_VIOLATION: f64 = 90.0;
const CONFIDENCE_PASS: f64 = 85.0;

/// Compare total momentum before and after the collision.
pub fn check_momentum(m: &MomentumMeasurement) -> CheckResult {
    if m.masses.iter().any(|&mass| mass <= 0.0 || !mass.is_finite()) {
        return degrade(
            CheckKind::Momentum,
            &PhysicsError::invalid("masses must be positive and finite"),
        );
    }

    let before = m.momentum_before();
    let after = m.momentum_after();
    if !before.is_finite() || !after.is_finite() {
        return degrade(
            CheckKind::Momentum,
            &PhysicsError::invalid("velocities must be finite"),
        );
    }

    let change = (after - before).abs();
    let tolerance = if before == 0.0 {
        MOMENTUM_ABSOLUTE_TOLERANCE
    } else {
        MOMENTUM_RELATIVE_TOLERANCE * before.abs()
    };
    let violated = change > tolerance;

    CheckResult::evaluated(
        CheckKind::Momentum,
        violated,
        after,
        before,
        if violated {
            CONFIDENCE_VIOLATION
        } else {
            CONFIDENCE_PASS
        },
    )
    .with_detail("momentum_change", change)
    .with_detail("tolerance", tolerance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use veritas_models::CheckStatus;

    fn collision(before: [f64; 2], after: [f64; 2]) -> MomentumMeasurement {
        MomentumMeasurement {
            masses: [2.0, 3.0],
            velocities_before: before,
            velocities_after: after,
        }
    }

    #[test]
    fn test_conserved_collision_passes() {
        // p = 2*3 + 3*0 = 6 before; 2*0 + 3*2 = 6 after
        let r = check_momentum(&collision([3.0, 0.0], [0.0, 2.0]));
        assert_eq!(r.status, CheckStatus::Pass);
        assert_eq!(r.confidence, 85.0);
    }

    #[test]
    fn test_momentum_gain_is_violation() {
        let r = check_momentum(&collision([3.0, 0.0], [2.0, 2.0]));
        assert_eq!(r.status, CheckStatus::Violation);
        assert_eq!(r.confidence, 90.0);
    }

    #[test]
    fn test_zero_initial_momentum_uses_absolute_tolerance() {
        let small = check_momentum(&collision([3.0, -2.0], [0.02, 0.0]));
        assert_eq!(small.status, CheckStatus::Pass);
        let large = check_momentum(&collision([3.0, -2.0], [1.0, 0.0]));
        assert_eq!(large.status, CheckStatus::Violation);
    }

    #[test]
    fn test_time_reversal_symmetry() {
        let cases = [
            collision([3.0, 0.0], [0.0, 2.0]),
            collision([3.0, 0.0], [2.0, 2.0]),
            collision([1.0, -1.0], [-0.5, 0.4]),
            collision([4.0, 1.0], [1.0, 3.0]),
        ];
        for m in cases {
            assert_eq!(
                check_momentum(&m).status,
                check_momentum(&m.time_reversed()).status
            );
        }
    }

    #[test]
    fn test_invalid_mass() {
        let mut m = collision([1.0, 1.0], [1.0, 1.0]);
        m.masses[0] = 0.0;
        assert_eq!(check_momentum(&m).status, CheckStatus::Error);
    }
}
