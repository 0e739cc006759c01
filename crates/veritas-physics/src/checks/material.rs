//! Material failure check: did an object survive an impact it should not have?

use veritas_models::{shatter_threshold_for, CheckKind, CheckResult, Material, MaterialImpact};

use super::degrade;
use crate::error::PhysicsError;

const CONFIDENCE_VIOLATION: f64 = 97.0;
const CONFIDENCE_PASS: f64 = 85.0;

/// Violation iff the impact reached the material's shatter threshold and the
/// object is still reported intact. Unknown materials use the default
/// threshold.
pub fn check_material(impact: &MaterialImpact) -> CheckResult {
    let velocity = impact.impact_velocity;
    if !velocity.is_finite() || velocity < 0.0 {
        return degrade(
            CheckKind::Material,
            &PhysicsError::invalid("impact velocity must be finite and non-negative"),
        );
    }

    let threshold = shatter_threshold_for(&impact.material);
    let should_break = velocity >= threshold;
    let violated = should_break && impact.object_intact;

    CheckResult::evaluated(
        CheckKind::Material,
        violated,
        velocity,
        threshold,
        if violated {
            CONFIDENCE_VIOLATION
        } else {
            CONFIDENCE_PASS
        },
    )
    .with_detail("object_intact", if impact.object_intact { 1.0 } else { 0.0 })
    .with_detail(
        "known_material",
        if Material::from_answer(&impact.material).is_some() {
            1.0
        } else {
            0.0
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use veritas_models::CheckStatus;

    fn impact(material: &str, velocity: f64, intact: bool) -> MaterialImpact {
        MaterialImpact {
            material: material.to_string(),
            impact_velocity: velocity,
            object_intact: intact,
        }
    }

    #[test]
    fn test_threshold_boundary() {
        for material in Material::ALL {
            let threshold = material.shatter_threshold();
            for eps in [1e-6, 0.5, 2.0] {
                let below = check_material(&impact(material.key(), threshold - eps, true));
                assert_eq!(below.status, CheckStatus::Pass, "{} below", material);
                let above = check_material(&impact(material.key(), threshold + eps, true));
                assert_eq!(above.status, CheckStatus::Violation, "{} above", material);
            }
        }
    }

    #[test]
    fn test_broken_object_is_consistent() {
        let r = check_material(&impact("glass", 15.0, false));
        assert_eq!(r.status, CheckStatus::Pass);
        assert_eq!(r.confidence, 85.0);
    }

    #[test]
    fn test_unknown_material_uses_default() {
        let r = check_material(&impact("granite", 10.0, true));
        assert_eq!(r.status, CheckStatus::Violation);
        assert_eq!(r.expected, Some(10.0));
        assert_eq!(r.details.get("known_material"), Some(&0.0));
        assert_eq!(r.confidence, 97.0);
    }
}
