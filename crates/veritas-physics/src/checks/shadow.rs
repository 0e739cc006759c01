//! Shadow direction consistency check.

use veritas_models::{CheckKind, CheckResult, ShadowAngles};

use super::degrade;
use crate::constants::{SHADOW_MIN_SAMPLES, SHADOW_VARIANCE_TOLERANCE};
use crate::error::PhysicsError;

const CONFIDENCE_VIOLATION: f64 = 88.0;
const CONFIDENCE_PASS: f64 = 80.0;

/// Population variance.
pub fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
}

/// A single light source casts shadows in one direction; a wide spread of
/// angles points to composited lighting.
pub fn check_shadow(angles: &ShadowAngles) -> CheckResult {
    let values = &angles.0;
    if values.len() < SHADOW_MIN_SAMPLES {
        return degrade(
            CheckKind::Shadow,
            &PhysicsError::insufficient(format!(
                "need at least {} shadow angles, got {}",
                SHADOW_MIN_SAMPLES,
                values.len()
            )),
        );
    }
    if values.iter().any(|v| !v.is_finite()) {
        return degrade(
            CheckKind::Shadow,
            &PhysicsError::invalid("shadow angles must be finite"),
        );
    }

    let spread = variance(values);
    let violated = spread > SHADOW_VARIANCE_TOLERANCE;
    let mean = values.iter().sum::<f64>() / values.len() as f64;

    CheckResult::evaluated(
        CheckKind::Shadow,
        violated,
        spread,
        SHADOW_VARIANCE_TOLERANCE,
        if violated {
            CONFIDENCE_VIOLATION
        } else {
            CONFIDENCE_PASS
        },
    )
    .with_detail("mean_angle", mean)
    .with_detail("samples", values.len() as f64)
}
