//! Projectile arc check against the closed-form apex height and range.

use veritas_models::{CheckKind, CheckResult, ProjectileMeasurement};

use super::degrade;
use crate::constants::{EARTH_GRAVITY, PROJECTILE_RELATIVE_TOLERANCE};
use crate::error::PhysicsError;

const CONFIDENCE_VIOLATION: f64 = 92.0;
const CONFIDENCE_PASS: f64 = 88.0;

/// Apex height `v0²sin²θ / 2g`.
pub fn expected_height(initial_velocity: f64, launch_angle_deg: f64) -> f64 {
    let s = launch_angle_deg.to_radians().sin();
    initial_velocity * initial_velocity * s * s / (2.0 * EARTH_GRAVITY)
}

/// Level-ground range `v0²sin2θ / g`.
pub fn expected_range(initial_velocity: f64, launch_angle_deg: f64) -> f64 {
    initial_velocity * initial_velocity * (2.0 * launch_angle_deg.to_radians()).sin()
        / EARTH_GRAVITY
}

/// Violation if either the apex height or the range is off by more than 15%.
pub fn check_projectile(m: &ProjectileMeasurement) -> CheckResult {
    let finite = [m.launch_angle_deg, m.initial_velocity, m.max_height, m.range]
        .iter()
        .all(|v| v.is_finite());
    if !finite {
        return degrade(
            CheckKind::Projectile,
            &PhysicsError::invalid("projectile values must be finite"),
        );
    }

    let height = expected_height(m.initial_velocity, m.launch_angle_deg);
    let range = expected_range(m.initial_velocity, m.launch_angle_deg);
    if height <= 0.0 || range <= 0.0 {
        return degrade(
            CheckKind::Projectile,
            &PhysicsError::insufficient("launch parameters give no arc to compare against"),
        );
    }

    let height_error = (m.max_height - height) / height;
    let range_error = (m.range - range) / range;
    let violated = height_error.abs() > PROJECTILE_RELATIVE_TOLERANCE
        || range_error.abs() > PROJECTILE_RELATIVE_TOLERANCE;
    let worst = if range_error.abs() > height_error.abs() {
        range_error
    } else {
        height_error
    };

    CheckResult::evaluated(
        CheckKind::Projectile,
        violated,
        m.max_height,
        height,
        if violated {
            CONFIDENCE_VIOLATION
        } else {
            CONFIDENCE_PASS
        },
    )
    .with_deviation(worst)
    .with_detail("range_measured", m.range)
    .with_detail("range_expected", range)
    .with_detail("height_error", height_error)
    .with_detail("range_error", range_error)
}
