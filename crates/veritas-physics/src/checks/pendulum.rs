//! Pendulum check: recover g from period and length.

use std::f64::consts::PI;

use veritas_models::{CheckKind, CheckResult, PendulumMeasurement};

use super::{degrade, evaluate_gravity};
use crate::error::PhysicsError;

/// Small-angle pendulum: `g = 4π²L/T²`.
pub fn pendulum_gravity(period: f64, length: f64) -> f64 {
    4.0 * PI * PI * length / (period * period)
}

/// Run the gravity comparison on the g implied by a pendulum.
pub fn check_pendulum(m: &PendulumMeasurement) -> CheckResult {
    if !(m.period.is_finite() && m.length.is_finite()) || m.period <= 0.0 || m.length <= 0.0 {
        return degrade(
            CheckKind::Pendulum,
            &PhysicsError::invalid("period and length must be positive"),
        );
    }
    evaluate_gravity(CheckKind::Pendulum, pendulum_gravity(m.period, m.length))
        .with_detail("period", m.period)
        .with_detail("length", m.length)
}
