//! Dispatcher that picks checks from the declared motion classification.

use tracing::{debug, info};
use veritas_models::{
    CheckKind, CheckResult, Measurement, MotionType, Observation, ShadowAngles,
};

use crate::checks::{
    check_gravity, check_material, check_momentum, check_pendulum, check_projectile,
    check_shadow,
};
use crate::fitter::KinematicFitter;

/// Counter of evaluated checks, labelled by kind and status.
pub const CHECKS_TOTAL: &str = "veritas_checks_total";

/// The fixed set of physics checks.
///
/// Shadow and material checks run whenever their data is present, whatever
/// the primary motion. A primary check whose data is missing reports
/// `INSUFFICIENT_DATA`.
#[derive(Debug, Clone, Default)]
pub struct CheckLibrary {
    fitter: KinematicFitter,
}

impl CheckLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fitter(fitter: KinematicFitter) -> Self {
        Self { fitter }
    }

    pub fn fitter(&self) -> &KinematicFitter {
        &self.fitter
    }

    /// Run the single check a measurement feeds.
    pub fn run(&self, measurement: &Measurement) -> CheckResult {
        let result = match measurement {
            Measurement::Trajectory(t) => check_gravity(&self.fitter, t),
            Measurement::Momentum(m) => check_momentum(m),
            Measurement::Shadow(s) => check_shadow(s),
            Measurement::MaterialImpact(i) => check_material(i),
            Measurement::Pendulum(p) => check_pendulum(p),
            Measurement::Projectile(p) => check_projectile(p),
        };
        record(&result);
        result
    }

    /// Run every check the observation calls for.
    pub fn run_for(&self, observation: &Observation) -> Vec<CheckResult> {
        let mut measurements = Vec::new();
        let mut results = Vec::new();

        match observation.motion_type {
            MotionType::FreeFall => match &observation.trajectory {
                Some(t) => measurements.push(Measurement::Trajectory(t.clone())),
                None => results.push(missing(CheckKind::Gravity, "trajectory")),
            },
            MotionType::Pendulum => match observation.pendulum {
                Some(p) => measurements.push(Measurement::Pendulum(p)),
                None => results.push(missing(CheckKind::Pendulum, "pendulum")),
            },
            MotionType::Projectile => {
                match observation.projectile {
                    Some(p) => measurements.push(Measurement::Projectile(p)),
                    None => results.push(missing(CheckKind::Projectile, "projectile")),
                }
                if let Some(t) = &observation.trajectory {
                    measurements.push(Measurement::Trajectory(t.clone()));
                }
            }
            MotionType::Collision => match observation.momentum {
                Some(m) => measurements.push(Measurement::Momentum(m)),
                None => results.push(missing(CheckKind::Momentum, "momentum")),
            },
            MotionType::Other => {
                debug!("No primary check for unclassified motion");
            }
        }

        if let Some(angles) = &observation.shadow_angles {
            measurements.push(Measurement::Shadow(ShadowAngles(angles.clone())));
        }
        if let Some(impact) = &observation.impact {
            measurements.push(Measurement::MaterialImpact(impact.clone()));
        }

        for r in &results {
            record(r);
        }
        results.extend(measurements.iter().map(|m| self.run(m)));

        info!(
            motion_type = %observation.motion_type,
            checks = results.len(),
            violations = results.iter().filter(|r| r.is_violation()).count(),
            "Physics checks completed"
        );
        results
    }
}

fn missing(check: CheckKind, what: &str) -> CheckResult {
    CheckResult::insufficient(check, format!("no {} data for declared motion", what))
}

fn record(result: &CheckResult) {
    debug!(
        check = result.check.as_str(),
        status = result.status.as_str(),
        measured = ?result.measured,
        confidence = result.confidence,
        "Check evaluated"
    );
    metrics::counter!(
        CHECKS_TOTAL,
        "kind" => result.check.as_str(),
        "status" => result.status.as_str()
    )
    .increment(1);
}
