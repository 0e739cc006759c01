//! Typed measurements consumed by individual physics checks.
//!
//! A `Measurement` is built once per check invocation from data supplied by
//! vision extraction and is never mutated afterwards.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Ordered (time, vertical position) samples of a tracked object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TrajectorySamples {
    /// Sample times in seconds
    pub timestamps: Vec<f64>,
    /// Vertical positions in metres (up is positive)
    pub positions: Vec<f64>,
}

impl TrajectorySamples {
    pub fn new(timestamps: Vec<f64>, positions: Vec<f64>) -> Self {
        Self {
            timestamps,
            positions,
        }
    }

    /// Number of paired samples.
    pub fn len(&self) -> usize {
        self.timestamps.len().min(self.positions.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Two-body collision: masses and velocities before and after impact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MomentumMeasurement {
    /// Masses in kg
    pub masses: [f64; 2],
    /// Velocities before the collision in m/s
    pub velocities_before: [f64; 2],
    /// Velocities after the collision in m/s
    pub velocities_after: [f64; 2],
}

impl MomentumMeasurement {
    pub fn momentum_before(&self) -> f64 {
        self.masses[0] * self.velocities_before[0] + self.masses[1] * self.velocities_before[1]
    }

    pub fn momentum_after(&self) -> f64 {
        self.masses[0] * self.velocities_after[0] + self.masses[1] * self.velocities_after[1]
    }

    pub fn kinetic_energy_before(&self) -> f64 {
        0.5 * (self.masses[0] * self.velocities_before[0].powi(2)
            + self.masses[1] * self.velocities_before[1].powi(2))
    }

    pub fn kinetic_energy_after(&self) -> f64 {
        0.5 * (self.masses[0] * self.velocities_after[0].powi(2)
            + self.masses[1] * self.velocities_after[1].powi(2))
    }

    /// The same collision viewed backwards in time.
    pub fn time_reversed(&self) -> Self {
        Self {
            masses: self.masses,
            velocities_before: [-self.velocities_after[0], -self.velocities_after[1]],
            velocities_after: [-self.velocities_before[0], -self.velocities_before[1]],
        }
    }
}

/// Shadow direction angles sampled across frames, in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ShadowAngles(pub Vec<f64>);

/// An impact between the tracked object and something else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MaterialImpact {
    /// Material name as reported (free text)
    pub material: String,
    /// Impact velocity in m/s
    pub impact_velocity: f64,
    /// Whether the object survived the impact in one piece
    #[serde(default = "default_intact")]
    pub object_intact: bool,
}

fn default_intact() -> bool {
    true
}

/// Observed period and string length of a pendulum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PendulumMeasurement {
    /// Period in seconds
    pub period: f64,
    /// Length in metres
    pub length: f64,
}

/// Launch parameters and measured outcome of a projectile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ProjectileMeasurement {
    /// Launch angle above horizontal, in degrees
    pub launch_angle_deg: f64,
    /// Initial speed in m/s
    pub initial_velocity: f64,
    /// Measured apex height in metres
    pub max_height: f64,
    /// Measured horizontal range in metres
    pub range: f64,
}

/// Input to exactly one physics check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Measurement {
    Trajectory(TrajectorySamples),
    Momentum(MomentumMeasurement),
    Shadow(ShadowAngles),
    MaterialImpact(MaterialImpact),
    Pendulum(PendulumMeasurement),
    Projectile(ProjectileMeasurement),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_reversal_negates_momentum() {
        let m = MomentumMeasurement {
            masses: [2.0, 1.0],
            velocities_before: [3.0, -1.0],
            velocities_after: [1.0, 2.5],
        };
        let r = m.time_reversed();
        assert_eq!(r.momentum_before(), -m.momentum_after());
        assert_eq!(r.momentum_after(), -m.momentum_before());
    }

    #[test]
    fn test_measurement_tagging() {
        let m = Measurement::Pendulum(PendulumMeasurement {
            period: 2.0,
            length: 1.0,
        });
        let json = serde_json::to_string(&m).unwrap();
        assert!(json.contains("\"kind\":\"pendulum\""));
    }

    #[test]
    fn test_impact_defaults_to_intact() {
        let impact: MaterialImpact =
            serde_json::from_str(r#"{"material":"glass","impact_velocity":12.0}"#).unwrap();
        assert!(impact.object_intact);
    }
}
