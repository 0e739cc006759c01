//! Structured observations handed over by vision extraction.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::measurement::{
    MaterialImpact, Measurement, MomentumMeasurement, PendulumMeasurement, ProjectileMeasurement,
    ShadowAngles, TrajectorySamples,
};
use crate::motion::MotionType;

/// An object the vision stage detected in the footage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DetectedObject {
    pub id: u32,
    pub label: String,
    /// Detector confidence, 0-1
    pub confidence: f64,
}

/// Everything vision extraction reports about one clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
pub struct Observation {
    /// Declared motion classification
    #[serde(default)]
    pub motion_type: MotionType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trajectory: Option<TrajectorySamples>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub momentum: Option<MomentumMeasurement>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow_angles: Option<Vec<f64>>,

    /// Impact event with the reported material hint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<MaterialImpact>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pendulum: Option<PendulumMeasurement>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projectile: Option<ProjectileMeasurement>,

    /// Peak deceleration in g, when an abrupt stop was measured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deceleration_g: Option<f64>,

    /// Auxiliary "physics looks implausible" signal from the motion classifier
    #[serde(default)]
    pub physics_implausible: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub objects: Vec<DetectedObject>,
}

impl Observation {
    pub fn new(motion_type: MotionType) -> Self {
        Self {
            motion_type,
            ..Default::default()
        }
    }

    pub fn with_trajectory(mut self, timestamps: Vec<f64>, positions: Vec<f64>) -> Self {
        self.trajectory = Some(TrajectorySamples::new(timestamps, positions));
        self
    }

    pub fn with_momentum(mut self, momentum: MomentumMeasurement) -> Self {
        self.momentum = Some(momentum);
        self
    }

    pub fn with_shadow_angles(mut self, angles: Vec<f64>) -> Self {
        self.shadow_angles = Some(angles);
        self
    }

    pub fn with_impact(
        mut self,
        material: impl Into<String>,
        impact_velocity: f64,
        object_intact: bool,
    ) -> Self {
        self.impact = Some(MaterialImpact {
            material: material.into(),
            impact_velocity,
            object_intact,
        });
        self
    }

    pub fn with_pendulum(mut self, period: f64, length: f64) -> Self {
        self.pendulum = Some(PendulumMeasurement { period, length });
        self
    }

    pub fn with_projectile(mut self, projectile: ProjectileMeasurement) -> Self {
        self.projectile = Some(projectile);
        self
    }

    pub fn with_deceleration(mut self, deceleration_g: f64) -> Self {
        self.deceleration_g = Some(deceleration_g);
        self
    }

    pub fn with_implausible_flag(mut self, implausible: bool) -> Self {
        self.physics_implausible = implausible;
        self
    }

    /// All measurements present in the observation, in a fixed order.
    pub fn measurements(&self) -> Vec<Measurement> {
        let mut out = Vec::new();
        if let Some(t) = &self.trajectory {
            out.push(Measurement::Trajectory(t.clone()));
        }
        if let Some(m) = self.momentum {
            out.push(Measurement::Momentum(m));
        }
        if let Some(s) = &self.shadow_angles {
            out.push(Measurement::Shadow(ShadowAngles(s.clone())));
        }
        if let Some(i) = &self.impact {
            out.push(Measurement::MaterialImpact(i.clone()));
        }
        if let Some(p) = self.pendulum {
            out.push(Measurement::Pendulum(p));
        }
        if let Some(p) = self.projectile {
            out.push(Measurement::Projectile(p));
        }
        out
    }

    /// Validate the fields no physics check evaluates.
    ///
    /// Measurement contents are left to the checks, which degrade bad
    /// samples into ERROR or INSUFFICIENT_DATA results.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(d) = self.deceleration_g {
            if !d.is_finite() || d < 0.0 {
                return Err(format!(
                    "Deceleration must be finite and non-negative, got {}",
                    d
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation() {
        let valid = Observation::new(MotionType::FreeFall)
            .with_trajectory(vec![0.0, 0.1, 0.2], vec![1.0, 0.9, 0.8])
            .with_deceleration(12.0);
        assert!(valid.validate().is_ok());

        assert!(Observation::new(MotionType::FreeFall)
            .with_deceleration(f64::NAN)
            .validate()
            .is_err());
        assert!(Observation::new(MotionType::FreeFall)
            .with_deceleration(-3.0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_measurement_contents_left_to_checks() {
        let mismatched =
            Observation::new(MotionType::FreeFall).with_trajectory(vec![0.0, 0.1], vec![1.0]);
        assert!(mismatched.validate().is_ok());

        let non_finite = Observation::new(MotionType::Pendulum)
            .with_pendulum(2.0, 1.0)
            .with_shadow_angles(vec![10.0, f64::NAN]);
        assert!(non_finite.validate().is_ok());

        let negative = Observation::new(MotionType::Other).with_impact("glass", -1.0, true);
        assert!(negative.validate().is_ok());
    }

    #[test]
    fn test_deserialize_minimal() {
        let obs: Observation = serde_json::from_str(r#"{"motion_type":"pendulum","pendulum":{"period":2.0,"length":1.0}}"#).unwrap();
        assert_eq!(obs.motion_type, MotionType::Pendulum);
        assert_eq!(obs.measurements().len(), 1);
        assert!(!obs.physics_implausible);
    }
}
