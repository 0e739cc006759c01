//! Violation signatures kept by the signature store.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

use crate::check::CheckKind;
use crate::motion::MotionType;

/// Pattern tag of a recorded violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SignaturePattern {
    GravityDeviation,
    MomentumViolation,
    ShadowInconsistency,
    MaterialFailure,
    PendulumPeriod,
    ProjectileArc,
    ImpossibleDeceleration,
    WaterReflection,
    HandAnatomy,
    TextArtifacts,
    #[serde(other)]
    Other,
}

impl SignaturePattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignaturePattern::GravityDeviation => "gravity_deviation",
            SignaturePattern::MomentumViolation => "momentum_violation",
            SignaturePattern::ShadowInconsistency => "shadow_inconsistency",
            SignaturePattern::MaterialFailure => "material_failure",
            SignaturePattern::PendulumPeriod => "pendulum_period",
            SignaturePattern::ProjectileArc => "projectile_arc",
            SignaturePattern::ImpossibleDeceleration => "impossible_deceleration",
            SignaturePattern::WaterReflection => "water_reflection",
            SignaturePattern::HandAnatomy => "hand_anatomy",
            SignaturePattern::TextArtifacts => "text_artifacts",
            SignaturePattern::Other => "other",
        }
    }

    /// Pattern recorded when `check` is violated.
    pub fn for_check(check: CheckKind) -> Self {
        match check {
            CheckKind::Gravity => SignaturePattern::GravityDeviation,
            CheckKind::Momentum => SignaturePattern::MomentumViolation,
            CheckKind::Shadow => SignaturePattern::ShadowInconsistency,
            CheckKind::Material => SignaturePattern::MaterialFailure,
            CheckKind::Pendulum => SignaturePattern::PendulumPeriod,
            CheckKind::Projectile => SignaturePattern::ProjectileArc,
            CheckKind::Deceleration => SignaturePattern::ImpossibleDeceleration,
        }
    }
}

impl fmt::Display for SignaturePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recorded pattern of a past violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SignatureEntry {
    pub id: String,

    pub pattern: SignaturePattern,

    /// Motion class the violation was observed in, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub motion_type: Option<MotionType>,

    /// Generator the pattern is attributed to, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_model: Option<String>,

    pub description: String,

    /// Physical-signature parameters; ranges use `<name>_min` / `<name>_max`
    #[serde(default)]
    pub parameters: BTreeMap<String, f64>,

    pub discovered_at: DateTime<Utc>,
}

impl SignatureEntry {
    pub fn new(pattern: SignaturePattern, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            pattern,
            motion_type: None,
            source_model: None,
            description: description.into(),
            parameters: BTreeMap::new(),
            discovered_at: Utc::now(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_motion_type(mut self, motion_type: MotionType) -> Self {
        self.motion_type = Some(motion_type);
        self
    }

    pub fn with_source_model(mut self, model: impl Into<String>) -> Self {
        self.source_model = Some(model.into());
        self
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: f64) -> Self {
        self.parameters.insert(name.into(), value);
        self
    }
}

/// Query used for similarity lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
pub struct SimilarityKey {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<SignaturePattern>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub motion_type: Option<MotionType>,

    /// Measured quantities to match against entry parameters
    #[serde(default)]
    pub parameters: BTreeMap<String, f64>,
}

impl SimilarityKey {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pattern(mut self, pattern: SignaturePattern) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn with_motion_type(mut self, motion_type: MotionType) -> Self {
        self.motion_type = Some(motion_type);
        self
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: f64) -> Self {
        self.parameters.insert(name.into(), value);
        self
    }
}
