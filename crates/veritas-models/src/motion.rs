//! Motion classification reported by vision extraction.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Primary motion class of the tracked object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum MotionType {
    Pendulum,
    FreeFall,
    Projectile,
    Collision,
    #[default]
    #[serde(other)]
    Other,
}

impl MotionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MotionType::Pendulum => "pendulum",
            MotionType::FreeFall => "free_fall",
            MotionType::Projectile => "projectile",
            MotionType::Collision => "collision",
            MotionType::Other => "other",
        }
    }

    /// Parse a classifier label. Unknown labels map to `Other`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "pendulum" => MotionType::Pendulum,
            "free_fall" | "freefall" => MotionType::FreeFall,
            "projectile" => MotionType::Projectile,
            "collision" => MotionType::Collision,
            _ => MotionType::Other,
        }
    }
}

impl fmt::Display for MotionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
