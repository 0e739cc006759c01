//! Answer keys for clarification questions and their physical implications.
//!
//! Each question kind has a closed set of answer keys. Free-text answers are
//! normalised (trimmed, lowercased, spaces and hyphens folded to `_`) and
//! looked up against that set; anything else is unrecognised and the caller
//! falls back to the documented default.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shatter threshold assumed for materials outside the table, in m/s.
pub const DEFAULT_SHATTER_THRESHOLD: f64 = 10.0;

/// Survivable g-ceiling assumed for an unrecognised barrier.
pub const DEFAULT_BARRIER_MAX_G: f64 = 50.0;

/// Fold free text into the key space.
pub fn normalize_answer(answer: &str) -> String {
    answer.trim().to_lowercase().replace([' ', '-'], "_")
}

/// Material of a struck object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Material {
    Glass,
    Ceramic,
    Plastic,
    Wood,
    Metal,
}

impl Material {
    pub const ALL: [Material; 5] = [
        Material::Glass,
        Material::Ceramic,
        Material::Plastic,
        Material::Wood,
        Material::Metal,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Material::Glass => "glass",
            Material::Ceramic => "ceramic",
            Material::Plastic => "plastic",
            Material::Wood => "wood",
            Material::Metal => "metal",
        }
    }

    /// Impact velocity at or above which the material fractures, in m/s.
    pub fn shatter_threshold(&self) -> f64 {
        match self {
            Material::Glass => 8.0,
            Material::Ceramic => 6.0,
            Material::Plastic => 15.0,
            Material::Wood => 20.0,
            Material::Metal => 50.0,
        }
    }

    pub fn from_answer(answer: &str) -> Option<Self> {
        let key = normalize_answer(answer);
        Self::ALL.into_iter().find(|m| m.key() == key)
    }
}

/// Shatter threshold for a free-text material name, defaulting for unknowns.
pub fn shatter_threshold_for(material: &str) -> f64 {
    Material::from_answer(material)
        .map(|m| m.shatter_threshold())
        .unwrap_or(DEFAULT_SHATTER_THRESHOLD)
}

/// Environment the footage was recorded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    #[default]
    Earth,
    Moon,
    Mars,
    Underwater,
}

impl Environment {
    pub const ALL: [Environment; 4] = [
        Environment::Earth,
        Environment::Moon,
        Environment::Mars,
        Environment::Underwater,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Environment::Earth => "earth",
            Environment::Moon => "moon",
            Environment::Mars => "mars",
            Environment::Underwater => "underwater",
        }
    }

    /// Effective downward acceleration in m/s².
    pub fn expected_gravity(&self) -> f64 {
        match self {
            Environment::Earth => 9.81,
            Environment::Moon => 1.62,
            Environment::Mars => 3.72,
            Environment::Underwater => 0.5,
        }
    }

    pub fn from_answer(answer: &str) -> Option<Self> {
        let key = normalize_answer(answer);
        Self::ALL.into_iter().find(|e| e.key() == key)
    }
}

/// What a decelerating object struck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Barrier {
    Wall,
    Tree,
    SoftBarrier,
}

impl Barrier {
    pub const ALL: [Barrier; 3] = [Barrier::Wall, Barrier::Tree, Barrier::SoftBarrier];

    pub fn key(&self) -> &'static str {
        match self {
            Barrier::Wall => "wall",
            Barrier::Tree => "tree",
            Barrier::SoftBarrier => "soft_barrier",
        }
    }

    /// Maximum expected deceleration in g.
    pub fn max_g(&self) -> f64 {
        match self {
            Barrier::Wall => 100.0,
            Barrier::Tree => 60.0,
            Barrier::SoftBarrier => 20.0,
        }
    }

    pub fn survivable(&self) -> bool {
        matches!(self, Barrier::SoftBarrier)
    }

    pub fn from_answer(answer: &str) -> Option<Self> {
        let key = normalize_answer(answer);
        Self::ALL.into_iter().find(|b| b.key() == key)
    }
}

/// Collision regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum CollisionType {
    Elastic,
    #[default]
    Inelastic,
}

impl CollisionType {
    pub const ALL: [CollisionType; 2] = [CollisionType::Elastic, CollisionType::Inelastic];

    pub fn key(&self) -> &'static str {
        match self {
            CollisionType::Elastic => "elastic",
            CollisionType::Inelastic => "inelastic",
        }
    }

    /// Coefficient of restitution.
    pub fn restitution(&self) -> f64 {
        match self {
            CollisionType::Elastic => 1.0,
            CollisionType::Inelastic => 0.0,
        }
    }

    pub fn from_answer(answer: &str) -> Option<Self> {
        let key = normalize_answer(answer);
        Self::ALL.into_iter().find(|c| c.key() == key)
    }
}

macro_rules! display_key {
    ($($t:ty),*) => {
        $(impl fmt::Display for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.key())
            }
        })*
    };
}

display_key!(Material, Environment, Barrier, CollisionType);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answers_match_case_insensitively() {
        assert_eq!(Material::from_answer("  GLASS "), Some(Material::Glass));
        assert_eq!(Environment::from_answer("Mars"), Some(Environment::Mars));
        assert_eq!(Barrier::from_answer("Soft Barrier"), Some(Barrier::SoftBarrier));
        assert_eq!(Barrier::from_answer("soft-barrier"), Some(Barrier::SoftBarrier));
        assert_eq!(CollisionType::from_answer("ELASTIC"), Some(CollisionType::Elastic));
    }

    #[test]
    fn test_unknown_answers() {
        assert_eq!(Material::from_answer("granite"), None);
        assert_eq!(Environment::from_answer("jupiter"), None);
        assert_eq!(shatter_threshold_for("granite"), DEFAULT_SHATTER_THRESHOLD);
    }

    #[test]
    fn test_shatter_table() {
        assert_eq!(shatter_threshold_for("glass"), 8.0);
        assert_eq!(shatter_threshold_for("Ceramic"), 6.0);
        assert_eq!(shatter_threshold_for("plastic"), 15.0);
        assert_eq!(shatter_threshold_for("wood"), 20.0);
        assert_eq!(shatter_threshold_for("metal"), 50.0);
    }

    #[test]
    fn test_barrier_survivability() {
        assert!(Barrier::SoftBarrier.survivable());
        assert!(!Barrier::Wall.survivable());
        assert_eq!(Barrier::Tree.max_g(), 60.0);
    }
}
