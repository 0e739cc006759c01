//! Ambiguity questions surfaced to a human.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::answers::{Barrier, CollisionType, Environment, Material};

/// Kind of missing context a question asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    /// What material is the struck object?
    Material,
    /// What kind of barrier was struck?
    Deceleration,
    /// Which environment was this recorded in?
    Gravity,
    /// Was the collision elastic or inelastic?
    Collision,
}

impl QuestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionKind::Material => "material",
            QuestionKind::Deceleration => "deceleration",
            QuestionKind::Gravity => "gravity",
            QuestionKind::Collision => "collision",
        }
    }

    /// Lower is more specific; the most specific triggered question wins.
    pub fn precedence(&self) -> u8 {
        match self {
            QuestionKind::Material => 0,
            QuestionKind::Deceleration => 1,
            QuestionKind::Gravity => 2,
            QuestionKind::Collision => 3,
        }
    }

    /// Answer-key table for this question kind.
    pub fn implications(&self) -> Vec<Implication> {
        match self {
            QuestionKind::Material => Material::ALL
                .iter()
                .map(|m| Implication::new(m.key(), m.shatter_threshold(), "m/s shatter velocity"))
                .collect(),
            QuestionKind::Gravity => Environment::ALL
                .iter()
                .map(|e| Implication::new(e.key(), e.expected_gravity(), "m/s² gravity"))
                .collect(),
            QuestionKind::Deceleration => Barrier::ALL
                .iter()
                .map(|b| {
                    Implication::new(b.key(), b.max_g(), "g maximum").with_survivable(b.survivable())
                })
                .collect(),
            QuestionKind::Collision => CollisionType::ALL
                .iter()
                .map(|c| Implication::new(c.key(), c.restitution(), "coefficient of restitution"))
                .collect(),
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Physical consequence of one answer key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Implication {
    /// Answer key (e.g. "glass", "moon")
    pub answer: String,
    /// Physical value the answer implies
    pub value: f64,
    /// What `value` measures
    pub unit: String,
    /// Only set for barrier answers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub survivable: Option<bool>,
}

impl Implication {
    pub fn new(answer: impl Into<String>, value: f64, unit: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            value,
            unit: unit.into(),
            survivable: None,
        }
    }

    pub fn with_survivable(mut self, survivable: bool) -> Self {
        self.survivable = Some(survivable);
        self
    }
}

/// Whether a verdict needs human context, and which question to ask.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
pub struct AmbiguityAssessment {
    pub needs_input: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_kind: Option<QuestionKind>,

    /// Rendered question text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,

    /// Answer key to physical implication table for `question_kind`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub implications: Vec<Implication>,

    /// Every trigger that fired, most specific first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub triggered: Vec<QuestionKind>,
}

impl AmbiguityAssessment {
    /// No trigger fired; proceed straight to aggregation.
    pub fn clear() -> Self {
        Self::default()
    }

    /// Ask `kind` with the given rendered text.
    pub fn ask(kind: QuestionKind, question: impl Into<String>, triggered: Vec<QuestionKind>) -> Self {
        Self {
            needs_input: true,
            question_kind: Some(kind),
            question: Some(question.into()),
            implications: kind.implications(),
            triggered,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_order() {
        let mut kinds = vec![
            QuestionKind::Gravity,
            QuestionKind::Collision,
            QuestionKind::Material,
            QuestionKind::Deceleration,
        ];
        kinds.sort_by_key(|k| k.precedence());
        assert_eq!(
            kinds,
            vec![
                QuestionKind::Material,
                QuestionKind::Deceleration,
                QuestionKind::Gravity,
                QuestionKind::Collision
            ]
        );
    }

    #[test]
    fn test_gravity_implications() {
        let table = QuestionKind::Gravity.implications();
        let moon = table.iter().find(|i| i.answer == "moon").unwrap();
        assert_eq!(moon.value, 1.62);
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn test_clear_assessment() {
        let a = AmbiguityAssessment::clear();
        assert!(!a.needs_input);
        assert!(a.question_kind.is_none());
    }
}
