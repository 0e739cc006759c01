//! Decides whether a human has to supply context before a verdict.

use tracing::debug;
use veritas_models::{
    AmbiguityAssessment, CheckKind, CheckResult, Material, Observation, QuestionKind,
};
use veritas_physics::constants::EARTH_GRAVITY;

/// Lower bound (exclusive) of the ambiguous gravity band, relative to Earth.
pub const GRAVITY_BAND_LOW: f64 = 0.10;
/// Upper bound (exclusive) of the ambiguous gravity band.
pub const GRAVITY_BAND_HIGH: f64 = 0.40;
/// Decelerations above this many g need the barrier type.
pub const DECELERATION_TRIGGER_G: f64 = 30.0;

/// The check a gravity question re-scores, with its measured g.
///
/// A fitted trajectory wins over a pendulum estimate.
pub fn gravity_source(results: &[CheckResult]) -> Option<(CheckKind, f64)> {
    [CheckKind::Gravity, CheckKind::Pendulum]
        .into_iter()
        .find_map(|kind| {
            results
                .iter()
                .find(|r| r.check == kind && r.status.is_determined())
                .and_then(|r| r.measured)
                .map(|g| (kind, g))
        })
}

/// Evaluates ambiguity triggers; holds only feature switches.
#[derive(Debug, Clone, Default)]
pub struct AmbiguityEvaluator {
    ask_collision_type: bool,
}

impl AmbiguityEvaluator {
    pub fn new(ask_collision_type: bool) -> Self {
        Self { ask_collision_type }
    }

    /// Inspect the observation and the direct results. When several triggers
    /// fire, the most specific one is asked: material, then deceleration,
    /// then gravity, then collision.
    pub fn evaluate(&self, observation: &Observation, results: &[CheckResult]) -> AmbiguityAssessment {
        let mut triggered = Vec::new();

        // Only a readable impact velocity can be re-scored.
        if observation
            .impact
            .as_ref()
            .is_some_and(|i| i.impact_velocity.is_finite() && i.impact_velocity >= 0.0)
        {
            triggered.push(QuestionKind::Material);
        }
        if observation
            .deceleration_g
            .is_some_and(|g| g > DECELERATION_TRIGGER_G)
        {
            triggered.push(QuestionKind::Deceleration);
        }
        if let Some((_, g)) = gravity_source(results) {
            let deviation = (g - EARTH_GRAVITY).abs() / EARTH_GRAVITY;
            if deviation > GRAVITY_BAND_LOW && deviation < GRAVITY_BAND_HIGH {
                triggered.push(QuestionKind::Gravity);
            }
        }
        if self.ask_collision_type
            && observation.momentum.is_some()
            && results
                .iter()
                .any(|r| r.check == CheckKind::Momentum && r.is_violation())
        {
            triggered.push(QuestionKind::Collision);
        }

        triggered.sort_by_key(|k| k.precedence());
        let Some(&kind) = triggered.first() else {
            return AmbiguityAssessment::clear();
        };

        debug!(question = %kind, ?triggered, "Ambiguity detected");
        AmbiguityAssessment::ask(kind, question_text(kind, observation, results), triggered)
    }
}

fn question_text(kind: QuestionKind, observation: &Observation, results: &[CheckResult]) -> String {
    match kind {
        QuestionKind::Material => {
            let velocity = observation
                .impact
                .as_ref()
                .map(|i| i.impact_velocity)
                .unwrap_or_default();
            let options: Vec<&str> = Material::ALL.iter().map(|m| m.key()).collect();
            format!(
                "I detected an impact at {:.1} m/s. What material is this object? ({})",
                velocity,
                options.join("/")
            )
        }
        QuestionKind::Deceleration => format!(
            "I calculated {:.1}g deceleration. Is this a crash into a wall, tree, or soft barrier?",
            observation.deceleration_g.unwrap_or_default()
        ),
        QuestionKind::Gravity => format!(
            "Gravity reads {:.2} m/s². Is this on Earth, Moon, Mars, or underwater?",
            gravity_source(results).map(|(_, g)| g).unwrap_or_default()
        ),
        QuestionKind::Collision => {
            "I see a collision with unusual momentum. Is this an elastic or inelastic collision?"
                .to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veritas_models::{MomentumMeasurement, MotionType};
    use veritas_physics::checks::evaluate_gravity;

    fn gravity_at(deviation: f64) -> Vec<CheckResult> {
        vec![evaluate_gravity(
            CheckKind::Gravity,
            EARTH_GRAVITY * (1.0 + deviation),
        )]
    }

    #[test]
    fn test_gravity_band() {
        let evaluator = AmbiguityEvaluator::default();
        let obs = Observation::new(MotionType::FreeFall);

        let ambiguous = evaluator.evaluate(&obs, &gravity_at(0.25));
        assert!(ambiguous.needs_input);
        assert_eq!(ambiguous.question_kind, Some(QuestionKind::Gravity));
        assert!(ambiguous.question.unwrap().contains("12.26"));

        assert!(!evaluator.evaluate(&obs, &gravity_at(0.05)).needs_input);
        assert!(!evaluator.evaluate(&obs, &gravity_at(0.45)).needs_input);
        assert!(evaluator.evaluate(&obs, &gravity_at(-0.25)).needs_input);
    }

    #[test]
    fn test_material_has_precedence() {
        let obs = Observation::new(MotionType::FreeFall)
            .with_impact("glass", 15.0, true)
            .with_deceleration(45.0);
        let a = AmbiguityEvaluator::default().evaluate(&obs, &gravity_at(0.25));
        assert_eq!(a.question_kind, Some(QuestionKind::Material));
        assert_eq!(
            a.triggered,
            vec![
                QuestionKind::Material,
                QuestionKind::Deceleration,
                QuestionKind::Gravity
            ]
        );
        assert_eq!(a.implications.len(), 5);
    }

    #[test]
    fn test_unreadable_impact_is_not_asked_about() {
        let evaluator = AmbiguityEvaluator::default();
        let nan = Observation::new(MotionType::Other).with_impact("glass", f64::NAN, true);
        assert!(!evaluator.evaluate(&nan, &[]).needs_input);

        let negative = Observation::new(MotionType::Other).with_impact("glass", -4.0, true);
        assert!(!evaluator.evaluate(&negative, &[]).needs_input);
    }

    #[test]
    fn test_deceleration_over_gravity() {
        let obs = Observation::new(MotionType::FreeFall).with_deceleration(35.0);
        let a = AmbiguityEvaluator::default().evaluate(&obs, &gravity_at(0.25));
        assert_eq!(a.question_kind, Some(QuestionKind::Deceleration));
        assert!(a.question.unwrap().contains("35.0g"));

        let calm = Observation::new(MotionType::FreeFall).with_deceleration(30.0);
        assert!(!AmbiguityEvaluator::default().evaluate(&calm, &[]).needs_input);
    }

    #[test]
    fn test_pendulum_feeds_gravity_band() {
        let results = vec![evaluate_gravity(CheckKind::Pendulum, 7.5)];
        assert_eq!(gravity_source(&results), Some((CheckKind::Pendulum, 7.5)));
        let a = AmbiguityEvaluator::default()
            .evaluate(&Observation::new(MotionType::Pendulum), &results);
        assert_eq!(a.question_kind, Some(QuestionKind::Gravity));
    }

    #[test]
    fn test_collision_question_is_opt_in() {
        let momentum = MomentumMeasurement {
            masses: [1.0, 1.0],
            velocities_before: [2.0, 0.0],
            velocities_after: [2.0, 2.0],
        };
        let obs = Observation::new(MotionType::Collision).with_momentum(momentum);
        let results = vec![veritas_physics::checks::check_momentum(&momentum)];

        assert!(!AmbiguityEvaluator::new(false).evaluate(&obs, &results).needs_input);
        let a = AmbiguityEvaluator::new(true).evaluate(&obs, &results);
        assert_eq!(a.question_kind, Some(QuestionKind::Collision));
    }
}
