//! Re-scores an ambiguous check with the context a human supplied.
//!
//! Every resolution produces an ordered reasoning trail: stated context,
//! looked-up bound, measured value, comparison, and a final `VERDICT:` line.
//! Unrecognised answers fall back to a per-question default and the trail
//! says so.

use tracing::{debug, info};
use veritas_models::{
    Barrier, CheckKind, CheckResult, ClarificationOutcome, CollisionType, Environment, Material,
    Observation, QuestionKind, DEFAULT_BARRIER_MAX_G, DEFAULT_SHATTER_THRESHOLD,
};

use crate::ambiguity::gravity_source;

/// Relative gravity error tolerated once the environment is known.
pub const ENVIRONMENT_GRAVITY_TOLERANCE: f64 = 0.20;
/// Measured deceleration may exceed the barrier ceiling by this factor.
pub const BARRIER_SAFETY_FACTOR: f64 = 1.5;
/// Kinetic energy change tolerated in an elastic collision.
pub const ELASTIC_ENERGY_TOLERANCE: f64 = 0.20;
/// Kinetic energy gain tolerated in an inelastic collision.
pub const INELASTIC_ENERGY_GAIN_TOLERANCE: f64 = 0.10;
/// Momentum change tolerated in an inelastic collision.
pub const INELASTIC_MOMENTUM_TOLERANCE: f64 = 0.10;

/// Outcome of a clarification plus the check result it stands in for.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub outcome: ClarificationOutcome,
    /// Replaces the direct result of the same check kind when aggregating
    pub result: CheckResult,
}

/// Stateless resolver.
#[derive(Debug, Clone, Default)]
pub struct ClarificationResolver;

impl ClarificationResolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolve `answer` to the pending question of `kind`.
    pub fn resolve(
        &self,
        kind: QuestionKind,
        answer: &str,
        observation: &Observation,
        results: &[CheckResult],
    ) -> Resolution {
        let resolution = match kind {
            QuestionKind::Material => resolve_material(answer, observation),
            QuestionKind::Gravity => resolve_gravity(answer, results),
            QuestionKind::Deceleration => resolve_deceleration(answer, observation),
            QuestionKind::Collision => resolve_collision(answer, observation),
        };

        info!(
            question = %kind,
            answer_recognized = resolution.outcome.answer_recognized,
            is_fake = resolution.outcome.is_violation,
            confidence = resolution.outcome.confidence,
            "Clarification resolved"
        );
        resolution
    }
}

/// Ordered reasoning steps under construction.
struct Trail {
    kind: QuestionKind,
    answer: String,
    recognized: bool,
    steps: Vec<String>,
}

impl Trail {
    fn new(kind: QuestionKind, answer: &str, recognized: bool) -> Self {
        Self {
            kind,
            answer: answer.trim().to_string(),
            recognized,
            steps: Vec::new(),
        }
    }

    fn step(mut self, step: impl Into<String>) -> Self {
        let step = step.into();
        debug!(question = %self.kind, step = %step, "Reasoning step");
        self.steps.push(step);
        self
    }

    /// Close the trail with a verdict line and score the check.
    fn conclude(
        self,
        check: CheckKind,
        violated: bool,
        measured: f64,
        expected: f64,
        confidence: f64,
        verdict: &str,
    ) -> Resolution {
        let label = if violated { "SYNTHETIC" } else { "AUTHENTIC" };
        let trail = self.step(format!("VERDICT: {} - {}", label, verdict));
        let result = CheckResult::evaluated(check, violated, measured, expected, confidence * 100.0);
        Resolution {
            outcome: ClarificationOutcome {
                question_kind: trail.kind,
                user_answer: trail.answer,
                answer_recognized: trail.recognized,
                is_violation: violated,
                confidence,
                reasoning_steps: trail.steps,
            },
            result,
        }
    }

    /// Close the trail when the measurement to re-score is missing.
    fn inconclusive(self, check: CheckKind, missing: &str) -> Resolution {
        let trail = self
            .step(format!("No {} measurement available", missing))
            .step(format!("VERDICT: INCONCLUSIVE - no {} to re-score", missing));
        Resolution {
            result: CheckResult::insufficient(
                check,
                format!("clarification had no {} measurement", missing),
            ),
            outcome: ClarificationOutcome {
                question_kind: trail.kind,
                user_answer: trail.answer,
                answer_recognized: trail.recognized,
                is_violation: false,
                confidence: 0.0,
                reasoning_steps: trail.steps,
            },
        }
    }
}

fn context_step(noun: &str, answer: &str, recognized: Option<&str>, fallback: &str) -> String {
    match recognized {
        Some(key) => format!("User identified {} as: {}", noun, key),
        None => format!(
            "Answer '{}' matches no known {}; assuming {}",
            answer.trim(),
            noun,
            fallback
        ),
    }
}

fn resolve_material(answer: &str, observation: &Observation) -> Resolution {
    let material = Material::from_answer(answer);
    let threshold = material
        .map(|m| m.shatter_threshold())
        .unwrap_or(DEFAULT_SHATTER_THRESHOLD);
    let name = material.map(|m| m.key()).unwrap_or("unknown material");

    let trail = Trail::new(QuestionKind::Material, answer, material.is_some())
        .step(context_step(
            "material",
            answer,
            material.map(|m| m.key()),
            "default shatter threshold",
        ))
        .step(format!("Shatter threshold for {}: {:.1} m/s", name, threshold));

    let Some(impact) = observation.impact.as_ref() else {
        return trail.inconclusive(CheckKind::Material, "impact");
    };

    let velocity = impact.impact_velocity;
    let should_break = velocity >= threshold;
    let violated = should_break && impact.object_intact;

    let trail = trail.step(format!(
        "Detected impact velocity: {:.1} m/s, object {}",
        velocity,
        if impact.object_intact {
            "reported intact"
        } else {
            "reported broken"
        }
    ));

    if violated {
        trail
            .step(format!(
                "ERROR: {} should shatter at {:.1} m/s but stayed intact",
                name, velocity
            ))
            .conclude(
                CheckKind::Material,
                true,
                velocity,
                threshold,
                0.95,
                "Material physics violated",
            )
    } else {
        let comparison = if should_break {
            format!("Object broke as expected at {:.1} m/s", velocity)
        } else {
            format!(
                "{:.1} m/s is below the {:.1} m/s shatter threshold",
                velocity, threshold
            )
        };
        trail.step(comparison).conclude(
            CheckKind::Material,
            false,
            velocity,
            threshold,
            0.85,
            "Material behavior is consistent with physics",
        )
    }
}

fn resolve_gravity(answer: &str, results: &[CheckResult]) -> Resolution {
    let environment = Environment::from_answer(answer);
    let chosen = environment.unwrap_or_default();
    let expected = chosen.expected_gravity();

    let trail = Trail::new(QuestionKind::Gravity, answer, environment.is_some())
        .step(context_step(
            "environment",
            answer,
            environment.map(|e| e.key()),
            chosen.key(),
        ))
        .step(format!(
            "Expected gravity for {}: {:.2} m/s²",
            chosen, expected
        ));

    let Some((check, measured)) = gravity_source(results) else {
        return trail.inconclusive(CheckKind::Gravity, "gravity");
    };

    let error = (measured - expected).abs() / expected;
    let violated = error > ENVIRONMENT_GRAVITY_TOLERANCE;
    let trail = trail.step(format!("Measured gravity: {:.2} m/s²", measured));

    if violated {
        trail
            .step(format!(
                "ERROR: {:.1}% off {} gravity exceeds the {:.0}% tolerance",
                error * 100.0,
                chosen,
                ENVIRONMENT_GRAVITY_TOLERANCE * 100.0
            ))
            .conclude(check, true, measured, expected, 0.90, "Gravity violation confirmed")
    } else {
        trail
            .step(format!(
                "{:.1}% off {} gravity is within the {:.0}% tolerance",
                error * 100.0,
                chosen,
                ENVIRONMENT_GRAVITY_TOLERANCE * 100.0
            ))
            .conclude(
                check,
                false,
                measured,
                expected,
                0.92,
                "Environment explains deviation",
            )
    }
}

fn resolve_deceleration(answer: &str, observation: &Observation) -> Resolution {
    let barrier = Barrier::from_answer(answer);
    let max_g = barrier.map(|b| b.max_g()).unwrap_or(DEFAULT_BARRIER_MAX_G);
    let name = barrier.map(|b| b.key()).unwrap_or("unknown barrier");

    let mut trail = Trail::new(QuestionKind::Deceleration, answer, barrier.is_some())
        .step(context_step(
            "barrier",
            answer,
            barrier.map(|b| b.key()),
            "default g-ceiling",
        ))
        .step(format!("Maximum expected deceleration for {}: {:.0}g", name, max_g));
    if barrier.is_some_and(|b| b.survivable()) {
        trail = trail.step(format!("A {} impact is survivable", name));
    }

    let Some(measured) = observation.deceleration_g else {
        return trail.inconclusive(CheckKind::Deceleration, "deceleration");
    };

    let limit = BARRIER_SAFETY_FACTOR * max_g;
    let violated = measured > limit;
    let trail = trail.step(format!("Measured deceleration: {:.1}g", measured));

    let resolution = if violated {
        trail
            .step(format!(
                "ERROR: {:.1}g exceeds {:.1} x {:.0}g = {:.1}g for {}",
                measured, BARRIER_SAFETY_FACTOR, max_g, limit, name
            ))
            .conclude(
                CheckKind::Deceleration,
                true,
                measured,
                limit,
                0.88,
                "Deceleration exceeds barrier physics",
            )
    } else {
        trail
            .step(format!(
                "{:.1}g is within {:.1} x {:.0}g = {:.1}g for {}",
                measured, BARRIER_SAFETY_FACTOR, max_g, limit, name
            ))
            .conclude(
                CheckKind::Deceleration,
                false,
                measured,
                limit,
                0.82,
                "Deceleration is within expected range",
            )
    };
    Resolution {
        result: resolution.result.with_detail("max_g", max_g),
        ..resolution
    }
}

/// Signed change relative to `before`, or the absolute change when `before` is zero.
fn relative_change(before: f64, after: f64) -> f64 {
    if before == 0.0 {
        after - before
    } else {
        (after - before) / before.abs()
    }
}

fn resolve_collision(answer: &str, observation: &Observation) -> Resolution {
    let collision = CollisionType::from_answer(answer);
    let chosen = collision.unwrap_or_default();

    let trail = Trail::new(QuestionKind::Collision, answer, collision.is_some())
        .step(context_step(
            "collision type",
            answer,
            collision.map(|c| c.key()),
            chosen.key(),
        ))
        .step(format!(
            "Coefficient of restitution for {}: {:.1}",
            chosen,
            chosen.restitution()
        ));

    let Some(m) = observation.momentum.as_ref() else {
        return trail.inconclusive(CheckKind::Momentum, "momentum");
    };

    let (ke_before, ke_after) = (m.kinetic_energy_before(), m.kinetic_energy_after());
    let (p_before, p_after) = (m.momentum_before(), m.momentum_after());
    let energy_change = relative_change(ke_before, ke_after);
    let momentum_change = relative_change(p_before, p_after);

    let trail = trail.step(format!(
        "Measured kinetic energy {:.2} J -> {:.2} J, momentum {:.2} -> {:.2} kg·m/s",
        ke_before, ke_after, p_before, p_after
    ));

    let (violated, comparison) = match chosen {
        CollisionType::Elastic => {
            let violated = energy_change.abs() > ELASTIC_ENERGY_TOLERANCE;
            (
                violated,
                format!(
                    "Kinetic energy changed by {:.1}% (elastic tolerance {:.0}%)",
                    energy_change * 100.0,
                    ELASTIC_ENERGY_TOLERANCE * 100.0
                ),
            )
        }
        CollisionType::Inelastic => {
            let violated = energy_change > INELASTIC_ENERGY_GAIN_TOLERANCE
                || momentum_change.abs() > INELASTIC_MOMENTUM_TOLERANCE;
            (
                violated,
                format!(
                    "Kinetic energy changed by {:.1}%, momentum by {:.1}% (inelastic tolerance {:.0}% gain / {:.0}%)",
                    energy_change * 100.0,
                    momentum_change * 100.0,
                    INELASTIC_ENERGY_GAIN_TOLERANCE * 100.0,
                    INELASTIC_MOMENTUM_TOLERANCE * 100.0
                ),
            )
        }
    };

    let trail = if violated {
        trail.step(format!("ERROR: {}", comparison))
    } else {
        trail.step(comparison)
    };
    let resolution = if violated {
        trail.conclude(
            CheckKind::Momentum,
            true,
            ke_after,
            ke_before,
            0.86,
            "Collision violates energy and momentum bounds",
        )
    } else {
        trail.conclude(
            CheckKind::Momentum,
            false,
            ke_after,
            ke_before,
            0.80,
            "Collision is consistent with its type",
        )
    };
    Resolution {
        result: resolution
            .result
            .with_detail("energy_change", energy_change)
            .with_detail("momentum_change", momentum_change),
        ..resolution
    }
}
