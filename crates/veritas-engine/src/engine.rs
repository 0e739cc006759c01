//! Session orchestration: checks, ambiguity, clarification, verdict.

use std::sync::Arc;

use veritas_models::{
    AnalysisResponse, Observation, SessionState, StageEvent,
};
use veritas_physics::constants::EARTH_GRAVITY;
use veritas_physics::CheckLibrary;
use veritas_signatures::SignatureStore;

use crate::aggregator::VerdictAggregator;
use crate::ambiguity::{gravity_source, AmbiguityEvaluator};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::logging::SessionLogger;
use crate::metrics;
use crate::resolver::ClarificationResolver;
use crate::session::AnalysisSession;

/// Runs analysis sessions against a shared signature store.
///
/// The engine holds no per-session state and can be shared across threads;
/// each session is driven by exactly one caller at a time.
pub struct VerificationEngine {
    library: CheckLibrary,
    evaluator: AmbiguityEvaluator,
    resolver: ClarificationResolver,
    store: Arc<dyn SignatureStore>,
    config: EngineConfig,
}

impl VerificationEngine {
    pub fn new(store: Arc<dyn SignatureStore>, config: EngineConfig) -> Self {
        Self {
            library: CheckLibrary::new(),
            evaluator: AmbiguityEvaluator::new(config.ask_collision_type),
            resolver: ClarificationResolver::new(),
            store,
            config,
        }
    }

    /// Replace the check library (e.g. to use a tuned fitter).
    pub fn with_library(mut self, library: CheckLibrary) -> Self {
        self.library = library;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn SignatureStore> {
        &self.store
    }

    /// Open a session for an observation.
    ///
    /// Only fields no check evaluates are rejected here; bad measurements
    /// surface as ERROR or INSUFFICIENT_DATA results during `run`.
    pub fn start(&self, observation: Observation) -> EngineResult<AnalysisSession> {
        observation
            .validate()
            .map_err(EngineError::invalid_observation)?;
        let mut session = AnalysisSession::new(observation);
        session.emit(StageEvent::log(format!(
            "Session opened for {} motion",
            session.observation().motion_type
        )));
        Ok(session)
    }

    /// Run the checks and either ask a question or finish with a verdict.
    pub fn run(&self, session: &mut AnalysisSession) -> EngineResult<AnalysisResponse> {
        if let Some(err) = EngineError::for_state(session.id().as_str(), session.state()) {
            return Err(err);
        }

        let logger = SessionLogger::new(
            session.id(),
            session.observation().motion_type,
            "analysis",
        );
        let span = logger.create_span();
        let _enter = span.enter();

        session.emit(StageEvent::progress(10, "physics_checks"));
        let results = self.library.run_for(session.observation());
        for result in &results {
            session.emit(StageEvent::CheckCompleted {
                result: result.clone(),
            });
        }
        if let Some((_, g)) = gravity_source(&results) {
            session.emit(StageEvent::PhysicsUpdate {
                gravity: g,
                expected: EARTH_GRAVITY,
                deviation: (g - EARTH_GRAVITY) / EARTH_GRAVITY,
            });
        }
        logger.log_checks(&results);

        session.emit(StageEvent::progress(60, "ambiguity"));
        let assessment = self.evaluator.evaluate(session.observation(), &results);
        session.record_results(results);

        if let (true, Some(kind)) = (assessment.needs_input, assessment.question_kind) {
            let question = assessment.question.clone().unwrap_or_default();
            let response = AnalysisResponse::InterrogationRequired {
                session_id: session.id().clone(),
                question_kind: kind,
                question_text: question.clone(),
                implications: assessment.implications.clone(),
                partial_results: session.results().to_vec(),
            };
            session.emit(StageEvent::Interrogation {
                question_kind: kind,
                question,
            });
            logger.log_question(kind, &assessment.triggered);
            session.await_clarification(assessment);
            metrics::record_interrogation(kind);
            return Ok(response);
        }

        Ok(self.finish(session, &logger, Vec::new()))
    }

    /// Resolve the pending question with the user's answer and finish.
    pub fn clarify(
        &self,
        session: &mut AnalysisSession,
        answer: &str,
    ) -> EngineResult<AnalysisResponse> {
        if session.state() == SessionState::Completed {
            return Err(EngineError::SessionClosed(session.id().to_string()));
        }
        let kind = session
            .take_pending()
            .and_then(|a| a.question_kind)
            .ok_or_else(|| EngineError::NoPendingQuestion(session.id().to_string()))?;

        let logger = SessionLogger::new(
            session.id(),
            session.observation().motion_type,
            "clarification",
        );
        let span = logger.create_span();
        let _enter = span.enter();

        let resolution =
            self.resolver
                .resolve(kind, answer, session.observation(), session.results());
        for step in &resolution.outcome.reasoning_steps {
            session.emit(StageEvent::log(step.clone()));
        }
        session.emit(StageEvent::Clarified {
            question_kind: kind,
            is_fake: resolution.outcome.is_fake(),
            confidence: resolution.outcome.confidence,
        });
        logger.log_answer(&resolution.outcome);

        let steps = resolution.outcome.reasoning_steps.clone();
        session.record_clarification(resolution);
        Ok(self.finish(session, &logger, steps))
    }

    /// Start and run in one call.
    pub fn analyze(
        &self,
        observation: Observation,
    ) -> EngineResult<(AnalysisSession, AnalysisResponse)> {
        let mut session = self.start(observation)?;
        let response = self.run(&mut session)?;
        Ok((session, response))
    }

    fn finish(
        &self,
        session: &mut AnalysisSession,
        logger: &SessionLogger,
        reasoning_steps: Vec<String>,
    ) -> AnalysisResponse {
        let results = session.effective_results();
        let aggregation = VerdictAggregator::new(self.store.as_ref(), &self.config).aggregate(
            session.id(),
            session.observation().motion_type,
            &results,
            session.observation().physics_implausible,
        );

        session.emit(StageEvent::Verdict {
            verdict: aggregation.verdict,
            confidence: aggregation.confidence,
            violations: aggregation.violations,
            total_checks: aggregation.total_checks,
        });
        session.emit(StageEvent::progress(100, "verdict"));
        logger.log_verdict(&aggregation);

        let response = AnalysisResponse::Completed {
            session_id: session.id().clone(),
            verdict: aggregation.verdict,
            confidence: aggregation.confidence,
            results,
            reasoning_steps,
            findings: aggregation.findings,
            prior_matches: aggregation.prior_matches,
        };
        session.complete(response.clone());
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veritas_models::{CheckKind, CheckStatus, MotionType, QuestionKind, StageEventType, Verdict};
    use veritas_signatures::InMemorySignatureStore;

    fn engine() -> VerificationEngine {
        VerificationEngine::new(
            Arc::new(InMemorySignatureStore::with_known_signatures()),
            EngineConfig::default(),
        )
    }

    #[test]
    fn test_invalid_deceleration_rejected() {
        let obs = Observation::new(MotionType::FreeFall).with_deceleration(f64::NAN);
        assert!(matches!(
            engine().start(obs),
            Err(EngineError::InvalidObservation(_))
        ));
    }

    #[test]
    fn test_mismatched_trajectory_degrades() {
        let engine = engine();
        let obs = Observation::new(MotionType::FreeFall).with_trajectory(vec![0.0, 0.1], vec![1.0]);
        let (session, response) = engine.analyze(obs).unwrap();

        assert!(response.is_completed());
        assert_eq!(session.results()[0].check, CheckKind::Gravity);
        assert_eq!(session.results()[0].status, CheckStatus::Error);
        assert!(!session
            .events()
            .iter()
            .any(|e| e.event_type() == StageEventType::PhysicsUpdate));
    }

    #[test]
    fn test_run_twice_is_rejected() {
        let engine = engine();
        let (mut session, response) = engine
            .analyze(Observation::new(MotionType::Pendulum).with_pendulum(2.0, 1.0))
            .unwrap();
        assert!(response.is_completed());
        assert!(matches!(
            engine.run(&mut session),
            Err(EngineError::SessionClosed(_))
        ));
        assert!(matches!(
            engine.clarify(&mut session, "glass"),
            Err(EngineError::SessionClosed(_))
        ));
    }

    #[test]
    fn test_clarify_without_question() {
        let engine = engine();
        let mut session = engine.start(Observation::default()).unwrap();
        assert!(matches!(
            engine.clarify(&mut session, "earth"),
            Err(EngineError::NoPendingQuestion(_))
        ));
    }

    #[test]
    fn test_interrogation_round_trip() {
        let engine = engine();
        let obs = Observation::new(MotionType::FreeFall).with_impact("glass", 15.0, true);
        let (mut session, response) = engine.analyze(obs).unwrap();

        assert_eq!(response.question_kind(), Some(QuestionKind::Material));
        assert_eq!(session.state(), SessionState::AwaitingClarification);
        assert!(matches!(
            engine.run(&mut session),
            Err(EngineError::QuestionAlreadyPending(_))
        ));

        let done = engine.clarify(&mut session, "Glass").unwrap();
        assert_eq!(done.verdict(), Some(Verdict::Synthetic));
        assert_eq!(session.state(), SessionState::Completed);
        assert!(session.pending().is_none());
        assert!(session.clarification().unwrap().is_fake());
        assert_eq!(
            done.reasoning_steps().last().map(String::as_str),
            Some("VERDICT: SYNTHETIC - Material physics violated")
        );
    }

    #[test]
    fn test_events_in_emission_order() {
        let engine = engine();
        let obs = Observation::new(MotionType::FreeFall).with_trajectory(
            vec![0.0, 0.1, 0.2, 0.3, 0.4],
            vec![10.0, 9.5, 8.0, 5.5, 2.0],
        );
        let (mut session, _) = engine.analyze(obs).unwrap();
        let types: Vec<StageEventType> = session
            .drain_events()
            .iter()
            .map(|e| e.event_type())
            .collect();
        assert_eq!(
            types,
            vec![
                StageEventType::Log,
                StageEventType::Progress,
                StageEventType::CheckCompleted,
                StageEventType::PhysicsUpdate,
                StageEventType::Progress,
                StageEventType::Verdict,
                StageEventType::Progress,
            ]
        );
    }
}
