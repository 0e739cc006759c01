//! Per-analysis session state.
//!
//! A session holds the direct check results, at most one pending question,
//! at most one clarification, and the final response. The pending question
//! and the partial results are kept here so a clarification can resume the
//! analysis from a separate call.

use chrono::{DateTime, Utc};
use veritas_models::{
    AmbiguityAssessment, AnalysisResponse, CheckResult, ClarificationOutcome, Observation,
    SessionId, SessionState, StageEvent, Verdict,
};

use crate::resolver::Resolution;

#[derive(Debug, Clone)]
pub struct AnalysisSession {
    id: SessionId,
    observation: Observation,
    state: SessionState,
    results: Vec<CheckResult>,
    pending: Option<AmbiguityAssessment>,
    clarification: Option<Resolution>,
    response: Option<AnalysisResponse>,
    events: Vec<StageEvent>,
    created_at: DateTime<Utc>,
}

impl AnalysisSession {
    pub(crate) fn new(observation: Observation) -> Self {
        Self {
            id: SessionId::new(),
            observation,
            state: SessionState::Created,
            results: Vec::new(),
            pending: None,
            clarification: None,
            response: None,
            events: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn observation(&self) -> &Observation {
        &self.observation
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Direct results from the check library.
    pub fn results(&self) -> &[CheckResult] {
        &self.results
    }

    pub fn pending(&self) -> Option<&AmbiguityAssessment> {
        self.pending.as_ref()
    }

    pub fn clarification(&self) -> Option<&ClarificationOutcome> {
        self.clarification.as_ref().map(|r| &r.outcome)
    }

    /// Results the verdict is computed from: the clarified result replaces
    /// the direct result of the same check, or is appended when there was none.
    pub fn effective_results(&self) -> Vec<CheckResult> {
        let mut results = self.results.clone();
        if let Some(resolution) = &self.clarification {
            let clarified = resolution.result.clone();
            match results.iter_mut().find(|r| r.check == clarified.check) {
                Some(slot) => *slot = clarified,
                None => results.push(clarified),
            }
        }
        results
    }

    pub fn response(&self) -> Option<&AnalysisResponse> {
        self.response.as_ref()
    }

    pub fn verdict(&self) -> Option<Verdict> {
        self.response.as_ref().and_then(|r| r.verdict())
    }

    /// Events recorded so far, without consuming them.
    pub fn events(&self) -> &[StageEvent] {
        &self.events
    }

    /// Take all recorded events in emission order.
    pub fn drain_events(&mut self) -> Vec<StageEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: StageEvent) {
        self.events.push(event);
    }

    pub(crate) fn record_results(&mut self, results: Vec<CheckResult>) {
        self.results = results;
    }

    pub(crate) fn await_clarification(&mut self, assessment: AmbiguityAssessment) {
        self.pending = Some(assessment);
        self.state = SessionState::AwaitingClarification;
    }

    pub(crate) fn take_pending(&mut self) -> Option<AmbiguityAssessment> {
        self.pending.take()
    }

    pub(crate) fn record_clarification(&mut self, resolution: Resolution) {
        self.clarification = Some(resolution);
    }

    pub(crate) fn complete(&mut self, response: AnalysisResponse) {
        self.response = Some(response);
        self.state = SessionState::Completed;
    }
}
