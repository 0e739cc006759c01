//! Shared data models for the Veritas physics verification engine.
//!
//! This crate provides Serde-serializable types for:
//! - Observations handed over by vision extraction
//! - Per-check measurements and results
//! - Ambiguity questions, answer keys and clarification outcomes
//! - Verdicts and the response envelopes returned to a transport
//! - Stage events and violation signatures

pub mod answers;
pub mod ambiguity;
pub mod check;
pub mod clarification;
pub mod events;
pub mod measurement;
pub mod motion;
pub mod observation;
pub mod session;
pub mod signature;
pub mod verdict;

// Re-export common types
pub use ambiguity::{AmbiguityAssessment, Implication, QuestionKind};
pub use answers::{
    shatter_threshold_for, Barrier, CollisionType, Environment, Material,
    DEFAULT_BARRIER_MAX_G, DEFAULT_SHATTER_THRESHOLD,
};
pub use check::{CheckKind, CheckResult, CheckStatus};
pub use clarification::ClarificationOutcome;
pub use events::{StageEvent, StageEventType};
pub use measurement::{
    MaterialImpact, Measurement, MomentumMeasurement, PendulumMeasurement,
    ProjectileMeasurement, ShadowAngles, TrajectorySamples,
};
pub use motion::MotionType;
pub use observation::{DetectedObject, Observation};
pub use session::{SessionId, SessionState};
pub use signature::{SignatureEntry, SignaturePattern, SimilarityKey};
pub use verdict::{AnalysisResponse, Verdict};
