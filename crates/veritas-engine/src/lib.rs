//! Ambiguity resolution and verdict engine.
//!
//! This crate drives one analysis session at a time:
//! - Runs the physics check library over an observation
//! - Decides whether a human must supply missing context
//! - Re-scores the affected check with the answer
//! - Aggregates everything into a verdict, consulting the signature store
//!
//! Sessions are plain values; the pending question and partial results live
//! in the session, so a clarification is a separate call.

pub mod aggregator;
pub mod ambiguity;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod resolver;
pub mod session;

pub use aggregator::{synthetic_confidence, Aggregation, VerdictAggregator};
pub use ambiguity::AmbiguityEvaluator;
pub use config::EngineConfig;
pub use engine::VerificationEngine;
pub use error::{EngineError, EngineResult};
pub use logging::SessionLogger;
pub use resolver::{ClarificationResolver, Resolution};
pub use session::AnalysisSession;
