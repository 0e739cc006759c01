//! Kinematic fitting and closed-form physics checks.
//!
//! This crate provides:
//! - A Levenberg–Marquardt fitter for constant-acceleration trajectories
//! - Stateless checks for gravity, momentum, shadows, material failure,
//!   pendulum period and projectile arcs
//! - A dispatcher that picks checks from a declared motion classification
//!
//! Nothing here performs I/O. Failures degrade to `CheckResult`s with
//! `ERROR` or `INSUFFICIENT_DATA` status instead of propagating.

pub mod checks;
pub mod constants;
pub mod error;
pub mod fitter;
pub mod library;

pub use error::{PhysicsError, PhysicsResult};
pub use fitter::{FitterConfig, KinematicFit, KinematicFitter};
pub use library::CheckLibrary;
