//! Physics check results.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Which physical law a result speaks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckKind {
    Gravity,
    Momentum,
    Shadow,
    Material,
    Pendulum,
    Projectile,
    /// Only produced by clarification of a high-deceleration impact
    Deceleration,
}

impl CheckKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckKind::Gravity => "GRAVITY",
            CheckKind::Momentum => "MOMENTUM",
            CheckKind::Shadow => "SHADOW",
            CheckKind::Material => "MATERIAL",
            CheckKind::Pendulum => "PENDULUM",
            CheckKind::Projectile => "PROJECTILE",
            CheckKind::Deceleration => "DECELERATION",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckStatus {
    Pass,
    Violation,
    InsufficientData,
    Error,
}

impl CheckStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckStatus::Pass => "PASS",
            CheckStatus::Violation => "VIOLATION",
            CheckStatus::InsufficientData => "INSUFFICIENT_DATA",
            CheckStatus::Error => "ERROR",
        }
    }

    /// True for PASS and VIOLATION, the statuses that carry a determination.
    pub fn is_determined(&self) -> bool {
        matches!(self, CheckStatus::Pass | CheckStatus::Violation)
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of exactly one check.
///
/// `status` is fixed at construction from the check's tolerance; nothing
/// re-derives it afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CheckResult {
    pub check: CheckKind,

    pub status: CheckStatus,

    /// Primary measured quantity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub measured: Option<f64>,

    /// Reference value the measurement is compared against
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<f64>,

    /// Signed relative deviation `(measured - expected) / |expected|`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deviation: Option<f64>,

    /// Confidence in the status, 0-100
    pub confidence: f64,

    /// Secondary named quantities (e.g. projectile range)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub details: BTreeMap<String, f64>,

    /// Failure or decline reason for ERROR / INSUFFICIENT_DATA
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckResult {
    /// Create an evaluated (PASS or VIOLATION) result.
    pub fn evaluated(
        check: CheckKind,
        violated: bool,
        measured: f64,
        expected: f64,
        confidence: f64,
    ) -> Self {
        Self {
            check,
            status: if violated {
                CheckStatus::Violation
            } else {
                CheckStatus::Pass
            },
            measured: Some(measured),
            expected: Some(expected),
            deviation: Some(relative_deviation(measured, expected)),
            confidence: clamp_confidence(confidence),
            details: BTreeMap::new(),
            message: None,
        }
    }

    /// Create an ERROR result carrying the failure message.
    pub fn error(check: CheckKind, message: impl Into<String>) -> Self {
        Self::declined(check, CheckStatus::Error, message)
    }

    /// Create an INSUFFICIENT_DATA result.
    pub fn insufficient(check: CheckKind, message: impl Into<String>) -> Self {
        Self::declined(check, CheckStatus::InsufficientData, message)
    }

    fn declined(check: CheckKind, status: CheckStatus, message: impl Into<String>) -> Self {
        Self {
            check,
            status,
            measured: None,
            expected: None,
            deviation: None,
            confidence: 0.0,
            details: BTreeMap::new(),
            message: Some(message.into()),
        }
    }

    /// Override the signed deviation (for checks with more than one comparison).
    pub fn with_deviation(mut self, deviation: f64) -> Self {
        self.deviation = Some(deviation);
        self
    }

    /// Attach a secondary named quantity.
    pub fn with_detail(mut self, name: impl Into<String>, value: f64) -> Self {
        self.details.insert(name.into(), value);
        self
    }

    pub fn is_violation(&self) -> bool {
        self.status == CheckStatus::Violation
    }

    pub fn is_pass(&self) -> bool {
        self.status == CheckStatus::Pass
    }
}

/// Signed relative deviation. Falls back to the absolute difference when the
/// reference is zero.
pub fn relative_deviation(measured: f64, expected: f64) -> f64 {
    if expected == 0.0 {
        measured - expected
    } else {
        (measured - expected) / expected.abs()
    }
}

/// Clamp a confidence into [0, 100], mapping NaN to 0.
pub fn clamp_confidence(confidence: f64) -> f64 {
    if confidence.is_nan() {
        0.0
    } else {
        confidence.clamp(0.0, 100.0)
    }
}
