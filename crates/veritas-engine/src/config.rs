//! Engine configuration.

/// Default number of prior signatures returned with a SYNTHETIC verdict.
pub const DEFAULT_SIGNATURE_TOP_K: usize = 3;

/// Default AUTHENTIC confidence when no check passed.
pub const DEFAULT_AUTHENTIC_BASELINE: f64 = 90.0;

/// Engine configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Similarity lookup result size
    pub signature_top_k: usize,
    /// Whether SYNTHETIC verdicts append a signature to the store
    pub record_signatures: bool,
    /// AUTHENTIC confidence when no check produced a PASS
    pub authentic_baseline: f64,
    /// Ask elastic/inelastic when the momentum check fails
    pub ask_collision_type: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            signature_top_k: DEFAULT_SIGNATURE_TOP_K,
            record_signatures: true,
            authentic_baseline: DEFAULT_AUTHENTIC_BASELINE,
            ask_collision_type: false,
        }
    }
}

impl EngineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            signature_top_k: std::env::var("VERITAS_SIGNATURE_TOP_K")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_SIGNATURE_TOP_K),
            record_signatures: std::env::var("VERITAS_RECORD_SIGNATURES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(true),
            authentic_baseline: std::env::var("VERITAS_AUTHENTIC_BASELINE")
                .ok()
                .and_then(|s| s.parse::<f64>().ok())
                .filter(|v| (0.0..=100.0).contains(v))
                .unwrap_or(DEFAULT_AUTHENTIC_BASELINE),
            ask_collision_type: std::env::var("VERITAS_ASK_COLLISION_TYPE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(false),
        }
    }

    pub fn with_collision_question(mut self, enabled: bool) -> Self {
        self.ask_collision_type = enabled;
        self
    }

    pub fn with_signature_recording(mut self, enabled: bool) -> Self {
        self.record_signatures = enabled;
        self
    }
}
