//! The signature store interface.

use serde::{Deserialize, Serialize};
use veritas_models::{SignatureEntry, SimilarityKey};

use crate::error::StoreResult;

/// Entry counts reported by a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StoreStats {
    /// Entries the store was seeded with
    pub known_signatures: usize,
    /// Entries appended since
    pub recorded_signatures: usize,
}

impl StoreStats {
    pub fn total(&self) -> usize {
        self.known_signatures + self.recorded_signatures
    }
}

/// A catalog of violation signatures.
///
/// Implementations must be safe to share across concurrent sessions.
/// Entries are never edited or deleted through this interface.
pub trait SignatureStore: Send + Sync {
    /// Up to `top_k` entries resembling `key`, most similar first.
    fn lookup(&self, key: &SimilarityKey, top_k: usize) -> StoreResult<Vec<SignatureEntry>>;

    /// Record a newly discovered signature.
    fn append(&self, entry: SignatureEntry) -> StoreResult<()>;

    fn stats(&self) -> StoreResult<StoreStats>;

    /// Store name for logging.
    fn name(&self) -> &'static str;
}
