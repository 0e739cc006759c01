//! Process-local signature store.

use std::cmp::Ordering;
use std::sync::RwLock;

use tracing::{debug, info};
use veritas_models::{MotionType, SignatureEntry, SignaturePattern, SimilarityKey};

use crate::error::{StoreError, StoreResult};
use crate::store::{SignatureStore, StoreStats};

/// Relative distance within which two equal-named parameters match.
const PARAMETER_MATCH_TOLERANCE: f64 = 0.25;

const PATTERN_SCORE: u32 = 2;
const MOTION_SCORE: u32 = 1;
const PARAMETER_SCORE: u32 = 1;

#[derive(Debug, Default)]
struct Entries {
    known: usize,
    items: Vec<SignatureEntry>,
}

/// Signature store backed by a vector behind a read/write lock.
#[derive(Debug, Default)]
pub struct InMemorySignatureStore {
    entries: RwLock<Entries>,
}

impl InMemorySignatureStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-loaded with signatures of known video generators.
    pub fn with_known_signatures() -> Self {
        let items = known_signatures();
        info!(count = items.len(), "Loaded known generator signatures");
        Self {
            entries: RwLock::new(Entries {
                known: items.len(),
                items,
            }),
        }
    }
}

impl SignatureStore for InMemorySignatureStore {
    fn lookup(&self, key: &SimilarityKey, top_k: usize) -> StoreResult<Vec<SignatureEntry>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::Poisoned("lookup"))?;

        let mut scored: Vec<(u32, &SignatureEntry)> = entries
            .items
            .iter()
            .map(|e| (similarity(key, e), e))
            .filter(|(score, _)| *score > 0)
            .collect();

        scored.sort_by(|a, b| match b.0.cmp(&a.0) {
            Ordering::Equal => a.1.discovered_at.cmp(&b.1.discovered_at),
            other => other,
        });

        let matches: Vec<SignatureEntry> = scored
            .into_iter()
            .take(top_k)
            .map(|(_, e)| e.clone())
            .collect();

        debug!(
            pattern = ?key.pattern,
            matches = matches.len(),
            "Signature lookup"
        );
        Ok(matches)
    }

    fn append(&self, entry: SignatureEntry) -> StoreResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StoreError::Poisoned("append"))?;
        debug!(id = %entry.id, pattern = %entry.pattern, "Recording signature");
        entries.items.push(entry);
        Ok(())
    }

    fn stats(&self) -> StoreResult<StoreStats> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::Poisoned("stats"))?;
        Ok(StoreStats {
            known_signatures: entries.known,
            recorded_signatures: entries.items.len() - entries.known,
        })
    }

    fn name(&self) -> &'static str {
        "in_memory"
    }
}

/// Similarity score of an entry against a key.
fn similarity(key: &SimilarityKey, entry: &SignatureEntry) -> u32 {
    let mut score = 0;
    if key.pattern == Some(entry.pattern) {
        score += PATTERN_SCORE;
    }
    if key.motion_type.is_some() && key.motion_type == entry.motion_type {
        score += MOTION_SCORE;
    }
    for (name, &value) in &key.parameters {
        if parameter_matches(entry, name, value) {
            score += PARAMETER_SCORE;
        }
    }
    score
}

fn parameter_matches(entry: &SignatureEntry, name: &str, value: f64) -> bool {
    let min = entry.parameters.get(&format!("{}_min", name));
    let max = entry.parameters.get(&format!("{}_max", name));
    if let (Some(&min), Some(&max)) = (min, max) {
        if value >= min && value <= max {
            return true;
        }
    }

    match entry.parameters.get(name) {
        Some(&reference) if reference != 0.0 => {
            ((value - reference) / reference).abs() <= PARAMETER_MATCH_TOLERANCE
        }
        Some(_) => value == 0.0,
        None => false,
    }
}

fn known_signatures() -> Vec<SignatureEntry> {
    vec![
        SignatureEntry::new(
            SignaturePattern::GravityDeviation,
            "Falling objects accelerate 15-20% faster than Earth gravity",
        )
        .with_id("sora_v1_gravity")
        .with_source_model("OpenAI Sora")
        .with_motion_type(MotionType::FreeFall)
        .with_parameter("gravity_min", 11.5)
        .with_parameter("gravity_max", 12.5)
        .with_parameter("typical_deviation", 18.0),
        SignatureEntry::new(
            SignaturePattern::WaterReflection,
            "Water reflections do not match object positions",
        )
        .with_id("sora_water_physics")
        .with_source_model("OpenAI Sora")
        .with_parameter("reflection_error", 0.3),
        SignatureEntry::new(
            SignaturePattern::ShadowInconsistency,
            "Multiple shadow directions indicating multiple light sources",
        )
        .with_id("kling_shadow")
        .with_source_model("Kling AI")
        .with_parameter("shadow_variance", 25.0),
        SignatureEntry::new(
            SignaturePattern::MomentumViolation,
            "Momentum not conserved in collisions",
        )
        .with_id("runway_momentum")
        .with_source_model("Runway Gen-3")
        .with_motion_type(MotionType::Collision)
        .with_parameter("momentum_error", 0.4),
        SignatureEntry::new(
            SignaturePattern::HandAnatomy,
            "Incorrect finger count or impossible hand poses",
        )
        .with_id("midjourney_hands")
        .with_source_model("Midjourney")
        .with_parameter("finger_count_error", 1.0),
        SignatureEntry::new(
            SignaturePattern::TextArtifacts,
            "Garbled or nonsense text in frames",
        )
        .with_id("dall_e_text")
        .with_source_model("DALL-E 3")
        .with_parameter("text_error", 1.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn test_seeded_stats() {
        let store = InMemorySignatureStore::with_known_signatures();
        let stats = store.stats().unwrap();
        assert_eq!(stats.known_signatures, 6);
        assert_eq!(stats.recorded_signatures, 0);
        assert_eq!(InMemorySignatureStore::new().stats().unwrap().total(), 0);
    }

    #[test]
    fn test_gravity_range_match_ranks_first() {
        let store = InMemorySignatureStore::with_known_signatures();
        let key = SimilarityKey::new()
            .with_pattern(SignaturePattern::GravityDeviation)
            .with_motion_type(MotionType::FreeFall)
            .with_parameter("gravity", 12.0);
        let matches = store.lookup(&key, 3).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, "sora_v1_gravity");
        assert_eq!(similarity(&key, &matches[0]), 4);
    }

    #[test]
    fn test_parameter_tolerance() {
        let entry = SignatureEntry::new(SignaturePattern::Other, "x")
            .with_parameter("shadow_variance", 25.0);
        assert!(parameter_matches(&entry, "shadow_variance", 30.0));
        assert!(!parameter_matches(&entry, "shadow_variance", 40.0));
        assert!(!parameter_matches(&entry, "gravity", 25.0));
    }

    #[test]
    fn test_no_match_returns_empty() {
        let store = InMemorySignatureStore::with_known_signatures();
        let key = SimilarityKey::new().with_parameter("unrelated", 1.0);
        assert!(store.lookup(&key, 3).unwrap().is_empty());
    }

    #[test]
    fn test_ties_break_by_discovery_time() {
        let store = InMemorySignatureStore::new();
        let now = Utc::now();
        let mut later =
            SignatureEntry::new(SignaturePattern::ShadowInconsistency, "later").with_id("later");
        later.discovered_at = now;
        let mut earlier =
            SignatureEntry::new(SignaturePattern::ShadowInconsistency, "earlier").with_id("earlier");
        earlier.discovered_at = now - Duration::seconds(60);
        store.append(later).unwrap();
        store.append(earlier).unwrap();

        let key = SimilarityKey::new().with_pattern(SignaturePattern::ShadowInconsistency);
        let ids: Vec<String> = store
            .lookup(&key, 5)
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec!["earlier", "later"]);
        assert_eq!(store.lookup(&key, 1).unwrap().len(), 1);
    }
}
