//! Concurrent access to the in-memory store.

use std::sync::Arc;

use veritas_models::{SignatureEntry, SignaturePattern, SimilarityKey};
use veritas_signatures::{InMemorySignatureStore, SignatureStore};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_appends_are_not_lost() {
    let store = Arc::new(InMemorySignatureStore::with_known_signatures());

    let mut handles = Vec::new();
    for task in 0..8 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            for i in 0..25 {
                let entry = SignatureEntry::new(
                    SignaturePattern::MomentumViolation,
                    format!("task {} entry {}", task, i),
                )
                .with_parameter("momentum_error", 0.4);
                store.append(entry).unwrap();
                let key = SimilarityKey::new().with_pattern(SignaturePattern::MomentumViolation);
                assert!(!store.lookup(&key, 3).unwrap().is_empty());
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let stats = store.stats().unwrap();
    assert_eq!(stats.known_signatures, 6);
    assert_eq!(stats.recorded_signatures, 200);
}

#[test]
fn test_store_is_object_safe() {
    let store: Arc<dyn SignatureStore> = Arc::new(InMemorySignatureStore::new());
    store
        .append(SignatureEntry::new(SignaturePattern::GravityDeviation, "g"))
        .unwrap();
    assert_eq!(store.stats().unwrap().recorded_signatures, 1);
    assert_eq!(store.name(), "in_memory");
}
