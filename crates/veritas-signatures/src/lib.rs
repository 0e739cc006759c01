//! Catalog of previously seen violation signatures.
//!
//! The engine treats the store as a similarity lookup plus an append-only
//! log. [`SignatureStore`] is the seam; [`InMemorySignatureStore`] is the
//! process-local implementation, optionally seeded with known generator
//! signatures.

pub mod error;
pub mod memory;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use memory::InMemorySignatureStore;
pub use store::{SignatureStore, StoreStats};
