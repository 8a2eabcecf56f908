//! Memory store engine orchestrating embedding, similarity search, and persistence.
//!
//! Provides the per-user `add`, `search`, `list`, `deduplicate`, and `delete_all`
//! operations on top of the pluggable embedder, index, and blob store.

mod crud;
mod dedup;
mod search;

// pub(crate): module internals hidden; public items re-exported explicitly via lib.rs
pub(crate) mod store;

pub use dedup::{deduplicate_records, DedupPolicy};
pub use store::{MemoryStore, DEFAULT_TOP_K, MAX_INPUT_LENGTH, MAX_TOP_K};
