//! longmem - Per-user long-term semantic memory for conversational assistants.
//!
//! Each identity owns one collection of short facts. Facts are embedded when
//! stored, retrieved by cosine similarity, and periodically pruned of
//! near-duplicates. All operations are synchronous (no async/await required).
//!
//! # Example
//!
//! ```no_run
//! use longmem::{Config, MemoryStore, detect_identity};
//!
//! let config = Config::load().expect("Failed to load config");
//! config.ensure_directories().expect("Failed to create directories");
//! let mut store = MemoryStore::open(&config).expect("Failed to initialize store");
//!
//! let identity = detect_identity(None);
//!
//! let message = store
//!     .add(&identity, "I live in Paris", 0.9, "personal_info", &[])
//!     .expect("Failed to store memory");
//! println!("{}", message);
//!
//! for hit in store.search_scored(&identity, "where does the user live", 5).unwrap() {
//!     println!("{:.2}: {}", hit.similarity, hit.memory.content);
//! }
//! ```
//!
//! # Mutability Requirements
//!
//! Every `MemoryStore` operation takes `&mut self`: the embedding engine
//! mutates state for ONNX tensor allocations and the store owns a cache of
//! loaded collections.

pub mod config;
pub mod embedding;
pub mod errors;
pub mod identity;
pub mod index;
pub mod memory;
pub mod memory_types;
pub mod storage;

// Re-export public API
pub use config::{Config, StorageBackend};
pub use embedding::{Embedder, EmbeddingEngine, EMBEDDING_DIMS};
pub use errors::Error;
pub use identity::detect_identity;
pub use index::{l2_normalize, FlatIndex, Neighbor, SimilarityIndex};
pub use memory::{
    deduplicate_records, DedupPolicy, MemoryStore, DEFAULT_TOP_K, MAX_INPUT_LENGTH, MAX_TOP_K,
};
pub use memory_types::{MemoryCollection, MemoryData, MemoryRecord, ScoredMemory};
pub use storage::{BlobStore, FsBlobStore, InMemoryBlobStore, SqliteBlobStore, StorageLocation};
