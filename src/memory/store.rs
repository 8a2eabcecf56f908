//! Core memory store struct: collaborators, cache, and load/save glue.

use std::collections::HashMap;
use std::path::{Component, Path};

use chrono::Utc;

use crate::config::{Config, StorageBackend};
use crate::embedding::{Embedder, EmbeddingEngine};
use crate::errors::Error;
use crate::index::{FlatIndex, SimilarityIndex};
use crate::memory_types::MemoryCollection;
use crate::storage::{BlobStore, FsBlobStore, InMemoryBlobStore, SqliteBlobStore, StorageLocation};

use super::dedup::DedupPolicy;

/// Maximum allowed input length (100,000 bytes).
pub const MAX_INPUT_LENGTH: usize = 100_000;
/// Maximum number of results a search may request.
pub const MAX_TOP_K: usize = 20;
/// Number of results returned when the caller does not specify one.
pub const DEFAULT_TOP_K: usize = 5;

/// Per-user semantic memory engine.
///
/// Owns an embedder, a similarity index, a blob store, and a cache of loaded
/// collections keyed by storage location. The cache lives as long as the
/// store and is the source of truth for reads once populated; entries are
/// replaced on every write and dropped by `delete_all`.
///
/// # Concurrency
///
/// Every operation takes `&mut self`, so one store serializes all of its
/// load-modify-save cycles. The store is `Send`; share it across threads as
/// `Arc<Mutex<MemoryStore>>`. Two independent stores writing the same
/// location are last-write-wins.
pub struct MemoryStore {
    pub(crate) embedder: Box<dyn Embedder>,
    pub(crate) index: Box<dyn SimilarityIndex>,
    pub(crate) storage: Box<dyn BlobStore>,
    pub(crate) policy: DedupPolicy,
    cache: HashMap<StorageLocation, MemoryCollection>,
}

impl MemoryStore {
    /// Assemble a store from its collaborators, using exact brute-force search.
    pub fn new(embedder: Box<dyn Embedder>, storage: Box<dyn BlobStore>, config: &Config) -> Self {
        Self {
            embedder,
            index: Box::new(FlatIndex),
            storage,
            policy: DedupPolicy::from_config(config),
            cache: HashMap::new(),
        }
    }

    /// Replace the similarity index strategy.
    pub fn with_index(mut self, index: Box<dyn SimilarityIndex>) -> Self {
        self.index = index;
        self
    }

    /// Build a store from configuration: ONNX embedder plus the configured backend.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - A storage path contains path traversal sequences (e.g., "../")
    /// - The SQLite database cannot be opened
    /// - The embedding model cannot be loaded
    pub fn open(config: &Config) -> Result<Self, Error> {
        let storage: Box<dyn BlobStore> = match config.storage_backend {
            StorageBackend::Filesystem => {
                reject_traversal(&config.storage_root)?;
                Box::new(FsBlobStore::new(&config.storage_root))
            }
            StorageBackend::Sqlite => {
                reject_traversal(&config.database_path)?;
                Box::new(SqliteBlobStore::open(&config.database_path)?)
            }
            StorageBackend::Memory => Box::new(InMemoryBlobStore::new()),
        };

        let embedder = EmbeddingEngine::new(&config.embedding_model, &config.model_cache)?;
        tracing::debug!(backend = ?config.storage_backend, "memory store opened");

        Ok(Self::new(Box::new(embedder), storage, config))
    }

    /// Load the collection for `location`, from cache when present.
    ///
    /// A missing or undecodable blob yields a fresh empty collection; losing a
    /// corrupt document is preferred over failing the caller.
    pub(crate) fn load_collection(
        &mut self,
        location: &StorageLocation,
    ) -> Result<MemoryCollection, Error> {
        if let Some(collection) = self.cache.get(location) {
            tracing::debug!(%location, memories = collection.len(), "collection cache hit");
            return Ok(collection.clone());
        }

        let collection = match self.storage.load(location)? {
            Some(bytes) => match MemoryCollection::from_bytes(&bytes) {
                Ok(collection) => collection,
                Err(error) => {
                    tracing::warn!(%location, %error, "discarding unreadable memory document");
                    MemoryCollection::empty()
                }
            },
            None => MemoryCollection::empty(),
        };

        tracing::debug!(%location, memories = collection.len(), "collection loaded");
        self.cache.insert(location.clone(), collection.clone());
        Ok(collection)
    }

    /// Persist `collection` and then cache it. The cache is untouched if the write fails.
    pub(crate) fn save_collection(
        &mut self,
        location: &StorageLocation,
        collection: &mut MemoryCollection,
    ) -> Result<(), Error> {
        collection.updated_at = Utc::now();
        let bytes = collection.to_bytes()?;
        self.storage.save(location, &bytes)?;

        tracing::debug!(%location, memories = collection.len(), bytes = bytes.len(), "collection saved");
        self.cache.insert(location.clone(), collection.clone());
        Ok(())
    }

    /// Drop the cached collection for `location`.
    pub(crate) fn evict(&mut self, location: &StorageLocation) -> bool {
        self.cache.remove(location).is_some()
    }

    #[cfg(test)]
    pub(crate) fn is_cached(&self, location: &StorageLocation) -> bool {
        self.cache.contains_key(location)
    }

    /// Validate input length (rejects empty and whitespace-only inputs).
    pub(crate) fn validate_input_length(text: &str) -> Result<(), Error> {
        if text.trim().is_empty() {
            return Err(Error::EmptyInput);
        }
        if text.len() > MAX_INPUT_LENGTH {
            return Err(Error::InputTooLong {
                max_length: MAX_INPUT_LENGTH,
                actual_length: text.len(),
            });
        }
        Ok(())
    }
}

/// Importance must be a finite number in [0, 1].
pub(crate) fn validate_importance(importance: f64) -> Result<(), Error> {
    if !importance.is_finite() || !(0.0..=1.0).contains(&importance) {
        return Err(Error::InvalidInput(format!(
            "Importance must be between 0 and 1, got {importance}"
        )));
    }
    Ok(())
}

/// `top_k` must be within [1, MAX_TOP_K].
pub(crate) fn validate_top_k(top_k: usize) -> Result<(), Error> {
    if top_k == 0 || top_k > MAX_TOP_K {
        return Err(Error::InvalidInput(format!(
            "top_k must be between 1 and {MAX_TOP_K}, got {top_k}"
        )));
    }
    Ok(())
}

/// Path traversal guard: reject parent directory components (works on all platforms).
fn reject_traversal(path: &Path) -> Result<(), Error> {
    if path.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(Error::Config(format!(
            "Invalid storage path {}: contains '..' which may escape the intended directory",
            path.display()
        )));
    }
    Ok(())
}
