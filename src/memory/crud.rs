//! Write and listing operations for the memory store.

use crate::errors::Error;
use crate::memory_types::{normalize_topics, MemoryData, MemoryRecord, DEFAULT_CATEGORY};

use super::store::{validate_importance, MemoryStore};

impl MemoryStore {
    #[must_use = "handle the error or results may be lost"]
    /// Store a new memory for `identity`.
    ///
    /// Embeds the content, appends a record with a fresh id, and persists the
    /// whole collection before updating the cache.
    ///
    /// # Arguments
    ///
    /// * `identity` - Opaque per-user credential, only used to resolve storage
    /// * `content` - The fact to remember (1 to 100,000 bytes)
    /// * `importance` - Retention priority in [0, 1], used to break dedup ties
    /// * `category` - Short label; empty becomes `"general"`
    /// * `topics` - Free-form tags; trimmed and de-duplicated
    ///
    /// # Returns
    ///
    /// A confirmation message containing the stored content.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Content is empty or exceeds 100,000 bytes
    /// - Importance is outside [0, 1]
    /// - The embedding dimension differs from the embedder's declared
    ///   dimension or from the stored memories
    /// - Embedding generation or persistence fails
    pub fn add(
        &mut self,
        identity: &str,
        content: &str,
        importance: f64,
        category: &str,
        topics: &[String],
    ) -> Result<String, Error> {
        Self::validate_input_length(content)?;
        validate_importance(importance)?;

        let location = self.storage.resolve_location(identity)?;
        let mut collection = self.load_collection(&location)?;

        let embedding = self.embedder.embed(content)?;
        if embedding.is_empty() {
            return Err(Error::Inference("Embedder returned an empty vector".to_string()));
        }
        let expected = self.embedder.dimensions();
        if embedding.len() != expected {
            return Err(Error::DimensionMismatch {
                expected,
                actual: embedding.len(),
            });
        }
        if let Some(expected) = collection.dimensions() {
            if expected != embedding.len() {
                return Err(Error::DimensionMismatch {
                    expected,
                    actual: embedding.len(),
                });
            }
        }

        let category = match category.trim() {
            "" => DEFAULT_CATEGORY,
            other => other,
        };
        let id = collection.next_id()?;
        collection.memories.push(MemoryRecord {
            data: MemoryData {
                id,
                content: content.to_string(),
                importance,
                category: category.to_string(),
                topics: normalize_topics(topics),
            },
            embedding,
        });

        self.save_collection(&location, &mut collection)?;
        tracing::info!(%location, id, total = collection.len(), "memory stored");

        Ok(format!("Memory successfully stored: {content}"))
    }

    #[must_use = "handle the error or results may be lost"]
    /// List every memory for `identity` in insertion order, without embeddings.
    pub fn list(&mut self, identity: &str) -> Result<Vec<MemoryData>, Error> {
        let location = self.storage.resolve_location(identity)?;
        let collection = self.load_collection(&location)?;
        Ok(collection.memories.into_iter().map(|m| m.data).collect())
    }

    #[must_use = "handle the error or results may be lost"]
    /// Delete all memories for `identity`.
    ///
    /// Removes the stored document and the cache entry. Deleting a store that
    /// does not exist succeeds.
    pub fn delete_all(&mut self, identity: &str) -> Result<String, Error> {
        let location = self.storage.resolve_location(identity)?;
        self.storage.delete(&location)?;
        let was_cached = self.evict(&location);
        tracing::info!(%location, was_cached, "all memories deleted");

        Ok("All long-term memories have been successfully deleted.".to_string())
    }
}
