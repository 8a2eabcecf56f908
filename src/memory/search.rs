//! Semantic search over a user's memories.

use chrono::Utc;

use crate::errors::Error;
use crate::index::l2_normalize;
use crate::memory_types::{MemoryData, ScoredMemory};

use super::store::{validate_top_k, MemoryStore};

impl MemoryStore {
    #[must_use = "handle the error or results may be lost"]
    /// Search memories by semantic similarity.
    ///
    /// Returns up to `top_k` memories with strictly positive cosine similarity
    /// to the query, most similar first. See [`MemoryStore::search_scored`].
    pub fn search(
        &mut self,
        identity: &str,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<MemoryData>, Error> {
        Ok(self
            .search_scored(identity, query, top_k)?
            .into_iter()
            .map(|hit| hit.memory)
            .collect())
    }

    #[must_use = "handle the error or results may be lost"]
    /// Search memories and return each hit with its similarity score.
    ///
    /// Runs a deduplication pass first when one is due. An empty collection
    /// yields an empty result; so does a query unrelated to every memory.
    ///
    /// # Arguments
    ///
    /// * `identity` - Opaque per-user credential
    /// * `query` - Natural-language query (1 to 100,000 bytes)
    /// * `top_k` - Maximum number of results, 1 to 20
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Query is empty or too long
    /// - `top_k` is out of range
    /// - Embedding, deduplication persistence, or index lookup fails
    pub fn search_scored(
        &mut self,
        identity: &str,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<ScoredMemory>, Error> {
        validate_top_k(top_k)?;
        let query = query.trim();
        Self::validate_input_length(query)?;

        let location = self.storage.resolve_location(identity)?;
        let mut collection = self.load_collection(&location)?;
        if collection.is_empty() {
            return Ok(Vec::new());
        }

        if self.policy.is_due(&collection, Utc::now()) {
            collection = self.deduplicate_and_save(&location, collection)?;
        }

        let query_embedding = l2_normalize(&self.embedder.embed(query)?);
        let candidates: Vec<Vec<f32>> = collection
            .memories
            .iter()
            .map(|m| l2_normalize(&m.embedding))
            .collect();

        let k = top_k.min(candidates.len());
        let neighbors = self.index.top_k(&query_embedding, &candidates, k)?;

        let results: Vec<ScoredMemory> = neighbors
            .into_iter()
            .filter(|n| n.similarity > 0.0)
            .filter_map(|n| {
                collection.memories.get(n.index).map(|m| ScoredMemory {
                    memory: m.data.clone(),
                    similarity: n.similarity,
                })
            })
            .collect();

        tracing::debug!(%location, candidates = candidates.len(), hits = results.len(), "search complete");
        Ok(results)
    }
}
