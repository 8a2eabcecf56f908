//! Batch removal of near-duplicate memories.
//!
//! Deduplication runs opportunistically from `search` when a collection is
//! large enough and the last pass is old enough, so its cost is paid on reads
//! rather than on every write.

use chrono::{DateTime, TimeDelta, Utc};

use crate::config::Config;
use crate::errors::Error;
use crate::index::{l2_normalize, SimilarityIndex};
use crate::memory_types::{MemoryCollection, MemoryRecord};
use crate::storage::StorageLocation;

use super::store::MemoryStore;

/// When deduplication runs and what counts as a duplicate.
#[derive(Debug, Clone, PartialEq)]
pub struct DedupPolicy {
    /// Cosine similarity strictly above which two memories are duplicates.
    pub threshold: f64,
    /// Collections with this many memories or fewer are never deduplicated.
    pub min_memories: usize,
    /// Minimum time between two automatic passes.
    pub interval: TimeDelta,
    /// Nearest neighbors examined per memory, including itself.
    pub neighbor_limit: usize,
}

impl Default for DedupPolicy {
    fn default() -> Self {
        Self {
            threshold: 0.75,
            min_memories: 10,
            interval: TimeDelta::hours(24),
            neighbor_limit: 20,
        }
    }
}

impl DedupPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            threshold: config.dedup_threshold,
            min_memories: config.dedup_min_memories,
            interval: TimeDelta::try_hours(config.dedup_interval_hours).unwrap_or(TimeDelta::MAX),
            neighbor_limit: config.dedup_neighbor_limit,
        }
    }

    /// Whether an automatic pass is due for `collection` at time `now`.
    pub fn is_due(&self, collection: &MemoryCollection, now: DateTime<Utc>) -> bool {
        collection.len() > self.min_memories
            && collection
                .last_deduplicated_at
                .is_none_or(|at| now - at > self.interval)
    }
}

/// Remove near-duplicates, keeping the more important memory of each pair.
///
/// Walks the records in order. For each surviving record `i`, every surviving
/// neighbor `j` above the threshold is compared by importance: ties and wins
/// keep `i` and drop `j`; a loss drops `i` and ends the scan for `i`.
/// Survivors keep their original relative order.
pub fn deduplicate_records(
    records: Vec<MemoryRecord>,
    index: &dyn SimilarityIndex,
    policy: &DedupPolicy,
) -> Result<Vec<MemoryRecord>, Error> {
    if records.len() <= 1 {
        return Ok(records);
    }

    let embeddings: Vec<Vec<f32>> = records.iter().map(|r| l2_normalize(&r.embedding)).collect();
    let neighbor_limit = policy.neighbor_limit.min(records.len());
    let mut removed = vec![false; records.len()];

    for i in 0..records.len() {
        if removed[i] {
            continue;
        }

        let neighbors = index.top_k(&embeddings[i], &embeddings, neighbor_limit)?;
        for neighbor in neighbors {
            let j = neighbor.index;
            if j == i || removed[j] {
                continue;
            }
            if f64::from(neighbor.similarity) <= policy.threshold {
                continue;
            }

            if records[i].data.importance >= records[j].data.importance {
                removed[j] = true;
            } else {
                removed[i] = true;
                break;
            }
        }
    }

    Ok(records
        .into_iter()
        .zip(removed)
        .filter_map(|(record, gone)| (!gone).then_some(record))
        .collect())
}

impl MemoryStore {
    #[must_use = "handle the error or results may be lost"]
    /// Run a deduplication pass now, regardless of the automatic schedule.
    ///
    /// Returns the number of memories removed. An empty collection is left
    /// untouched and nothing is written.
    pub fn deduplicate(&mut self, identity: &str) -> Result<usize, Error> {
        let location = self.storage.resolve_location(identity)?;
        let collection = self.load_collection(&location)?;
        if collection.is_empty() {
            return Ok(0);
        }

        let before = collection.len();
        let collection = self.deduplicate_and_save(&location, collection)?;
        Ok(before - collection.len())
    }

    /// Deduplicate, stamp the pass time, persist, and return the reduced collection.
    pub(crate) fn deduplicate_and_save(
        &mut self,
        location: &StorageLocation,
        mut collection: MemoryCollection,
    ) -> Result<MemoryCollection, Error> {
        let before = collection.len();
        let records = std::mem::take(&mut collection.memories);
        collection.memories = deduplicate_records(records, self.index.as_ref(), &self.policy)?;
        collection.last_deduplicated_at = Some(Utc::now());

        self.save_collection(location, &mut collection)?;
        tracing::info!(
            %location,
            removed = before - collection.len(),
            remaining = collection.len(),
            "deduplicated memories"
        );
        Ok(collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::FlatIndex;
    use crate::memory_types::MemoryData;

    fn record(id: i64, importance: f64, embedding: Vec<f32>) -> MemoryRecord {
        MemoryRecord {
            data: MemoryData {
                id,
                content: format!("memory {id}"),
                importance,
                category: "general".to_string(),
                topics: Vec::new(),
            },
            embedding,
        }
    }

    /// Unit vector at cosine 0.9 from [1, 0].
    fn near_x() -> Vec<f32> {
        vec![0.9, 0.435_889_9]
    }

    fn ids(records: &[MemoryRecord]) -> Vec<i64> {
        records.iter().map(|r| r.data.id).collect()
    }

    fn run(records: Vec<MemoryRecord>) -> Vec<MemoryRecord> {
        deduplicate_records(records, &FlatIndex, &DedupPolicy::default()).unwrap()
    }

    #[test]
    fn test_keeps_higher_importance_when_outer_wins() {
        let records = vec![record(1, 0.9, vec![1.0, 0.0]), record(2, 0.5, near_x())];
        assert_eq!(ids(&run(records)), vec![1]);
    }

    #[test]
    fn test_keeps_higher_importance_when_outer_loses() {
        let records = vec![record(1, 0.5, vec![1.0, 0.0]), record(2, 0.9, near_x())];
        assert_eq!(ids(&run(records)), vec![2]);
    }

    #[test]
    fn test_equal_importance_keeps_earlier() {
        let records = vec![record(1, 0.5, vec![1.0, 0.0]), record(2, 0.5, near_x())];
        assert_eq!(ids(&run(records)), vec![1]);
    }

    #[test]
    fn test_below_threshold_keeps_both() {
        // cos = 0.7
        let records = vec![
            record(1, 0.9, vec![1.0, 0.0]),
            record(2, 0.1, vec![0.7, 0.714_142_8]),
        ];
        assert_eq!(ids(&run(records)), vec![1, 2]);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let policy = DedupPolicy {
            threshold: 1.0,
            ..DedupPolicy::default()
        };
        let records = vec![record(1, 0.9, vec![1.0, 0.0]), record(2, 0.1, vec![1.0, 0.0])];
        let result = deduplicate_records(records, &FlatIndex, &policy).unwrap();
        assert_eq!(ids(&result), vec![1, 2]);
    }

    #[test]
    fn test_preserves_order_of_survivors() {
        let records = vec![
            record(1, 0.5, vec![0.0, 1.0, 0.0]),
            record(2, 0.2, vec![1.0, 0.0, 0.0]),
            record(3, 0.5, vec![0.0, 0.0, 1.0]),
            record(4, 0.8, vec![1.0, 0.0, 0.0]),
        ];
        assert_eq!(ids(&run(records)), vec![1, 3, 4]);
    }

    #[test]
    fn test_unnormalized_embeddings() {
        let records = vec![record(1, 0.9, vec![10.0, 0.0]), record(2, 0.5, vec![3.0, 0.1])];
        assert_eq!(ids(&run(records)), vec![1]);
    }

    #[test]
    fn test_single_and_empty_untouched() {
        assert!(run(Vec::new()).is_empty());
        assert_eq!(ids(&run(vec![record(1, 0.5, vec![1.0])])), vec![1]);
    }

    #[test]
    fn test_second_pass_removes_nothing() {
        let records = vec![
            record(1, 0.3, vec![1.0, 0.0, 0.0]),
            record(2, 0.9, vec![0.95, 0.312_249_9, 0.0]),
            record(3, 0.6, vec![0.0, 1.0, 0.0]),
            record(4, 0.4, vec![0.0, 0.98, 0.198_997_5]),
            record(5, 0.7, vec![0.0, 0.0, 1.0]),
        ];
        let first = run(records);
        let second = run(first.clone());
        assert_eq!(first, second);
        assert_eq!(ids(&first), vec![2, 3, 5]);
    }

    #[test]
    fn test_neighbor_limit_of_one_sees_only_self() {
        let policy = DedupPolicy {
            neighbor_limit: 1,
            ..DedupPolicy::default()
        };
        let records = vec![record(1, 0.9, vec![1.0, 0.0]), record(2, 0.5, vec![1.0, 0.0])];
        let result = deduplicate_records(records, &FlatIndex, &policy).unwrap();
        assert_eq!(result.len(), 2);
    }

    fn collection_of(n: usize, last: Option<DateTime<Utc>>) -> MemoryCollection {
        let mut collection = MemoryCollection::empty();
        collection.memories = (0..n)
            .map(|i| record(i as i64, 0.5, vec![1.0]))
            .collect();
        collection.last_deduplicated_at = last;
        collection
    }

    #[test]
    fn test_not_due_at_or_below_min_memories() {
        let policy = DedupPolicy::default();
        let now = Utc::now();
        assert!(!policy.is_due(&collection_of(10, None), now));
        assert!(!policy.is_due(&collection_of(10, Some(now - TimeDelta::days(30))), now));
    }

    #[test]
    fn test_due_when_never_run() {
        let policy = DedupPolicy::default();
        assert!(policy.is_due(&collection_of(11, None), Utc::now()));
    }

    #[test]
    fn test_due_only_after_interval() {
        let policy = DedupPolicy::default();
        let now = Utc::now();
        assert!(!policy.is_due(&collection_of(11, Some(now - TimeDelta::hours(23))), now));
        assert!(!policy.is_due(&collection_of(11, Some(now - TimeDelta::hours(24))), now));
        assert!(policy.is_due(&collection_of(11, Some(now - TimeDelta::hours(25))), now));
    }
}
