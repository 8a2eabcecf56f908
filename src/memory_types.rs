//! Memory records and the per-user collection that is persisted as one document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::Error;

/// Category assigned when the caller does not supply one.
pub const DEFAULT_CATEGORY: &str = "general";

/// A stored fact without its embedding, as returned by search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryData {
    pub id: i64,
    pub content: String,
    pub importance: f64,
    pub category: String,
    #[serde(default)]
    pub topics: Vec<String>,
}

/// A stored fact together with the embedding of its content.
///
/// Serialized flat: `{id, content, importance, category, topics, embedding}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    #[serde(flatten)]
    pub data: MemoryData,
    pub embedding: Vec<f32>,
}

/// A search hit: memory data plus its cosine similarity to the query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredMemory {
    #[serde(flatten)]
    pub memory: MemoryData,
    pub similarity: f32,
}

/// Full memory state for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryCollection {
    #[serde(default)]
    pub memories: Vec<MemoryRecord>,
    #[serde(alias = "updated_at")]
    pub updated_at: DateTime<Utc>,
    #[serde(default, alias = "last_deduplicated_at")]
    pub last_deduplicated_at: Option<DateTime<Utc>>,
}

impl MemoryCollection {
    /// An empty collection that has never been deduplicated.
    pub fn empty() -> Self {
        Self {
            memories: Vec::new(),
            updated_at: Utc::now(),
            last_deduplicated_at: None,
        }
    }

    pub fn len(&self) -> usize {
        self.memories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memories.is_empty()
    }

    /// Embedding dimension shared by every record, if any record exists.
    pub fn dimensions(&self) -> Option<usize> {
        self.memories.first().map(|m| m.embedding.len())
    }

    /// Next record id: the current time in milliseconds, bumped past the
    /// largest existing id so ids stay unique and increasing within the collection.
    ///
    /// Fails with `Error::Storage` when a stored id already sits at `i64::MAX`.
    pub fn next_id(&self) -> Result<i64, Error> {
        let now = Utc::now().timestamp_millis();
        match self.memories.iter().map(|m| m.data.id).max() {
            Some(max_id) if max_id >= now => max_id.checked_add(1).ok_or_else(|| {
                Error::Storage(format!("Memory id space exhausted (largest id {max_id})"))
            }),
            _ => Ok(now),
        }
    }

    /// Encode as the persisted JSON document.
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Decode a persisted document.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

/// Trim tags, drop empty ones, and remove duplicates keeping the first occurrence.
pub fn normalize_topics(topics: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(topics.len());
    for topic in topics {
        let topic = topic.trim();
        if !topic.is_empty() && !out.iter().any(|t| t == topic) {
            out.push(topic.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, content: &str) -> MemoryRecord {
        MemoryRecord {
            data: MemoryData {
                id,
                content: content.to_string(),
                importance: 0.5,
                category: DEFAULT_CATEGORY.to_string(),
                topics: vec!["home".to_string()],
            },
            embedding: vec![0.1, 0.2, 0.3],
        }
    }

    #[test]
    fn test_record_serializes_flat() {
        let json = serde_json::to_value(record(7, "I live in Paris")).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["content"], "I live in Paris");
        assert_eq!(json["category"], "general");
        assert_eq!(json["topics"][0], "home");
        assert_eq!(json["embedding"].as_array().unwrap().len(), 3);
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_collection_uses_camel_case_keys() {
        let collection = MemoryCollection::empty();
        let json = serde_json::to_value(&collection).unwrap();
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("lastDeduplicatedAt").is_some());
        assert!(json["lastDeduplicatedAt"].is_null());
    }

    #[test]
    fn test_collection_round_trip() {
        let mut collection = MemoryCollection::empty();
        collection.memories.push(record(1, "first"));
        collection.memories.push(record(2, "second"));
        collection.last_deduplicated_at = Some(Utc::now());

        let bytes = collection.to_bytes().unwrap();
        let decoded = MemoryCollection::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, collection);
    }

    #[test]
    fn test_collection_accepts_snake_case_keys() {
        let doc = r#"{
            "memories": [],
            "updated_at": "2025-01-01T00:00:00Z",
            "last_deduplicated_at": "2025-01-02T00:00:00Z"
        }"#;
        let decoded = MemoryCollection::from_bytes(doc.as_bytes()).unwrap();
        assert!(decoded.is_empty());
        assert!(decoded.last_deduplicated_at.is_some());
    }

    #[test]
    fn test_corrupt_document_fails_to_decode() {
        assert!(MemoryCollection::from_bytes(b"{not json").is_err());
        assert!(MemoryCollection::from_bytes(br#"{"memories": 3}"#).is_err());
    }

    #[test]
    fn test_next_id_unique_when_clock_is_behind() {
        let mut collection = MemoryCollection::empty();
        let future = Utc::now().timestamp_millis() + 60_000;
        collection.memories.push(record(future, "from the future"));
        assert_eq!(collection.next_id().unwrap(), future + 1);
    }

    #[test]
    fn test_next_id_at_max_is_an_error() {
        let mut collection = MemoryCollection::empty();
        collection.memories.push(record(i64::MAX, "last id"));
        assert!(matches!(collection.next_id(), Err(Error::Storage(_))));
    }

    #[test]
    fn test_next_id_uses_clock_for_empty_collection() {
        let before = Utc::now().timestamp_millis();
        let id = MemoryCollection::empty().next_id().unwrap();
        assert!(id >= before);
    }

    #[test]
    fn test_dimensions() {
        let mut collection = MemoryCollection::empty();
        assert_eq!(collection.dimensions(), None);
        collection.memories.push(record(1, "x"));
        assert_eq!(collection.dimensions(), Some(3));
    }

    #[test]
    fn test_normalize_topics() {
        let topics = vec![
            " travel ".to_string(),
            "".to_string(),
            "food".to_string(),
            "travel".to_string(),
        ];
        assert_eq!(normalize_topics(&topics), vec!["travel", "food"]);
    }
}
