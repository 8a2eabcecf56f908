//! JSON response types and human-readable formatting for CLI output.

use serde::Serialize;

use longmem::{MemoryData, ScoredMemory};

/// Response for a stored memory.
#[derive(Serialize)]
pub struct StoreResponse {
    pub status: String,
    pub message: String,
}

/// Response for search results.
#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<ScoredMemory>,
}

/// Response for listing memories.
#[derive(Serialize)]
pub struct ListResponse {
    pub memories: Vec<MemoryData>,
}

/// Response for a forced deduplication pass.
#[derive(Serialize)]
pub struct DedupResponse {
    pub status: String,
    pub removed: usize,
}

/// Response for deleting every memory.
#[derive(Serialize)]
pub struct DeleteResponse {
    pub status: String,
    pub message: String,
}

/// Response for errors.
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Print a value as formatted JSON to stdout.
pub fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Failed to serialize JSON: {}", e);
            std::process::exit(1);
        }
    }
}

/// Markdown transcript of search hits, numbered from 1.
///
/// An empty result renders as `No memories found.`.
pub fn format_search_results(memories: &[MemoryData]) -> String {
    if memories.is_empty() {
        return "No memories found.".to_string();
    }

    let mut lines = Vec::with_capacity(memories.len() * 5);
    for (i, memory) in memories.iter().enumerate() {
        lines.push(format!("### Memory {}", i + 1));
        lines.push(format!("- **Content:** {}", memory.content));
        lines.push(format!("- **Category:** {}", memory.category));
        if !memory.topics.is_empty() {
            lines.push(format!("- **Topics:** {}", memory.topics.join(", ")));
        }
        lines.push(String::new());
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory(content: &str, topics: &[&str]) -> MemoryData {
        MemoryData {
            id: 1,
            content: content.to_string(),
            importance: 0.9,
            category: "personal_info".to_string(),
            topics: topics.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn test_format_no_results() {
        assert_eq!(format_search_results(&[]), "No memories found.");
    }

    #[test]
    fn test_format_numbered_transcript() {
        let text = format_search_results(&[
            memory("I live in Paris", &["home", "travel"]),
            memory("Works as an engineer", &[]),
        ]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "### Memory 1");
        assert_eq!(lines[1], "- **Content:** I live in Paris");
        assert_eq!(lines[2], "- **Category:** personal_info");
        assert_eq!(lines[3], "- **Topics:** home, travel");
        assert_eq!(lines[5], "### Memory 2");
        assert!(!text.contains("- **Topics:** \n"));
    }

    #[test]
    fn test_serialize_search_response() {
        let response = SearchResponse {
            query: "where do I live".to_string(),
            results: vec![ScoredMemory {
                memory: memory("I live in Paris", &[]),
                similarity: 0.5,
            }],
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["results"][0]["content"], "I live in Paris");
        assert_eq!(json["results"][0]["similarity"], 0.5);
        assert!(json["results"][0].get("embedding").is_none());
    }

    #[test]
    fn test_serialize_dedup_response() {
        let response = DedupResponse {
            status: "deduplicated".to_string(),
            removed: 3,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"removed\":3"));
    }

    #[test]
    fn test_serialize_error_response() {
        let response = ErrorResponse {
            error: "Empty input".to_string(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"error":"Empty input"}"#);
    }
}
