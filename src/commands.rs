//! Command handlers for the longmem CLI.

use crate::output::*;
use longmem::{Error, MemoryStore, DEFAULT_TOP_K};
use std::process::ExitCode;

/// Commands supported by longmem CLI.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Remember a fact
    Store {
        /// Memory text content
        content: String,

        /// Retention priority between 0 and 1
        #[arg(short = 'i', long, default_value = "0.5")]
        importance: f64,

        /// Short label for the memory
        #[arg(short = 'c', long, default_value = "general")]
        category: String,

        /// Tag to attach (repeatable)
        #[arg(short = 't', long = "topic")]
        topics: Vec<String>,
    },
    /// Find memories related to a query
    Search {
        /// Search query text
        query: String,

        /// Maximum number of results (1 to 20)
        #[arg(short = 'k', long, default_value_t = DEFAULT_TOP_K)]
        top_k: usize,
    },
    /// Show every stored memory
    List,
    /// Remove near-duplicate memories now
    Dedup,
    /// Delete every stored memory
    DeleteAll,
    /// Print version information
    Version,
}

/// Execute a CLI command.
pub fn execute(
    command: &Commands,
    store: &mut MemoryStore,
    identity: &str,
    json: bool,
) -> Result<ExitCode, Error> {
    match command {
        Commands::Store {
            content,
            importance,
            category,
            topics,
        } => handle_store(store, identity, content, *importance, category, topics, json),
        Commands::Search { query, top_k } => handle_search(store, identity, query, *top_k, json),
        Commands::List => handle_list(store, identity, json),
        Commands::Dedup => handle_dedup(store, identity, json),
        Commands::DeleteAll => handle_delete_all(store, identity, json),
        Commands::Version => handle_version(json),
    }
}

fn handle_store(
    store: &mut MemoryStore,
    identity: &str,
    content: &str,
    importance: f64,
    category: &str,
    topics: &[String],
    json: bool,
) -> Result<ExitCode, Error> {
    let message = store.add(identity, content, importance, category, topics)?;
    if json {
        print_json(&StoreResponse {
            status: "stored".to_string(),
            message,
        });
    } else {
        println!("{}", message);
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_search(
    store: &mut MemoryStore,
    identity: &str,
    query: &str,
    top_k: usize,
    json: bool,
) -> Result<ExitCode, Error> {
    let results = store.search_scored(identity, query, top_k)?;
    if json {
        print_json(&SearchResponse {
            query: query.to_string(),
            results,
        });
    } else {
        let memories: Vec<_> = results.into_iter().map(|hit| hit.memory).collect();
        println!("## Search query: {}\n", query);
        println!("{}", format_search_results(&memories));
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_list(store: &mut MemoryStore, identity: &str, json: bool) -> Result<ExitCode, Error> {
    let memories = store.list(identity)?;
    if json {
        print_json(&ListResponse { memories });
    } else if memories.is_empty() {
        println!("No memories found.");
    } else {
        for memory in memories {
            println!(
                "{} [{}, importance {:.2}]\n  {}\n",
                memory.id, memory.category, memory.importance, memory.content
            );
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_dedup(store: &mut MemoryStore, identity: &str, json: bool) -> Result<ExitCode, Error> {
    let removed = store.deduplicate(identity)?;
    if json {
        print_json(&DedupResponse {
            status: "deduplicated".to_string(),
            removed,
        });
    } else {
        println!("Removed {} duplicate memory/memories", removed);
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_delete_all(
    store: &mut MemoryStore,
    identity: &str,
    json: bool,
) -> Result<ExitCode, Error> {
    let message = store.delete_all(identity)?;
    if json {
        print_json(&DeleteResponse {
            status: "deleted".to_string(),
            message,
        });
    } else {
        println!("{}", message);
    }
    Ok(ExitCode::SUCCESS)
}

pub fn handle_version(json: bool) -> Result<ExitCode, Error> {
    if json {
        print_json(&serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "name": env!("CARGO_PKG_NAME")
        }));
    } else {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    }
    Ok(ExitCode::SUCCESS)
}
