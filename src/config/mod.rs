//! Configuration system for longmem.

mod env_parser;
mod loader;
mod overrides;
mod paths;
mod validation;

#[cfg(test)]
pub(crate) mod tests_utils;

use crate::errors::Error;
use serde::Deserialize;
use std::path::PathBuf;

pub use loader::ConfigFile;

/// Where memory documents are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// One JSON file per user under `storage_root`.
    Filesystem,
    /// One row per user in the SQLite database at `database_path`.
    Sqlite,
    /// Process-local, nothing survives exit.
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "filesystem" | "fs" => Ok(Self::Filesystem),
            "sqlite" => Ok(Self::Sqlite),
            "memory" => Ok(Self::Memory),
            other => Err(Error::Config(format!(
                "Unknown storage backend: {other} (expected filesystem, sqlite or memory)"
            ))),
        }
    }
}

/// Configuration values with priority: defaults < config file < env vars.
#[derive(Debug, Clone)]
pub struct Config {
    /// Storage backend for memory documents.
    pub storage_backend: StorageBackend,

    /// Root directory for the filesystem backend.
    pub storage_root: PathBuf,

    /// Path to the SQLite database for the sqlite backend.
    pub database_path: PathBuf,

    /// HuggingFace embedding model identifier.
    pub embedding_model: String,

    /// Directory for caching ONNX models.
    pub model_cache: PathBuf,

    /// Cosine similarity above which two memories count as duplicates.
    pub dedup_threshold: f64,

    /// Deduplication only runs on collections larger than this.
    pub dedup_min_memories: usize,

    /// Minimum hours between two automatic deduplication passes.
    pub dedup_interval_hours: i64,

    /// Nearest neighbors examined per memory during deduplication.
    pub dedup_neighbor_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        // Use home directory with sensible fallback for systems without HOME
        let home = dirs::home_dir().unwrap_or_else(|| {
            std::env::var("HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("."))
        });
        let longmem_dir = home.join(".longmem");

        Self {
            storage_backend: StorageBackend::Filesystem,
            storage_root: longmem_dir.join("store"),
            database_path: longmem_dir.join("memories.db"),
            embedding_model: "BAAI/bge-small-en-v1.5".to_string(),
            model_cache: longmem_dir.join("models"),
            dedup_threshold: 0.75,
            dedup_min_memories: 10,
            dedup_interval_hours: 24,
            dedup_neighbor_limit: 20,
        }
    }
}

impl Config {
    /// Load configuration with defaults, file values, and environment overrides.
    pub fn load() -> Result<Self, Error> {
        let file_config = loader::load_from_file()?;

        let mut config = Config::default();

        if let Some(mut file) = file_config {
            if let Some(path) = file.storage_root.as_mut() {
                paths::expand_tilde(path);
            }
            if let Some(path) = file.database_path.as_mut() {
                paths::expand_tilde(path);
            }
            if let Some(path) = file.model_cache.as_mut() {
                paths::expand_tilde(path);
            }
            config.merge_from_file(file);
        }

        overrides::apply_env_overrides(&mut config)?;

        config.validate()?;

        Ok(config)
    }

    /// Merge configuration from a file into this config.
    fn merge_from_file(&mut self, file: ConfigFile) {
        if let Some(backend) = file.storage_backend {
            self.storage_backend = backend;
        }
        if let Some(path) = file.storage_root.filter(|p| !p.as_os_str().is_empty()) {
            self.storage_root = path;
        }
        if let Some(path) = file.database_path.filter(|p| !p.as_os_str().is_empty()) {
            self.database_path = path;
        }
        if let Some(model) = file.embedding_model.filter(|m| !m.is_empty()) {
            self.embedding_model = model;
        }
        if let Some(path) = file.model_cache.filter(|p| !p.as_os_str().is_empty()) {
            self.model_cache = path;
        }
        if let Some(threshold) = file.dedup_threshold {
            self.dedup_threshold = threshold;
        }
        if let Some(min) = file.dedup_min_memories {
            self.dedup_min_memories = min;
        }
        if let Some(hours) = file.dedup_interval_hours {
            self.dedup_interval_hours = hours;
        }
        if let Some(limit) = file.dedup_neighbor_limit {
            self.dedup_neighbor_limit = limit;
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), Error> {
        validation::ConfigValidator { config: self }.validate()
    }

    /// Ensure the directories the selected backend and model cache write to exist.
    pub fn ensure_directories(&self) -> Result<(), Error> {
        let storage_dir = match self.storage_backend {
            StorageBackend::Filesystem => Some(self.storage_root.as_path()),
            StorageBackend::Sqlite => self.database_path.parent(),
            StorageBackend::Memory => None,
        };

        if let Some(dir) = storage_dir.filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|e| {
                Error::Config(format!(
                    "Failed to create storage directory {}: {e}",
                    dir.display()
                ))
            })?;
        }

        if !self.model_cache.as_os_str().is_empty() {
            std::fs::create_dir_all(&self.model_cache).map_err(|e| {
                Error::Config(format!(
                    "Failed to create model cache directory {}: {e}",
                    self.model_cache.display()
                ))
            })?;
        }

        Ok(())
    }
}
