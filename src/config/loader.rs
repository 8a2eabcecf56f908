//! Configuration file loading and parsing.

use crate::errors::Error;
use serde::Deserialize;
use std::path::PathBuf;

use super::StorageBackend;

/// Configuration loaded from TOML file. Absent keys keep the defaults.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub storage_backend: Option<StorageBackend>,

    #[serde(default)]
    pub storage_root: Option<PathBuf>,

    #[serde(default)]
    pub database_path: Option<PathBuf>,

    #[serde(default)]
    pub embedding_model: Option<String>,

    #[serde(default)]
    pub model_cache: Option<PathBuf>,

    #[serde(default)]
    pub dedup_threshold: Option<f64>,

    #[serde(default)]
    pub dedup_min_memories: Option<usize>,

    #[serde(default)]
    pub dedup_interval_hours: Option<i64>,

    #[serde(default)]
    pub dedup_neighbor_limit: Option<usize>,
}

/// Load configuration from `<config dir>/longmem/config.toml`, if present.
pub fn load_from_file() -> Result<Option<ConfigFile>, Error> {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    let config_dir = dirs::config_dir().unwrap_or_else(|| home.join(".config"));

    let config_path = config_dir.join("longmem/config.toml");

    if config_path.exists() {
        let content = std::fs::read_to_string(&config_path).map_err(|e| {
            Error::Config(format!(
                "Failed to read config file {}: {e}",
                config_path.display()
            ))
        })?;

        let config: ConfigFile = toml::from_str(&content).map_err(|e| {
            Error::Config(format!(
                "Failed to parse config file {}: {e}",
                config_path.display()
            ))
        })?;

        tracing::debug!(path = %config_path.display(), "loaded config file");
        Ok(Some(config))
    } else {
        Ok(None)
    }
}
