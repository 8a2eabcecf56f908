//! Environment variable overrides for configuration.

use crate::errors::Error;

use super::env_parser::{apply_override, parse_env_path, parse_env_string, parse_env_value};
use super::Config;

/// Apply `LONGMEM_*` environment variable overrides to configuration.
pub fn apply_env_overrides(config: &mut Config) -> Result<(), Error> {
    apply_override(
        "LONGMEM_STORAGE_BACKEND",
        &mut config.storage_backend,
        parse_env_value,
    )?;
    apply_override("LONGMEM_STORAGE_ROOT", &mut config.storage_root, parse_env_path)?;
    apply_override("LONGMEM_DATABASE_PATH", &mut config.database_path, parse_env_path)?;
    apply_override(
        "LONGMEM_EMBEDDING_MODEL",
        &mut config.embedding_model,
        parse_env_string,
    )?;
    apply_override("LONGMEM_MODEL_CACHE", &mut config.model_cache, parse_env_path)?;
    apply_override(
        "LONGMEM_DEDUP_THRESHOLD",
        &mut config.dedup_threshold,
        parse_env_value,
    )?;
    apply_override(
        "LONGMEM_DEDUP_MIN_MEMORIES",
        &mut config.dedup_min_memories,
        parse_env_value,
    )?;
    apply_override(
        "LONGMEM_DEDUP_INTERVAL_HOURS",
        &mut config.dedup_interval_hours,
        parse_env_value,
    )?;
    apply_override(
        "LONGMEM_DEDUP_NEIGHBOR_LIMIT",
        &mut config.dedup_neighbor_limit,
        parse_env_value,
    )?;
    Ok(())
}
