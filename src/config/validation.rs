//! Configuration validation logic.

use crate::errors::Error;

use super::{Config, StorageBackend};

/// Validates configuration values.
pub struct ConfigValidator<'a> {
    pub config: &'a Config,
}

impl ConfigValidator<'_> {
    /// Validate all configuration values for correctness and constraints.
    ///
    /// Checks that:
    /// - Dedup threshold is finite and between 0.0 and 1.0
    /// - Dedup interval is positive and neighbor limit is non-zero
    /// - Embedding model is not empty
    /// - The path used by the selected storage backend is not empty
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if any validation check fails.
    pub fn validate(&self) -> Result<(), Error> {
        self.validate_dedup_threshold()?;
        self.validate_dedup_schedule()?;
        self.validate_embedding_model()?;
        self.validate_storage_paths()?;

        Ok(())
    }

    fn validate_dedup_threshold(&self) -> Result<(), Error> {
        let threshold = self.config.dedup_threshold;
        if !threshold.is_finite() {
            return Err(Error::Config(
                "Invalid dedup threshold: NaN and infinity are not allowed".into(),
            ));
        }

        if !(0.0..=1.0).contains(&threshold) {
            return Err(Error::Config(format!(
                "Invalid dedup threshold: {} (must be between 0.0 and 1.0)",
                threshold
            )));
        }

        Ok(())
    }

    fn validate_dedup_schedule(&self) -> Result<(), Error> {
        if self.config.dedup_interval_hours <= 0 {
            return Err(Error::Config(format!(
                "Invalid dedup interval: {} hours (must be positive)",
                self.config.dedup_interval_hours
            )));
        }

        if self.config.dedup_neighbor_limit == 0 {
            return Err(Error::Config(
                "Dedup neighbor limit must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    fn validate_embedding_model(&self) -> Result<(), Error> {
        if self.config.embedding_model.trim().is_empty() {
            return Err(Error::Config("Embedding model cannot be empty".to_string()));
        }

        Ok(())
    }

    fn validate_storage_paths(&self) -> Result<(), Error> {
        match self.config.storage_backend {
            StorageBackend::Filesystem if self.config.storage_root.as_os_str().is_empty() => {
                Err(Error::Config("Storage root cannot be empty".to_string()))
            }
            StorageBackend::Sqlite if self.config.database_path.as_os_str().is_empty() => {
                Err(Error::Config("Database path cannot be empty".to_string()))
            }
            _ => Ok(()),
        }
    }
}
