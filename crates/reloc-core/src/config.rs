//! Relocation run configuration
//!
//! Loaded from a TOML file; every key is optional:
//!
//! ```toml
//! table = "migrations.csv"
//! collision_policy = "first-wins"
//! workers = 4
//! cache_capacity = 16
//! ```

use crate::error::ConfigError;
use reloc_index::CollisionPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Relocation configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RelocConfig {
    /// Migration table (CSV) to load
    pub table: Option<PathBuf>,
    /// How duplicate (coordinate, version pattern) records are handled
    pub collision_policy: CollisionPolicy,
    /// Worker threads for relocation passes (1 runs inline)
    pub workers: usize,
    /// Maximum number of built indexes kept in memory
    pub cache_capacity: u64,
}

impl Default for RelocConfig {
    fn default() -> Self {
        Self {
            table: None,
            collision_policy: CollisionPolicy::default(),
            workers: 1,
            cache_capacity: 16,
        }
    }
}

impl RelocConfig {
    /// Parse configuration from TOML text
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] on bad TOML or unknown keys, and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    ///
    /// A relative `table` path is resolved against the file's directory.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = Self::from_toml_str(&text)?;
        if let (Some(table), Some(dir)) = (config.table.as_mut(), path.parent()) {
            if table.is_relative() {
                *table = dir.join(&*table);
            }
        }

        tracing::debug!(path = %path.display(), ?config, "loaded configuration");
        Ok(config)
    }

    /// Set migration table path
    #[must_use]
    pub fn with_table(mut self, table: impl Into<PathBuf>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Set collision policy
    #[must_use]
    pub fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.collision_policy = policy;
        self
    }

    /// Set worker count
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set index cache capacity
    #[must_use]
    pub fn with_cache_capacity(mut self, capacity: u64) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Check value ranges
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] naming the first bad key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::Invalid {
                key: "workers",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.cache_capacity == 0 {
            return Err(ConfigError::Invalid {
                key: "cache_capacity",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
