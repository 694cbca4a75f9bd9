//! Configuration for a `tripledb-core` store.
//!
//! Layered the way the teacher's `VelesConfig` is: defaults < TOML file <
//! `TRIPLEDB_*` environment variables.
//!
//! # Priority (highest to lowest)
//!
//! 1. Environment variables (`TRIPLEDB_*`)
//! 2. Configuration file (`tripledb.toml`)
//! 3. Default values

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Error;

/// Storage configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory under which `nodes.db`, `triples.db`, their indices, and
    /// per-model files are created.
    pub data_dir: PathBuf,
    /// When true, nothing is written to disk: the node store, triple store
    /// and named models all behave as if anonymous. Useful for tests and
    /// short-lived embeddings.
    pub in_memory_only: bool,
    /// Number of add/remove operations a model index log accumulates
    /// before it is compacted into a fresh sorted snapshot.
    pub model_log_compaction_threshold: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            in_memory_only: false,
            model_log_compaction_threshold: 4096,
        }
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Root configuration structure for `tripledb-core`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl Config {
    /// Loads configuration from `tripledb.toml` in the current directory,
    /// if present, layered under environment variables and over defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but fails to parse.
    pub fn load() -> Result<Self, Error> {
        Self::load_from_path("tripledb.toml")
    }

    /// Loads configuration from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but fails to parse.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("TRIPLEDB_").split("_").lowercase(false));

        figment
            .extract()
            .map_err(|e| Error::Config(e.to_string()))
    }

    /// Validates the configuration, rejecting values that would make the
    /// store unusable.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid field encountered.
    pub fn validate(&self) -> Result<(), Error> {
        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(Error::Config(format!(
                "logging.level '{}' is invalid, expected one of: {:?}",
                self.logging.level, valid_levels
            )));
        }
        if self.storage.model_log_compaction_threshold == 0 {
            return Err(Error::Config(
                "storage.model_log_compaction_threshold must be nonzero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
