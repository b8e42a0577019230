//! Configuration for dsync
//!
//! Typed settings with serde defaults and optional YAML file loading.
//! CLI flags override whatever the file provides; the engine only ever
//! sees the resolved [`SyncConfig`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum upload chunk size: one content-hash block
///
/// Session appends smaller than this buy nothing and multiply round
/// trips, so config validation clamps up to it.
pub const MIN_CHUNK_SIZE_MB: u64 = 4;

/// Default upload chunk size in MiB (the provider allows up to 150 MiB
/// per session request)
pub const DEFAULT_CHUNK_SIZE_MB: u64 = 150;

/// Default number of concurrent per-file transfer tasks
pub const DEFAULT_MAX_CONCURRENT: u32 = 4;

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path to the offending file
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid YAML for this schema
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        /// Path to the offending file
        path: String,
        /// Underlying parse error
        #[source]
        source: serde_yaml::Error,
    },

    /// A setting failed validation
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Resolved settings for one synchronization run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Remote destination folder name; defaults to the local root's
    /// base name when absent
    #[serde(default)]
    pub destination: Option<String>,

    /// Upload chunk size in MiB; files at or above this size use the
    /// chunked session protocol
    #[serde(default = "default_chunk_size_mb")]
    pub chunk_size_mb: u64,

    /// Maximum number of files transferred concurrently
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: u32,

    /// Optional path to the ignore file (one segment per line)
    #[serde(default)]
    pub ignore_file: Option<PathBuf>,
}

fn default_chunk_size_mb() -> u64 {
    DEFAULT_CHUNK_SIZE_MB
}

fn default_max_concurrent() -> u32 {
    DEFAULT_MAX_CONCURRENT
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            destination: None,
            chunk_size_mb: DEFAULT_CHUNK_SIZE_MB,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            ignore_file: None,
        }
    }
}

impl SyncConfig {
    /// Loads configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks settings for internally consistent values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size_mb == 0 {
            return Err(ConfigError::Invalid(
                "chunk_size_mb must be greater than zero".to_string(),
            ));
        }
        if self.max_concurrent == 0 {
            return Err(ConfigError::Invalid(
                "max_concurrent must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Upload chunk size in bytes, clamped to the 4 MiB floor
    #[must_use]
    pub fn chunk_size_bytes(&self) -> u64 {
        self.chunk_size_mb.max(MIN_CHUNK_SIZE_MB) * 1024 * 1024
    }
}
