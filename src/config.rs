//! Configuration loading with file, environment, and CLI precedence
//!
//! Tunables load from an optional TOML file with `DIRSYNC_*` environment
//! overrides; the binary applies CLI arguments on top, so precedence is
//! CLI > environment > file > defaults.

use crate::error::SyncError;
use crate::logging::LoggingConfig;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Interval used when the configured one is missing or non-positive
pub const DEFAULT_INTERVAL_SECS: u64 = 5;

/// Default bound on concurrently running hash/copy/delete tasks
pub const DEFAULT_MAX_CONCURRENT: usize = 8;

/// Full runtime configuration for the sync daemon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Source tree root; must exist at startup
    #[serde(default)]
    pub source: PathBuf,

    /// Destination tree root; created if absent
    #[serde(default)]
    pub destination: PathBuf,

    /// Seconds between the end of one cycle and the start of the next
    #[serde(default = "default_interval")]
    pub interval_secs: u64,

    /// Bound on concurrently running hash/copy/delete tasks
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_interval() -> u64 {
    DEFAULT_INTERVAL_SECS
}

fn default_max_concurrent() -> usize {
    DEFAULT_MAX_CONCURRENT
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::new(),
            destination: PathBuf::new(),
            interval_secs: default_interval(),
            max_concurrent: default_max_concurrent(),
            logging: LoggingConfig::default(),
        }
    }
}

impl SyncConfig {
    /// Load from an optional TOML file plus `DIRSYNC_*` environment overrides.
    ///
    /// Nested keys use a double underscore in the environment, e.g.
    /// `DIRSYNC_LOGGING__LEVEL=debug`.
    pub fn load(path: Option<&Path>) -> Result<Self, SyncError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path.to_path_buf()));
        }
        let cfg = builder
            .add_source(
                Environment::with_prefix("DIRSYNC")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Ok(cfg.try_deserialize()?)
    }

    /// Validate before the first cycle. Bad paths are fatal at startup, not
    /// per cycle.
    pub fn validate(&self) -> Result<(), SyncError> {
        if self.source.as_os_str().is_empty() {
            return Err(SyncError::Config("source folder path is empty".to_string()));
        }
        if !self.source.exists() {
            return Err(SyncError::Config(format!(
                "source folder does not exist: {}",
                self.source.display()
            )));
        }
        if self.destination.as_os_str().is_empty() {
            return Err(SyncError::Config(
                "destination folder path is empty".to_string(),
            ));
        }
        if self.interval_secs == 0 {
            return Err(SyncError::Config(
                "interval must be a positive number of seconds".to_string(),
            ));
        }
        if self.max_concurrent == 0 {
            return Err(SyncError::Config(
                "max_concurrent must be at least 1".to_string(),
            ));
        }
        if let Some(file) = &self.logging.file {
            if file.as_os_str().is_empty() {
                return Err(SyncError::Config("log file path is empty".to_string()));
            }
        }
        Ok(())
    }
}

/// Clamp a possibly non-positive CLI interval to the default.
///
/// Non-positive intervals fall back to the default rather than failing
/// startup.
pub fn normalize_interval(raw: i64) -> u64 {
    if raw <= 0 {
        DEFAULT_INTERVAL_SECS
    } else {
        raw as u64
    }
}
