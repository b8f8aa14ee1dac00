//! Error types for the directory synchronization engine.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while scanning a tree or hashing file content
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Root path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Scan I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Cycle- and startup-level errors
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Scan failed: {0}")]
    Scan(#[from] ScanError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Worker task failed: {0}")]
    Join(String),
}

impl From<config::ConfigError> for SyncError {
    fn from(err: config::ConfigError) -> Self {
        SyncError::Config(err.to_string())
    }
}
