//! Sync event reporting through an injected observer collaborator
//!
//! The diff engine and executor do not persist logs themselves. They emit
//! structured events to an `Observer` constructed once at startup and passed
//! in explicitly; the production observer renders each event as a
//! human-readable line through `tracing`, whose subscriber owns
//! timestamping and durable append to the log file and console.

use parking_lot::Mutex;
use std::fmt;
use std::path::PathBuf;
use tracing::{info, warn};

/// One reportable event from a sync cycle
#[derive(Debug, Clone)]
pub enum SyncEvent {
    CycleStarted {
        source: PathBuf,
        destination: PathBuf,
    },
    FileMissing {
        path: PathBuf,
        size: u64,
    },
    FileChanged {
        source: PathBuf,
        source_size: u64,
        destination: PathBuf,
        destination_size: u64,
    },
    HashUnreadable {
        path: PathBuf,
        reason: String,
    },
    Copied {
        source: PathBuf,
        destination: PathBuf,
        elapsed_ms: u128,
    },
    CopyFailed {
        source: PathBuf,
        reason: String,
    },
    Deleted {
        path: PathBuf,
    },
    DeleteFailed {
        path: PathBuf,
        reason: String,
    },
    CycleCompleted {
        copied: usize,
        deleted: usize,
        failed: usize,
        elapsed_ms: u128,
    },
}

impl fmt::Display for SyncEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncEvent::CycleStarted {
                source,
                destination,
            } => write!(
                f,
                "Starting sync cycle: {} -> {}",
                source.display(),
                destination.display()
            ),
            SyncEvent::FileMissing { path, size } => {
                write!(f, "File is missing: {}, Size: {} bytes", path.display(), size)
            }
            SyncEvent::FileChanged {
                source,
                source_size,
                destination,
                destination_size,
            } => write!(
                f,
                "File differs: source {} ({} bytes), destination {} ({} bytes)",
                source.display(),
                source_size,
                destination.display(),
                destination_size
            ),
            SyncEvent::HashUnreadable { path, reason } => write!(
                f,
                "Cannot hash {}: {}, skipping comparison",
                path.display(),
                reason
            ),
            SyncEvent::Copied {
                source,
                destination,
                elapsed_ms,
            } => write!(
                f,
                "Copied: {} -> {} - {} ms",
                source.display(),
                destination.display(),
                elapsed_ms
            ),
            SyncEvent::CopyFailed { source, reason } => {
                write!(f, "Error copying {}: {}", source.display(), reason)
            }
            SyncEvent::Deleted { path } => write!(f, "Deleted: {}", path.display()),
            SyncEvent::DeleteFailed { path, reason } => {
                write!(f, "Error deleting {}: {}", path.display(), reason)
            }
            SyncEvent::CycleCompleted {
                copied,
                deleted,
                failed,
                elapsed_ms,
            } => write!(
                f,
                "Sync cycle completed: {} copied, {} deleted, {} failed - {} ms",
                copied, deleted, failed, elapsed_ms
            ),
        }
    }
}

/// Observer capability with a single `record` operation.
///
/// Implementations must tolerate calls from concurrent workers; event
/// ordering across workers is not guaranteed.
pub trait Observer: Send + Sync {
    fn record(&self, event: &SyncEvent);
}

/// Production observer: renders events as log lines through `tracing`
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn record(&self, event: &SyncEvent) {
        match event {
            SyncEvent::HashUnreadable { .. }
            | SyncEvent::CopyFailed { .. }
            | SyncEvent::DeleteFailed { .. } => warn!("{}", event),
            _ => info!("{}", event),
        }
    }
}

/// Collecting observer for tests and embedding
#[derive(Default)]
pub struct MemoryObserver {
    events: Mutex<Vec<SyncEvent>>,
}

impl MemoryObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all events recorded so far
    pub fn events(&self) -> Vec<SyncEvent> {
        self.events.lock().clone()
    }
}

impl Observer for MemoryObserver {
    fn record(&self, event: &SyncEvent) {
        self.events.lock().push(event.clone());
    }
}
