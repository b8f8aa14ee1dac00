//! Executes a diff result: parallel copies and deletions
//!
//! Every action is attempted independently. A failed copy or delete is
//! reported through the observer and skipped; the next cycle's diff
//! reproduces the action, so the interval-based re-run is the only retry
//! mechanism. There is no rollback of a partially applied diff.

use crate::config::DEFAULT_MAX_CONCURRENT;
use crate::diff::{CopyItem, DiffResult};
use crate::observe::{Observer, SyncEvent};
use futures::stream::{FuturesUnordered, StreamExt};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::warn;

/// Per-cycle action tallies
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    pub copied: usize,
    pub deleted: usize,
    pub failed: usize,
}

enum ActionOutcome {
    Copied,
    Deleted,
    Failed,
}

/// Applies copy and delete actions from a diff
pub struct SyncExecutor {
    max_concurrent: usize,
    observer: Arc<dyn Observer>,
}

impl SyncExecutor {
    pub fn new(observer: Arc<dyn Observer>) -> Self {
        Self {
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            observer,
        }
    }

    pub fn with_concurrency(observer: Arc<dyn Observer>, max_concurrent: usize) -> Self {
        Self {
            max_concurrent: max_concurrent.max(1),
            observer,
        }
    }

    /// Apply the diff: copy every missing item, delete every extra path.
    ///
    /// One bounded task per action; the copy and delete passes run
    /// concurrently with no ordering between them. Copies overwrite an
    /// existing destination file.
    pub async fn execute(&self, diff: DiffResult) -> SyncReport {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let mut tasks = FuturesUnordered::new();

        for item in diff.missing {
            let semaphore = Arc::clone(&semaphore);
            let observer = Arc::clone(&self.observer);
            tasks.push(tokio::spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => return ActionOutcome::Failed,
                };
                copy_file(&item, observer.as_ref()).await
            }));
        }

        for path in diff.extra {
            let semaphore = Arc::clone(&semaphore);
            let observer = Arc::clone(&self.observer);
            tasks.push(tokio::spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => return ActionOutcome::Failed,
                };
                delete_file(&path, observer.as_ref()).await
            }));
        }

        let mut report = SyncReport::default();
        while let Some(joined) = tasks.next().await {
            match joined {
                Ok(ActionOutcome::Copied) => report.copied += 1,
                Ok(ActionOutcome::Deleted) => report.deleted += 1,
                Ok(ActionOutcome::Failed) => report.failed += 1,
                Err(e) => {
                    warn!("Sync task aborted: {}", e);
                    report.failed += 1;
                }
            }
        }

        report
    }
}

async fn copy_file(item: &CopyItem, observer: &dyn Observer) -> ActionOutcome {
    let start = Instant::now();

    if let Some(parent) = item.destination.parent() {
        if let Err(e) = tokio::fs::create_dir_all(parent).await {
            observer.record(&SyncEvent::CopyFailed {
                source: item.source.clone(),
                reason: e.to_string(),
            });
            return ActionOutcome::Failed;
        }
    }

    match tokio::fs::copy(&item.source, &item.destination).await {
        Ok(_) => {
            observer.record(&SyncEvent::Copied {
                source: item.source.clone(),
                destination: item.destination.clone(),
                elapsed_ms: start.elapsed().as_millis(),
            });
            ActionOutcome::Copied
        }
        Err(e) => {
            observer.record(&SyncEvent::CopyFailed {
                source: item.source.clone(),
                reason: e.to_string(),
            });
            ActionOutcome::Failed
        }
    }
}

async fn delete_file(path: &Path, observer: &dyn Observer) -> ActionOutcome {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {
            observer.record(&SyncEvent::Deleted {
                path: path.to_path_buf(),
            });
            ActionOutcome::Deleted
        }
        Err(e) => {
            observer.record(&SyncEvent::DeleteFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            });
            ActionOutcome::Failed
        }
    }
}
