//! One sync cycle: index both roots, diff, execute
//!
//! The engine owns no state across cycles; every pass scans both trees
//! fresh. Scheduling (the fixed-interval loop) belongs to the caller.

use crate::config::DEFAULT_MAX_CONCURRENT;
use crate::diff::DiffEngine;
use crate::error::{ScanError, SyncError};
use crate::executor::SyncExecutor;
use crate::index::DirectoryIndex;
use crate::observe::{Observer, SyncEvent};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument};

/// Counts and timing for one completed cycle
#[derive(Debug, Clone, Copy)]
pub struct CycleSummary {
    pub source_files: usize,
    pub destination_files: usize,
    pub missing: usize,
    pub extra: usize,
    pub copied: usize,
    pub deleted: usize,
    pub failed: usize,
    pub elapsed_ms: u128,
}

/// Orchestrates index → diff → execute for one source/destination pair
pub struct SyncEngine {
    source_root: PathBuf,
    destination_root: PathBuf,
    max_concurrent: usize,
    observer: Arc<dyn Observer>,
}

impl SyncEngine {
    pub fn new(
        source_root: PathBuf,
        destination_root: PathBuf,
        observer: Arc<dyn Observer>,
    ) -> Self {
        Self {
            source_root,
            destination_root,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            observer,
        }
    }

    /// Bound on concurrently running hash/copy/delete tasks
    pub fn with_concurrency(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    /// Run one full index → diff → execute pass.
    ///
    /// The destination root is created if absent. A scan failure (source
    /// root vanished, unreadable subtree) is fatal for the cycle and
    /// propagates; the caller's schedule is the retry mechanism. Copy and
    /// delete failures never fail the cycle — they are reported per action
    /// and show up in the summary's `failed` count.
    #[instrument(skip(self), fields(source = %self.source_root.display(), destination = %self.destination_root.display()))]
    pub async fn run_cycle(&self) -> Result<CycleSummary, SyncError> {
        let start = Instant::now();
        self.observer.record(&SyncEvent::CycleStarted {
            source: self.source_root.clone(),
            destination: self.destination_root.clone(),
        });

        tokio::fs::create_dir_all(&self.destination_root)
            .await
            .map_err(ScanError::Io)?;

        // Disjoint roots: both scans run concurrently
        let source_root = self.source_root.clone();
        let destination_root = self.destination_root.clone();
        let (source_index, destination_index) = tokio::try_join!(
            tokio::task::spawn_blocking(move || DirectoryIndex::scan(&source_root)),
            tokio::task::spawn_blocking(move || DirectoryIndex::scan(&destination_root)),
        )
        .map_err(|e| SyncError::Join(e.to_string()))?;
        let source_index = source_index?;
        let destination_index = destination_index?;

        info!(
            source_files = source_index.len(),
            destination_files = destination_index.len(),
            "Indexed both trees"
        );

        let diff = DiffEngine::with_concurrency(Arc::clone(&self.observer), self.max_concurrent)
            .diff(&source_index, &destination_index, &self.destination_root)
            .await;
        let missing = diff.missing.len();
        let extra = diff.extra.len();

        let report = SyncExecutor::with_concurrency(Arc::clone(&self.observer), self.max_concurrent)
            .execute(diff)
            .await;

        let elapsed_ms = start.elapsed().as_millis();
        self.observer.record(&SyncEvent::CycleCompleted {
            copied: report.copied,
            deleted: report.deleted,
            failed: report.failed,
            elapsed_ms,
        });

        Ok(CycleSummary {
            source_files: source_index.len(),
            destination_files: destination_index.len(),
            missing,
            extra,
            copied: report.copied,
            deleted: report.deleted,
            failed: report.failed,
            elapsed_ms,
        })
    }
}
