//! Content-addressed diff between two directory indexes
//!
//! Determines which files must be copied (new or content-changed in the
//! source) and which must be deleted (present only in the destination).
//! Equality is defined purely by content digest: files that differ only in
//! timestamps or permissions are considered identical.

use crate::config::DEFAULT_MAX_CONCURRENT;
use crate::hash;
use crate::index::DirectoryIndex;
use crate::observe::{Observer, SyncEvent};
use crate::types::{short_hex, Digest};
use futures::stream::{FuturesUnordered, StreamExt};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

/// One pending copy: source file to destination location
#[derive(Debug, Clone)]
pub struct CopyItem {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub size: u64,
}

/// Actions needed to make the destination match the source
///
/// Built once per cycle, read-only afterwards, consumed by the executor.
/// Entry order reflects task completion and carries no meaning.
#[derive(Debug, Default)]
pub struct DiffResult {
    /// Files to copy: absent from the destination or content-changed
    pub missing: Vec<CopyItem>,
    /// Destination files with no source counterpart
    pub extra: Vec<PathBuf>,
}

impl DiffResult {
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.extra.is_empty()
    }
}

/// Computes copy and delete candidates by content digest
pub struct DiffEngine {
    max_concurrent: usize,
    observer: Arc<dyn Observer>,
}

impl DiffEngine {
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

    /// Compare the two indexes and produce the action set.
    ///
    /// Fans out one task per key on each side onto the runtime, bounded by a
    /// semaphore sized to the configured I/O parallelism. The missing and
    /// extra passes run concurrently and append to shared result vectors in
    /// no particular order.
    ///
    /// A pair that cannot be hashed is reported through the observer and
    /// treated as unchanged, so a permanently unreadable file warns every
    /// cycle instead of re-copying forever.
    pub async fn diff(
        &self,
        source: &DirectoryIndex,
        dest: &DirectoryIndex,
        dest_root: &Path,
    ) -> DiffResult {
        let missing = Arc::new(Mutex::new(Vec::new()));
        let extra = Arc::new(Mutex::new(Vec::new()));
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let mut tasks = FuturesUnordered::new();

        // Missing pass: one task per source key
        for entry in source.entries() {
            let entry = entry.clone();
            let dest_entry = dest.get(&entry.key).cloned();
            let dest_path = dest_root.join(&entry.key);
            let missing = Arc::clone(&missing);
            let semaphore = Arc::clone(&semaphore);
            let observer = Arc::clone(&self.observer);

            tasks.push(tokio::spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => return, // semaphore is never closed
                };

                match dest_entry {
                    None => {
                        observer.record(&SyncEvent::FileMissing {
                            path: entry.path.clone(),
                            size: entry.size,
                        });
                        missing.lock().push(CopyItem {
                            source: entry.path,
                            destination: dest_path,
                            size: entry.size,
                        });
                    }
                    Some(dest_entry) => {
                        match content_digests(&entry.path, &dest_entry.path).await {
                            Ok((src_digest, dst_digest)) if src_digest == dst_digest => {
                                debug!(key = %entry.key, digest = %short_hex(&src_digest), "Content identical");
                            }
                            Ok((src_digest, dst_digest)) => {
                                debug!(
                                    key = %entry.key,
                                    source_digest = %short_hex(&src_digest),
                                    destination_digest = %short_hex(&dst_digest),
                                    "Content differs"
                                );
                                observer.record(&SyncEvent::FileChanged {
                                    source: entry.path.clone(),
                                    source_size: entry.size,
                                    destination: dest_entry.path.clone(),
                                    destination_size: dest_entry.size,
                                });
                                missing.lock().push(CopyItem {
                                    source: entry.path,
                                    destination: dest_entry.path,
                                    size: entry.size,
                                });
                            }
                            Err((path, e)) => {
                                observer.record(&SyncEvent::HashUnreadable {
                                    path,
                                    reason: e.to_string(),
                                });
                            }
                        }
                    }
                }
            }));
        }

        // Extra pass: one task per destination key, concurrent with the
        // missing pass
        for entry in dest.entries() {
            let key_present = source.contains_key(&entry.key);
            let path = entry.path.clone();
            let extra = Arc::clone(&extra);
            let semaphore = Arc::clone(&semaphore);

            tasks.push(tokio::spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => return,
                };

                if !key_present {
                    extra.lock().push(path);
                }
            }));
        }

        while let Some(joined) = tasks.next().await {
            if let Err(e) = joined {
                warn!("Diff task aborted: {}", e);
            }
        }

        DiffResult {
            missing: take_shared(missing),
            extra: take_shared(extra),
        }
    }
}

/// Digest both sides of a pair, tagging a failure with the offending path
async fn content_digests(
    source: &Path,
    dest: &Path,
) -> Result<(Digest, Digest), (PathBuf, crate::error::ScanError)> {
    let src_digest = hash::digest_file(source)
        .await
        .map_err(|e| (source.to_path_buf(), e))?;
    let dst_digest = hash::digest_file(dest)
        .await
        .map_err(|e| (dest.to_path_buf(), e))?;
    Ok((src_digest, dst_digest))
}

/// Unwrap a shared result vector after all writers have completed
fn take_shared<T: Clone>(shared: Arc<Mutex<Vec<T>>>) -> Vec<T> {
    Arc::try_unwrap(shared)
        .map(Mutex::into_inner)
        .unwrap_or_else(|arc| arc.lock().clone())
}
