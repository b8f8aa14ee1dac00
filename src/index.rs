//! Directory indexing: one snapshot of a tree keyed by relative path

use crate::error::ScanError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use unicode_normalization::UnicodeNormalization;
use walkdir::WalkDir;

/// Metadata for one regular file in a tree snapshot
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// Comparison key: path relative to the root, `/`-separated, NFC-normalized
    pub key: String,
    /// Absolute path on disk
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// Last modification time
    pub modified: SystemTime,
}

/// Snapshot index of one tree: comparison key to FileEntry
///
/// Built once per sync cycle and immutable afterwards. Keying by relative
/// path keeps files with equal base names in different subdirectories
/// distinct.
#[derive(Debug)]
pub struct DirectoryIndex {
    root: PathBuf,
    entries: HashMap<String, FileEntry>,
}

impl DirectoryIndex {
    /// Scan `root` recursively and index every regular file.
    ///
    /// Symlinks are not followed and directories themselves are not indexed.
    /// Returns `ScanError::PathNotFound` if the root does not exist; an
    /// empty tree yields an empty index. Walk errors propagate — a cycle
    /// never runs on a partial index.
    pub fn scan(root: &Path) -> Result<Self, ScanError> {
        if !root.exists() {
            return Err(ScanError::PathNotFound(root.to_path_buf()));
        }
        let root = dunce::canonicalize(root).map_err(|e| {
            ScanError::InvalidPath(format!(
                "Failed to canonicalize {}: {}",
                root.display(),
                e
            ))
        })?;

        let mut entries = HashMap::new();
        for entry in WalkDir::new(&root).follow_links(false) {
            let entry = entry.map_err(|e| {
                ScanError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    format!("Failed to walk directory: {}", e),
                ))
            })?;

            let metadata = entry.metadata().map_err(|e| {
                ScanError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    format!("Failed to read metadata for {:?}: {}", entry.path(), e),
                ))
            })?;

            if !metadata.is_file() {
                continue;
            }

            let path = entry.path().to_path_buf();
            let key = relative_key(&root, &path)?;
            let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
            entries.insert(
                key.clone(),
                FileEntry {
                    key,
                    path,
                    size: metadata.len(),
                    modified,
                },
            );
        }

        Ok(Self { root, entries })
    }

    /// Root this index was scanned from (canonicalized)
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&FileEntry> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterate over all indexed entries (no ordering guarantee)
    pub fn entries(&self) -> impl Iterator<Item = &FileEntry> {
        self.entries.values()
    }
}

/// Compute the comparison key for `path` under `root`.
///
/// Keys use `/` separators on every platform and NFC Unicode normalization
/// so the same file name compares equal across filesystems that store
/// different representations.
fn relative_key(root: &Path, path: &Path) -> Result<String, ScanError> {
    let relative = path.strip_prefix(root).map_err(|_| {
        ScanError::InvalidPath(format!(
            "{} is not under root {}",
            path.display(),
            root.display()
        ))
    })?;

    let joined = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/");

    Ok(joined.nfc().collect())
}
