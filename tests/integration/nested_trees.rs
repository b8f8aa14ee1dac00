//! Subdirectory handling: relative-path keys and nested copies

use dirsync::engine::SyncEngine;
use dirsync::observe::{MemoryObserver, Observer};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn engine_for(src: &TempDir, dst: &TempDir) -> SyncEngine {
    let observer = Arc::new(MemoryObserver::new());
    SyncEngine::new(
        src.path().to_path_buf(),
        dst.path().to_path_buf(),
        observer as Arc<dyn Observer>,
    )
}

#[tokio::test]
async fn test_nested_files_sync_to_same_relative_location() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();
    fs::create_dir_all(src.path().join("docs/api")).unwrap();
    fs::write(src.path().join("docs/api/readme.md"), "hello").unwrap();
    fs::write(src.path().join("top.txt"), "root level").unwrap();

    let summary = engine_for(&src, &dst).run_cycle().await.unwrap();

    assert_eq!(summary.copied, 2);
    assert_eq!(
        fs::read_to_string(dst.path().join("docs/api/readme.md")).unwrap(),
        "hello"
    );
    assert_eq!(
        fs::read_to_string(dst.path().join("top.txt")).unwrap(),
        "root level"
    );
}

#[tokio::test]
async fn test_same_basename_in_different_subdirs_both_sync() {
    // Name-only keying would collapse these two files into one key; the
    // relative-path key keeps them distinct.
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();
    fs::create_dir(src.path().join("left")).unwrap();
    fs::create_dir(src.path().join("right")).unwrap();
    fs::write(src.path().join("left/config.toml"), "left side").unwrap();
    fs::write(src.path().join("right/config.toml"), "right side").unwrap();

    let summary = engine_for(&src, &dst).run_cycle().await.unwrap();

    assert_eq!(summary.copied, 2);
    assert_eq!(
        fs::read_to_string(dst.path().join("left/config.toml")).unwrap(),
        "left side"
    );
    assert_eq!(
        fs::read_to_string(dst.path().join("right/config.toml")).unwrap(),
        "right side"
    );
}

#[tokio::test]
async fn test_moved_file_treated_as_copy_plus_delete() {
    // No move detection: a relocated file is missing at the new key and
    // extra at the old one.
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();
    fs::create_dir(src.path().join("new-home")).unwrap();
    fs::write(src.path().join("new-home/data.txt"), "payload").unwrap();
    fs::create_dir(dst.path().join("old-home")).unwrap();
    fs::write(dst.path().join("old-home/data.txt"), "payload").unwrap();

    let summary = engine_for(&src, &dst).run_cycle().await.unwrap();

    assert_eq!(summary.copied, 1);
    assert_eq!(summary.deleted, 1);
    assert_eq!(
        fs::read_to_string(dst.path().join("new-home/data.txt")).unwrap(),
        "payload"
    );
    assert!(!dst.path().join("old-home/data.txt").exists());
}

#[tokio::test]
async fn test_extra_nested_file_deleted() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();
    fs::create_dir_all(dst.path().join("cache/tmp")).unwrap();
    fs::write(dst.path().join("cache/tmp/junk.bin"), "junk").unwrap();

    let summary = engine_for(&src, &dst).run_cycle().await.unwrap();

    assert_eq!(summary.deleted, 1);
    assert!(!dst.path().join("cache/tmp/junk.bin").exists());
}
