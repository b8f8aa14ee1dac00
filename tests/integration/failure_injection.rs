//! Failure isolation: one bad action never aborts the rest of the cycle

use dirsync::diff::{CopyItem, DiffResult};
use dirsync::executor::SyncExecutor;
use dirsync::observe::{MemoryObserver, Observer, SyncEvent};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

#[tokio::test]
async fn test_failed_delete_leaves_copies_intact() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();
    fs::write(src.path().join("a.txt"), "X").unwrap();
    fs::write(src.path().join("b.txt"), "Y").unwrap();
    // A directory at the delete target makes remove_file fail, standing in
    // for a permission error on c.txt
    let undeletable = dst.path().join("c.txt");
    fs::create_dir(&undeletable).unwrap();

    let observer = Arc::new(MemoryObserver::new());
    let executor = SyncExecutor::new(observer.clone() as Arc<dyn Observer>);

    let diff = DiffResult {
        missing: vec![
            CopyItem {
                source: src.path().join("a.txt"),
                destination: dst.path().join("a.txt"),
                size: 1,
            },
            CopyItem {
                source: src.path().join("b.txt"),
                destination: dst.path().join("b.txt"),
                size: 1,
            },
        ],
        extra: vec![undeletable.clone()],
    };

    let report = executor.execute(diff).await;

    assert_eq!(report.copied, 2);
    assert_eq!(report.deleted, 0);
    assert_eq!(report.failed, 1);
    assert_eq!(fs::read_to_string(dst.path().join("a.txt")).unwrap(), "X");
    assert_eq!(fs::read_to_string(dst.path().join("b.txt")).unwrap(), "Y");
    assert!(undeletable.exists());

    let events = observer.events();
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, SyncEvent::Copied { .. }))
            .count(),
        2
    );
    assert!(events
        .iter()
        .any(|e| matches!(e, SyncEvent::DeleteFailed { .. })));
}

#[tokio::test]
async fn test_mixed_failures_are_isolated_per_action() {
    let src = TempDir::new().unwrap();
    let dst = TempDir::new().unwrap();
    fs::write(src.path().join("good.txt"), "ok").unwrap();
    let stale = dst.path().join("stale.txt");
    fs::write(&stale, "old").unwrap();

    let observer = Arc::new(MemoryObserver::new());
    let executor = SyncExecutor::new(observer.clone() as Arc<dyn Observer>);

    let diff = DiffResult {
        missing: vec![
            CopyItem {
                source: src.path().join("good.txt"),
                destination: dst.path().join("good.txt"),
                size: 2,
            },
            // Source vanished before the copy ran
            CopyItem {
                source: src.path().join("vanished.txt"),
                destination: dst.path().join("vanished.txt"),
                size: 0,
            },
        ],
        extra: vec![stale.clone()],
    };

    let report = executor.execute(diff).await;

    assert_eq!(report.copied, 1);
    assert_eq!(report.deleted, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(fs::read_to_string(dst.path().join("good.txt")).unwrap(), "ok");
    assert!(!stale.exists());

    let events = observer.events();
    assert!(events
        .iter()
        .any(|e| matches!(e, SyncEvent::CopyFailed { .. })));
    assert!(events.iter().any(|e| matches!(e, SyncEvent::Deleted { .. })));
}
