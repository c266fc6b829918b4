// Integration tests for storage-unavailable propagation

#![allow(clippy::unwrap_used, clippy::expect_used)]

use markkk_core::ExErrorKind;
use markkk_store::{DocumentStore, StoreConfig};

#[tokio::test]
async fn test_unreachable_location_is_storage_unavailable() {
    // A regular file where a directory is needed makes the path uncreatable
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"plain file").unwrap();
    let store = DocumentStore::new(StoreConfig::file(blocker.join("store.db")));

    let err = store.save_document("lost", None).await.unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::StorageUnavailable);

    let err = store.get_theme().await.unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::StorageUnavailable);
    assert!(!store.is_open());
}

#[tokio::test]
async fn test_failed_open_is_retried_on_next_call() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("later-a-dir");
    std::fs::write(&blocker, b"plain file").unwrap();
    let store = DocumentStore::new(StoreConfig::file(blocker.join("store.db")));

    assert!(store.get_documents().await.is_err());

    // Once the obstruction is gone the same handle opens normally
    std::fs::remove_file(&blocker).unwrap();
    assert!(store.get_documents().await.unwrap().is_empty());
    assert!(store.is_open());
}

#[tokio::test]
async fn test_non_database_file_is_storage_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("garbage.db");
    std::fs::write(&path, vec![0x5au8; 8192]).unwrap();
    let store = DocumentStore::new(StoreConfig::file(&path));

    let err = store.get_documents().await.unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::StorageUnavailable);
}
