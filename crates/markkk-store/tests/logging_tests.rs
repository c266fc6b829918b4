// Store operations emit start/end boundary events

#![allow(clippy::unwrap_used, clippy::expect_used)]

use markkk_core::logging_facility::test_capture::init_test_capture;
use markkk_core::markkk_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};
use markkk_store::{DocumentStore, StoreConfig};

#[tokio::test]
async fn test_operations_log_start_and_end() {
    let capture = init_test_capture();
    let store = DocumentStore::new(StoreConfig::in_memory());

    store.save_document("# Logged", Some("log")).await.unwrap();
    store.get_theme().await.unwrap();

    for op in ["save_document", "get_theme", "open_store"] {
        capture.assert_event_exists(op, EVENT_START);
        capture.assert_event_exists(op, EVENT_END);
    }

    let end = capture.last_end("save_document").unwrap();
    assert!(end.duration_ms.is_some());
    assert!(end
        .component
        .as_deref()
        .is_some_and(|c| c.starts_with("markkk_store")));
}

#[tokio::test]
async fn test_failures_log_error_code() {
    let capture = init_test_capture();
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"x").unwrap();
    let store = DocumentStore::new(StoreConfig::file(blocker.join("db.sqlite")));

    store.delete_document("anything").await.unwrap_err();

    let errors: Vec<_> = capture
        .events_for_op("delete_document")
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .collect();
    assert!(!errors.is_empty());
    assert!(errors
        .iter()
        .any(|e| e.err_code.as_deref() == Some("ERR_STORAGE_UNAVAILABLE")));
}
