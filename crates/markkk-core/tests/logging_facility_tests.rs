#![allow(clippy::unwrap_used, clippy::expect_used)]

use markkk_core::errors::{ExError, ExErrorKind, MarkkkError};
use markkk_core::logging_facility::test_capture::init_test_capture;
use markkk_core::{log_op_end, log_op_error, log_op_start};
use markkk_core::markkk_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name, document_id = "d1");

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 1, "Should capture exactly one start event");
    assert_eq!(events[0].event.as_deref(), Some(EVENT_START));
    assert_eq!(events[0].document_id.as_deref(), Some("d1"));
    assert!(events[0].component.is_some(), "component should be recorded");
}

#[test]
fn test_log_op_end_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let end = capture.last_end(op_name).expect("end event");
    assert_eq!(end.event.as_deref(), Some(EVENT_END));
    assert_eq!(end.duration_ms, Some(42));
}

#[test]
fn test_log_op_error_includes_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = MarkkkError::StorageUnavailable {
        reason: "disk full".to_string(),
    };
    log_op_error!(op_name, err, duration_ms = 10);

    let error_events: Vec<_> = capture
        .events_for_op(op_name)
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .collect();

    assert_eq!(error_events.len(), 1, "Should have exactly one error event");
    assert_eq!(
        error_events[0].err_code.as_deref(),
        Some("ERR_STORAGE_UNAVAILABLE")
    );
    assert_eq!(
        error_events[0].err_kind.as_deref(),
        Some("StorageUnavailable")
    );
    assert_eq!(error_events[0].duration_ms, Some(10));
}

#[test]
fn test_log_op_error_accepts_ex_error_and_keeps_it() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_4";

    let err = ExError::new(ExErrorKind::AlreadyExists).with_entity_id("d9");
    log_op_error!(op_name, err, duration_ms = 1, document_id = "d9");

    // Still usable after logging
    assert_eq!(err.entity_id(), Some("d9"));
    let failed = capture.last_error(op_name).expect("error event");
    assert_eq!(failed.err_code.as_deref(), Some(err.code()));
    assert_eq!(failed.document_id.as_deref(), Some("d9"));
}

#[test]
fn test_start_end_pairing() {
    let capture = init_test_capture();
    let op_name = "test_start_end_pairing_unique_5";

    log_op_start!(op_name);
    log_op_end!(op_name, duration_ms = 3);

    let events = capture.events_for_op(op_name);
    let kinds: Vec<_> = events.iter().filter_map(|e| e.event.as_deref()).collect();
    assert_eq!(kinds, vec![EVENT_START, EVENT_END]);
}
