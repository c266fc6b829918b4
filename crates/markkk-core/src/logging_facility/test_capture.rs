//! In-memory capture of operation events for tests
//!
//! `init_test_capture()` installs a global subscriber whose only layer is a
//! [`TestCapture`]. Every event is decoded into the canonical operation
//! fields so tests can assert on boundaries, timings and error codes.

use std::sync::{Arc, Mutex, OnceLock};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

use markkk_core_types::schema::{
    EVENT_END, EVENT_END_ERROR, FIELD_COMPONENT, FIELD_DOCUMENT_ID, FIELD_DURATION_MS,
    FIELD_ERR_CODE, FIELD_ERR_KIND, FIELD_EVENT, FIELD_OP,
};

/// One decoded operation event
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CapturedEvent {
    pub level: Option<Level>,
    pub component: Option<String>,
    pub op: Option<String>,
    pub event: Option<String>,
    pub duration_ms: Option<u64>,
    pub document_id: Option<String>,
    pub err_code: Option<String>,
    /// `Debug` rendering of the [`ExErrorKind`](crate::errors::ExErrorKind)
    pub err_kind: Option<String>,
}

impl CapturedEvent {
    fn set(&mut self, field: &Field, value: String) {
        let slot = match field.name() {
            FIELD_COMPONENT => &mut self.component,
            FIELD_OP => &mut self.op,
            FIELD_EVENT => &mut self.event,
            FIELD_DOCUMENT_ID => &mut self.document_id,
            FIELD_ERR_CODE => &mut self.err_code,
            FIELD_ERR_KIND => &mut self.err_kind,
            _ => return,
        };
        *slot = Some(value);
    }
}

impl Visit for CapturedEvent {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.set(field, format!("{:?}", value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.set(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        if field.name() == FIELD_DURATION_MS {
            self.duration_ms = Some(value);
        } else {
            self.set(field, value.to_string());
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        match u64::try_from(value) {
            Ok(value) => self.record_u64(field, value),
            Err(_) => self.set(field, value.to_string()),
        }
    }
}

/// Shared event buffer; also the layer that fills it
#[derive(Clone, Default)]
pub struct TestCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl<S: Subscriber> Layer<S> for TestCapture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut captured = CapturedEvent {
            level: Some(*event.metadata().level()),
            ..CapturedEvent::default()
        };
        event.record(&mut captured);

        if let Ok(mut events) = self.events.lock() {
            events.push(captured);
        }
    }
}

impl TestCapture {
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Events emitted for one operation, in emission order
    pub fn events_for_op(&self, op: &str) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.op.as_deref() == Some(op))
            .collect()
    }

    /// The most recent successful end event of `op`
    pub fn last_end(&self, op: &str) -> Option<CapturedEvent> {
        self.last_with_event(op, EVENT_END)
    }

    /// The most recent failed end event of `op`
    pub fn last_error(&self, op: &str) -> Option<CapturedEvent> {
        self.last_with_event(op, EVENT_END_ERROR)
    }

    fn last_with_event(&self, op: &str, event: &str) -> Option<CapturedEvent> {
        self.events_for_op(op)
            .into_iter()
            .rev()
            .find(|e| e.event.as_deref() == Some(event))
    }

    /// # Panics
    ///
    /// Panics if no event of `op` carries `event`
    pub fn assert_event_exists(&self, op: &str, event: &str) {
        let events = self.events_for_op(op);
        assert!(
            events.iter().any(|e| e.event.as_deref() == Some(event)),
            "no {} event for op {} among {:?}",
            event,
            op,
            events
        );
    }
}

static GLOBAL_CAPTURE: OnceLock<TestCapture> = OnceLock::new();

/// Install the capture subscriber once per process and return its handle
///
/// All tests in a binary share one buffer, so each should log under its own
/// `op` name.
///
/// ```
/// use markkk_core::logging_facility::test_capture::init_test_capture;
/// use markkk_core::log_op_start;
///
/// let capture = init_test_capture();
/// log_op_start!("doc_example");
/// capture.assert_event_exists("doc_example", "start");
/// ```
pub fn init_test_capture() -> TestCapture {
    GLOBAL_CAPTURE
        .get_or_init(|| {
            let capture = TestCapture::default();
            tracing_subscriber::registry().with(capture.clone()).init();
            capture
        })
        .clone()
}
