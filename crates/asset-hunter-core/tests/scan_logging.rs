#![forbid(unsafe_code)]

//! Structured log events emitted by scan and drawer transitions.

use std::sync::{Arc, Mutex};

use asset_hunter_core::{DashboardState, ScanOutcome, mock_batch};
use tracing::Subscriber;
use tracing_subscriber::layer::{Context, SubscriberExt};

#[derive(Debug, Clone)]
struct Captured {
    target: String,
    message: String,
    fields: Vec<(String, String)>,
}

impl Captured {
    fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Default)]
struct EventVisitor {
    message: String,
    fields: Vec<(String, String)>,
}

impl tracing::field::Visit for EventVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields
                .push((field.name().to_string(), format!("{value:?}")));
        }
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.fields.push((field.name().to_string(), value.to_string()));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.fields.push((field.name().to_string(), value.to_string()));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.fields.push((field.name().to_string(), value.to_string()));
    }
}

struct CaptureLayer(Arc<Mutex<Vec<Captured>>>);

impl<S: Subscriber> tracing_subscriber::Layer<S> for CaptureLayer {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let target = event.metadata().target();
        if !target.starts_with("asset_hunter") {
            return;
        }
        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);
        self.0.lock().unwrap().push(Captured {
            target: target.to_string(),
            message: visitor.message,
            fields: visitor.fields,
        });
    }
}

fn capture<F: FnOnce()>(f: F) -> Vec<Captured> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry().with(CaptureLayer(events.clone()));
    {
        let _guard = tracing::subscriber::set_default(subscriber);
        tracing::callsite::rebuild_interest_cache();
        f();
    }
    let out = events.lock().unwrap().clone();
    out
}

#[test]
fn scan_lifecycle_is_logged_with_ids() {
    let events = capture(|| {
        let mut state = DashboardState::new();
        let ticket = state.trigger_scan();
        state.complete_scan(ticket.id(), ScanOutcome::Completed(mock_batch()));
    });

    let started = events
        .iter()
        .find(|e| e.message == "scan started")
        .expect("scan started event");
    assert_eq!(started.target, "asset_hunter.scan");
    assert_eq!(started.field("scan_id"), Some("1"));

    let applied = events
        .iter()
        .find(|e| e.message == "scan applied")
        .expect("scan applied event");
    assert_eq!(applied.field("records"), Some("3"));
}

#[test]
fn stale_completion_is_logged_and_ignored() {
    let events = capture(|| {
        let mut state = DashboardState::new();
        let first = state.trigger_scan();
        let _second = state.trigger_scan();
        state.complete_scan(first.id(), ScanOutcome::Completed(mock_batch()));
        assert!(state.is_busy());
    });

    assert!(events.iter().any(|e| e.message == "superseding in-flight scan"));
    let stale = events
        .iter()
        .find(|e| e.message == "ignoring stale scan completion")
        .expect("stale event");
    assert_eq!(stale.field("scan_id"), Some("1"));
    assert_eq!(stale.field("stale"), Some("true"));
    assert!(!events.iter().any(|e| e.message == "scan applied"));
}

#[test]
fn drawer_transitions_use_drawer_target() {
    let events = capture(|| {
        let mut state = DashboardState::new();
        let ticket = state.trigger_scan();
        state.complete_scan(ticket.id(), ScanOutcome::Completed(mock_batch()));
        state.analyze_index(1);
        state.close_drawer();
    });

    let drawer: Vec<_> = events
        .iter()
        .filter(|e| e.target == "asset_hunter.drawer")
        .collect();
    assert_eq!(drawer.len(), 2);
    assert_eq!(drawer[0].field("record_id"), Some("2"));
    assert_eq!(drawer[1].message, "drawer closed");
}
