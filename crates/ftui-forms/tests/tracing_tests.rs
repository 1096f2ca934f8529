#![forbid(unsafe_code)]

//! Tracing instrumentation of form updates.
//!
//! Verifies that coalesced group updates run inside a
//! `form_group_set_value` span and that contract violations are logged at
//! WARN before the error is returned.

use std::sync::{Arc, Mutex};

use ftui_forms::{ControlValue, FormControl, FormError, FormGroup};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

// ============================================================================
// Test Infrastructure
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Captured {
    Span(String),
    Event {
        level: tracing::Level,
        span: Option<String>,
    },
}

struct Capture {
    records: Arc<Mutex<Vec<Captured>>>,
}

impl<S> tracing_subscriber::Layer<S> for Capture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        self.records
            .lock()
            .unwrap()
            .push(Captured::Span(attrs.metadata().name().to_string()));
    }

    fn on_event(&self, event: &tracing::Event<'_>, ctx: tracing_subscriber::layer::Context<'_, S>) {
        let span = ctx
            .event_span(event)
            .map(|span_ref| span_ref.name().to_string());
        self.records.lock().unwrap().push(Captured::Event {
            level: *event.metadata().level(),
            span,
        });
    }
}

fn capture<F: FnOnce()>(f: F) -> Vec<Captured> {
    let records = Arc::new(Mutex::new(Vec::new()));
    let layer = Capture {
        records: Arc::clone(&records),
    };
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    let out = records.lock().unwrap().clone();
    out
}

fn group() -> FormGroup {
    FormGroup::new([("a", FormControl::new(1)), ("b", FormControl::new(2))])
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn group_set_value_runs_inside_span() {
    let form = group();
    let records = capture(|| {
        let update = ControlValue::map([("a", 10), ("b", 20)]);
        form.set_value(update).unwrap();
    });
    assert!(records.contains(&Captured::Span("form_group_set_value".into())));
    assert!(records.iter().any(|r| matches!(
        r,
        Captured::Event { level, span: Some(span) }
            if *level == tracing::Level::TRACE && span == "form_group_set_value"
    )));
}

#[test]
fn leaf_set_value_opens_no_group_span() {
    let leaf = FormControl::new(1);
    let records = capture(|| leaf.set_value(2).unwrap());
    assert!(!records.contains(&Captured::Span("form_group_set_value".into())));
}

#[test]
fn unknown_key_is_logged_at_warn() {
    let form = group();
    let records = capture(|| {
        let err = form
            .set_value(ControlValue::map([("missing", 1)]))
            .unwrap_err();
        assert_eq!(err, FormError::UnknownControl("missing".into()));
    });
    assert!(records.iter().any(|r| matches!(
        r,
        Captured::Event { level, .. } if *level == tracing::Level::WARN
    )));
    assert!(!records.contains(&Captured::Span("form_group_set_value".into())));
}

#[test]
fn cycle_is_logged_at_warn() {
    let form = group();
    let records = capture(|| {
        assert!(form.add_control("me", form.clone()).is_err());
    });
    assert!(records.iter().any(|r| matches!(
        r,
        Captured::Event { level, .. } if *level == tracing::Level::WARN
    )));
}
