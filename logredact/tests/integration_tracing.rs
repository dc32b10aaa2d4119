//! Integration tests for the tracing span processor.
//!
//! Spans are recorded through a real `tracing_subscriber` registry and
//! collected by a closure exporter once they close.

#![cfg(feature = "tracing")]

use std::sync::{Arc, Mutex};

use logredact::{
    RedactingSpanLayer, RedactionConfig, RedactionPolicy, Redactor, SpanData,
};
use serde_json::json;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;

const EMAIL: &str = r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}";

fn redactor() -> Redactor {
    RedactionPolicy::from_config(
        &RedactionConfig::empty()
            .with_sensitive_field("password")
            .with_sensitive_field("authorization")
            .with_pattern("email", EMAIL),
    )
    .unwrap()
    .into()
}

/// Runs `body` under a subscriber with the redacting layer and returns the
/// exported spans in close order.
fn collect_spans(redactor: Redactor, body: impl FnOnce()) -> Vec<SpanData> {
    let exported: Arc<Mutex<Vec<SpanData>>> = Arc::default();
    let sink = Arc::clone(&exported);
    let layer = RedactingSpanLayer::new(redactor, move |span: SpanData| {
        sink.lock().unwrap().push(span);
    });

    tracing::subscriber::with_default(tracing_subscriber::registry().with(layer), body);

    let spans = exported.lock().unwrap().clone();
    spans
}

mod attributes {
    use super::*;

    #[test]
    fn sensitive_attributes_are_masked_on_close() {
        let spans = collect_spans(redactor(), || {
            let _span = tracing::info_span!(
                "http.request",
                authorization = "Bearer abc",
                user = "alice@example.com",
                status = 200u64
            )
            .entered();
        });

        assert_eq!(spans.len(), 1);
        let span = &spans[0];
        assert_eq!(span.name, "http.request");
        assert_eq!(span.level, Level::INFO);
        assert_eq!(span.attribute("authorization"), Some(&json!("[REDACTED]")));
        assert_eq!(span.attribute("user"), Some(&json!("[REDACTED]")));
        assert_eq!(span.attribute("status"), Some(&json!(200)));
    }

    #[test]
    fn late_recorded_fields_are_redacted_too() {
        let spans = collect_spans(redactor(), || {
            let span = tracing::info_span!(
                "signup",
                password = tracing::field::Empty,
                email = tracing::field::Empty
            );
            span.record("password", "hunter2");
            span.record("email", "new@example.com");
        });

        let span = &spans[0];
        assert_eq!(span.attribute("password"), Some(&json!("[REDACTED]")));
        assert_eq!(span.attribute("email"), Some(&json!("[REDACTED]")));
    }

    #[test]
    fn display_name_and_baggage_are_redacted() {
        let spans = collect_spans(redactor(), || {
            let _span = tracing::info_span!(
                "lookup",
                otel.name = "GET /users/bob@example.com",
                baggage.password = "p",
                baggage.tenant = "acme"
            )
            .entered();
        });

        let span = &spans[0];
        assert_eq!(span.name, "GET /users/[REDACTED]");
        assert_eq!(span.baggage_item("password"), Some(&json!("[REDACTED]")));
        assert_eq!(span.baggage_item("tenant"), Some(&json!("acme")));
        assert_eq!(span.attribute("otel.name"), None);
    }
}

mod events {
    use super::*;

    #[test]
    fn events_inside_a_span_are_redacted_with_it() {
        let spans = collect_spans(redactor(), || {
            let _span = tracing::info_span!("checkout").entered();
            tracing::warn!(password = "hunter2", "receipt sent to carol@example.com");
        });

        let events = &spans[0].events;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].level, Level::WARN);
        assert_eq!(events[0].message, "receipt sent to [REDACTED]");
        assert_eq!(
            events[0].fields,
            vec![("password".to_string(), json!("[REDACTED]"))]
        );
    }

    #[test]
    fn nested_spans_are_exported_innermost_first() {
        let spans = collect_spans(redactor(), || {
            let _outer = tracing::info_span!("outer", user = "a@b.com").entered();
            let _inner = tracing::debug_span!("inner", password = "x").entered();
        });

        let names: Vec<_> = spans.iter().map(|span| span.name.as_str()).collect();
        assert_eq!(names, ["inner", "outer"]);
        assert_eq!(spans[0].attribute("password"), Some(&json!("[REDACTED]")));
        assert_eq!(spans[1].attribute("user"), Some(&json!("[REDACTED]")));
    }
}

mod passthrough {
    use super::*;

    #[test]
    fn disabled_redactor_exports_raw_spans() {
        let spans = collect_spans(Redactor::disabled(), || {
            let _span = tracing::info_span!("login", password = "hunter2").entered();
        });
        assert_eq!(spans[0].attribute("password"), Some(&json!("hunter2")));
    }
}

mod stacking {
    use super::*;

    #[test]
    fn two_layers_on_one_subscriber_each_export_the_span() {
        let first: Arc<Mutex<Vec<SpanData>>> = Arc::default();
        let second: Arc<Mutex<Vec<SpanData>>> = Arc::default();
        let first_sink = Arc::clone(&first);
        let second_sink = Arc::clone(&second);

        let subscriber = tracing_subscriber::registry()
            .with(RedactingSpanLayer::new(redactor(), move |span: SpanData| {
                first_sink.lock().unwrap().push(span);
            }))
            .with(RedactingSpanLayer::new(redactor(), move |span: SpanData| {
                second_sink.lock().unwrap().push(span);
            }));

        tracing::subscriber::with_default(subscriber, || {
            let span = tracing::info_span!(
                "login",
                password = "hunter2",
                user = tracing::field::Empty
            );
            span.record("user", "erin@example.com");
            let _entered = span.entered();
            tracing::info!("signed in");
        });

        for spans in [&first, &second] {
            let spans = spans.lock().unwrap();
            assert_eq!(spans.len(), 1);
            assert_eq!(spans[0].attribute("password"), Some(&json!("[REDACTED]")));
            assert_eq!(spans[0].attribute("user"), Some(&json!("[REDACTED]")));
            assert_eq!(spans[0].events.len(), 1);
        }
    }
}
