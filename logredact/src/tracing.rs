//! A span processor for `tracing` that redacts spans when they complete.
//!
//! [`RedactingSpanLayer`] is a `tracing_subscriber::Layer`. While a span is
//! open it accumulates the span's fields and events in a [`SpanData`] kept
//! in the span's extensions. When the span closes the data is taken out,
//! redacted once, and handed to a [`SpanExporter`].
//!
//! Redacting at close time means nothing races with code still recording
//! fields on a live span.
//!
//! Several redacting layers can be stacked on one subscriber, for example one
//! per exporter. Each layer keeps its own copy of the span's data.
//!
//! Field conventions:
//! - `otel.name` overrides the span's display name.
//! - `baggage.<key>` records a baggage entry named `<key>`.
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//!
//! use logredact::{RedactionConfig, RedactionPolicy, tracing::{RedactingSpanLayer, SpanData}};
//! use tracing_subscriber::layer::SubscriberExt;
//!
//! let policy = RedactionPolicy::from_config(&RedactionConfig::default()).unwrap();
//! let exported: Arc<Mutex<Vec<SpanData>>> = Arc::default();
//! let sink = Arc::clone(&exported);
//! let layer = RedactingSpanLayer::new(policy.into(), move |span: SpanData| {
//!     sink.lock().unwrap().push(span);
//! });
//!
//! tracing::subscriber::with_default(tracing_subscriber::registry().with(layer), || {
//!     let _span = tracing::info_span!("login", password = "hunter2").entered();
//! });
//!
//! let spans = exported.lock().unwrap();
//! assert_eq!(spans[0].attribute("password"), Some(&serde_json::json!("[REDACTED]")));
//! ```

use std::{
    fmt, mem,
    sync::atomic::{AtomicU64, Ordering},
};

use serde_json::Value;
use tracing::{
    Event, Level, Subscriber,
    field::{Field, Visit},
    span::{Attributes, Id, Record},
};
use tracing_subscriber::{Layer, layer::Context, registry::LookupSpan};

use crate::{engine::Redactor, global};

const NAME_FIELD: &str = "otel.name";
const BAGGAGE_PREFIX: &str = "baggage.";
const MESSAGE_FIELD: &str = "message";

/// A completed span, as handed to a [`SpanExporter`].
#[derive(Clone, Debug, PartialEq)]
pub struct SpanData {
    pub name: String,
    pub target: String,
    pub level: Level,
    pub attributes: Vec<(String, Value)>,
    pub baggage: Vec<(String, Value)>,
    pub events: Vec<SpanEvent>,
}

/// An event recorded while a span was open.
#[derive(Clone, Debug, PartialEq)]
pub struct SpanEvent {
    pub message: String,
    pub level: Level,
    pub fields: Vec<(String, Value)>,
}

fn upsert(entries: &mut Vec<(String, Value)>, key: &str, value: Value) {
    match entries.iter_mut().find(|(existing, _)| existing == key) {
        Some((_, slot)) => *slot = value,
        None => entries.push((key.to_string(), value)),
    }
}

fn lookup<'a>(entries: &'a [(String, Value)], key: &str) -> Option<&'a Value> {
    entries
        .iter()
        .find(|(existing, _)| existing == key)
        .map(|(_, value)| value)
}

fn redact_entries(redactor: &Redactor, entries: &mut [(String, Value)]) {
    for (key, value) in entries {
        *value = redactor.redact_field(key, mem::take(value));
    }
}

impl SpanData {
    pub fn new(name: impl Into<String>, target: impl Into<String>, level: Level) -> Self {
        Self {
            name: name.into(),
            target: target.into(),
            level,
            attributes: Vec::new(),
            baggage: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        lookup(&self.attributes, key)
    }

    pub fn baggage_item(&self, key: &str) -> Option<&Value> {
        lookup(&self.baggage, key)
    }

    /// Redacts the span in place.
    ///
    /// The name and event messages are pattern-scanned. Attributes, baggage
    /// and event fields are redacted by name, falling back to patterns for
    /// entries without one.
    pub fn redact(&mut self, redactor: &Redactor) {
        if !redactor.is_active() {
            return;
        }
        self.name = redactor.redact_message(&self.name);
        redact_entries(redactor, &mut self.attributes);
        redact_entries(redactor, &mut self.baggage);
        for event in &mut self.events {
            event.message = redactor.redact_message(&event.message);
            redact_entries(redactor, &mut event.fields);
        }
    }

    fn record_field(&mut self, name: &str, value: Value) {
        if name == NAME_FIELD {
            self.name = match value {
                Value::String(text) => text,
                other => other.to_string(),
            };
        } else if let Some(key) = name.strip_prefix(BAGGAGE_PREFIX) {
            upsert(&mut self.baggage, key, value);
        } else {
            upsert(&mut self.attributes, name, value);
        }
    }
}

/// Receives spans after redaction.
pub trait SpanExporter: Send + Sync + 'static {
    fn export(&self, span: SpanData);
}

impl<F> SpanExporter for F
where
    F: Fn(SpanData) + Send + Sync + 'static,
{
    fn export(&self, span: SpanData) {
        self(span);
    }
}

/// Converts `tracing` field values into JSON.
trait JsonVisit {
    fn record_json(&mut self, field: &Field, value: Value);
}

struct JsonVisitor<'a, T: JsonVisit>(&'a mut T);

impl<T: JsonVisit> Visit for JsonVisitor<'_, T> {
    fn record_f64(&mut self, field: &Field, value: f64) {
        let json = serde_json::Number::from_f64(value)
            .map_or_else(|| Value::String(value.to_string()), Value::Number);
        self.0.record_json(field, json);
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.0.record_json(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.0.record_json(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.0.record_json(field, Value::Bool(value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.record_json(field, Value::from(value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.0.record_json(field, Value::String(value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.record_json(field, Value::String(format!("{value:?}")));
    }
}

impl JsonVisit for SpanData {
    fn record_json(&mut self, field: &Field, value: Value) {
        self.record_field(field.name(), value);
    }
}

impl JsonVisit for SpanEvent {
    fn record_json(&mut self, field: &Field, value: Value) {
        if field.name() == MESSAGE_FIELD {
            self.message = match value {
                Value::String(text) => text,
                other => other.to_string(),
            };
        } else {
            upsert(&mut self.fields, field.name(), value);
        }
    }
}

static NEXT_LAYER_ID: AtomicU64 = AtomicU64::new(0);

/// Span data of every redacting layer attached to one span, keyed by layer.
#[derive(Default)]
struct OpenSpans(Vec<(u64, SpanData)>);

impl OpenSpans {
    fn insert(&mut self, layer: u64, data: SpanData) {
        match self.0.iter_mut().find(|(id, _)| *id == layer) {
            Some((_, slot)) => *slot = data,
            None => self.0.push((layer, data)),
        }
    }

    fn get_mut(&mut self, layer: u64) -> Option<&mut SpanData> {
        self.0
            .iter_mut()
            .find(|(id, _)| *id == layer)
            .map(|(_, data)| data)
    }

    fn take(&mut self, layer: u64) -> Option<SpanData> {
        let index = self.0.iter().position(|(id, _)| *id == layer)?;
        Some(self.0.swap_remove(index).1)
    }
}

/// Layer that redacts spans on close and hands them to an exporter.
pub struct RedactingSpanLayer<E> {
    id: u64,
    redactor: Redactor,
    exporter: E,
}

impl<E: SpanExporter> RedactingSpanLayer<E> {
    pub fn new(redactor: Redactor, exporter: E) -> Self {
        Self {
            id: NEXT_LAYER_ID.fetch_add(1, Ordering::Relaxed),
            redactor,
            exporter,
        }
    }

    /// Uses the process-wide redactor, see [`global::redactor`].
    pub fn with_global_policy(exporter: E) -> Self {
        Self::new(global::redactor(), exporter)
    }

    pub fn redactor(&self) -> &Redactor {
        &self.redactor
    }
}

impl<E: fmt::Debug> fmt::Debug for RedactingSpanLayer<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedactingSpanLayer")
            .field("id", &self.id)
            .field("redactor", &self.redactor)
            .field("exporter", &self.exporter)
            .finish()
    }
}

impl<S, E> Layer<S> for RedactingSpanLayer<E>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    E: SpanExporter,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let metadata = attrs.metadata();
        let mut data = SpanData::new(metadata.name(), metadata.target(), *metadata.level());
        attrs.record(&mut JsonVisitor(&mut data));

        let mut extensions = span.extensions_mut();
        match extensions.get_mut::<OpenSpans>() {
            Some(open) => open.insert(self.id, data),
            None => {
                let mut open = OpenSpans::default();
                open.insert(self.id, data);
                extensions.insert(open);
            }
        }
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut extensions = span.extensions_mut();
        if let Some(data) = extensions
            .get_mut::<OpenSpans>()
            .and_then(|open| open.get_mut(self.id))
        {
            values.record(&mut JsonVisitor(data));
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let Some(span) = ctx.event_span(event) else {
            return;
        };
        let mut recorded = SpanEvent {
            message: String::new(),
            level: *event.metadata().level(),
            fields: Vec::new(),
        };
        event.record(&mut JsonVisitor(&mut recorded));

        let mut extensions = span.extensions_mut();
        if let Some(data) = extensions
            .get_mut::<OpenSpans>()
            .and_then(|open| open.get_mut(self.id))
        {
            data.events.push(recorded);
        }
    }

    fn on_close(&self, id: Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(&id) else {
            return;
        };
        let taken = span
            .extensions_mut()
            .get_mut::<OpenSpans>()
            .and_then(|open| open.take(self.id));
        let Some(mut data) = taken else {
            return;
        };
        data.redact(&self.redactor);
        self.exporter.export(data);
    }
}
