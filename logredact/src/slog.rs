//! A `slog` drain decorator that redacts records before they leave the process.
//!
//! [`RedactingDrain`] wraps the drain that writes or ships records. For each
//! record it:
//! - renders the message and runs it through the content patterns,
//! - captures the record's key-value pairs and the logger's scope values as
//!   JSON, redacting each pair with its key as the field name,
//! - rebuilds the record from the redacted parts and logs it downstream.
//!
//! Each record is redacted exactly once, on its way to the wrapped drain.
//! Capture never fails the logging call: a value whose serialization errors
//! is dropped along with the rest of its list, with a warning.

use std::fmt::Arguments;

use serde_json::{Number, Value};
use slog::{
    BorrowedKV, Drain, KV, Key, Level, OwnedKV, OwnedKVList, Record, RecordLocation,
    RecordStatic, Result as SlogResult, Serializer,
};

use crate::{engine::Redactor, global};

/// Drain decorator that redacts every record it forwards.
#[derive(Clone, Debug)]
pub struct RedactingDrain<D> {
    drain: D,
    redactor: Redactor,
}

impl<D> RedactingDrain<D> {
    pub fn new(drain: D, redactor: Redactor) -> Self {
        Self { drain, redactor }
    }

    /// Wraps `drain` with the process-wide redactor, see [`global::redactor`].
    pub fn with_global_policy(drain: D) -> Self {
        Self::new(drain, global::redactor())
    }

    pub fn get_ref(&self) -> &D {
        &self.drain
    }

    pub fn into_inner(self) -> D {
        self.drain
    }

    fn redact_pairs(&self, pairs: CapturedPairs) -> CapturedPairs {
        CapturedPairs(
            pairs
                .0
                .into_iter()
                .map(|(key, value)| (key, self.redactor.redact_field(key, value)))
                .collect(),
        )
    }
}

impl<D: Drain> Drain for RedactingDrain<D> {
    type Ok = D::Ok;
    type Err = D::Err;

    fn log(&self, record: &Record<'_>, values: &OwnedKVList) -> Result<Self::Ok, Self::Err> {
        if !self.redactor.is_active() {
            return self.drain.log(record, values);
        }

        let message = self.redactor.redact_message(&record.msg().to_string());
        let pairs = self.redact_pairs(CapturedPairs::capture(record, &record.kv()));
        let scope = OwnedKVList::from(OwnedKV(
            self.redact_pairs(CapturedPairs::capture(record, values)),
        ));

        let location = RecordLocation {
            file: record.file(),
            line: record.line(),
            column: record.column(),
            function: record.function(),
            module: record.module(),
        };
        let static_info = RecordStatic {
            location: &location,
            tag: record.tag(),
            level: record.level(),
        };

        self.drain.log(
            &Record::new(&static_info, &format_args!("{message}"), BorrowedKV(&pairs)),
            &scope,
        )
    }

    fn is_enabled(&self, level: Level) -> bool {
        self.drain.is_enabled(level)
    }
}

/// Key-value pairs captured from a record, in emission order.
#[derive(Clone, Debug, Default)]
struct CapturedPairs(Vec<(Key, Value)>);

impl CapturedPairs {
    fn capture(record: &Record<'_>, kv: &dyn KV) -> Self {
        let mut capture = CapturingSerializer::default();
        if let Err(err) = kv.serialize(record, &mut capture) {
            tracing::warn!(
                error = %err,
                captured = capture.pairs.len(),
                "failed to capture log values for redaction; remaining values dropped"
            );
        }
        Self(capture.pairs)
    }
}

impl KV for CapturedPairs {
    fn serialize(&self, _record: &Record<'_>, serializer: &mut dyn Serializer) -> SlogResult {
        for (key, value) in &self.0 {
            emit_value(*key, value, serializer)?;
        }
        Ok(())
    }
}

/// Re-emits a redacted value using the closest native slog type.
fn emit_value(key: Key, value: &Value, serializer: &mut dyn Serializer) -> SlogResult {
    match value {
        Value::Null => serializer.emit_none(key),
        Value::Bool(flag) => serializer.emit_bool(key, *flag),
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                serializer.emit_i64(key, int)
            } else if let Some(uint) = number.as_u64() {
                serializer.emit_u64(key, uint)
            } else if let Some(float) = number.as_f64() {
                serializer.emit_f64(key, float)
            } else {
                serializer.emit_arguments(key, &format_args!("{number}"))
            }
        }
        Value::String(text) => serializer.emit_str(key, text),
        Value::Array(_) | Value::Object(_) => serializer.emit_serde(key, &slog::Serde(value.clone())),
    }
}

/// Serializer that turns every emitted value into JSON.
#[derive(Default)]
struct CapturingSerializer {
    pairs: Vec<(Key, Value)>,
}

impl CapturingSerializer {
    fn push(&mut self, key: Key, value: Value) -> SlogResult {
        self.pairs.push((key, value));
        Ok(())
    }
}

fn float(value: f64) -> Value {
    Number::from_f64(value).map_or_else(|| Value::String(value.to_string()), Value::Number)
}

impl Serializer for CapturingSerializer {
    fn emit_arguments(&mut self, key: Key, val: &Arguments<'_>) -> SlogResult {
        self.push(key, Value::String(val.to_string()))
    }

    fn emit_str(&mut self, key: Key, val: &str) -> SlogResult {
        self.push(key, Value::from(val))
    }

    fn emit_bool(&mut self, key: Key, val: bool) -> SlogResult {
        self.push(key, Value::Bool(val))
    }

    fn emit_char(&mut self, key: Key, val: char) -> SlogResult {
        self.push(key, Value::String(val.to_string()))
    }

    fn emit_usize(&mut self, key: Key, val: usize) -> SlogResult {
        self.push(key, Value::from(val))
    }

    fn emit_isize(&mut self, key: Key, val: isize) -> SlogResult {
        self.push(key, Value::from(val))
    }

    fn emit_u32(&mut self, key: Key, val: u32) -> SlogResult {
        self.push(key, Value::from(val))
    }

    fn emit_i32(&mut self, key: Key, val: i32) -> SlogResult {
        self.push(key, Value::from(val))
    }

    fn emit_u64(&mut self, key: Key, val: u64) -> SlogResult {
        self.push(key, Value::from(val))
    }

    fn emit_i64(&mut self, key: Key, val: i64) -> SlogResult {
        self.push(key, Value::from(val))
    }

    fn emit_f32(&mut self, key: Key, val: f32) -> SlogResult {
        self.push(key, float(f64::from(val)))
    }

    fn emit_f64(&mut self, key: Key, val: f64) -> SlogResult {
        self.push(key, float(val))
    }

    fn emit_unit(&mut self, key: Key) -> SlogResult {
        self.push(key, Value::Null)
    }

    fn emit_none(&mut self, key: Key) -> SlogResult {
        self.push(key, Value::Null)
    }

    fn emit_serde(&mut self, key: Key, val: &dyn slog::SerdeValue) -> SlogResult {
        let json = serde_json::to_value(val.as_serde()).unwrap_or_else(|err| {
            Value::String(format!("Failed to serialize log value: {err}"))
        });
        self.push(key, json)
    }
}
