//! Field-aware traversal of structured documents.
//!
//! Documents are `serde_json::Value` trees. With the `preserve_order`
//! feature of `serde_json` enabled, object keys keep their original order
//! through redaction.

use std::borrow::Cow;

use serde_json::{Map, Value};

use crate::policy::RedactionPolicy;

/// Walks a document, masking sensitive fields and pattern-scanning strings.
///
/// Precedence for an object entry: a sensitive key masks its value wholesale
/// and stops the walk there, whatever the value contains. Only entries under
/// non-sensitive keys are descended into.
#[derive(Clone, Copy, Debug)]
pub struct DocumentWalker<'p> {
    policy: &'p RedactionPolicy,
}

impl<'p> DocumentWalker<'p> {
    pub fn new(policy: &'p RedactionPolicy) -> Self {
        Self { policy }
    }

    /// Redacts `value` in place.
    pub fn walk(&self, value: &mut Value) {
        match value {
            Value::Object(map) => self.walk_object(map),
            Value::Array(items) => {
                for item in items {
                    self.walk(item);
                }
            }
            Value::String(text) => {
                let redacted = match self.policy.patterns().redact_cow(text) {
                    Cow::Owned(redacted) => redacted,
                    Cow::Borrowed(_) => return,
                };
                *text = redacted;
            }
            Value::Number(_) | Value::Bool(_) | Value::Null => {}
        }
    }

    fn walk_object(&self, map: &mut Map<String, Value>) {
        for (key, value) in map.iter_mut() {
            self.walk_field(key, value);
        }
    }

    /// Redacts the value of a single named field in place.
    pub fn walk_field(&self, key: &str, value: &mut Value) {
        if self.policy.matcher().is_sensitive(key) {
            let raw = leaf_text(value);
            *value = Value::String(self.policy.masker().mask_field(key, &raw));
        } else {
            self.walk(value);
        }
    }
}

/// Text a masked value is derived from.
///
/// Strings contribute their contents without JSON quoting so partial masks
/// see the real value; `null` counts as empty; anything else is its compact
/// JSON form.
pub(crate) fn leaf_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
