//! The redaction entrypoints used at logging and tracing boundaries.
//!
//! Every method here is total. Malformed input, serialization failures and
//! a missing policy all degrade to best-effort output instead of an error,
//! so a redaction problem can never take down the logging call that hit it.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::{policy::RedactionPolicy, walker::DocumentWalker};

/// Handle to a shared [`RedactionPolicy`].
///
/// A `Redactor` without a policy is fail-open: every entrypoint returns its
/// input unchanged. That keeps logs flowing when no policy was installed, at
/// the cost of emitting them unredacted.
#[derive(Clone, Debug, Default)]
pub struct Redactor {
    policy: Option<Arc<RedactionPolicy>>,
}

impl Redactor {
    pub fn new(policy: Arc<RedactionPolicy>) -> Self {
        Self {
            policy: Some(policy),
        }
    }

    /// A redactor that passes everything through.
    pub fn disabled() -> Self {
        Self { policy: None }
    }

    pub fn policy(&self) -> Option<&Arc<RedactionPolicy>> {
        self.policy.as_ref()
    }

    /// `true` when a policy is present and switched on.
    pub fn is_active(&self) -> bool {
        self.active().is_some()
    }

    fn active(&self) -> Option<&RedactionPolicy> {
        self.policy.as_deref().filter(|policy| policy.is_active())
    }

    /// Applies content patterns to free text.
    pub fn redact_message(&self, text: &str) -> String {
        match self.active() {
            Some(policy) => policy.patterns().redact_text(text),
            None => text.to_string(),
        }
    }

    /// Redacts a structured document.
    pub fn redact_structured(&self, mut document: Value) -> Value {
        if let Some(policy) = self.active() {
            DocumentWalker::new(policy).walk(&mut document);
        }
        document
    }

    /// Redacts a serialized JSON payload.
    ///
    /// Input that does not parse as JSON is treated as free text.
    pub fn redact_json_str(&self, raw: &str) -> String {
        if !self.is_active() {
            return raw.to_string();
        }
        match serde_json::from_str::<Value>(raw) {
            Ok(document) => self.redact_structured(document).to_string(),
            Err(err) => {
                tracing::debug!(error = %err, "payload is not JSON; redacting as text");
                self.redact_message(raw)
            }
        }
    }

    /// Serializes `value` and redacts the result.
    ///
    /// A value that serializes to a JSON string is returned as the redacted
    /// string itself, without quotes. A value that fails to serialize is
    /// replaced by the placeholder since its contents cannot be inspected.
    pub fn redact_object<T>(&self, value: &T) -> String
    where
        T: Serialize + ?Sized,
    {
        let document = match serde_json::to_value(value) {
            Ok(document) => document,
            Err(err) => {
                let Some(policy) = self.active() else {
                    return String::new();
                };
                tracing::warn!(error = %err, "failed to serialize value for redaction");
                return policy.placeholder().to_string();
            }
        };
        match self.redact_structured(document) {
            Value::String(text) => text,
            other => other.to_string(),
        }
    }

    /// Redacts a map of named values, treating each key as a field name.
    pub fn redact_field_map(&self, mut fields: Map<String, Value>) -> Map<String, Value> {
        if let Some(policy) = self.active() {
            let walker = DocumentWalker::new(policy);
            for (key, value) in &mut fields {
                walker.walk_field(key, value);
            }
        }
        fields
    }

    /// Redacts one named value.
    ///
    /// An empty name carries no field information, so the value is only
    /// pattern-scanned.
    pub fn redact_field(&self, name: &str, mut value: Value) -> Value {
        if let Some(policy) = self.active() {
            let walker = DocumentWalker::new(policy);
            if name.is_empty() {
                walker.walk(&mut value);
            } else {
                walker.walk_field(name, &mut value);
            }
        }
        value
    }
}

impl From<RedactionPolicy> for Redactor {
    fn from(policy: RedactionPolicy) -> Self {
        Self::new(Arc::new(policy))
    }
}

impl From<Arc<RedactionPolicy>> for Redactor {
    fn from(policy: Arc<RedactionPolicy>) -> Self {
        Self::new(policy)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::policy::RedactionConfig;

    fn redactor() -> Redactor {
        RedactionPolicy::from_config(
            &RedactionConfig::empty()
                .with_sensitive_field("password")
                .with_pattern("email", r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}"),
        )
        .unwrap()
        .into()
    }

    #[test]
    fn missing_policy_fails_open() {
        let redactor = Redactor::disabled();
        assert!(!redactor.is_active());
        assert_eq!(redactor.redact_message("a@b.com"), "a@b.com");
        let doc = json!({"password": "p"});
        assert_eq!(redactor.redact_structured(doc.clone()), doc);
        assert_eq!(redactor.redact_json_str("{\"password\":\"p\"}"), "{\"password\":\"p\"}");
        assert_eq!(redactor.redact_field("password", json!("p")), json!("p"));
    }

    #[test]
    fn malformed_json_falls_back_to_text() {
        let redactor = redactor();
        assert_eq!(
            redactor.redact_json_str("{\"password\": a@b.com"),
            "{\"password\": [REDACTED]"
        );
        assert_eq!(
            redactor.redact_json_str(r#"{"password":"p","x":"a@b.com"}"#),
            r#"{"password":"[REDACTED]","x":"[REDACTED]"}"#
        );
    }

    #[test]
    fn redact_object_unquotes_strings() {
        let redactor = redactor();
        assert_eq!(redactor.redact_object("write a@b.com"), "write [REDACTED]");
        assert_eq!(redactor.redact_object(&42), "42");
        assert_eq!(
            redactor.redact_object(&json!({"password": "p"})),
            r#"{"password":"[REDACTED]"}"#
        );
    }

    #[test]
    fn redact_object_replaces_unserializable_values() {
        struct Broken;

        impl Serialize for Broken {
            fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
                Err(serde::ser::Error::custom("boom"))
            }
        }

        assert_eq!(redactor().redact_object(&Broken), "[REDACTED]");
    }

    #[test]
    fn field_map_and_single_fields() {
        let redactor = redactor();
        let mut fields = Map::new();
        fields.insert("password".into(), json!({"nested": true}));
        fields.insert("bio".into(), json!("a@b.com"));
        let redacted = redactor.redact_field_map(fields);
        assert_eq!(redacted["password"], json!("[REDACTED]"));
        assert_eq!(redacted["bio"], json!("[REDACTED]"));

        assert_eq!(redactor.redact_field("", json!("password a@b.com")), json!("password [REDACTED]"));
        assert_eq!(redactor.redact_field("userPassword", json!(7)), json!("[REDACTED]"));
    }
}
