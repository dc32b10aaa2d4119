//! The configuration document a [`RedactionPolicy`] is built from.
//!
//! Configuration is plain data: nothing here is compiled or validated until
//! [`RedactionPolicy::from_config`] runs. Every key is optional and falls back
//! to the built-in defaults.
//!
//! ```rust
//! use logredact::{MaskStrategy, RedactionConfig, RedactionMode};
//!
//! let config = RedactionConfig::from_json_str(
//!     r#"{
//!         "redactionText": "[HIDDEN]",
//!         "sensitiveFields": ["password", "ssn"],
//!         "patterns": [{ "name": "ticket", "pattern": "TCK-\\d{6}" }],
//!         "mode": "custom",
//!         "fieldStrategies": { "ssn": "hash" }
//!     }"#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.mode, RedactionMode::Custom);
//! assert_eq!(config.field_strategies["ssn"], MaskStrategy::Hash);
//! ```
//!
//! [`RedactionPolicy`]: super::RedactionPolicy
//! [`RedactionPolicy::from_config`]: super::RedactionPolicy::from_config

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::strategy::{FieldMatchMode, MaskStrategy, MatchValidator, RedactionMode};
use crate::{
    error::PolicyError,
    mask::MASK_CHAR,
    patterns::{BUILTIN_PATTERNS, BuiltinPattern},
};

/// Default placeholder used for full redaction.
pub const REDACTED_PLACEHOLDER: &str = "[REDACTED]";

/// Field names treated as sensitive when the configuration does not list any.
pub const DEFAULT_SENSITIVE_FIELDS: &[&str] = &[
    "password",
    "passwd",
    "secret",
    "token",
    "apikey",
    "api_key",
    "authorization",
    "cookie",
    "ssn",
    "creditcard",
    "cardnumber",
    "cvv",
    "privatekey",
];

/// One named content pattern.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternConfig {
    pub name: String,
    pub pattern: String,
    /// Higher priorities run first. Equal priorities keep declaration order.
    #[serde(default)]
    pub priority: i32,
    /// Matches failing this check are left in place.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validator: Option<MatchValidator>,
}

impl PatternConfig {
    #[must_use]
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
            priority: 0,
            validator: None,
        }
    }

    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn with_validator(mut self, validator: MatchValidator) -> Self {
        self.validator = Some(validator);
        self
    }
}

/// Redaction settings as read from an external configuration source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RedactionConfig {
    pub enabled: bool,
    pub redaction_text: String,
    pub sensitive_fields: Vec<String>,
    pub patterns: Vec<PatternConfig>,
    pub mode: RedactionMode,
    pub field_strategies: BTreeMap<String, MaskStrategy>,
    pub field_matching: FieldMatchMode,
    /// Character hiding the concealed part of partially masked values.
    pub mask_char: char,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            redaction_text: REDACTED_PLACEHOLDER.to_string(),
            sensitive_fields: DEFAULT_SENSITIVE_FIELDS
                .iter()
                .map(ToString::to_string)
                .collect(),
            patterns: BUILTIN_PATTERNS.iter().map(BuiltinPattern::config).collect(),
            mode: RedactionMode::default(),
            field_strategies: BTreeMap::new(),
            field_matching: FieldMatchMode::default(),
            mask_char: MASK_CHAR,
        }
    }
}

impl RedactionConfig {
    /// A configuration with no sensitive fields and no patterns.
    ///
    /// Useful as a starting point when every rule should be spelled out.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            sensitive_fields: Vec::new(),
            patterns: Vec::new(),
            ..Self::default()
        }
    }

    /// Parses a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self, PolicyError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads configuration out of an already-parsed JSON document.
    pub fn from_json_value(value: serde_json::Value) -> Result<Self, PolicyError> {
        Ok(serde_json::from_value(value)?)
    }

    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_redaction_text(mut self, text: impl Into<String>) -> Self {
        self.redaction_text = text.into();
        self
    }

    #[must_use]
    pub fn with_sensitive_field(mut self, field: impl Into<String>) -> Self {
        self.sensitive_fields.push(field.into());
        self
    }

    /// Appends a pattern after every pattern already declared.
    #[must_use]
    pub fn with_pattern(mut self, name: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.patterns.push(PatternConfig::new(name, pattern));
        self
    }

    #[must_use]
    pub fn with_pattern_config(mut self, pattern: PatternConfig) -> Self {
        self.patterns.push(pattern);
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: RedactionMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_field_strategy(mut self, field: impl Into<String>, strategy: MaskStrategy) -> Self {
        self.field_strategies.insert(field.into(), strategy);
        self
    }

    #[must_use]
    pub fn with_field_matching(mut self, matching: FieldMatchMode) -> Self {
        self.field_matching = matching;
        self
    }

    #[must_use]
    pub fn with_mask_char(mut self, mask_char: char) -> Self {
        self.mask_char = mask_char;
        self
    }
}
