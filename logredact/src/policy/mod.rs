//! Redaction policy: configuration and its compiled, immutable form.
//!
//! This module provides:
//!
//! - **Configuration** (`config`): [`RedactionConfig`], the serde document a
//!   policy is built from.
//! - **Strategies** (`strategy`): the closed [`RedactionMode`],
//!   [`MaskStrategy`], [`FieldMatchMode`] and [`MatchValidator`] enums.
//! - **The policy**: [`RedactionPolicy`], built once at startup and shared
//!   read-only (usually behind an `Arc`) by every caller.
//!
//! # Example
//!
//! ```rust
//! use logredact::{RedactionConfig, RedactionPolicy};
//!
//! let policy = RedactionPolicy::from_config(
//!     &RedactionConfig::empty()
//!         .with_sensitive_field("password")
//!         .with_pattern("email", r"[\w.+-]+@[\w-]+\.[\w.]+"),
//! )
//! .unwrap();
//!
//! assert!(policy.matcher().is_sensitive("userPassword"));
//! assert_eq!(policy.patterns().redact_text("ping bob@example.com"), "ping [REDACTED]");
//! ```

mod config;
mod strategy;

pub use config::{DEFAULT_SENSITIVE_FIELDS, PatternConfig, REDACTED_PLACEHOLDER, RedactionConfig};
pub use strategy::{FieldMatchMode, MaskStrategy, MatchValidator, RedactionMode, UnknownVariant};

use crate::{error::PolicyError, mask::Masker, matcher::FieldMatcher, patterns::PatternEngine};

/// Compiled redaction rules.
///
/// Holds no interior mutability: a policy can be read from any number of
/// threads without synchronization.
#[derive(Clone, Debug)]
pub struct RedactionPolicy {
    enabled: bool,
    mode: RedactionMode,
    matcher: FieldMatcher,
    patterns: PatternEngine,
    masker: Masker,
}

impl RedactionPolicy {
    /// Builds a policy, compiling every pattern exactly once.
    ///
    /// Fails if a pattern does not compile, two patterns share a name, the
    /// placeholder is empty, or any pattern matches the placeholder.
    pub fn from_config(config: &RedactionConfig) -> Result<Self, PolicyError> {
        let patterns = PatternEngine::compile(&config.patterns, &config.redaction_text)?;
        let matcher = FieldMatcher::new(&config.sensitive_fields, config.field_matching);
        let masker = Masker::new(
            config.redaction_text.clone(),
            config.mode,
            &config.field_strategies,
            config.field_matching,
        )
        .with_mask_char(config.mask_char);

        tracing::debug!(
            enabled = config.enabled,
            mode = ?config.mode,
            field_matching = ?config.field_matching,
            sensitive_fields = matcher.len(),
            patterns = patterns.len(),
            field_strategies = config.field_strategies.len(),
            "redaction policy compiled"
        );

        Ok(Self {
            enabled: config.enabled,
            mode: config.mode,
            matcher,
            patterns,
            masker,
        })
    }

    /// Parses a JSON configuration document and builds the policy from it.
    pub fn from_json_str(json: &str) -> Result<Self, PolicyError> {
        Self::from_config(&RedactionConfig::from_json_str(json)?)
    }

    /// `false` when redaction is switched off or the mode is `Disabled`.
    pub fn is_active(&self) -> bool {
        self.enabled && self.mode != RedactionMode::Disabled
    }

    pub fn mode(&self) -> RedactionMode {
        self.mode
    }

    pub fn placeholder(&self) -> &str {
        self.patterns.placeholder()
    }

    pub fn matcher(&self) -> &FieldMatcher {
        &self.matcher
    }

    pub fn patterns(&self) -> &PatternEngine {
        &self.patterns
    }

    pub fn masker(&self) -> &Masker {
        &self.masker
    }
}

impl Default for RedactionPolicy {
    /// The built-in policy.
    ///
    /// Falls back to an inactive policy if the built-in patterns ever fail to
    /// compile, which the test suite rules out.
    fn default() -> Self {
        match Self::from_config(&RedactionConfig::default()) {
            Ok(policy) => policy,
            Err(err) => {
                tracing::error!(error = %err, "built-in redaction policy failed to compile");
                Self {
                    enabled: false,
                    mode: RedactionMode::Disabled,
                    matcher: FieldMatcher::new(std::iter::empty::<&str>(), FieldMatchMode::Contains),
                    patterns: PatternEngine::empty(REDACTED_PLACEHOLDER),
                    masker: Masker::new(
                        REDACTED_PLACEHOLDER,
                        RedactionMode::Disabled,
                        &std::collections::BTreeMap::new(),
                        FieldMatchMode::Contains,
                    ),
                }
            }
        }
    }
}
