//! Masking strategies for values under sensitive field names.
//!
//! - **`text`**: partial-reveal primitives (`KeepConfig`, `EmailConfig`)
//! - **`hash`**: the deterministic digest used by [`MaskStrategy::Hash`]
//!
//! The [`Masker`] resolves which strategy applies to a field and renders the
//! masked string. It never fails: values that cannot be partially revealed
//! fall back to the placeholder.

mod hash;
mod text;

use std::collections::BTreeMap;

pub use hash::{HASH_PREFIX, digest_hex};
pub use text::{EmailConfig, KeepConfig, MASK_CHAR, PartialCategory};

use crate::{
    matcher::normalize_field,
    policy::{FieldMatchMode, MaskStrategy, RedactionMode},
};

/// Applies a [`MaskStrategy`] to a value.
#[derive(Clone, Debug)]
pub struct Masker {
    placeholder: String,
    mode: RedactionMode,
    matching: FieldMatchMode,
    /// Normalized field name to strategy, longest names first.
    strategies: Vec<(String, MaskStrategy)>,
    keep: KeepConfig,
    email: EmailConfig,
}

impl Masker {
    pub fn new(
        placeholder: impl Into<String>,
        mode: RedactionMode,
        field_strategies: &BTreeMap<String, MaskStrategy>,
        matching: FieldMatchMode,
    ) -> Self {
        let mut strategies: Vec<(String, MaskStrategy)> = field_strategies
            .iter()
            .map(|(field, strategy)| (normalize_field(field.trim(), matching), *strategy))
            .filter(|(field, _)| !field.is_empty())
            .collect();
        strategies.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));

        Self {
            placeholder: placeholder.into(),
            mode,
            matching,
            strategies,
            keep: KeepConfig::last(4),
            email: EmailConfig::new(1),
        }
    }

    /// Masks partially revealed values with `mask_char` instead of `*`.
    #[must_use]
    pub fn with_mask_char(mut self, mask_char: char) -> Self {
        self.keep = self.keep.with_mask_char(mask_char);
        self.email = self.email.with_mask_char(mask_char);
        self
    }

    /// Resolves the strategy for a sensitive field.
    ///
    /// An explicit entry wins: first an exact (normalized) name, then, when
    /// matching by containment, the longest configured name contained in
    /// `field`. Otherwise the mode's default applies. Returns `None` when
    /// redaction is disabled.
    pub fn strategy_for(&self, field: &str) -> Option<MaskStrategy> {
        let default = self.mode.default_strategy()?;
        let name = normalize_field(field, self.matching);

        if let Some((_, strategy)) = self.strategies.iter().find(|(key, _)| *key == name) {
            return Some(*strategy);
        }
        let contained = self.strategies.iter().find(|(key, _)| {
            self.matching == FieldMatchMode::Contains && name.contains(key.as_str())
        });
        Some(contained.map_or(default, |(_, strategy)| *strategy))
    }

    /// Masks `value` with `strategy`, without a field-name hint.
    pub fn mask(&self, value: &str, strategy: MaskStrategy) -> String {
        self.render(None, value, strategy)
    }

    /// Masks the value of a sensitive field using its resolved strategy.
    pub fn mask_field(&self, field: &str, value: &str) -> String {
        match self.strategy_for(field) {
            Some(strategy) => self.render(Some(field), value, strategy),
            None => value.to_string(),
        }
    }

    fn render(&self, field: Option<&str>, value: &str, strategy: MaskStrategy) -> String {
        if self.mode == RedactionMode::Disabled {
            return value.to_string();
        }
        match strategy {
            MaskStrategy::FullMask => self.placeholder.clone(),
            MaskStrategy::PartialMask => self.partial(field, value),
            MaskStrategy::Hash => digest_hex(value),
            MaskStrategy::Length => format!("<{} chars>", value.chars().count()),
        }
    }

    fn partial(&self, field: Option<&str>, value: &str) -> String {
        let revealed = match PartialCategory::for_field(field, value) {
            PartialCategory::Email => self.email.apply_to(value),
            PartialCategory::Trailing => self.keep.apply_to(value),
        };
        revealed.unwrap_or_else(|| self.placeholder.clone())
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn mode(&self) -> RedactionMode {
        self.mode
    }
}
