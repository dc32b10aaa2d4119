//! Content patterns applied to free text and leaf strings.
//!
//! Patterns compose sequentially: each one rewrites the output of the one
//! before it. A redaction made by an earlier pattern therefore hides its
//! input from every later pattern, and the placeholder must not be matched
//! by any pattern or redaction would stop being idempotent.

use std::borrow::Cow;

use regex::{Captures, Regex};

use crate::{
    error::PolicyError,
    policy::{MatchValidator, PatternConfig},
};

/// A pattern shipped with the crate.
#[derive(Clone, Copy, Debug)]
pub struct BuiltinPattern {
    pub name: &'static str,
    pub pattern: &'static str,
    pub validator: Option<MatchValidator>,
}

impl BuiltinPattern {
    const fn new(name: &'static str, pattern: &'static str) -> Self {
        Self {
            name,
            pattern,
            validator: None,
        }
    }

    const fn validated(name: &'static str, pattern: &'static str, validator: MatchValidator) -> Self {
        Self {
            name,
            pattern,
            validator: Some(validator),
        }
    }

    pub fn config(&self) -> PatternConfig {
        let config = PatternConfig::new(self.name, self.pattern);
        match self.validator {
            Some(validator) => config.with_validator(validator),
            None => config,
        }
    }
}

/// Built-in patterns, most specific first.
///
/// None of these match bracketed uppercase placeholders such as `[REDACTED]`.
pub const BUILTIN_PATTERNS: &[BuiltinPattern] = &[
    BuiltinPattern::new(
        "private_key",
        r"-----BEGIN (?:[A-Z]+ )*PRIVATE KEY-----[\s\S]*?-----END (?:[A-Z]+ )*PRIVATE KEY-----",
    ),
    BuiltinPattern::new(
        "jwt",
        r"\beyJ[A-Za-z0-9_-]+\.eyJ[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+",
    ),
    BuiltinPattern::new("bearer_token", r"(?i)\bbearer\s+[A-Za-z0-9\-._~+/]+=*"),
    BuiltinPattern::new("aws_access_key", r"\b(?:AKIA|ASIA|ABIA|ACCA)[A-Z0-9]{16}\b"),
    BuiltinPattern::new(
        "api_key",
        r"\b(?:(?:sk|pk|rk)_(?:live|test)_[A-Za-z0-9]{16,}|gh[pousr]_[A-Za-z0-9]{36,}|xox[baprs]-[A-Za-z0-9-]{10,})\b",
    ),
    BuiltinPattern::new("email", r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}"),
    BuiltinPattern::new("ssn", r"\b\d{3}-\d{2}-\d{4}\b"),
    BuiltinPattern::validated(
        "credit_card",
        r"\b(?:\d[ -]?){12,18}\d\b",
        MatchValidator::Luhn,
    ),
];

/// Luhn (mod 10) checksum over the digits of `candidate`.
///
/// Separators are ignored. Only 13 to 19 digits, the range of payment card
/// numbers, can pass.
pub fn validate_luhn(candidate: &str) -> bool {
    let digits: Vec<u32> = candidate.chars().filter_map(|ch| ch.to_digit(10)).collect();
    if !(13..=19).contains(&digits.len()) {
        return false;
    }

    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &digit)| {
            if i % 2 == 1 {
                let doubled = digit * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                digit
            }
        })
        .sum();
    sum % 10 == 0
}

/// A compiled pattern and the name it was declared under.
#[derive(Clone, Debug)]
pub struct NamedPattern {
    name: String,
    regex: Regex,
    validator: Option<MatchValidator>,
}

impl NamedPattern {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn validator(&self) -> Option<MatchValidator> {
        self.validator
    }
}

/// The ordered, pre-compiled pattern set of a policy.
#[derive(Clone, Debug)]
pub struct PatternEngine {
    patterns: Vec<NamedPattern>,
    placeholder: String,
}

impl PatternEngine {
    /// Compiles `configs` once, ordering them by descending priority.
    ///
    /// The sort is stable, so patterns of equal priority keep their
    /// declaration order.
    pub fn compile(configs: &[PatternConfig], placeholder: &str) -> Result<Self, PolicyError> {
        if placeholder.is_empty() {
            return Err(PolicyError::EmptyPlaceholder);
        }

        let mut ordered: Vec<&PatternConfig> = configs.iter().collect();
        ordered.sort_by(|a, b| b.priority.cmp(&a.priority));

        let mut patterns: Vec<NamedPattern> = Vec::with_capacity(ordered.len());
        for config in ordered {
            if patterns.iter().any(|p| p.name == config.name) {
                return Err(PolicyError::DuplicatePattern(config.name.clone()));
            }
            let regex = Regex::new(&config.pattern).map_err(|source| PolicyError::InvalidPattern {
                name: config.name.clone(),
                source,
            })?;
            if regex.is_match(placeholder) {
                return Err(PolicyError::PlaceholderNotImmune {
                    name: config.name.clone(),
                    placeholder: placeholder.to_string(),
                });
            }
            patterns.push(NamedPattern {
                name: config.name.clone(),
                regex,
                validator: config.validator,
            });
        }

        Ok(Self {
            patterns,
            placeholder: placeholder.to_string(),
        })
    }

    /// An engine with no patterns; every text passes through unchanged.
    pub fn empty(placeholder: &str) -> Self {
        Self {
            patterns: Vec::new(),
            placeholder: placeholder.to_string(),
        }
    }

    /// Replaces every match of every pattern, in order, with the placeholder.
    pub fn redact_text(&self, text: &str) -> String {
        self.redact_cow(text).into_owned()
    }

    /// Like [`redact_text`](Self::redact_text) but borrows when nothing matched.
    ///
    /// A match rejected by its pattern's validator is kept verbatim.
    pub fn redact_cow<'a>(&self, text: &'a str) -> Cow<'a, str> {
        let mut current = Cow::Borrowed(text);
        for pattern in &self.patterns {
            let replaced = match pattern.validator {
                None => pattern
                    .regex
                    .replace_all(&current, regex::NoExpand(&self.placeholder)),
                Some(validator) => pattern.regex.replace_all(&current, |caps: &Captures<'_>| {
                    if validator.accepts(&caps[0]) {
                        self.placeholder.clone()
                    } else {
                        caps[0].to_string()
                    }
                }),
            };
            let next = match replaced {
                Cow::Borrowed(_) => continue,
                Cow::Owned(next) => next,
            };
            if next == *current {
                continue;
            }
            current = Cow::Owned(next);
        }
        current
    }

    /// Patterns in application order.
    pub fn patterns(&self) -> &[NamedPattern] {
        &self.patterns
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|p| p.name.as_str())
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
