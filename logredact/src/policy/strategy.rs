//! Closed sets of redaction behaviors.
//!
//! Each enum deserializes case-insensitively from the names used in
//! configuration documents and serializes back to its camelCase name.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A configuration string that does not name a known variant.
#[derive(Debug, Error)]
#[error("unknown {kind} `{value}`; expected one of: {expected}")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
    expected: &'static str,
}

fn normalize(value: &str) -> String {
    value
        .chars()
        .filter(|ch| !matches!(ch, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Global redaction mode.
///
/// `Disabled` turns every entrypoint into an identity function. The other
/// modes choose the default [`MaskStrategy`] for sensitive fields that have
/// no explicit strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "String")]
pub enum RedactionMode {
    Disabled,
    #[default]
    Full,
    Partial,
    Custom,
}

impl RedactionMode {
    /// The strategy applied to a sensitive field without an explicit entry.
    ///
    /// Returns `None` for [`RedactionMode::Disabled`].
    #[must_use]
    pub fn default_strategy(self) -> Option<MaskStrategy> {
        match self {
            RedactionMode::Disabled => None,
            RedactionMode::Full | RedactionMode::Custom => Some(MaskStrategy::FullMask),
            RedactionMode::Partial => Some(MaskStrategy::PartialMask),
        }
    }
}

impl FromStr for RedactionMode {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize(value).as_str() {
            "disabled" | "none" | "off" => Ok(Self::Disabled),
            "full" => Ok(Self::Full),
            "partial" => Ok(Self::Partial),
            "custom" => Ok(Self::Custom),
            _ => Err(UnknownVariant {
                kind: "redaction mode",
                value: value.to_string(),
                expected: "disabled, full, partial, custom",
            }),
        }
    }
}

impl TryFrom<String> for RedactionMode {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// How a sensitive value is rewritten.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "String")]
pub enum MaskStrategy {
    /// Replace the value with the placeholder text.
    FullMask,
    /// Reveal a category-specific fragment (email domain, trailing digits).
    PartialMask,
    /// Replace the value with a stable one-way digest.
    Hash,
    /// Replace the value with its length, e.g. `<8 chars>`.
    Length,
}

impl FromStr for MaskStrategy {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize(value).as_str() {
            "fullmask" | "full" | "redact" => Ok(Self::FullMask),
            "partialmask" | "partial" | "mask" => Ok(Self::PartialMask),
            "hash" | "sha256" => Ok(Self::Hash),
            "length" | "len" => Ok(Self::Length),
            _ => Err(UnknownVariant {
                kind: "mask strategy",
                value: value.to_string(),
                expected: "fullMask, partialMask, hash, length",
            }),
        }
    }
}

impl TryFrom<String> for MaskStrategy {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for MaskStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MaskStrategy::FullMask => "fullMask",
            MaskStrategy::PartialMask => "partialMask",
            MaskStrategy::Hash => "hash",
            MaskStrategy::Length => "length",
        };
        f.write_str(name)
    }
}

/// How field names are compared against the sensitive field list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "String")]
pub enum FieldMatchMode {
    /// Case-insensitive substring containment: `userPassword` matches
    /// `password`, and so does `passwordResetEnabled`.
    #[default]
    Contains,
    /// Case-insensitive equality after dropping `_`, `-`, `.` and spaces:
    /// `api_key` matches `apiKey` but `apiKeyRotation` does not.
    Exact,
}

impl FromStr for FieldMatchMode {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize(value).as_str() {
            "contains" | "substring" => Ok(Self::Contains),
            "exact" | "equals" => Ok(Self::Exact),
            _ => Err(UnknownVariant {
                kind: "field matching mode",
                value: value.to_string(),
                expected: "contains, exact",
            }),
        }
    }
}

impl TryFrom<String> for FieldMatchMode {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A check a pattern match must pass before it is redacted.
///
/// Lets a broad pattern stay broad without swallowing look-alikes: a
/// 13-digit millisecond timestamp has the shape of a card number but fails
/// the Luhn checksum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "String")]
pub enum MatchValidator {
    /// Digits of the match must pass the Luhn checksum used by payment cards.
    Luhn,
}

impl MatchValidator {
    /// Returns `true` if `candidate` should be redacted.
    #[must_use]
    pub fn accepts(self, candidate: &str) -> bool {
        match self {
            MatchValidator::Luhn => crate::patterns::validate_luhn(candidate),
        }
    }
}

impl FromStr for MatchValidator {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match normalize(value).as_str() {
            "luhn" | "mod10" => Ok(Self::Luhn),
            _ => Err(UnknownVariant {
                kind: "match validator",
                value: value.to_string(),
                expected: "luhn",
            }),
        }
    }
}

impl TryFrom<String> for MatchValidator {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
