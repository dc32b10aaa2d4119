//! Partial-reveal primitives for string values.
//!
//! These are pure string transformations. They return `None` when the value
//! is too short (or the wrong shape) to reveal anything without exposing
//! most of it, and the caller falls back to full masking.

/// Default character used to mask sensitive characters.
pub const MASK_CHAR: char = '*';

/// Mask characters written in place of a hidden email local part.
const EMAIL_MASK_WIDTH: usize = 3;

/// Keeps the trailing characters visible and masks the rest.
///
/// Operates on Unicode scalar values.
#[derive(Clone, Copy, Debug)]
pub struct KeepConfig {
    /// Number of trailing characters to keep visible.
    visible_suffix: usize,
    /// Symbol used to mask the hidden prefix.
    mask_char: char,
}

impl KeepConfig {
    /// Keeps only the last `visible_suffix` scalar values.
    #[must_use]
    pub fn last(visible_suffix: usize) -> Self {
        Self {
            visible_suffix,
            mask_char: MASK_CHAR,
        }
    }

    /// Uses a specific masking character.
    #[must_use]
    pub fn with_mask_char(mut self, mask_char: char) -> Self {
        self.mask_char = mask_char;
        self
    }

    /// Masks everything but the visible suffix.
    ///
    /// Values no longer than the suffix would be shown in full, so they
    /// yield `None`.
    pub fn apply_to(&self, value: &str) -> Option<String> {
        let chars: Vec<char> = value.chars().collect();
        let total = chars.len();
        if total <= self.visible_suffix {
            return None;
        }

        let hidden = total - self.visible_suffix;
        let masked = std::iter::repeat_n(self.mask_char, hidden);
        Some(masked.chain(chars[hidden..].iter().copied()).collect())
    }
}

/// Masks the local part of an email address while preserving the domain.
///
/// The hidden portion is replaced by a fixed-width run of mask characters so
/// the output does not leak the local part's length.
#[derive(Clone, Copy, Debug)]
pub struct EmailConfig {
    /// Number of leading characters of the local part to keep visible.
    visible_prefix: usize,
    /// Symbol used to mask the local part.
    mask_char: char,
}

impl EmailConfig {
    /// Keeps the first `visible_prefix` chars of the local part.
    #[must_use]
    pub fn new(visible_prefix: usize) -> Self {
        Self {
            visible_prefix,
            mask_char: MASK_CHAR,
        }
    }

    /// Uses a specific masking character.
    #[must_use]
    pub fn with_mask_char(mut self, mask_char: char) -> Self {
        self.mask_char = mask_char;
        self
    }

    /// Applies the policy to an email address.
    ///
    /// Returns `None` for values that are not email-shaped or whose local
    /// part is not longer than the visible prefix.
    pub fn apply_to(&self, value: &str) -> Option<String> {
        let (local, domain) = split_email(value)?;
        if local.chars().count() <= self.visible_prefix {
            return None;
        }

        let visible: String = local.chars().take(self.visible_prefix).collect();
        let masked: String = std::iter::repeat_n(self.mask_char, EMAIL_MASK_WIDTH).collect();
        Some(format!("{visible}{masked}@{domain}"))
    }
}

/// Splits `local@domain`, requiring a non-empty local part and a dotted domain.
fn split_email(value: &str) -> Option<(&str, &str)> {
    let trimmed = value.trim();
    let (local, domain) = trimmed.rsplit_once('@')?;
    let dotted = domain
        .split('.')
        .filter(|label| !label.is_empty())
        .count()
        >= 2;
    if local.is_empty() || !dotted || domain.chars().any(char::is_whitespace) {
        return None;
    }
    Some((local, domain))
}

/// Which partial-reveal rule applies to a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PartialCategory {
    /// First character of the local part plus the full domain.
    Email,
    /// Last four characters.
    Trailing,
}

impl PartialCategory {
    /// Picks the category from the field name, then from the value's shape.
    ///
    /// A field named like an email address is always treated as one; a value
    /// under such a field that is not email-shaped is then fully masked.
    pub fn for_field(field: Option<&str>, value: &str) -> Self {
        if let Some(field) = field {
            let field = field.to_lowercase();
            if field.contains("mail") {
                return Self::Email;
            }
            if ["phone", "card", "account", "iban", "ssn", "mobile"]
                .iter()
                .any(|hint| field.contains(hint))
            {
                return Self::Trailing;
            }
        }
        if split_email(value).is_some() {
            Self::Email
        } else {
            Self::Trailing
        }
    }
}
