//! Errors raised while building a redaction policy.
//!
//! Only policy construction is fallible. Once a [`RedactionPolicy`] exists,
//! every redaction entrypoint is total: failures on the hot path degrade to
//! placeholder output instead of surfacing here.
//!
//! [`RedactionPolicy`]: crate::RedactionPolicy

use thiserror::Error;

/// Failure to turn a configuration document into a usable policy.
///
/// Any of these should abort startup: running with a partially compiled
/// pattern set silently weakens redaction.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// The configuration document could not be parsed.
    #[error("invalid redaction configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// A pattern failed to compile.
    #[error("redaction pattern `{name}` failed to compile: {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },

    /// Two patterns share a name.
    #[error("redaction pattern `{0}` is declared more than once")]
    DuplicatePattern(String),

    /// The placeholder text would itself be matched by a pattern.
    #[error("placeholder `{placeholder}` is matched by redaction pattern `{name}`")]
    PlaceholderNotImmune { name: String, placeholder: String },

    /// The placeholder text is empty.
    #[error("placeholder text must not be empty")]
    EmptyPlaceholder,
}
