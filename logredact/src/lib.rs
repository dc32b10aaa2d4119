//! Policy-driven redaction for log records and trace spans.
//!
//! This crate separates:
//! - **Policy**: what is sensitive (field names, content patterns) and how it
//!   is masked, compiled once into an immutable [`RedactionPolicy`].
//! - **Redaction**: the [`Redactor`] entrypoints that apply a policy to text,
//!   JSON documents, serializable values and field maps.
//! - **Interceptors**: a `slog` drain decorator and a `tracing` span layer
//!   that redact every record and span before it is handed on.
//!
//! Detection works two ways. A field whose *name* is sensitive has its whole
//! value masked, whatever it contains. Every other string is scanned by the
//! content patterns, applied in order.
//!
//! What this crate does not do:
//! - ship, store or format logs
//! - install a global logger or subscriber
//!
//! ```rust
//! use logredact::{RedactionConfig, RedactionPolicy, Redactor};
//! use serde_json::json;
//!
//! let policy = RedactionPolicy::from_config(
//!     &RedactionConfig::empty()
//!         .with_sensitive_field("password")
//!         .with_pattern("email", r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}"),
//! )
//! .unwrap();
//! let redactor = Redactor::from(policy);
//!
//! let redacted = redactor.redact_structured(json!({
//!     "username": "alice",
//!     "password": "p@ss",
//!     "bio": "mail me at alice@example.com",
//! }));
//! assert_eq!(
//!     redacted,
//!     json!({
//!         "username": "alice",
//!         "password": "[REDACTED]",
//!         "bio": "mail me at [REDACTED]",
//!     })
//! );
//! ```

// <https://doc.rust-lang.org/rustc/lints/listing/allowed-by-default.html>
#![warn(
    anonymous_parameters,
    bare_trait_objects,
    elided_lifetimes_in_paths,
    missing_copy_implementations,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces
)]
// <https://rust-lang.github.io/rust-clippy/stable>
#![warn(
    clippy::all,
    clippy::cargo,
    clippy::dbg_macro,
    clippy::float_cmp_const,
    clippy::get_unwrap,
    clippy::mem_forget,
    clippy::nursery,
    clippy::pedantic,
    clippy::todo,
    clippy::unwrap_used,
    clippy::uninlined_format_args
)]
// Allow some clippy lints
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions,
    clippy::must_use_candidate,
    clippy::needless_pass_by_value,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::option_if_let_else,
    clippy::return_self_not_must_use
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::non_ascii_literal, clippy::unwrap_used))]

mod engine;
mod error;
pub mod global;
pub mod mask;
mod matcher;
mod patterns;
pub mod policy;
mod walker;

#[cfg(feature = "slog")]
pub mod slog;
#[cfg(feature = "tracing")]
pub mod tracing;

pub use engine::Redactor;
pub use error::PolicyError;
pub use mask::{MASK_CHAR, Masker};
pub use matcher::FieldMatcher;
pub use patterns::{BUILTIN_PATTERNS, BuiltinPattern, NamedPattern, PatternEngine, validate_luhn};
pub use policy::{
    DEFAULT_SENSITIVE_FIELDS, FieldMatchMode, MaskStrategy, MatchValidator, PatternConfig,
    REDACTED_PLACEHOLDER, RedactionConfig, RedactionMode, RedactionPolicy,
};
#[cfg(feature = "slog")]
pub use self::slog::RedactingDrain;
#[cfg(feature = "tracing")]
pub use self::tracing::{RedactingSpanLayer, SpanData, SpanEvent, SpanExporter};
pub use walker::DocumentWalker;
