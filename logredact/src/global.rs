//! Process-wide policy slot.
//!
//! Install the policy once during startup; everything that redacts later
//! reads it through [`redactor`]. Until a policy is installed, [`redactor`]
//! hands out a pass-through [`Redactor`].

use std::sync::{Arc, OnceLock};

use crate::{engine::Redactor, policy::RedactionPolicy};

static POLICY: OnceLock<Arc<RedactionPolicy>> = OnceLock::new();

/// Installs the process-wide policy.
///
/// The slot can be filled once. A second call leaves the first policy in
/// place and returns the rejected one.
pub fn install(policy: Arc<RedactionPolicy>) -> Result<(), Arc<RedactionPolicy>> {
    POLICY.set(policy)?;
    tracing::debug!("process-wide redaction policy installed");
    Ok(())
}

/// The installed policy, if any.
pub fn policy() -> Option<Arc<RedactionPolicy>> {
    POLICY.get().cloned()
}

/// A redactor bound to the installed policy, or a pass-through one.
pub fn redactor() -> Redactor {
    policy().map_or_else(Redactor::disabled, Redactor::new)
}
