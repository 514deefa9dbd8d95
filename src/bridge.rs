//! Environment bridge.
//!
//! Translates a [`ResolvedInvocation`] into the child process's environment
//! overlay. Keys follow the fixed convention `usage_<normalized_name>`; the
//! overlay is an explicit list handed to process creation and is never
//! written into the runner's own environment, so concurrent or repeated
//! invocations cannot interfere with each other.

use crate::matcher::ResolvedInvocation;

/// Prefix of every bridged environment variable.
pub const ENV_PREFIX: &str = "usage_";

/// Environment key for a logical flag/arg name: `usage_` plus the
/// lower-cased name with every non-alphanumeric character mapped to `_`.
#[must_use]
pub fn env_key(name: &str) -> String {
    let normalized: String = name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{ENV_PREFIX}{normalized}")
}

/// Build the environment overlay for a resolved invocation, in declaration
/// order. Merged over the inherited environment at spawn time; on key
/// collision the resolved value wins.
#[must_use]
pub fn env_overlay(resolved: &ResolvedInvocation) -> Vec<(String, String)> {
    resolved
        .iter()
        .map(|(name, value)| (env_key(name), value.to_string()))
        .collect()
}
