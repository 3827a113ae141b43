//! Credential resolution.
//!
//! One resolution policy applied uniformly across every tool: an explicit
//! config value wins, then the crew-state `env` map under a documented
//! key, otherwise the field is missing.  Empty strings count as absent.
//! Resolution is re-run on every invocation so state changes between calls
//! are picked up; nothing is cached.

use crate::error::{Result, ToolError};
use crate::state::CrewState;

/// One credential a tool needs, with the two places it may come from.
#[derive(Debug, Clone, Copy)]
pub struct CredentialSource<'a> {
    /// Field name used in error messages (e.g. `access_token`).
    pub field: &'a str,
    /// Explicit config value, if any.
    pub config: Option<&'a str>,
    /// Crew-state env key consulted when the config value is absent.
    pub env_key: &'a str,
}

/// Resolve a batch of credentials in declaration order.
///
/// Fails with a single [`ToolError::Configuration`] naming every missing
/// field together with both sources it was looked up in, so a caller can
/// fix all of its configuration in one pass.
pub fn resolve_credentials<const N: usize>(
    sources: [CredentialSource<'_>; N],
    state: Option<&CrewState>,
) -> Result<[String; N]> {
    let mut resolved: [String; N] = [const { String::new() }; N];
    let mut missing = Vec::new();

    for (slot, source) in resolved.iter_mut().zip(sources.iter()) {
        match lookup(source, state) {
            Some(value) => *slot = value,
            None => missing.push(format!(
                "`{}` (config field or crew state key `{}`)",
                source.field, source.env_key
            )),
        }
    }

    if missing.is_empty() {
        Ok(resolved)
    } else {
        Err(ToolError::Configuration {
            message: format!("missing credentials: {}", missing.join(", ")),
        })
    }
}

/// Look up a single credential, config first, then crew state.
fn lookup(source: &CredentialSource<'_>, state: Option<&CrewState>) -> Option<String> {
    if let Some(value) = source.config
        && !value.is_empty()
    {
        return Some(value.to_string());
    }
    state
        .and_then(|s| s.env_var(source.env_key))
        .filter(|v| !v.is_empty())
}
