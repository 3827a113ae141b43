//! Google service configuration.
//!
//! Every Google tool is backed by a self-hosted google-service proxy and
//! authenticates with OAuth tokens minted elsewhere.  The config carries
//! those values when the caller has them; anything left unset falls back to
//! the crew state at invocation time.

use crewtools_core::{CredentialSource, CrewState, Result, ToolError, env_keys, resolve_credentials};
use serde::{Deserialize, Serialize};
use url::Url;

/// Credentials and endpoint for the google-service proxy.
///
/// Every field is optional at construction; a missing field falls back to
/// the crew-state env key documented in [`crewtools_core::env_keys`] on
/// each invocation.  Immutable once constructed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleServiceConfig {
    /// OAuth access token, used by Drive, Gmail read, and Sheets calls.
    pub access_token: Option<String>,
    /// OAuth refresh token, used by the Gmail send call.
    pub refresh_token: Option<String>,
    /// Base URL of the google-service proxy (e.g. `http://localhost:8080`).
    pub api_url: Option<String>,
}

impl GoogleServiceConfig {
    /// Resolve the access token and proxy base URL for read-path calls.
    ///
    /// Re-run on every invocation; nothing is cached.
    pub(crate) fn resolve_read(&self, state: Option<&CrewState>) -> Result<(String, String)> {
        let [token, api_url] = resolve_credentials(
            [
                CredentialSource {
                    field: "access_token",
                    config: self.access_token.as_deref(),
                    env_key: env_keys::GOOGLE_ACCESS_TOKEN,
                },
                CredentialSource {
                    field: "api_url",
                    config: self.api_url.as_deref(),
                    env_key: env_keys::GOOGLE_SERVICE_API_URL,
                },
            ],
            state,
        )?;
        Ok((token, validate_base_url(&api_url)?))
    }

    /// Resolve the refresh token and proxy base URL for the send path.
    ///
    /// The proxy's send endpoint mints its own access token server-side, so
    /// it is the refresh token that goes on the wire.
    pub(crate) fn resolve_send(&self, state: Option<&CrewState>) -> Result<(String, String)> {
        let [token, api_url] = resolve_credentials(
            [
                CredentialSource {
                    field: "refresh_token",
                    config: self.refresh_token.as_deref(),
                    env_key: env_keys::GOOGLE_REFRESH_TOKEN,
                },
                CredentialSource {
                    field: "api_url",
                    config: self.api_url.as_deref(),
                    env_key: env_keys::GOOGLE_SERVICE_API_URL,
                },
            ],
            state,
        )?;
        Ok((token, validate_base_url(&api_url)?))
    }
}

/// Check that a resolved base URL parses, and strip any trailing slash so
/// path concatenation stays predictable.
fn validate_base_url(api_url: &str) -> Result<String> {
    Url::parse(api_url).map_err(|e| ToolError::Configuration {
        message: format!("`api_url` is not a valid URL: {e}"),
    })?;
    Ok(api_url.trim_end_matches('/').to_string())
}
