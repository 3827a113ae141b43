//! WordPress connection settings.

use serde::{Deserialize, Serialize};

/// Connection settings for one WordPress site.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WordPressConfig {
    /// Site URL and Basic-auth credentials.
    pub credentials: WordPressCredentials,
    /// Accept invalid TLS certificates when talking to the site.
    ///
    /// Off by default.  Turning it on disables certificate verification
    /// for every call this tool makes, which is only appropriate for
    /// self-signed development installs.
    pub accept_invalid_certs: bool,
}

/// Basic-auth credentials for the WordPress REST API.
///
/// Every field is optional at construction; a missing field falls back to
/// the crew-state env key documented in [`crewtools_core::env_keys`] on
/// each invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WordPressCredentials {
    /// Site base URL (e.g. `https://blog.example.com`).
    pub url: Option<String>,
    /// Username the application password belongs to.
    pub username: Option<String>,
    /// Application password.
    pub password: Option<String>,
}
