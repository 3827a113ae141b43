//! Documented crew-state env keys.
//!
//! Tools fall back to these keys in the crew state's `env` map when the
//! corresponding config field is not set.

/// Google OAuth access token, used by the Drive, Gmail read, and Sheets tools.
pub const GOOGLE_ACCESS_TOKEN: &str = "GOOGLE_ACCESS_TOKEN";

/// Google OAuth refresh token, used by the Gmail send tool.
pub const GOOGLE_REFRESH_TOKEN: &str = "GOOGLE_REFRESH_TOKEN";

/// Base URL of the self-hosted google-service proxy.
pub const GOOGLE_SERVICE_API_URL: &str = "GOOGLE_SERVICE_API_URL";

/// WordPress site base URL (scheme and host, no trailing path).
pub const WORDPRESS_URL: &str = "WORDPRESS_URL";

/// WordPress username for Basic auth.
pub const WORDPRESS_USERNAME: &str = "WORDPRESS_USERNAME";

/// WordPress application password for Basic auth.
pub const WORDPRESS_PASSWORD: &str = "WORDPRESS_PASSWORD";
