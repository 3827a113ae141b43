//! Shared plumbing for the proxy-backed Google tools.
//!
//! The google-service proxy speaks plain JSON over HTTP with a bearer
//! token.  Remote failures are not propagated as errors by this family:
//! callers fold the message produced here into their `{success:false,
//! error}` result shape.

use serde_json::{Value, json};

/// Thin wrapper around [`reqwest::Client`] with the proxy's header
/// conventions.
pub(crate) struct ProxyClient {
    client: reqwest::Client,
}

impl ProxyClient {
    pub(crate) fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent("crewtools/0.1")
            .build()
            .unwrap_or_default();
        Self { client }
    }

    /// Build a GET request with the proxy's standard headers.
    pub(crate) fn get(&self, url: &str, token: &str) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .header("Authorization", format!("Bearer {token}"))
            .header("Content-Type", "application/json")
    }

    /// Build a POST request with the proxy's standard headers.
    pub(crate) fn post(&self, url: &str, token: &str) -> reqwest::RequestBuilder {
        self.client
            .post(url)
            .header("Authorization", format!("Bearer {token}"))
            .header("Content-Type", "application/json")
    }

    /// Send a request and parse the 2xx JSON body.
    ///
    /// On failure the `Err` carries the message the caller folds into its
    /// failure result: non-2xx statuses get the tool's `error_prefix` plus
    /// the status text, network and decode failures carry the underlying
    /// error message as-is.
    pub(crate) async fn send(
        &self,
        request: reqwest::RequestBuilder,
        error_prefix: &str,
    ) -> std::result::Result<Value, String> {
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return Err(e.to_string()),
        };

        let status = response.status();
        if !status.is_success() {
            let status_text = status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| status.as_u16().to_string());
            return Err(format!("{error_prefix}: {status_text}"));
        }

        response.json::<Value>().await.map_err(|e| e.to_string())
    }
}

/// The proxy family's failure shape.
pub(crate) fn failure_body(message: String) -> Value {
    json!({ "success": false, "error": message })
}
