//! WordPress post creation.
//!
//! [`WordPressPost`] creates a post through the WordPress REST API with
//! HTTP Basic auth.  Unlike the Google proxy family, this tool propagates
//! every failure as an error: a non-2xx response becomes
//! [`ToolError::Api`] carrying the response body, a network failure
//! becomes [`ToolError::Transport`], and missing credentials surface as
//! [`ToolError::Configuration`] before any request is made.

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use crewtools_core::{
    CredentialSource, CrewState, Result, Tool, ToolDefinition, ToolError, env_keys,
    resolve_credentials,
};
use serde_json::{Value, json};
use tracing::debug;
use url::Url;

use crate::config::WordPressConfig;

/// Post status used when the caller does not ask for one.
const DEFAULT_STATUS: &str = "draft";

/// Create a new post on a WordPress site.
pub struct WordPressPost {
    config: WordPressConfig,
    state: Option<CrewState>,
    client: reqwest::Client,
}

impl WordPressPost {
    /// Create a posting tool for the given site configuration.
    pub fn new(config: WordPressConfig) -> Self {
        let client = build_client(config.accept_invalid_certs);
        Self {
            config,
            state: None,
            client,
        }
    }

    /// Attach a crew state consulted for credentials the config omits.
    pub fn with_state(mut self, state: CrewState) -> Self {
        self.state = Some(state);
        self
    }

    /// Resolve the site URL and Basic-auth pair for one invocation.
    fn resolve(&self) -> Result<(String, String, String)> {
        let creds = &self.config.credentials;
        let [url, username, password] = resolve_credentials(
            [
                CredentialSource {
                    field: "url",
                    config: creds.url.as_deref(),
                    env_key: env_keys::WORDPRESS_URL,
                },
                CredentialSource {
                    field: "username",
                    config: creds.username.as_deref(),
                    env_key: env_keys::WORDPRESS_USERNAME,
                },
                CredentialSource {
                    field: "password",
                    config: creds.password.as_deref(),
                    env_key: env_keys::WORDPRESS_PASSWORD,
                },
            ],
            self.state.as_ref(),
        )?;
        Url::parse(&url).map_err(|e| ToolError::Configuration {
            message: format!("`url` is not a valid URL: {e}"),
        })?;
        Ok((url.trim_end_matches('/').to_string(), username, password))
    }
}

#[async_trait]
impl Tool for WordPressPost {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "PostToWordPress".into(),
            description: "Creates a new post on WordPress with the given title and content".into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "title": {
                        "type": "string",
                        "description": "The title of the WordPress post"
                    },
                    "content": {
                        "type": "string",
                        "description": "The content of the WordPress post (can include HTML)"
                    },
                    "status": {
                        "type": "string",
                        "enum": ["draft", "publish"],
                        "description": "Whether to publish the post immediately or save as draft"
                    }
                },
                "required": ["title", "content"]
            }),
        }
    }

    async fn invoke(&self, args: Value) -> Result<Value> {
        let title = args
            .get("title")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolError::InvalidParams {
                tool_name: "PostToWordPress".into(),
                reason: "missing required string field `title`".into(),
            })?;
        let content = args
            .get("content")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolError::InvalidParams {
                tool_name: "PostToWordPress".into(),
                reason: "missing required string field `content`".into(),
            })?;
        let status = args
            .get("status")
            .and_then(|v| v.as_str())
            .unwrap_or(DEFAULT_STATUS);

        let (site, username, password) = self.resolve()?;
        let auth = STANDARD.encode(format!("{username}:{password}"));

        let url = format!("{site}/wp-json/wp/v2/posts");
        debug!(url = %url, title, status, "creating WordPress post");
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Basic {auth}"))
            .header("Content-Type", "application/json")
            .json(&json!({
                "title": title,
                "content": content,
                "status": status,
            }))
            .send()
            .await
            .map_err(|e| ToolError::Transport {
                message: format!("Failed to post to WordPress: {e}"),
            })?;

        let http_status = response.status();
        if !http_status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ToolError::Api {
                service: "WordPress".into(),
                message: body,
            });
        }

        let post: Value = response.json().await.map_err(|e| ToolError::Transport {
            message: format!("Failed to post to WordPress: {e}"),
        })?;
        Ok(post_result(&post))
    }
}

/// Build the HTTP client, optionally accepting invalid certificates.
fn build_client(accept_invalid_certs: bool) -> reqwest::Client {
    let mut builder = reqwest::Client::builder().user_agent("crewtools/0.1");
    if accept_invalid_certs {
        builder = builder.danger_accept_invalid_certs(true);
    }
    builder.build().unwrap_or_default()
}

/// Shape the created post into the tool result, renaming `link` to `url`.
fn post_result(post: &Value) -> Value {
    let mut result = serde_json::Map::new();
    if let Some(id) = post.get("id") {
        result.insert("id".into(), id.clone());
    }
    if let Some(link) = post.get("link") {
        result.insert("url".into(), link.clone());
    }
    if let Some(status) = post.get("status") {
        result.insert("status".into(), status.clone());
    }
    Value::Object(result)
}
