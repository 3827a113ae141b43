//! Gmail tools.
//!
//! [`GmailSearch`] passes Gmail search-operator queries through verbatim,
//! [`GmailSend`] builds and transmits a base64url-encoded RFC 2822 message,
//! and [`GetGmailMessageById`] fetches a single message.  The send path
//! authenticates with the refresh token; the proxy's send endpoint mints
//! its own access token server-side.

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use crewtools_core::{CrewState, Result, Tool, ToolDefinition, ToolError};
use serde_json::{Value, json};
use tracing::debug;

use crate::config::GoogleServiceConfig;
use crate::proxy::{ProxyClient, failure_body};

// ---------------------------------------------------------------------------
// Raw message construction
// ---------------------------------------------------------------------------

/// Assemble the RFC 2822 message the send endpoint expects.
///
/// Header lines and body are joined with CRLF.  When `from` is `None` the
/// `From` header is omitted and the service fills in the authenticated
/// sender.
fn build_raw_email(from: Option<&str>, to: &str, subject: &str, body: &str) -> String {
    let mut lines = Vec::with_capacity(7);
    if let Some(from) = from {
        lines.push(format!("From: {from}"));
    }
    lines.push(format!("To: {to}"));
    lines.push(r#"Content-Type: text/plain; charset="UTF-8""#.to_string());
    lines.push("MIME-Version: 1.0".to_string());
    lines.push(format!("Subject: {subject}"));
    lines.push(String::new());
    lines.push(body.to_string());
    lines.join("\r\n")
}

/// URL-safe base64 without padding, the wire format for raw messages.
fn encode_raw_email(raw: &str) -> String {
    URL_SAFE_NO_PAD.encode(raw)
}

// ---------------------------------------------------------------------------
// Result shaping
// ---------------------------------------------------------------------------

/// Shape a search response: `messages` defaults to an empty array and
/// `resultSizeEstimate` to zero.
fn search_result(data: &Value) -> Value {
    json!({
        "success": true,
        "messages": data
            .get("messages")
            .filter(|v| !v.is_null())
            .cloned()
            .unwrap_or_else(|| json!([])),
        "resultSizeEstimate": data
            .get("resultSizeEstimate")
            .filter(|v| !v.is_null())
            .cloned()
            .unwrap_or_else(|| json!(0)),
    })
}

/// Shape a send response, renaming the service's `id` to `messageId` and
/// carrying `threadId`/`labelIds` through only when present.
fn send_result(data: &Value) -> Value {
    let mut result = json!({ "success": true });
    if let Some(id) = data.get("id") {
        result["messageId"] = id.clone();
    }
    if let Some(thread_id) = data.get("threadId") {
        result["threadId"] = thread_id.clone();
    }
    if let Some(label_ids) = data.get("labelIds") {
        result["labelIds"] = label_ids.clone();
    }
    result
}

// ---------------------------------------------------------------------------
// GmailSearch
// ---------------------------------------------------------------------------

/// Search Gmail messages with Gmail's native query operators.
pub struct GmailSearch {
    config: GoogleServiceConfig,
    state: Option<CrewState>,
    client: ProxyClient,
}

impl GmailSearch {
    /// Create a search tool over the given proxy configuration.
    pub fn new(config: GoogleServiceConfig) -> Self {
        Self {
            config,
            state: None,
            client: ProxyClient::new(),
        }
    }

    /// Attach a crew state consulted for credentials the config omits.
    pub fn with_state(mut self, state: CrewState) -> Self {
        self.state = Some(state);
        self
    }
}

#[async_trait]
impl Tool for GmailSearch {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "GmailSearch".into(),
            description: "Search google workspace emails using the Gmail search query format. \
                          For example, \"from:john@example.com\" or \"is:unread\" or \
                          \"label:inbox\" or \"after:2025/01/01\" or a combination of these."
                .into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Gmail search query"
                    }
                },
                "required": ["query"]
            }),
        }
    }

    async fn invoke(&self, args: Value) -> Result<Value> {
        let query = args
            .get("query")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolError::InvalidParams {
                tool_name: "GmailSearch".into(),
                reason: "missing required string field `query`".into(),
            })?;
        let (token, base) = self.config.resolve_read(self.state.as_ref())?;

        let url = format!("{base}/service/google/gmail/search");
        debug!(url = %url, query, "searching Gmail messages");
        let request = self.client.get(&url, &token).query(&[("q", query)]);

        match self.client.send(request, "Gmail search failed").await {
            Ok(data) => Ok(search_result(&data)),
            Err(message) => Ok(failure_body(message)),
        }
    }
}

// ---------------------------------------------------------------------------
// GmailSend
// ---------------------------------------------------------------------------

/// Send a plain-text email through the proxy's Gmail send endpoint.
pub struct GmailSend {
    config: GoogleServiceConfig,
    state: Option<CrewState>,
    client: ProxyClient,
}

impl GmailSend {
    /// Create a send tool over the given proxy configuration.
    pub fn new(config: GoogleServiceConfig) -> Self {
        Self {
            config,
            state: None,
            client: ProxyClient::new(),
        }
    }

    /// Attach a crew state consulted for credentials the config omits.
    pub fn with_state(mut self, state: CrewState) -> Self {
        self.state = Some(state);
        self
    }
}

#[async_trait]
impl Tool for GmailSend {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "GmailSend".into(),
            description: "Send an email using Gmail".into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "from": {
                        "type": "string",
                        "description": "Email address of the sender"
                    },
                    "to": {
                        "type": "string",
                        "description": "Email address of the recipient"
                    },
                    "subject": {
                        "type": "string",
                        "description": "Subject of the email"
                    },
                    "body": {
                        "type": "string",
                        "description": "Body of the email"
                    }
                },
                "required": ["to", "subject", "body"]
            }),
        }
    }

    async fn invoke(&self, args: Value) -> Result<Value> {
        let from = args.get("from").and_then(|v| v.as_str());
        let to = required_str(&args, "to", "GmailSend")?;
        let subject = required_str(&args, "subject", "GmailSend")?;
        let body = required_str(&args, "body", "GmailSend")?;
        let (refresh_token, base) = self.config.resolve_send(self.state.as_ref())?;

        let raw = build_raw_email(from, to, subject, body);
        let encoded = encode_raw_email(&raw);

        let url = format!("{base}/service/google/gmail/send");
        debug!(url = %url, to, subject, "sending email");
        let request = self
            .client
            .post(&url, &refresh_token)
            .json(&json!({ "raw": encoded }));

        match self.client.send(request, "Failed to send email").await {
            Ok(data) => Ok(send_result(&data)),
            Err(message) => Ok(failure_body(message)),
        }
    }
}

// ---------------------------------------------------------------------------
// GetGmailMessageById
// ---------------------------------------------------------------------------

/// Fetch one Gmail message by its id.
pub struct GetGmailMessageById {
    config: GoogleServiceConfig,
    state: Option<CrewState>,
    client: ProxyClient,
}

impl GetGmailMessageById {
    /// Create a message-fetch tool over the given proxy configuration.
    pub fn new(config: GoogleServiceConfig) -> Self {
        Self {
            config,
            state: None,
            client: ProxyClient::new(),
        }
    }

    /// Attach a crew state consulted for credentials the config omits.
    pub fn with_state(mut self, state: CrewState) -> Self {
        self.state = Some(state);
        self
    }
}

#[async_trait]
impl Tool for GetGmailMessageById {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "GetGmailMessageById".into(),
            description: "Get a single Gmail message by its id".into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "messageId": {
                        "type": "string",
                        "description": "The id of the message to fetch"
                    }
                },
                "required": ["messageId"]
            }),
        }
    }

    async fn invoke(&self, args: Value) -> Result<Value> {
        let message_id = required_str(&args, "messageId", "GetGmailMessageById")?;
        let (token, base) = self.config.resolve_read(self.state.as_ref())?;

        let url = format!("{base}/service/google/gmail/message");
        debug!(url = %url, message_id, "fetching Gmail message");
        let request = self.client.get(&url, &token).query(&[("id", message_id)]);

        match self.client.send(request, "Failed to get email message").await {
            Ok(data) => Ok(json!({ "success": true, "message": data })),
            Err(message) => Ok(failure_body(message)),
        }
    }
}

/// Pull a required string field out of the arguments.
fn required_str<'a>(args: &'a Value, field: &str, tool_name: &str) -> Result<&'a str> {
    args.get(field)
        .and_then(|v| v.as_str())
        .ok_or_else(|| ToolError::InvalidParams {
            tool_name: tool_name.into(),
            reason: format!("missing required string field `{field}`"),
        })
}
