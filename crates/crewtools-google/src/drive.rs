//! Google Drive tools.
//!
//! [`DriveSearch`] queries files with Drive's search syntax and
//! [`ListDriveFiles`] pages through recent files.  Both hit the proxy's
//! file-listing endpoint with a `fields` projection and fold remote
//! failures into the family's `{success:false, error}` shape.

use async_trait::async_trait;
use crewtools_core::{CrewState, Result, Tool, ToolDefinition, ToolError};
use serde_json::{Value, json};
use tracing::debug;

use crate::config::GoogleServiceConfig;
use crate::proxy::{ProxyClient, failure_body};

/// Field projection for search results (includes the file size).
const SEARCH_FIELDS: &str = "files(id, name, mimeType, modifiedTime, size, webViewLink)";

/// Field projection for plain listings.
const LIST_FIELDS: &str = "files(id, name, mimeType, modifiedTime, webViewLink)";

/// Page size used when the caller does not ask for one.
const DEFAULT_PAGE_SIZE: &str = "25";

/// Shape a proxy listing response into the tool result.
///
/// `files` defaults to an empty array; `nextPageToken` is passed through
/// only when the backend sent one, and the key is absent otherwise.
fn file_listing(data: &Value) -> Value {
    let mut result = json!({
        "success": true,
        "files": data
            .get("files")
            .filter(|v| !v.is_null())
            .cloned()
            .unwrap_or_else(|| json!([])),
    });
    if let Some(token) = data.get("nextPageToken") {
        result["nextPageToken"] = token.clone();
    }
    result
}

// ---------------------------------------------------------------------------
// DriveSearch
// ---------------------------------------------------------------------------

/// Search Google Drive files using Drive query syntax.
pub struct DriveSearch {
    config: GoogleServiceConfig,
    state: Option<CrewState>,
    client: ProxyClient,
}

impl DriveSearch {
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
impl Tool for DriveSearch {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "DriveSearch".into(),
            description: "Search Google Drive files using Drive query syntax. For example, \
                          \"name contains 'budget'\" or \"mimeType = 'application/pdf'\" or \
                          \"modifiedTime > '2024-01-01'\"."
                .into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Drive search query"
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
                tool_name: "DriveSearch".into(),
                reason: "missing required string field `query`".into(),
            })?;
        let (token, base) = self.config.resolve_read(self.state.as_ref())?;

        let url = format!("{base}/service/google/drive/files");
        debug!(url = %url, query, "searching Drive files");
        let request = self
            .client
            .get(&url, &token)
            .query(&[("q", query), ("fields", SEARCH_FIELDS)]);

        match self.client.send(request, "Drive search failed").await {
            Ok(data) => Ok(file_listing(&data)),
            Err(message) => Ok(failure_body(message)),
        }
    }
}

// ---------------------------------------------------------------------------
// ListDriveFiles
// ---------------------------------------------------------------------------

/// List Drive files without a query filter, most recently modified first.
pub struct ListDriveFiles {
    config: GoogleServiceConfig,
    state: Option<CrewState>,
    client: ProxyClient,
}

impl ListDriveFiles {
    /// Create a listing tool over the given proxy configuration.
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
impl Tool for ListDriveFiles {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "ListDriveFiles".into(),
            description: "List files in Google Drive with optional pagination and sorting. \
                          Returns most recently modified files by default."
                .into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "pageSize": {
                        "type": "string",
                        "description": "Number of files to return per page (max: 25)"
                    }
                }
            }),
        }
    }

    async fn invoke(&self, args: Value) -> Result<Value> {
        // The proxy takes pageSize as a string; accept a number too rather
        // than silently falling back to the default.
        let page_size = match args.get("pageSize") {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => DEFAULT_PAGE_SIZE.to_string(),
        };
        let (token, base) = self.config.resolve_read(self.state.as_ref())?;

        let url = format!("{base}/service/google/drive/files");
        debug!(url = %url, page_size, "listing Drive files");
        let request = self
            .client
            .get(&url, &token)
            .query(&[("fields", LIST_FIELDS), ("pageSize", page_size.as_str())]);

        match self.client.send(request, "Failed to list Drive files").await {
            Ok(data) => Ok(file_listing(&data)),
            Err(message) => Ok(failure_body(message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- Definitions --

    #[test]
    fn drive_search_requires_query() {
        let tool = DriveSearch::new(GoogleServiceConfig::default());
        let def = tool.definition();
        assert_eq!(def.name, "DriveSearch");
        let required = def.parameters["required"].as_array().unwrap();
        assert!(required.contains(&json!("query")));
    }

    #[test]
    fn list_drive_files_has_no_required_fields() {
        let tool = ListDriveFiles::new(GoogleServiceConfig::default());
        let def = tool.definition();
        assert_eq!(def.name, "ListDriveFiles");
        assert!(def.parameters.get("required").is_none());
    }

    // -- Result shaping --

    #[test]
    fn file_listing_defaults_files_to_empty_array() {
        let shaped = file_listing(&json!({}));
        assert_eq!(shaped["success"], true);
        assert_eq!(shaped["files"], json!([]));
        assert!(shaped.get("nextPageToken").is_none());
    }

    #[test]
    fn file_listing_passes_next_page_token_through() {
        let shaped = file_listing(&json!({
            "files": [{"id": "f1"}],
            "nextPageToken": "tok-2"
        }));
        assert_eq!(shaped["files"][0]["id"], "f1");
        assert_eq!(shaped["nextPageToken"], "tok-2");
    }

    #[test]
    fn file_listing_treats_null_files_as_empty() {
        let shaped = file_listing(&json!({ "files": null }));
        assert_eq!(shaped["files"], json!([]));
    }

    // -- Parameter validation --

    #[tokio::test]
    async fn drive_search_rejects_missing_query() {
        let tool = DriveSearch::new(GoogleServiceConfig::default());
        let err = tool.invoke(json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidParams { .. }));
    }

    #[tokio::test]
    async fn drive_search_without_credentials_is_a_configuration_error() {
        let tool = DriveSearch::new(GoogleServiceConfig::default());
        let err = tool.invoke(json!({"query": "name contains 'x'"})).await.unwrap_err();
        assert!(matches!(err, ToolError::Configuration { .. }));
    }
}
