//! Google Sheets tools.
//!
//! [`ListSheets`] returns the sheet metadata of one spreadsheet and
//! [`GetData`] reads a cell grid from a named sheet, optionally restricted
//! to an A1 range.  Unlike the Drive and Gmail tools, 2xx proxy responses
//! are returned to the caller as-is, without a wrapping result object.

use async_trait::async_trait;
use crewtools_core::{CrewState, Result, Tool, ToolDefinition, ToolError};
use serde_json::{Value, json};
use tracing::debug;

use crate::config::GoogleServiceConfig;
use crate::proxy::{ProxyClient, failure_body};

// ---------------------------------------------------------------------------
// ListSheets
// ---------------------------------------------------------------------------

/// List all sheets within a Google Spreadsheet.
pub struct ListSheets {
    config: GoogleServiceConfig,
    state: Option<CrewState>,
    client: ProxyClient,
}

impl ListSheets {
    /// Create a sheet-listing tool over the given proxy configuration.
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
impl Tool for ListSheets {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "ListSheets".into(),
            description: "List all sheets within a Google Spreadsheet".into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "spreadsheet_id": {
                        "type": "string",
                        "description": "The ID of the spreadsheet"
                    }
                },
                "required": ["spreadsheet_id"]
            }),
        }
    }

    async fn invoke(&self, args: Value) -> Result<Value> {
        let spreadsheet_id = args
            .get("spreadsheet_id")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolError::InvalidParams {
                tool_name: "ListSheets".into(),
                reason: "missing required string field `spreadsheet_id`".into(),
            })?;
        let (token, base) = self.config.resolve_read(self.state.as_ref())?;

        // The proxy's sheets paths end with a slash before the query string.
        let url = format!("{base}/service/google/sheets/sheets/");
        debug!(url = %url, spreadsheet_id, "listing spreadsheet sheets");
        let request = self
            .client
            .get(&url, &token)
            .query(&[("spreadsheet_id", spreadsheet_id)]);

        match self.client.send(request, "Failed to list sheets").await {
            Ok(data) => Ok(data),
            Err(message) => Ok(failure_body(message)),
        }
    }
}

// ---------------------------------------------------------------------------
// GetData
// ---------------------------------------------------------------------------

/// Read a cell value grid from one sheet of a spreadsheet.
pub struct GetData {
    config: GoogleServiceConfig,
    state: Option<CrewState>,
    client: ProxyClient,
}

impl GetData {
    /// Create a data-reading tool over the given proxy configuration.
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
impl Tool for GetData {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "GetData".into(),
            description: "Get data from a specific sheet and range within a Google Spreadsheet"
                .into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "spreadsheet_id": {
                        "type": "string",
                        "description": "The ID of the spreadsheet"
                    },
                    "sheetName": {
                        "type": "string",
                        "description": "The name of the sheet within the spreadsheet to get data from"
                    },
                    "range": {
                        "type": "string",
                        "description": "The A1 notation range to get data from (e.g., \"A1:B10\"). If not provided, fetches all data."
                    }
                },
                "required": ["spreadsheet_id", "sheetName"]
            }),
        }
    }

    async fn invoke(&self, args: Value) -> Result<Value> {
        let spreadsheet_id = args
            .get("spreadsheet_id")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolError::InvalidParams {
                tool_name: "GetData".into(),
                reason: "missing required string field `spreadsheet_id`".into(),
            })?;
        let sheet_name = args
            .get("sheetName")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolError::InvalidParams {
                tool_name: "GetData".into(),
                reason: "missing required string field `sheetName`".into(),
            })?;
        // An empty range means the same as no range: fetch the whole sheet
        // and leave the parameter off the query string entirely.
        let range = args
            .get("range")
            .and_then(|v| v.as_str())
            .filter(|r| !r.is_empty());
        let (token, base) = self.config.resolve_read(self.state.as_ref())?;

        let url = format!("{base}/service/google/sheets/data/");
        debug!(url = %url, spreadsheet_id, sheet_name, range = ?range, "reading sheet data");
        let mut request = self
            .client
            .get(&url, &token)
            .query(&[("spreadsheet_id", spreadsheet_id), ("sheetName", sheet_name)]);
        if let Some(range) = range {
            request = request.query(&[("range", range)]);
        }

        match self.client.send(request, "Failed to get sheet data").await {
            Ok(data) => Ok(data),
            Err(message) => Ok(failure_body(message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- Definitions --

    #[test]
    fn list_sheets_requires_spreadsheet_id() {
        let tool = ListSheets::new(GoogleServiceConfig::default());
        let required = tool.definition().parameters["required"].as_array().unwrap().clone();
        assert_eq!(required, vec![json!("spreadsheet_id")]);
    }

    #[test]
    fn get_data_requires_spreadsheet_id_and_sheet_name() {
        let tool = GetData::new(GoogleServiceConfig::default());
        let required = tool.definition().parameters["required"].as_array().unwrap().clone();
        assert!(required.contains(&json!("spreadsheet_id")));
        assert!(required.contains(&json!("sheetName")));
        assert!(!required.contains(&json!("range")));
    }

    // -- Validation --

    #[tokio::test]
    async fn get_data_rejects_missing_sheet_name() {
        let tool = GetData::new(GoogleServiceConfig::default());
        let err = tool.invoke(json!({"spreadsheet_id": "s-1"})).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidParams { .. }));
    }

    #[tokio::test]
    async fn list_sheets_without_credentials_is_a_configuration_error() {
        let tool = ListSheets::new(GoogleServiceConfig::default());
        let err = tool.invoke(json!({"spreadsheet_id": "s-1"})).await.unwrap_err();
        assert!(matches!(err, ToolError::Configuration { .. }));
    }
}
