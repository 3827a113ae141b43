//! Core tool trait and supporting types.
//!
//! Every adapter capability (search Drive, send an email, publish a post)
//! implements the [`Tool`] trait, providing a uniform interface for an
//! agent orchestrator to discover and invoke it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// A capability exposed to the agent, described by a JSON Schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Machine-readable tool name (e.g. `DriveSearch`, `GmailSend`).
    pub name: String,
    /// Human-readable description of what the tool does.
    pub description: String,
    /// JSON Schema describing the tool's input parameters.
    pub parameters: Value,
}

/// The universal tool interface.
///
/// Each invocation performs exactly one remote call: resolve credentials,
/// build one HTTP request, map the response.  Implementations hold no
/// mutable state, so an orchestrator can share them freely across tasks.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Return the definition the agent sees for this tool.
    fn definition(&self) -> ToolDefinition;

    /// Invoke the tool with the given JSON arguments.
    ///
    /// Returns a JSON value representing the tool's output.
    async fn invoke(&self, args: Value) -> Result<Value>;
}
