//! Tool error types.
//!
//! All tool crates surface errors through [`ToolError`].  Each variant
//! carries enough context for an orchestrator to decide how to handle the
//! failure without inspecting opaque strings.

/// Unified error type for crewtools adapters.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Required credentials are missing or invalid.  For missing fields the
    /// message names every one of them and both places it could have come
    /// from.
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// The parameters supplied to a tool are invalid.
    #[error("invalid parameters for tool `{tool_name}`: {reason}")]
    InvalidParams { tool_name: String, reason: String },

    /// The HTTP request could not be completed.
    #[error("transport error: {message}")]
    Transport { message: String },

    /// The backing service accepted the request but rejected it at the API
    /// level.  The vendor's message is propagated intact.
    #[error("{service} API error: {message}")]
    Api { service: String, message: String },

    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The requested tool is not registered.
    #[error("tool not found: `{tool_name}`")]
    ToolNotFound { tool_name: String },

    /// A tool with the same name is already registered.
    #[error("tool already registered: `{tool_name}`")]
    DuplicateTool { tool_name: String },
}

/// Convenience alias used throughout the tool crates.
pub type Result<T> = std::result::Result<T, ToolError>;
