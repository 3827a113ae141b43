//! Core contracts for crewtools -- the tool trait, registry, shared crew
//! state, error taxonomy, and credential resolution used by every adapter
//! crate.

pub mod creds;
pub mod env_keys;
pub mod error;
pub mod registry;
pub mod state;
pub mod tool;

pub use creds::{CredentialSource, resolve_credentials};
pub use error::{Result, ToolError};
pub use registry::ToolRegistry;
pub use state::CrewState;
pub use tool::{Tool, ToolDefinition};
