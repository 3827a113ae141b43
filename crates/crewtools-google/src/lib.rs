//! Google Workspace tools for crewtools -- Drive search and listing, Gmail
//! search/send/fetch, and Sheets metadata and data retrieval.
//!
//! All tools call a self-hosted google-service proxy
//! (`{api_url}/service/google/...`) with a bearer token rather than the
//! vendor APIs directly.  Remote failures come back as `{success:false,
//! error}` results; missing credentials and bad arguments are returned as
//! [`crewtools_core::ToolError`] values.

pub mod config;
pub mod drive;
pub mod gmail;
pub mod sheets;

mod proxy;

pub use config::GoogleServiceConfig;
pub use drive::{DriveSearch, ListDriveFiles};
pub use gmail::{GetGmailMessageById, GmailSearch, GmailSend};
pub use sheets::{GetData, ListSheets};
