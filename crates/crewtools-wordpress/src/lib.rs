//! WordPress tool for crewtools.
//!
//! LLM-agent tool that creates posts on a WordPress site through its
//! REST API (`/wp-json/wp/v2/posts`) with HTTP Basic authentication.
//! Credentials come from [`WordPressConfig`] or fall back to the
//! attached [`CrewState`](crewtools_core::CrewState).

pub mod config;
pub mod post;

pub use config::{WordPressConfig, WordPressCredentials};
pub use post::WordPressPost;
