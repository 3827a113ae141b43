//! Create a draft post on a live WordPress site.
//!
//! Usage:
//!   export WORDPRESS_URL="https://your-wordpress-site.com"
//!   export WORDPRESS_USERNAME="your_username"
//!   export WORDPRESS_PASSWORD="your_application_password"
//!   cargo run -p crewtools-wordpress --example post

use std::collections::HashMap;

use anyhow::Result;
use crewtools_core::{CrewState, Tool, env_keys};
use crewtools_wordpress::{WordPressConfig, WordPressPost};
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    // Seed the crew state from the process environment, the way an
    // orchestrator would before handing tools to its agents.
    let state = CrewState::new();
    let mut env = HashMap::new();
    for key in [
        env_keys::WORDPRESS_URL,
        env_keys::WORDPRESS_USERNAME,
        env_keys::WORDPRESS_PASSWORD,
    ] {
        if let Ok(value) = std::env::var(key) {
            env.insert(key.to_string(), value);
        }
    }
    state.set_env(env);

    let tool = WordPressPost::new(WordPressConfig::default()).with_state(state);

    println!();
    println!("  Testing PostToWordPress...");
    match tool
        .invoke(json!({
            "title": "Draft created by crewtools",
            "content": "<p>This draft was created through the WordPress REST API.</p>",
            "status": "draft"
        }))
        .await
    {
        Ok(result) => {
            println!("  [+] post created");
            println!("      id:     {}", result["id"]);
            println!("      url:    {}", result["url"]);
            println!("      status: {}", result["status"]);
        }
        Err(e) => println!("  [!] failed: {e}"),
    }

    println!();
    Ok(())
}
