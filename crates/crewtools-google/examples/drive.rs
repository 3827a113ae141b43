//! Walk the Drive tools against a live google-service proxy.
//!
//! Usage:
//!   export GOOGLE_ACCESS_TOKEN="your_access_token"
//!   export GOOGLE_SERVICE_API_URL="http://localhost:8080"
//!   cargo run -p crewtools-google --example drive

use std::collections::HashMap;
use std::time::Duration;

use anyhow::Result;
use crewtools_core::{CrewState, Tool, env_keys};
use crewtools_google::{DriveSearch, GoogleServiceConfig, ListDriveFiles};
use serde_json::{Value, json};
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
        env_keys::GOOGLE_ACCESS_TOKEN,
        env_keys::GOOGLE_REFRESH_TOKEN,
        env_keys::GOOGLE_SERVICE_API_URL,
    ] {
        if let Ok(value) = std::env::var(key) {
            env.insert(key.to_string(), value);
        }
    }
    state.set_env(env);

    let config = GoogleServiceConfig::default();

    println!();
    println!("  Testing DriveSearch...");
    let search = DriveSearch::new(config.clone()).with_state(state.clone());
    let result = search.invoke(json!({ "query": "" })).await?;
    print_listing(&result);

    // Pace sequential calls to stay under the proxy's rate limits.
    tokio::time::sleep(Duration::from_millis(500)).await;

    println!();
    println!("  Testing ListDriveFiles...");
    let list = ListDriveFiles::new(config).with_state(state);
    let result = list.invoke(json!({ "pageSize": "10" })).await?;
    print_listing(&result);

    println!();
    Ok(())
}

fn print_listing(result: &Value) {
    if result["success"] == true {
        let count = result["files"].as_array().map(Vec::len).unwrap_or(0);
        println!("  [+] success, {count} files");
        if let Some(first) = result["files"].get(0) {
            let pretty = serde_json::to_string_pretty(first).unwrap_or_default();
            println!("      first file: {pretty}");
        }
        if let Some(token) = result.get("nextPageToken") {
            println!("      nextPageToken: {token}");
        }
    } else {
        println!("  [!] failed: {}", result["error"]);
    }
}
