//! CLI Status Command
//!
//! Queries a running server's health endpoint.

use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::terminal_output::{note_error, note_success, note_warn};

pub async fn run(port: u16) -> Result<()> {
    let url = format!("http://127.0.0.1:{port}/api/health");
    println!("\n📊 SightMate Status ({url})\n");

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .context("Failed to build HTTP client")?;

    let health: Value = match client.get(&url).send().await {
        Ok(resp) if resp.status().is_success() => resp
            .json()
            .await
            .context("Health endpoint returned malformed JSON")?,
        Ok(resp) => {
            note_error(&format!("Server answered with HTTP {}", resp.status()));
            return Ok(());
        }
        Err(e) => {
            note_error(&format!("No server reachable on port {port}: {}", e.without_url()));
            return Ok(());
        }
    };

    note_success(&format!(
        "{} {} is {}",
        health["service"].as_str().unwrap_or("sightmate"),
        health["version"].as_str().unwrap_or("?"),
        health["status"].as_str().unwrap_or("unknown"),
    ));
    if health["ai_configured"].as_bool().unwrap_or(false) {
        note_success("Vision provider configured");
    } else {
        note_warn("Vision provider not configured; analyses will fail");
    }
    println!();

    Ok(())
}
