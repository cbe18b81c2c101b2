//! CLI Doctor Command
//!
//! Checks the Gemini credential, the history database, and (when a key is
//! present) that the model actually answers.

use anyhow::Result;

use sightmate_memory::{Collection, SqliteHistoryStore};
use sightmate_understanding::{supported_currencies, GeminiProvider};

use crate::config::Config;
use crate::terminal_output::{note_error, note_success, note_warn};

/// Executes the full doctor diagnosis.
pub async fn run(config: &Config) -> Result<()> {
    println!("\n🔍 Running SightMate Doctor...\n");

    let key_ok = check_credentials(config);
    let db_ok = check_database(config).await;
    let provider_ok = if key_ok { check_provider(config).await } else { false };
    report_capabilities();

    println!();
    if key_ok && db_ok && provider_ok {
        println!("✅ All checks passed! SightMate is healthy.");
    } else {
        println!("❌ Some checks failed! Please fix the errors above.");
    }

    Ok(())
}

fn check_credentials(config: &Config) -> bool {
    println!("Checking Environment Variables:");
    match &config.gemini_api_key {
        Some(_) => {
            note_success("GEMINI_API_KEY is set");
            true
        }
        None => {
            note_error("GEMINI_API_KEY is missing (REQUIRED for vision endpoints)");
            false
        }
    }
}

async fn check_database(config: &Config) -> bool {
    println!("Checking History Database ({}):", config.database_url);
    let mut all_good = true;

    for collection in [Collection::AnalysisHistory, Collection::EmergencyRequests] {
        let counted = match SqliteHistoryStore::open(&config.database_url, collection) {
            Ok(store) => store.count().await,
            Err(e) => Err(e),
        };
        match counted {
            Ok(n) => note_success(&format!("{}: {n} records", collection.table_name())),
            Err(e) => {
                note_error(&format!("{}: {e}", collection.table_name()));
                all_good = false;
            }
        }
    }

    all_good
}

fn report_capabilities() {
    println!("Currency Amounts Recognised:");
    note_success(&currency_summary());
}

fn currency_summary() -> String {
    supported_currencies().collect::<Vec<_>>().join(", ")
}

async fn check_provider(config: &Config) -> bool {
    let Some(api_key) = &config.gemini_api_key else {
        return false;
    };
    println!("Checking Gemini ({}):", config.gemini_model);

    let provider = GeminiProvider::new(api_key.clone())
        .with_model(config.gemini_model.clone())
        .with_base_url(config.gemini_base_url.clone());

    match tokio::time::timeout(config.upstream_timeout(), provider.ping()).await {
        Ok(Ok(reply)) if !reply.trim().is_empty() => {
            note_success("Model answered a test prompt");
            true
        }
        Ok(Ok(_)) => {
            note_warn("Model answered with an empty reply");
            false
        }
        Ok(Err(e)) => {
            note_error(&e.to_string());
            false
        }
        Err(_) => {
            note_error("Model did not answer before the upstream timeout");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_summary_lists_every_code() {
        assert_eq!(currency_summary(), "USD, EUR, GBP");
    }

    #[tokio::test]
    async fn test_database_check_reports_both_tables() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = Config {
            database_url: dir.path().join("history.db").display().to_string(),
            ..Config::default()
        };

        assert!(check_database(&config).await);
    }

    #[tokio::test]
    async fn test_in_memory_database_fails_the_check() {
        let config = Config {
            database_url: ":memory:".into(),
            ..Config::default()
        };
        assert!(!check_database(&config).await);
    }
}
