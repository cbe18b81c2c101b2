//! CLI History Command
//!
//! Prints the most recent analyses straight from the database, without a
//! running server.

use anyhow::{Context, Result};

use sightmate_core::HistoryEntry;
use sightmate_memory::{Collection, HistoryStore, SqliteHistoryStore};

use crate::config::Config;
use crate::terminal_output::render_table;

const RESULT_COLUMN_WIDTH: usize = 60;

/// Fields that carry the model's answer, by record type.
const RESULT_FIELDS: [&str; 3] = ["description", "text_content", "color_description"];

pub async fn run(config: &Config, limit: usize) -> Result<()> {
    let store = SqliteHistoryStore::open(&config.database_url, Collection::AnalysisHistory)
        .with_context(|| format!("Failed to open {}", config.database_url))?;
    let entries = store.recent(limit).await.context("Failed to read history")?;

    if entries.is_empty() {
        println!("No analyses recorded yet.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = entries.iter().map(row).collect();
    print!(
        "{}",
        render_table(&["Timestamp", "Type", "Result"], &rows, RESULT_COLUMN_WIDTH)
    );
    Ok(())
}

fn row(entry: &HistoryEntry) -> Vec<String> {
    let result = RESULT_FIELDS
        .iter()
        .find_map(|field| entry.fields.get(*field))
        .map(|value| match value.as_str() {
            Some(s) => s.to_string(),
            None => value.to_string(),
        })
        .unwrap_or_default();

    vec![entry.timestamp.clone(), entry.kind.to_string(), result]
}

#[cfg(test)]
mod tests {
    use super::*;
    use sightmate_core::AnalysisRecord;

    #[test]
    fn test_row_picks_result_field_per_kind() {
        let text = AnalysisRecord::text_reading("EXIT").into_entry();
        assert_eq!(row(&text)[1..], ["text_reading".to_string(), "EXIT".to_string()]);

        let colors = AnalysisRecord::color_detection("Mostly blue").into_entry();
        assert_eq!(row(&colors)[2], "Mostly blue");

        let objects = AnalysisRecord::object_detection("A bench", 10, 20).into_entry();
        assert_eq!(row(&objects)[2], "A bench");
    }
}
