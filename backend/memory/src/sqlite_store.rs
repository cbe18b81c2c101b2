//! SQLite-backed durable history store.
//!
//! Each `SqliteHistoryStore` owns one table (its `Collection`). Every
//! operation opens its own connection on the blocking pool, so concurrent
//! requests never share a statement or cursor; WAL mode plus a busy timeout
//! lets readers and writers proceed side by side.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use rusqlite::{params, Connection};
use tracing::{debug, info};

use sightmate_core::{AnalysisRecord, HistoryEntry, RecordKind, SightError};

use crate::store::{Collection, HistoryStore};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub struct SqliteHistoryStore {
    path: PathBuf,
    collection: Collection,
}

impl SqliteHistoryStore {
    /// Open (creating if needed) the store behind `database_url`.
    ///
    /// Accepts a plain filesystem path or a `sqlite://` URL. In-memory
    /// databases are refused: each operation opens its own connection, so
    /// the schema would vanish after `open`.
    pub fn open(database_url: &str, collection: Collection) -> Result<Self, SightError> {
        let location = database_url
            .strip_prefix("sqlite://")
            .unwrap_or(database_url);
        if is_in_memory(location) {
            return Err(SightError::persistence(format!(
                "in-memory database {location:?} is not supported; use --ephemeral instead"
            )));
        }
        let path = PathBuf::from(location);

        let conn = open_connection(&path).map_err(SightError::persistence)?;
        conn.execute_batch(&schema(collection))
            .map_err(SightError::persistence)?;

        info!(path = %path.display(), table = collection.table_name(), "History store opened");
        Ok(Self { path, collection })
    }

    /// Number of stored records.
    pub async fn count(&self) -> Result<usize, SightError> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.collection.table_name());
        self.with_connection(move |conn| conn.query_row(&sql, [], |row| row.get(0)))
            .await
    }

    async fn with_connection<T, F>(&self, op: F) -> Result<T, SightError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
    {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || {
            let conn = open_connection(&path)?;
            op(&conn)
        })
        .await
        .map_err(SightError::persistence)?
        .map_err(SightError::persistence)
    }
}

fn is_in_memory(location: &str) -> bool {
    location == ":memory:" || location.is_empty() || location.contains("mode=memory")
}

fn open_connection(path: &Path) -> rusqlite::Result<Connection> {
    let conn = Connection::open(path)?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    Ok(conn)
}

fn schema(collection: Collection) -> String {
    let table = collection.table_name();
    format!(
        "PRAGMA journal_mode=WAL;
         CREATE TABLE IF NOT EXISTS {table} (
             id        TEXT PRIMARY KEY,
             kind      TEXT NOT NULL,
             timestamp TEXT NOT NULL,
             fields    TEXT NOT NULL
         );
         CREATE INDEX IF NOT EXISTS idx_{table}_timestamp ON {table}(timestamp);"
    )
}

#[async_trait]
impl HistoryStore for SqliteHistoryStore {
    async fn append(&self, record: AnalysisRecord) -> Result<(), SightError> {
        let fields = serde_json::to_string(&record.fields).map_err(SightError::persistence)?;
        let sql = format!(
            "INSERT INTO {} (id, kind, timestamp, fields) VALUES (?1, ?2, ?3, ?4)",
            self.collection.table_name()
        );
        let id = record.id;

        self.with_connection(move |conn| {
            conn.execute(
                &sql,
                params![
                    record.id.to_string(),
                    record.kind.as_str(),
                    record.timestamp,
                    fields,
                ],
            )
        })
        .await?;

        debug!(id = %id, table = self.collection.table_name(), "Record appended");
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<HistoryEntry>, SightError> {
        let sql = format!(
            "SELECT kind, timestamp, fields FROM {}
             ORDER BY timestamp DESC, rowid DESC LIMIT ?1",
            self.collection.table_name()
        );
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let rows: Vec<(String, String, String)> = self
            .with_connection(move |conn| {
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt
                    .query_map(params![limit], |row| {
                        Ok((row.get(0)?, row.get(1)?, row.get(2)?))
                    })?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(rows)
            })
            .await?;

        rows.into_iter()
            .map(|(kind, timestamp, fields)| {
                Ok(HistoryEntry {
                    kind: kind.parse::<RecordKind>().map_err(SightError::persistence)?,
                    timestamp,
                    fields: serde_json::from_str(&fields).map_err(SightError::persistence)?,
                })
            })
            .collect()
    }
}
