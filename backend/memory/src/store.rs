use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use sightmate_core::{AnalysisRecord, HistoryEntry, SightError};

/// Records returned by `recent` when the caller gives no limit.
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Append-only store for analysis and emergency records.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Persist a record. Records are never updated or deleted afterwards.
    async fn append(&self, record: AnalysisRecord) -> Result<(), SightError>;

    /// Up to `limit` records, newest timestamp first, without their ids.
    async fn recent(&self, limit: usize) -> Result<Vec<HistoryEntry>, SightError>;
}

/// Logical collections; each gets its own `HistoryStore` instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    AnalysisHistory,
    EmergencyRequests,
}

impl Collection {
    pub fn table_name(&self) -> &'static str {
        match self {
            Self::AnalysisHistory => "analysis_history",
            Self::EmergencyRequests => "emergency_requests",
        }
    }
}

/// Simple in-memory store for tests and ephemeral runs.
#[derive(Default)]
pub struct InMemoryHistoryStore {
    records: RwLock<Vec<AnalysisRecord>>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn append(&self, record: AnalysisRecord) -> Result<(), SightError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| SightError::persistence("history lock poisoned"))?;
        records.push(record);
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<HistoryEntry>, SightError> {
        let records = self
            .records
            .read()
            .map_err(|_| SightError::persistence("history lock poisoned"))?;

        // Newest timestamp first; later insertion wins ties.
        let mut ordered: Vec<(usize, &AnalysisRecord)> = records.iter().enumerate().collect();
        ordered.sort_by(|(ia, a), (ib, b)| b.timestamp.cmp(&a.timestamp).then(ib.cmp(ia)));

        Ok(ordered
            .into_iter()
            .take(limit)
            .map(|(_, record)| record.clone().into_entry())
            .collect())
    }
}
