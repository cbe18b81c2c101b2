//! Emergency SOS intake.
//!
//! Requests are recorded and audited only. Nothing is sent to the contacts:
//! no SMS, email or call is placed.

use std::sync::Arc;

use serde_json::{Map, Value};
use uuid::Uuid;

use sightmate_core::{AnalysisRecord, SightError};
use sightmate_logging::{AuditEvent, AuditLogger};
use sightmate_memory::HistoryStore;

#[derive(Clone)]
pub struct EmergencyNotifier {
    store: Arc<dyn HistoryStore>,
}

impl EmergencyNotifier {
    pub fn new(store: Arc<dyn HistoryStore>) -> Self {
        Self { store }
    }

    /// Record an SOS request for `contact_info` and return its id.
    ///
    /// The mapping is stored as given; no field is required.
    pub async fn initiate(&self, contact_info: Map<String, Value>) -> Result<Uuid, SightError> {
        let summary = Value::Object(contact_info.clone()).to_string();
        let record = AnalysisRecord::emergency_sos(contact_info);
        let id = record.id;

        self.store.append(record).await?;
        AuditLogger::log_event(AuditEvent::EmergencyRequested {
            emergency_id: id.to_string(),
            contact_info: summary,
        });
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sightmate_core::RecordKind;
    use sightmate_memory::InMemoryHistoryStore;

    #[tokio::test]
    async fn test_empty_contacts_still_succeed_with_fresh_ids() {
        let store = Arc::new(InMemoryHistoryStore::new());
        let notifier = EmergencyNotifier::new(store.clone());

        let first = notifier.initiate(Map::new()).await.unwrap();
        let second = notifier.initiate(Map::new()).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_record_keeps_contacts_and_status() {
        let store = Arc::new(InMemoryHistoryStore::new());
        let notifier = EmergencyNotifier::new(store.clone());

        let mut contacts = Map::new();
        contacts.insert("name".into(), json!("Priya"));
        contacts.insert("phone".into(), json!("+44 20 7946 0018"));
        notifier.initiate(contacts).await.unwrap();

        let entries = store.recent(1).await.unwrap();
        assert_eq!(entries[0].kind, RecordKind::EmergencySos);
        assert_eq!(entries[0].fields["status"], "initiated");
        assert_eq!(entries[0].fields["contact_info"]["phone"], "+44 20 7946 0018");
    }
}
