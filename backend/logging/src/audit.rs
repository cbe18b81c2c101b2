//! Audit Event Logger
//!
//! Persisted analyses and emergency requests are emitted as structured events
//! on the `sightmate_audit` target, so they can be routed to their own sink.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::redact::redact_sensitive_data;

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuditEvent {
    AnalysisStored {
        record_id: String,
        kind: String,
    },
    EmergencyRequested {
        emergency_id: String,
        contact_info: String,
    },
}

#[derive(Debug, Serialize)]
pub struct AuditLogEntry {
    pub timestamp: DateTime<Utc>,
    pub event: AuditEvent,
}

pub struct AuditLogger;

impl AuditLogger {
    /// Emit an audit event, scrubbing free-form content first.
    pub fn log_event(mut event: AuditEvent) -> AuditLogEntry {
        if let AuditEvent::EmergencyRequested { contact_info, .. } = &mut event {
            *contact_info = redact_sensitive_data(contact_info);
        }

        let entry = AuditLogEntry {
            timestamp: Utc::now(),
            event,
        };

        let json = serde_json::to_string(&entry).unwrap_or_default();
        match &entry.event {
            AuditEvent::EmergencyRequested { .. } => {
                warn!(
                    target: "sightmate_audit",
                    event = %json,
                    "Emergency SOS recorded; no notification sent"
                )
            }
            AuditEvent::AnalysisStored { .. } => {
                info!(target: "sightmate_audit", event = %json, "Analysis stored")
            }
        }
        entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_details_are_redacted() {
        let entry = AuditLogger::log_event(AuditEvent::EmergencyRequested {
            emergency_id: "e-1".into(),
            contact_info: r#"{"name":"Sam","phone":"555-123-4567"}"#.into(),
        });

        let AuditEvent::EmergencyRequested { contact_info, .. } = &entry.event else {
            panic!("unexpected event");
        };
        assert!(contact_info.contains("Sam"));
        assert!(!contact_info.contains("555-123-4567"));
    }

    #[test]
    fn test_entries_serialize_with_type_tag() {
        let entry = AuditLogger::log_event(AuditEvent::AnalysisStored {
            record_id: "r-1".into(),
            kind: "text_reading".into(),
        });
        let doc = serde_json::to_value(&entry).unwrap();
        assert_eq!(doc["event"]["type"], "analysis_stored");
        assert_eq!(doc["event"]["kind"], "text_reading");
    }
}
