use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::clock::now_iso;
use crate::types::DetectedAmounts;

/// An immutable record of one analysis or emergency request.
///
/// Kind-specific result fields (`description`, `text_content`, ...) are kept in
/// `fields` and flattened into the serialized document next to `id`, `type`
/// and `timestamp`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: RecordKind,
    pub timestamp: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// A stored record as served back to clients: everything except the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(rename = "type")]
    pub kind: RecordKind,
    pub timestamp: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Categories of records the backend persists.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// Scene and object description
    ObjectDetection,
    /// Banknotes, coins and displayed amounts
    CurrencyDetection,
    /// Text read out of the image
    TextReading,
    /// Colour and lighting description
    ColorDetection,
    /// Emergency contact request
    EmergencySos,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown record kind: {0}")]
pub struct UnknownRecordKind(pub String);

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ObjectDetection => "object_detection",
            Self::CurrencyDetection => "currency_detection",
            Self::TextReading => "text_reading",
            Self::ColorDetection => "color_detection",
            Self::EmergencySos => "emergency_sos",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = UnknownRecordKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "object_detection" => Ok(Self::ObjectDetection),
            "currency_detection" => Ok(Self::CurrencyDetection),
            "text_reading" => Ok(Self::TextReading),
            "color_detection" => Ok(Self::ColorDetection),
            "emergency_sos" => Ok(Self::EmergencySos),
            other => Err(UnknownRecordKind(other.to_string())),
        }
    }
}

impl AnalysisRecord {
    /// Create a record with a fresh id and the current timestamp.
    pub fn new(kind: RecordKind, fields: Map<String, Value>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            timestamp: now_iso(),
            fields,
        }
    }

    pub fn object_detection(description: impl Into<String>, width: u32, height: u32) -> Self {
        Self::new(
            RecordKind::ObjectDetection,
            object(json!({
                "description": description.into(),
                "image_size": format!("{width}x{height}"),
            })),
        )
    }

    pub fn currency_detection(
        description: impl Into<String>,
        detected_amounts: &DetectedAmounts,
    ) -> Self {
        Self::new(
            RecordKind::CurrencyDetection,
            object(json!({
                "description": description.into(),
                "detected_amounts": detected_amounts,
            })),
        )
    }

    pub fn text_reading(text_content: impl Into<String>) -> Self {
        Self::new(
            RecordKind::TextReading,
            object(json!({ "text_content": text_content.into() })),
        )
    }

    pub fn color_detection(color_description: impl Into<String>) -> Self {
        Self::new(
            RecordKind::ColorDetection,
            object(json!({ "color_description": color_description.into() })),
        )
    }

    /// An SOS request. The contact mapping is stored as given, without validation.
    pub fn emergency_sos(contact_info: Map<String, Value>) -> Self {
        let mut fields = Map::new();
        fields.insert("contact_info".into(), Value::Object(contact_info));
        fields.insert("status".into(), Value::String("initiated".into()));
        Self::new(RecordKind::EmergencySos, fields)
    }

    /// Look up a kind-specific field as a string.
    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    /// Drop the id, yielding the client-facing projection.
    pub fn into_entry(self) -> HistoryEntry {
        HistoryEntry {
            kind: self.kind,
            timestamp: self.timestamp,
            fields: self.fields,
        }
    }
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_kind_wire_names() {
        for kind in [
            RecordKind::ObjectDetection,
            RecordKind::CurrencyDetection,
            RecordKind::TextReading,
            RecordKind::ColorDetection,
            RecordKind::EmergencySos,
        ] {
            let wire = serde_json::to_value(kind).unwrap();
            assert_eq!(wire.as_str(), Some(kind.as_str()));
            assert_eq!(kind.as_str().parse::<RecordKind>().unwrap(), kind);
        }
        assert!("selfie".parse::<RecordKind>().is_err());
    }

    #[test]
    fn test_object_detection_record_shape() {
        let record = AnalysisRecord::object_detection("A chair on the left", 800, 600);
        let doc = serde_json::to_value(&record).unwrap();

        assert_eq!(doc["type"], "object_detection");
        assert_eq!(doc["description"], "A chair on the left");
        assert_eq!(doc["image_size"], "800x600");
        assert_eq!(doc["id"], record.id.to_string());
        assert!(doc["timestamp"].as_str().is_some());
    }

    #[test]
    fn test_sos_record_keeps_arbitrary_contacts() {
        let mut contacts = Map::new();
        contacts.insert("name".into(), json!("Ana"));
        contacts.insert("phones".into(), json!(["555-0100"]));

        let record = AnalysisRecord::emergency_sos(contacts);
        assert_eq!(record.kind, RecordKind::EmergencySos);
        assert_eq!(record.field_str("status"), Some("initiated"));
        assert_eq!(record.fields["contact_info"]["phones"][0], "555-0100");
    }

    #[test]
    fn test_entry_projection_has_no_id() {
        let record = AnalysisRecord::text_reading("EXIT");
        let entry = record.clone().into_entry();
        let doc = serde_json::to_value(&entry).unwrap();

        assert!(doc.get("id").is_none());
        assert_eq!(doc["type"], "text_reading");
        assert_eq!(doc["text_content"], "EXIT");
        assert_eq!(doc["timestamp"], record.timestamp);
    }

    #[test]
    fn test_record_roundtrips_through_json() {
        let mut amounts = DetectedAmounts::new();
        amounts.insert("USD".into(), vec!["20.00".into()]);
        let record = AnalysisRecord::currency_detection("A twenty dollar bill, $20.00", &amounts);

        let text = serde_json::to_string(&record).unwrap();
        let back: AnalysisRecord = serde_json::from_str(&text).unwrap();
        assert_eq!(back, record);
    }
}
