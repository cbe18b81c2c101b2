use std::collections::BTreeMap;

use bytes::Bytes;

/// Currency code (`USD`, `EUR`, `GBP`) to the literal amount strings found
/// in a description, in order of appearance.
pub type DetectedAmounts = BTreeMap<String, Vec<String>>;

/// A normalized, encoded image ready to be sent to a completion provider.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    pub mime_type: String,
    pub data: Bytes,
    pub width: u32,
    pub height: u32,
}
