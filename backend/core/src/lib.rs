pub mod clock;
pub mod error;
pub mod record;
pub mod traits;
pub mod types;

pub use clock::now_iso;
pub use error::SightError;
pub use record::{AnalysisRecord, HistoryEntry, RecordKind, UnknownRecordKind};
pub use traits::CompletionProvider;
pub use types::{DetectedAmounts, ImagePayload};
