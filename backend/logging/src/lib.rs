//! Structured logging for SightMate.
//!
//! Handles subscriber setup (console plus optional rolling NDJSON files),
//! secret and phone-number redaction, and the audit event stream.

pub mod audit;
pub mod logger;
pub mod redact;

pub use audit::{AuditEvent, AuditLogEntry, AuditLogger};
pub use logger::init_logger;
pub use redact::redact_sensitive_data;
