//! SightMate HTTP API.
//!
//! Vision endpoints, analysis history, and the emergency SOS stub.

pub mod api;
pub mod emergency;
pub mod error;
pub mod server;

pub use api::{build_router, AppState, DEFAULT_MAX_UPLOAD_BYTES};
pub use emergency::EmergencyNotifier;
pub use error::ApiError;
pub use server::start_server;
