use thiserror::Error;

/// Top-level error type for the SightMate backend.
///
/// Every variant renders a human-readable message; the HTTP layer passes it
/// through verbatim as the error detail.
#[derive(Debug, Error)]
pub enum SightError {
    #[error("invalid image: {0}")]
    InvalidImage(String),

    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("upstream error: {0}")]
    UpstreamError(String),

    #[error("persistence error: {0}")]
    PersistenceError(String),
}

impl SightError {
    pub fn invalid_image(err: impl std::fmt::Display) -> Self {
        Self::InvalidImage(err.to_string())
    }

    pub fn upstream(err: impl std::fmt::Display) -> Self {
        Self::UpstreamError(err.to_string())
    }

    pub fn persistence(err: impl std::fmt::Display) -> Self {
        Self::PersistenceError(err.to_string())
    }
}
