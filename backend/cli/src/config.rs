use std::path::PathBuf;
use std::time::Duration;

use sightmate_gateway::DEFAULT_MAX_UPLOAD_BYTES;
use sightmate_understanding::{DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL};

/// SightMate runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server bind address
    pub bind_address: String,
    /// HTTP server port
    pub port: u16,
    /// History database (path or `sqlite://` URL)
    pub database_url: String,
    /// Gemini API key; analyses are unavailable without it
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    /// Upper bound on a single provider call
    pub upstream_timeout_secs: u64,
    /// Largest accepted request body
    pub max_upload_bytes: usize,
    /// Log level
    pub log_level: String,
    /// Directory for rolling JSON logs
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8001,
            database_url: "sightmate.db".to_string(),
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            upstream_timeout_secs: 60,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            log_level: "info".to_string(),
            log_dir: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source (useful for testing).
    ///
    /// Empty values count as unset; unparsable numbers fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            bind_address: var("SIGHTMATE_BIND").unwrap_or(defaults.bind_address),
            port: var("SIGHTMATE_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            database_url: var("SIGHTMATE_DB_URL").unwrap_or(defaults.database_url),
            gemini_api_key: var("GEMINI_API_KEY"),
            gemini_model: var("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            gemini_base_url: var("GEMINI_BASE_URL").unwrap_or(defaults.gemini_base_url),
            upstream_timeout_secs: var("SIGHTMATE_UPSTREAM_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.upstream_timeout_secs),
            max_upload_bytes: var("SIGHTMATE_MAX_UPLOAD_BYTES")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_upload_bytes),
            log_level: var("RUST_LOG").unwrap_or(defaults.log_level),
            log_dir: var("SIGHTMATE_LOG_DIR").map(PathBuf::from),
        }
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    pub fn bind(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}
