//! Analysis dispatch.
//!
//! Routes an upload to its task prompt, runs image normalization on the
//! blocking pool, and calls the completion provider under a timeout. Calls
//! are independent of one another; nothing is cached between requests.

use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use tracing::{debug, info, instrument, warn};

use sightmate_core::{AnalysisRecord, CompletionProvider, DetectedAmounts, SightError};
use sightmate_media::{is_image, sniff_mime};

use crate::currency::extract_amounts;
use crate::prompts::AnalysisTask;

pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(60);

/// The model's answer for one upload, with the normalized image size.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub task: AnalysisTask,
    pub text: String,
    pub width: u32,
    pub height: u32,
}

impl Analysis {
    /// Amounts found in the description; only currency analyses carry them.
    pub fn detected_amounts(&self) -> Option<DetectedAmounts> {
        match self.task {
            AnalysisTask::Currency => Some(extract_amounts(&self.text)),
            _ => None,
        }
    }

    /// Build the history record for this analysis.
    pub fn to_record(&self) -> AnalysisRecord {
        match self.task {
            AnalysisTask::Objects => {
                AnalysisRecord::object_detection(self.text.clone(), self.width, self.height)
            }
            AnalysisTask::Currency => AnalysisRecord::currency_detection(
                self.text.clone(),
                &self.detected_amounts().unwrap_or_default(),
            ),
            AnalysisTask::Text => AnalysisRecord::text_reading(self.text.clone()),
            AnalysisTask::Colors => AnalysisRecord::color_detection(self.text.clone()),
        }
    }
}

#[derive(Clone)]
pub struct VisionDispatcher {
    provider: Option<Arc<dyn CompletionProvider>>,
    timeout: Duration,
}

impl VisionDispatcher {
    /// `provider` is `None` when no credential is configured; every analysis
    /// then fails with `ServiceUnavailable`.
    pub fn new(provider: Option<Arc<dyn CompletionProvider>>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    #[instrument(skip(self, upload), fields(task = task.response_type(), bytes = upload.len()))]
    pub async fn analyze(&self, task: AnalysisTask, upload: Bytes) -> Result<Analysis, SightError> {
        let provider = self.provider.as_ref().ok_or_else(|| {
            SightError::ServiceUnavailable("Gemini API key not configured".into())
        })?;

        let mime = sniff_mime(&upload);
        if is_image(mime) {
            debug!(mime, "Normalizing upload");
        } else {
            warn!(mime, "Upload does not look like an image; decoding anyway");
        }
        let payload = tokio::task::spawn_blocking(move || sightmate_media::prepare(&upload))
            .await
            .map_err(|e| SightError::invalid_image(format!("image worker failed: {e}")))??;

        let started = Instant::now();
        let call = provider.complete(task.prompt(), &payload);
        let text = match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(
                    provider = provider.name(),
                    timeout_secs = self.timeout.as_secs(),
                    "Provider call timed out"
                );
                return Err(SightError::UpstreamError(format!(
                    "{} did not respond within {}s",
                    provider.name(),
                    self.timeout.as_secs()
                )));
            }
        };

        info!(
            provider = provider.name(),
            latency_ms = started.elapsed().as_millis() as u64,
            chars = text.len(),
            "Analysis complete"
        );

        Ok(Analysis {
            task,
            text,
            width: payload.width,
            height: payload.height,
        })
    }
}
