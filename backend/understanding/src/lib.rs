//! Image understanding for SightMate: task prompts, dispatch to a multimodal
//! provider, and post-processing of the model's answer.

pub mod currency;
pub mod dispatcher;
pub mod prompts;
pub mod vision;

pub use currency::{extract_amounts, supported_currencies};
pub use dispatcher::{Analysis, VisionDispatcher, DEFAULT_UPSTREAM_TIMEOUT};
pub use prompts::AnalysisTask;
pub use vision::{GeminiProvider, DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL};
