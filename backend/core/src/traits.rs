use async_trait::async_trait;

use crate::error::SightError;
use crate::types::ImagePayload;

/// An external multimodal model that turns an instruction plus an image into text.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Provider name (e.g., "gemini").
    fn name(&self) -> &str;

    /// Send the prompt and image, returning the model's free-text answer.
    async fn complete(&self, prompt: &str, image: &ImagePayload) -> Result<String, SightError>;
}
