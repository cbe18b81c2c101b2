//! Vision understanding via Google Gemini's `generateContent` endpoint.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::{json, Value};
use tracing::{debug, info};

use sightmate_core::{CompletionProvider, ImagePayload, SightError};
use sightmate_logging::redact_sensitive_data;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Gemini multimodal provider.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url.trim_end_matches('/'),
            self.model,
            self.api_key
        )
    }

    /// Text-only round trip, used to verify the key and model.
    pub async fn ping(&self) -> Result<String, SightError> {
        self.generate(json!([{ "text": "Say hello" }])).await
    }

    async fn generate(&self, parts: Value) -> Result<String, SightError> {
        let body = json!({ "contents": [{ "parts": parts }] });

        let resp = self
            .client
            .post(self.endpoint())
            .json(&body)
            .send()
            .await
            .map_err(|e| upstream(e.without_url()))?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            return Err(upstream(format!("Gemini returned {status}: {detail}")));
        }

        let json: Value = resp.json().await.map_err(|e| upstream(e.without_url()))?;
        extract_text(&json).ok_or_else(|| {
            let reason = json["promptFeedback"]["blockReason"]
                .as_str()
                .or_else(|| json["candidates"][0]["finishReason"].as_str())
                .unwrap_or("empty response");
            upstream(format!("Gemini returned no text ({reason})"))
        })
    }
}

#[async_trait]
impl CompletionProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, prompt: &str, image: &ImagePayload) -> Result<String, SightError> {
        info!(
            model = %self.model,
            bytes = image.data.len(),
            size = %format!("{}x{}", image.width, image.height),
            "Describing image via Gemini"
        );
        let parts = json!([
            { "text": prompt },
            { "inlineData": { "mimeType": image.mime_type, "data": STANDARD.encode(&image.data) } }
        ]);
        let text = self.generate(parts).await?;
        debug!(chars = text.len(), "Gemini response received");
        Ok(text)
    }
}

/// Concatenate the text parts of the first candidate.
fn extract_text(response: &Value) -> Option<String> {
    let parts = response["candidates"][0]["content"]["parts"].as_array()?;
    let text: String = parts.iter().filter_map(|p| p["text"].as_str()).collect();
    (!text.is_empty()).then_some(text)
}

fn upstream(err: impl std::fmt::Display) -> SightError {
    SightError::UpstreamError(redact_sensitive_data(&err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use mockito::Matcher;

    fn payload() -> ImagePayload {
        ImagePayload {
            mime_type: "image/jpeg".into(),
            data: Bytes::from_static(&[0xFF, 0xD8, 0xFF, 0xD9]),
            width: 2,
            height: 1,
        }
    }

    fn generate_path() -> Matcher {
        Matcher::Regex(r"^/v1beta/models/gemini-1\.5-flash:generateContent".into())
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let body = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "A door " }, { "text": "ahead." }] }
            }]
        });
        assert_eq!(extract_text(&body).as_deref(), Some("A door ahead."));
        assert_eq!(extract_text(&json!({ "candidates": [] })), None);
    }

    #[test]
    fn test_endpoint_uses_model_and_base_url() {
        let provider = GeminiProvider::new("k")
            .with_model("gemini-2.0-flash")
            .with_base_url("http://localhost:9000/");
        assert_eq!(
            provider.endpoint(),
            "http://localhost:9000/v1beta/models/gemini-2.0-flash:generateContent?key=k"
        );
    }

    #[tokio::test]
    async fn test_complete_sends_prompt_and_inline_image() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", generate_path())
            .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
            .match_body(Matcher::PartialJson(json!({
                "contents": [{ "parts": [
                    { "text": "Describe" },
                    { "inlineData": { "mimeType": "image/jpeg", "data": "/9j/2Q==" } }
                ]}]
            })))
            .with_status(200)
            .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"A red door."}]}}]}"#)
            .expect(1)
            .create_async()
            .await;

        let provider = GeminiProvider::new("test-key").with_base_url(server.url());
        let text = provider.complete("Describe", &payload()).await.unwrap();

        assert_eq!(text, "A red door.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status_is_upstream_error_without_key() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", generate_path())
            .with_status(400)
            .with_body(r#"{"error":{"message":"API key not valid"}}"#)
            .create_async()
            .await;

        let provider = GeminiProvider::new("leaky-key").with_base_url(server.url());
        let err = provider.complete("Describe", &payload()).await.unwrap_err();

        let SightError::UpstreamError(message) = err else {
            panic!("expected an upstream error");
        };
        assert!(message.contains("400"));
        assert!(message.contains("API key not valid"));
        assert!(!message.contains("leaky-key"));
    }

    #[tokio::test]
    async fn test_blocked_response_reports_reason() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", generate_path())
            .with_status(200)
            .with_body(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#)
            .create_async()
            .await;

        let provider = GeminiProvider::new("k").with_base_url(server.url());
        let err = provider.ping().await.unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_upstream_error() {
        let provider = GeminiProvider::new("secret").with_base_url("http://127.0.0.1:9");
        let err = provider.ping().await.unwrap_err();

        assert!(matches!(err, SightError::UpstreamError(_)));
        assert!(!err.to_string().contains("secret"));
    }
}
