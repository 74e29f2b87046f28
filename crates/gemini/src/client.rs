//! HTTP client for the generative-language API.

use serde::Deserialize;

use crate::error::GeminiError;
use crate::wire::{self, GenerateContentRequest, GenerateContentResponse};

/// Default REST base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Configuration for [`GeminiClient`], loaded from environment by the api
/// crate.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key sent via the `x-goog-api-key` header.
    pub api_key: String,
    /// REST base URL. Overridable so tests can point at a local server.
    pub base_url: String,
    /// Model used for image generation.
    pub image_model: String,
    /// Model used for location inference.
    pub text_model: String,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            image_model: "gemini-2.5-flash-image".to_string(),
            text_model: "gemini-2.5-flash".to_string(),
        }
    }
}

/// A generated image: decoded bytes plus the mime type the API reported.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// Client for `models/{model}:generateContent`.
pub struct GeminiClient {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Create a client reusing an existing [`reqwest::Client`] so connections
    /// pool with the rest of the process.
    pub fn new(client: reqwest::Client, config: GeminiConfig) -> Self {
        Self { client, config }
    }

    /// Generate the composite monument image.
    ///
    /// The two user prompts are merged into one instruction asking for a
    /// photorealistic composite of the monument placed in the scene.
    pub async fn generate_monument_image(
        &self,
        monument_prompt: &str,
        scene_prompt: &str,
    ) -> Result<GeneratedImage, GeminiError> {
        let prompt = format!(
            "Create a photorealistic photograph of the following monument: \
             {monument_prompt}. Place it in this scene: {scene_prompt}. \
             Composite the monument into the scene with matching lighting, \
             shadows and perspective, as if photographed on location."
        );

        let body = GenerateContentRequest::from_text(prompt).with_image_output();
        let response = self
            .generate_content(&self.config.image_model, &body)
            .await?;

        let image = wire::extract_image(response)?;
        tracing::debug!(
            mime_type = %image.mime_type,
            bytes = image.bytes.len(),
            "Generated monument image"
        );

        Ok(GeneratedImage {
            bytes: image.bytes,
            mime_type: image.mime_type,
        })
    }

    /// Infer the most likely real-world place for a creation.
    ///
    /// Returns `None` when the model cannot name a real place; callers fall
    /// back to Null Island.
    pub async fn infer_location(
        &self,
        monument_prompt: &str,
        scene_prompt: &str,
    ) -> Result<Option<String>, GeminiError> {
        let prompt = format!(
            "A monument described as \"{monument_prompt}\" stands in a scene \
             described as \"{scene_prompt}\". Name the single most likely \
             real-world place this scene depicts, suitable for geocoding \
             (for example \"Eiffel Tower, Paris, France\"). Reply with only \
             the place name. If the scene does not correspond to any \
             real-world place, reply with exactly NONE."
        );

        let body = GenerateContentRequest::from_text(prompt);
        let response = self
            .generate_content(&self.config.text_model, &body)
            .await?;

        let reply = wire::extract_text(response)?;
        let place = wire::parse_location_reply(&reply);
        tracing::debug!(reply = %reply, place = ?place, "Inferred location");

        Ok(place)
    }

    async fn generate_content(
        &self,
        model: &str,
        body: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GeminiError> {
        let url = format!(
            "{}/models/{model}:generateContent",
            self.config.base_url.trim_end_matches('/'),
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .map(|body| api_error_message(&body))
                .unwrap_or_default();
            return Err(GeminiError::from_status(status.as_u16(), message));
        }

        Ok(response.json().await?)
    }
}

/// Pull the human-readable message out of an API error body, falling back to
/// the raw text when the shape is unfamiliar.
fn api_error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: ErrorDetail,
    }
    #[derive(Deserialize)]
    struct ErrorDetail {
        message: String,
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.error.message,
        Err(_) => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_extracted_from_api_body() {
        let body = r#"{ "error": { "code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT" } }"#;
        assert_eq!(api_error_message(body), "API key not valid");
    }

    #[test]
    fn unfamiliar_error_body_passes_through() {
        assert_eq!(api_error_message("<html>boom</html>"), "<html>boom</html>");
    }
}
