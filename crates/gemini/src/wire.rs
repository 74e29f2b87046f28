//! Wire types for `models/{model}:generateContent` and the pure response
//! interpretation the client builds on.

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::GeminiError;

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    /// Single-turn text request.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(text.into()),
                    inline_data: None,
                }],
            }],
            generation_config: None,
        }
    }

    /// Request image output modalities on top of the prompt.
    pub fn with_image_output(mut self) -> Self {
        self.generation_config = Some(GenerationConfig {
            response_modalities: Some(vec!["TEXT".to_string(), "IMAGE".to_string()]),
        });
        self
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_modalities: Option<Vec<String>>,
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

/// Base64 blob part, how generated images come back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
    pub block_reason_message: Option<String>,
}

/// Finish reasons that mean a safety filter rejected the output.
const BLOCKED_FINISH_REASONS: &[&str] = &[
    "SAFETY",
    "IMAGE_SAFETY",
    "IMAGE_PROHIBITED_CONTENT",
    "PROHIBITED_CONTENT",
    "RECITATION",
    "BLOCKLIST",
];

// ---------------------------------------------------------------------------
// Interpretation
// ---------------------------------------------------------------------------

/// Decoded image bytes plus mime type.
#[derive(Debug, Clone)]
pub struct InlineImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// Pull the first candidate out of a 2xx response, surfacing safety blocks.
///
/// Blocks are reported two ways, both as HTTP 200: `promptFeedback` with a
/// `blockReason` (the prompt itself was rejected), or a candidate whose
/// `finishReason` names a safety filter.
fn first_candidate(response: GenerateContentResponse) -> Result<Candidate, GeminiError> {
    if let Some(feedback) = response.prompt_feedback {
        if let Some(reason) = feedback.block_reason {
            let message = feedback
                .block_reason_message
                .unwrap_or_else(|| format!("prompt blocked: {reason}"));
            return Err(GeminiError::ContentBlocked(message));
        }
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| GeminiError::UnexpectedResponse("no candidates in response".into()))?;

    if let Some(ref reason) = candidate.finish_reason {
        if BLOCKED_FINISH_REASONS.contains(&reason.as_str()) {
            return Err(GeminiError::ContentBlocked(format!(
                "output blocked by safety filter: {reason}"
            )));
        }
    }

    Ok(candidate)
}

/// Extract and decode the first inline image from a response.
pub fn extract_image(response: GenerateContentResponse) -> Result<InlineImage, GeminiError> {
    let candidate = first_candidate(response)?;

    let content = candidate
        .content
        .ok_or_else(|| GeminiError::UnexpectedResponse("candidate has no content".into()))?;

    let inline = content
        .parts
        .into_iter()
        .find_map(|p| p.inline_data)
        .ok_or_else(|| GeminiError::UnexpectedResponse("no image data in response".into()))?;

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(&inline.data)
        .map_err(|e| GeminiError::Decode(e.to_string()))?;

    Ok(InlineImage {
        bytes,
        mime_type: inline.mime_type,
    })
}

/// Extract the concatenated text parts of the first candidate.
pub fn extract_text(response: GenerateContentResponse) -> Result<String, GeminiError> {
    let candidate = first_candidate(response)?;

    let content = candidate
        .content
        .ok_or_else(|| GeminiError::UnexpectedResponse("candidate has no content".into()))?;

    let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();

    if text.is_empty() {
        return Err(GeminiError::UnexpectedResponse(
            "no text parts in response".into(),
        ));
    }

    Ok(text)
}

/// Interpret a location-inference reply.
///
/// The model is instructed to answer with a bare place name or exactly
/// `NONE`. Strip wrapping quotes and a trailing period, then map `NONE` or an
/// empty reply to no location.
pub fn parse_location_reply(reply: &str) -> Option<String> {
    let cleaned = reply
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim_end_matches('.')
        .trim();

    if cleaned.is_empty() || cleaned.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(cleaned.to_string())
    }
}
