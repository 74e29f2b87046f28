//! CAPTCHA token verification for the write endpoints.
//!
//! Verification runs only when a secret is configured; without one the
//! check is a no-op so local development needs no CAPTCHA setup. Tokens are
//! verified against the provider's siteverify endpoint and, when a score is
//! present, checked against the configured threshold.

use serde::Deserialize;

use monument_core::error::CoreError;

use crate::error::AppError;
use crate::state::AppState;

/// Default siteverify endpoint.
pub const DEFAULT_VERIFY_URL: &str = "https://www.google.com/recaptcha/api/siteverify";

/// CAPTCHA verification settings.
#[derive(Debug, Clone)]
pub struct CaptchaConfig {
    /// Server-side secret for the siteverify call.
    pub secret: String,
    /// Minimum acceptable score when the provider returns one.
    pub score_threshold: f64,
    /// Verification endpoint. Overridable for tests.
    pub verify_url: String,
}

impl CaptchaConfig {
    pub fn new(secret: impl Into<String>, score_threshold: f64) -> Self {
        Self {
            secret: secret.into(),
            score_threshold,
            verify_url: DEFAULT_VERIFY_URL.to_string(),
        }
    }
}

/// Provider response for a siteverify call.
#[derive(Debug, Deserialize)]
pub struct VerifyResponse {
    pub success: bool,
    /// Present for score-based tokens, absent for checkbox tokens.
    pub score: Option<f64>,
    #[serde(rename = "error-codes", default)]
    pub error_codes: Vec<String>,
}

/// Judge a provider response against the configured threshold.
///
/// A missing score passes (checkbox-style tokens carry none); a present
/// score must meet the threshold.
pub fn evaluate(response: &VerifyResponse, score_threshold: f64) -> Result<(), CoreError> {
    if !response.success {
        return Err(CoreError::Unauthorized(format!(
            "CAPTCHA verification failed: {}",
            response.error_codes.join(", ")
        )));
    }

    if let Some(score) = response.score {
        if score < score_threshold {
            return Err(CoreError::Unauthorized(format!(
                "CAPTCHA score {score} below threshold"
            )));
        }
    }

    Ok(())
}

/// Verify a request's CAPTCHA token.
///
/// No-op when verification is not configured. A missing token, a failed
/// verification, or an unreachable verifier all reject the request -- the
/// check never fails open.
pub async fn verify(state: &AppState, token: Option<&str>) -> Result<(), AppError> {
    let Some(config) = &state.config.captcha else {
        return Ok(());
    };

    let token = token.ok_or_else(|| {
        AppError::Core(CoreError::Unauthorized("CAPTCHA token required".into()))
    })?;

    let response = state
        .http
        .post(&config.verify_url)
        .form(&[("secret", config.secret.as_str()), ("response", token)])
        .send()
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "CAPTCHA verification request failed");
            AppError::Internal("CAPTCHA verification unavailable".into())
        })?;

    let verdict: VerifyResponse = response.json().await.map_err(|e| {
        tracing::error!(error = %e, "CAPTCHA verification response unreadable");
        AppError::Internal("CAPTCHA verification unavailable".into())
    })?;

    evaluate(&verdict, config.score_threshold).map_err(AppError::Core)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(success: bool, score: Option<f64>) -> VerifyResponse {
        VerifyResponse {
            success,
            score,
            error_codes: vec![],
        }
    }

    #[test]
    fn passing_score_is_accepted() {
        assert!(evaluate(&response(true, Some(0.9)), 0.5).is_ok());
    }

    #[test]
    fn score_at_threshold_is_accepted() {
        assert!(evaluate(&response(true, Some(0.5)), 0.5).is_ok());
    }

    #[test]
    fn low_score_is_rejected() {
        let err = evaluate(&response(true, Some(0.1)), 0.5).unwrap_err();
        assert!(matches!(err, CoreError::Unauthorized(_)));
    }

    #[test]
    fn missing_score_passes() {
        // Checkbox-style tokens have no score.
        assert!(evaluate(&response(true, None), 0.5).is_ok());
    }

    #[test]
    fn unsuccessful_verification_is_rejected() {
        let verdict = VerifyResponse {
            success: false,
            score: None,
            error_codes: vec!["invalid-input-response".to_string()],
        };
        let err = evaluate(&verdict, 0.5).unwrap_err();
        assert!(err.to_string().contains("invalid-input-response"));
    }

    #[test]
    fn verify_response_parses_provider_json() {
        let verdict: VerifyResponse = serde_json::from_str(
            r#"{ "success": true, "score": 0.7, "action": "create", "hostname": "example.com" }"#,
        )
        .unwrap();
        assert!(verdict.success);
        assert_eq!(verdict.score, Some(0.7));
    }
}
