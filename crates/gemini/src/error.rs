/// Errors from the generative-language API layer.
#[derive(Debug, thiserror::Error)]
pub enum GeminiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API key was rejected (401/403).
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The API asked us to slow down (429).
    #[error("Rate limited by the generative API")]
    RateLimited,

    /// The prompt or the generated output tripped a safety filter.
    #[error("Content blocked: {0}")]
    ContentBlocked(String),

    /// Any other non-2xx status.
    #[error("Generative API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        message: String,
    },

    /// The base64 image payload could not be decoded.
    #[error("Failed to decode image payload: {0}")]
    Decode(String),

    /// A 2xx response missing the parts we need.
    #[error("Unexpected response shape: {0}")]
    UnexpectedResponse(String),
}

impl GeminiError {
    /// Map a non-2xx HTTP status and body into the right variant.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => Self::Auth(body),
            429 => Self::RateLimited,
            _ => Self::Api {
                status,
                message: body,
            },
        }
    }
}
