use crate::middleware::captcha::CaptchaConfig;
use crate::middleware::rate_limit::RateLimitConfig;

/// Server configuration loaded from environment variables.
///
/// Third-party credentials are required; everything else has defaults
/// suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// API key for the generative-language API.
    pub gemini_api_key: String,
    /// Model used for image generation.
    pub gemini_image_model: String,
    /// Model used for location inference.
    pub gemini_text_model: String,
    /// API key for the geocoding API.
    pub geocoding_api_key: String,
    /// CAPTCHA verification; `None` (no `CAPTCHA_SECRET` set) disables it.
    pub captcha: Option<CaptchaConfig>,
    /// Fixed-window rate limit applied to the write endpoints.
    pub rate_limit: RateLimitConfig,
    /// Maximum number of creations held in the in-memory image cache.
    pub image_cache_capacity: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                   | Default                       |
    /// |---------------------------|-------------------------------|
    /// | `HOST`                    | `0.0.0.0`                     |
    /// | `PORT`                    | `3000`                        |
    /// | `CORS_ORIGINS`            | `http://localhost:5173`       |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                          |
    /// | `GEMINI_API_KEY`          | (required)                    |
    /// | `GEMINI_IMAGE_MODEL`      | `gemini-2.5-flash-image`      |
    /// | `GEMINI_TEXT_MODEL`       | `gemini-2.5-flash`            |
    /// | `GEOCODING_API_KEY`       | (required)                    |
    /// | `CAPTCHA_SECRET`          | (unset: verification off)     |
    /// | `CAPTCHA_SCORE_THRESHOLD` | `0.5`                         |
    /// | `RATE_LIMIT_WINDOW_SECS`  | `60`                          |
    /// | `RATE_LIMIT_MAX_REQUESTS` | `10`                          |
    /// | `IMAGE_CACHE_CAPACITY`    | `128`                         |
    ///
    /// Panics on missing credentials or unparseable values, which is the
    /// desired behaviour -- misconfiguration should fail at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let gemini_api_key =
            std::env::var("GEMINI_API_KEY").expect("GEMINI_API_KEY must be set");

        let gemini_image_model = std::env::var("GEMINI_IMAGE_MODEL")
            .unwrap_or_else(|_| "gemini-2.5-flash-image".into());

        let gemini_text_model =
            std::env::var("GEMINI_TEXT_MODEL").unwrap_or_else(|_| "gemini-2.5-flash".into());

        let geocoding_api_key =
            std::env::var("GEOCODING_API_KEY").expect("GEOCODING_API_KEY must be set");

        let captcha = std::env::var("CAPTCHA_SECRET").ok().map(|secret| {
            let score_threshold: f64 = std::env::var("CAPTCHA_SCORE_THRESHOLD")
                .unwrap_or_else(|_| "0.5".into())
                .parse()
                .expect("CAPTCHA_SCORE_THRESHOLD must be a valid f64");
            CaptchaConfig::new(secret, score_threshold)
        });

        let rate_limit = RateLimitConfig {
            window_secs: std::env::var("RATE_LIMIT_WINDOW_SECS")
                .unwrap_or_else(|_| "60".into())
                .parse()
                .expect("RATE_LIMIT_WINDOW_SECS must be a valid u64"),
            max_requests: std::env::var("RATE_LIMIT_MAX_REQUESTS")
                .unwrap_or_else(|_| "10".into())
                .parse()
                .expect("RATE_LIMIT_MAX_REQUESTS must be a valid u32"),
        };

        let image_cache_capacity: usize = std::env::var("IMAGE_CACHE_CAPACITY")
            .unwrap_or_else(|_| "128".into())
            .parse()
            .expect("IMAGE_CACHE_CAPACITY must be a valid usize");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            gemini_api_key,
            gemini_image_model,
            gemini_text_model,
            geocoding_api_key,
            captcha,
            rate_limit,
            image_cache_capacity,
        }
    }
}
