use std::sync::Arc;

use monument_gemini::{GeminiClient, GeminiConfig};
use monument_geocode::GeocodeClient;

use crate::cache::ImageCache;
use crate::config::ServerConfig;
use crate::middleware::rate_limit::FixedWindowLimiter;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: monument_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Shared HTTP client (CAPTCHA verification; also pooled into the API
    /// clients below).
    pub http: reqwest::Client,
    /// Generative-language client (image generation + location inference).
    pub gemini: Arc<GeminiClient>,
    /// Geocoding client.
    pub geocoder: Arc<GeocodeClient>,
    /// Fixed-window rate limiter guarding the write endpoints.
    pub rate_limiter: Arc<FixedWindowLimiter>,
    /// Process-local cache for by-id creation reads.
    pub image_cache: Arc<ImageCache>,
}

impl AppState {
    /// Build the full state from a pool and configuration.
    ///
    /// One [`reqwest::Client`] is shared across every outbound integration so
    /// connections pool process-wide.
    pub fn new(pool: monument_db::DbPool, config: ServerConfig) -> Self {
        let http = reqwest::Client::new();

        let gemini_config = GeminiConfig {
            api_key: config.gemini_api_key.clone(),
            base_url: monument_gemini::client::DEFAULT_BASE_URL.to_string(),
            image_model: config.gemini_image_model.clone(),
            text_model: config.gemini_text_model.clone(),
        };
        let gemini = Arc::new(GeminiClient::new(http.clone(), gemini_config));

        let geocoder = Arc::new(GeocodeClient::new(
            http.clone(),
            config.geocoding_api_key.clone(),
        ));

        let rate_limiter = Arc::new(FixedWindowLimiter::new(&config.rate_limit));
        let image_cache = Arc::new(ImageCache::new(config.image_cache_capacity));

        Self {
            pool,
            config: Arc::new(config),
            http,
            gemini,
            geocoder,
            rate_limiter,
            image_cache,
        }
    }
}
