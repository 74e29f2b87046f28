use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use sqlx::PgPool;
use tower::ServiceExt;

use monument_api::config::ServerConfig;
use monument_api::middleware::rate_limit::RateLimitConfig;
use monument_api::router::build_app_router;
use monument_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults: CAPTCHA off, a rate limit
/// far above anything a test sends, and dummy upstream credentials (no test
/// in this suite talks to an external API).
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        gemini_api_key: "test-gemini-key".to_string(),
        gemini_image_model: "gemini-2.5-flash-image".to_string(),
        gemini_text_model: "gemini-2.5-flash".to_string(),
        geocoding_api_key: "test-geocoding-key".to_string(),
        captcha: None,
        rate_limit: RateLimitConfig {
            window_secs: 60,
            max_requests: 10_000,
        },
        image_cache_capacity: 128,
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, test_config())
}

/// Same as [`build_test_app`] but with a caller-supplied configuration.
pub fn build_test_app_with(pool: PgPool, config: ServerConfig) -> Router {
    let state = AppState::new(pool, config.clone());
    build_app_router(state, &config)
}

/// Send a GET request through the router.
pub async fn get(app: Router, path: &str) -> Response {
    app.oneshot(
        Request::builder()
            .uri(path)
            .body(Body::empty())
            .expect("request must build"),
    )
    .await
    .expect("request must not fail")
}

/// Send a JSON POST request through the router.
pub async fn post_json(app: Router, path: &str, body: serde_json::Value) -> Response {
    post_json_from(app, path, body, None).await
}

/// Send a JSON POST with an optional `x-forwarded-for` client address.
pub async fn post_json_from(
    app: Router,
    path: &str,
    body: serde_json::Value,
    forwarded_for: Option<&str>,
) -> Response {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json");

    if let Some(addr) = forwarded_for {
        builder = builder.header("x-forwarded-for", addr);
    }

    app.oneshot(
        builder
            .body(Body::from(body.to_string()))
            .expect("request must build"),
    )
    .await
    .expect("request must not fail")
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    use http_body_util::BodyExt;

    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body must collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body must be JSON")
}

/// Assert a status and return the parsed body.
pub async fn expect_json(response: Response, status: StatusCode) -> serde_json::Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}
