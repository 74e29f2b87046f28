//! Fixed-window in-memory rate limiting for the write endpoints.
//!
//! Counters live in a process-local map keyed by client address, so limits
//! reset on restart and are not shared across instances.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;

use monument_core::error::CoreError;

use crate::error::AppError;
use crate::state::AppState;

/// Entries are pruned once the map exceeds this size.
const PRUNE_THRESHOLD: usize = 1024;

/// Fixed-window rate limit settings.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub window_secs: u64,
    pub max_requests: u32,
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started_at: Instant,
    count: u32,
}

/// Fixed-window counter map keyed by client address.
pub struct FixedWindowLimiter {
    window: Duration,
    max_requests: u32,
    windows: Mutex<HashMap<String, Window>>,
}

impl FixedWindowLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            window: Duration::from_secs(config.window_secs),
            max_requests: config.max_requests,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Count a request for `key`, rejecting once the window is exhausted.
    pub fn check(&self, key: &str) -> Result<(), CoreError> {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> Result<(), CoreError> {
        let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);

        if windows.len() > PRUNE_THRESHOLD {
            let window = self.window;
            windows.retain(|_, w| now.duration_since(w.started_at) < window);
        }

        let entry = windows.entry(key.to_string()).or_insert(Window {
            started_at: now,
            count: 0,
        });

        if now.duration_since(entry.started_at) >= self.window {
            entry.started_at = now;
            entry.count = 0;
        }

        entry.count += 1;
        if entry.count > self.max_requests {
            return Err(CoreError::RateLimited(
                "Too many requests, try again later".into(),
            ));
        }

        Ok(())
    }
}

/// Rate-limit guard extractor.
///
/// Add as a handler parameter to make the endpoint count against the
/// client's window before the body is read:
///
/// ```ignore
/// async fn create(state: State<AppState>, _guard: RateLimitGuard, ...) -> AppResult<...>
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RateLimitGuard;

impl FromRequestParts<AppState> for RateLimitGuard {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let key = client_key(parts);
        state.rate_limiter.check(&key).map_err(AppError::Core)?;
        Ok(RateLimitGuard)
    }
}

/// Derive the limiter key for a request.
///
/// Prefers the first `x-forwarded-for` hop (the service normally runs behind
/// a proxy), then the peer address, then a shared fallback bucket.
fn client_key(parts: &Parts) -> String {
    if let Some(forwarded) = parts
        .headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
    {
        if let Some(first_hop) = forwarded.split(',').next() {
            let first_hop = first_hop.trim();
            if !first_hop.is_empty() {
                return first_hop.to_string();
            }
        }
    }

    parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
