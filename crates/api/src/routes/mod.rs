pub mod health;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /creations            GET list (or single with ?id=), POST persist
/// /creations/pins       GET map pins (grouped by rounded coordinate)
/// /creations/compose    POST full create pipeline
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/creations",
            get(handlers::creations::list_or_get).post(handlers::creations::create),
        )
        .route("/creations/pins", get(handlers::creations::pins))
        .route("/creations/compose", post(handlers::creations::compose))
}
