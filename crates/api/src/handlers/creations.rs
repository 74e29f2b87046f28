//! Handlers for creations.
//!
//! Routes:
//! - `GET  /creations`          — list summaries, or one full creation with `?id=`
//! - `GET  /creations/pins`     — creations grouped into map pins
//! - `POST /creations`          — persist an already-composed creation
//! - `POST /creations/compose`  — generate, locate, geocode, persist

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use monument_core::error::CoreError;
use monument_core::geo::{self, Coordinates, PinPoint, NULL_ISLAND};
use monument_core::types::DbId;
use monument_core::{creation, data_uri};
use monument_db::models::creation::{CreateCreation, CreationSummary};
use monument_db::repositories::CreationRepo;

use crate::error::AppResult;
use crate::middleware::captcha;
use crate::middleware::rate_limit::RateLimitGuard;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /creations`.
///
/// The original wire contract multiplexes the list and by-id reads on one
/// path: no `id` lists summaries, `?id=` returns a single creation with its
/// image payload.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub id: Option<DbId>,
}

/// GET /api/v1/creations
pub async fn list_or_get(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Response> {
    match params.id {
        Some(id) => get_by_id(&state, id).await,
        None => {
            let summaries = CreationRepo::list_summaries(&state.pool).await?;
            Ok(Json(DataResponse { data: summaries }).into_response())
        }
    }
}

/// By-id read with the image payload, memoized in the process-local cache.
async fn get_by_id(state: &AppState, id: DbId) -> AppResult<Response> {
    if let Some(cached) = state.image_cache.get(id) {
        tracing::debug!(id, "Creation served from cache");
        return Ok(Json(DataResponse { data: cached }).into_response());
    }

    let creation = CreationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Creation",
            id,
        })?;

    state.image_cache.insert(creation.clone());
    Ok(Json(DataResponse { data: creation }).into_response())
}

/// GET /api/v1/creations/pins
///
/// Groups all creations by rounded coordinate so the map renders one marker
/// per bucket with a count badge. Image-free by construction: the grouping
/// works on summaries.
pub async fn pins(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let summaries = CreationRepo::list_summaries(&state.pool).await?;

    let points: Vec<PinPoint> = summaries
        .iter()
        .map(|s| PinPoint {
            id: s.id,
            lat: s.lat,
            lng: s.lng,
        })
        .collect();

    Ok(Json(DataResponse {
        data: geo::group_pins(&points),
    }))
}

/// Request body for `POST /creations`.
#[derive(Debug, Deserialize)]
pub struct CreateCreationRequest {
    pub monument_prompt: String,
    pub scene_prompt: String,
    /// Base64 data URI (`data:image/...;base64,...`).
    pub image_data: String,
    pub lat: f64,
    pub lng: f64,
    pub captcha_token: Option<String>,
}

/// POST /api/v1/creations
///
/// Persists a creation composed elsewhere. Validates prompts, coordinates,
/// and the image payload; counts against the rate limit; requires a CAPTCHA
/// token when verification is configured. Responds 201 with the stored
/// summary -- the image is not echoed back.
pub async fn create(
    State(state): State<AppState>,
    _guard: RateLimitGuard,
    Json(input): Json<CreateCreationRequest>,
) -> AppResult<impl IntoResponse> {
    creation::validate_prompts(&input.monument_prompt, &input.scene_prompt)?;
    geo::validate_coordinates(input.lat, input.lng)?;
    data_uri::parse_image_data_uri(&input.image_data)?;

    captcha::verify(&state, input.captcha_token.as_deref()).await?;

    let stored = CreationRepo::insert(
        &state.pool,
        &CreateCreation {
            monument_prompt: input.monument_prompt,
            scene_prompt: input.scene_prompt,
            image_data: input.image_data,
            lat: input.lat,
            lng: input.lng,
        },
    )
    .await?;

    tracing::info!(id = stored.id, lat = stored.lat, lng = stored.lng, "Creation saved");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: CreationSummary::from(stored),
        }),
    ))
}

/// Request body for `POST /creations/compose`.
#[derive(Debug, Deserialize)]
pub struct ComposeRequest {
    pub monument_prompt: String,
    pub scene_prompt: String,
    pub captcha_token: Option<String>,
}

/// POST /api/v1/creations/compose
///
/// Runs the full create pipeline server-side. Image generation failure
/// aborts the request; the location stages only ever downgrade the result to
/// Null Island. Responds 201 with the full creation, image included, so the
/// client can render it immediately.
pub async fn compose(
    State(state): State<AppState>,
    _guard: RateLimitGuard,
    Json(input): Json<ComposeRequest>,
) -> AppResult<impl IntoResponse> {
    creation::validate_prompts(&input.monument_prompt, &input.scene_prompt)?;
    captcha::verify(&state, input.captcha_token.as_deref()).await?;

    let image = state
        .gemini
        .generate_monument_image(&input.monument_prompt, &input.scene_prompt)
        .await?;
    let image_data = data_uri::to_data_uri(&image.bytes, &image.mime_type);

    let coordinates =
        resolve_coordinates(&state, &input.monument_prompt, &input.scene_prompt).await;

    let stored = CreationRepo::insert(
        &state.pool,
        &CreateCreation {
            monument_prompt: input.monument_prompt,
            scene_prompt: input.scene_prompt,
            image_data,
            lat: coordinates.lat,
            lng: coordinates.lng,
        },
    )
    .await?;

    tracing::info!(
        id = stored.id,
        lat = stored.lat,
        lng = stored.lng,
        null_island = coordinates.is_null_island(),
        "Creation composed"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: stored })))
}

/// Infer and geocode a location for the prompts.
///
/// Both stages degrade to [`NULL_ISLAND`] on failure or absence; nothing in
/// here can abort the pipeline.
async fn resolve_coordinates(state: &AppState, monument: &str, scene: &str) -> Coordinates {
    let place = match state.gemini.infer_location(monument, scene).await {
        Ok(Some(place)) => place,
        Ok(None) => {
            tracing::info!("No real-world location inferred, using Null Island");
            return NULL_ISLAND;
        }
        Err(e) => {
            tracing::warn!(error = %e, "Location inference failed, using Null Island");
            return NULL_ISLAND;
        }
    };

    match state.geocoder.geocode(&place).await {
        Ok(Some(coordinates)) => coordinates,
        Ok(None) => {
            tracing::info!(place = %place, "Geocoding found no results, using Null Island");
            NULL_ISLAND
        }
        Err(e) => {
            tracing::warn!(place = %place, error = %e, "Geocoding failed, using Null Island");
            NULL_ISLAND
        }
    }
}
