//! Client for the Google Geocoding REST API.
//!
//! One operation: turn a place name into coordinates. A place the provider
//! does not know is not an error, it is `None`; callers fall back to Null
//! Island.

use monument_core::geo::Coordinates;
use serde::Deserialize;

/// Default REST base URL (the `/json` output path is appended per request).
pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/geocode";

/// Errors from the geocoding layer.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider rejected the API key or the request (`REQUEST_DENIED`).
    #[error("Geocoding request denied: {0}")]
    Denied(String),

    /// The provider asked us to slow down (`OVER_QUERY_LIMIT`).
    #[error("Geocoding query limit exceeded")]
    RateLimited,

    /// Any other non-OK provider status.
    #[error("Geocoding failed ({status}): {message}")]
    Api {
        /// Provider status string, e.g. `INVALID_REQUEST`.
        status: String,
        /// Provider `error_message` when present.
        message: String,
    },
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct GeocodeResponse {
    pub status: String,
    pub error_message: Option<String>,
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodeResult {
    pub geometry: Geometry,
    pub formatted_address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Geometry {
    pub location: Location,
}

#[derive(Debug, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

/// Interpret a geocoding response body.
///
/// `OK` yields the first result's location, `ZERO_RESULTS` yields `None`,
/// everything else is an error variant.
pub fn interpret_response(
    response: GeocodeResponse,
) -> Result<Option<Coordinates>, GeocodeError> {
    match response.status.as_str() {
        "OK" => {
            let result = response.results.into_iter().next().ok_or_else(|| {
                GeocodeError::Api {
                    status: "OK".to_string(),
                    message: "status OK but no results".to_string(),
                }
            })?;
            Ok(Some(Coordinates::new(
                result.geometry.location.lat,
                result.geometry.location.lng,
            )))
        }
        "ZERO_RESULTS" => Ok(None),
        "OVER_QUERY_LIMIT" => Err(GeocodeError::RateLimited),
        "REQUEST_DENIED" => Err(GeocodeError::Denied(
            response.error_message.unwrap_or_default(),
        )),
        other => Err(GeocodeError::Api {
            status: other.to_string(),
            message: response.error_message.unwrap_or_default(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for the geocoding API.
pub struct GeocodeClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeocodeClient {
    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn new(client: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Override the base URL (tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Geocode a place name to coordinates.
    pub async fn geocode(&self, place: &str) -> Result<Option<Coordinates>, GeocodeError> {
        let url = format!("{}/json", self.base_url.trim_end_matches('/'));

        let response = self
            .client
            .get(&url)
            .query(&[("address", place), ("key", &self.api_key)])
            .send()
            .await?
            .error_for_status()?
            .json::<GeocodeResponse>()
            .await?;

        let coordinates = interpret_response(response)?;
        tracing::debug!(place = %place, coordinates = ?coordinates, "Geocoded place");
        Ok(coordinates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn parse(json: &str) -> GeocodeResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn ok_status_yields_first_result() {
        let response = parse(
            r#"{
                "status": "OK",
                "results": [
                    {
                        "formatted_address": "Eiffel Tower, Paris, France",
                        "geometry": { "location": { "lat": 48.8584, "lng": 2.2945 } }
                    },
                    {
                        "formatted_address": "Somewhere else",
                        "geometry": { "location": { "lat": 1.0, "lng": 1.0 } }
                    }
                ]
            }"#,
        );

        let coordinates = interpret_response(response).unwrap().unwrap();
        assert_eq!(coordinates.lat, 48.8584);
        assert_eq!(coordinates.lng, 2.2945);
    }

    #[test]
    fn zero_results_is_none() {
        let response = parse(r#"{ "status": "ZERO_RESULTS", "results": [] }"#);
        assert!(interpret_response(response).unwrap().is_none());
    }

    #[test]
    fn over_query_limit_is_rate_limited() {
        let response = parse(r#"{ "status": "OVER_QUERY_LIMIT", "results": [] }"#);
        assert_matches!(interpret_response(response), Err(GeocodeError::RateLimited));
    }

    #[test]
    fn request_denied_carries_provider_message() {
        let response = parse(
            r#"{ "status": "REQUEST_DENIED", "error_message": "The provided API key is invalid.", "results": [] }"#,
        );
        assert_matches!(
            interpret_response(response),
            Err(GeocodeError::Denied(msg)) if msg.contains("invalid")
        );
    }

    #[test]
    fn unknown_status_is_api_error() {
        let response = parse(r#"{ "status": "INVALID_REQUEST", "results": [] }"#);
        assert_matches!(
            interpret_response(response),
            Err(GeocodeError::Api { status, .. }) if status == "INVALID_REQUEST"
        );
    }

    #[test]
    fn ok_with_no_results_is_api_error() {
        let response = parse(r#"{ "status": "OK", "results": [] }"#);
        assert_matches!(interpret_response(response), Err(GeocodeError::Api { .. }));
    }
}
