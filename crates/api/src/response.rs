//! Shared response envelope for API handlers.
//!
//! Every success response is wrapped in `{ "data": ... }` so clients can
//! distinguish payloads from the `{ "error": ..., "code": ... }` error shape.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
