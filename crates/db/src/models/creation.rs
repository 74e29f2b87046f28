//! Creation entity model and DTOs.

use monument_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A full row from the `creations` table, image payload included.
///
/// Only the by-id read path returns this shape; everything else uses
/// [`CreationSummary`] so image payloads never ride along with lists.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Creation {
    pub id: DbId,
    pub monument_prompt: String,
    pub scene_prompt: String,
    /// Base64 data URI (`data:image/...;base64,...`).
    pub image_data: String,
    pub lat: f64,
    pub lng: f64,
    pub created_at: Timestamp,
}

/// A creation without its image payload.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CreationSummary {
    pub id: DbId,
    pub monument_prompt: String,
    pub scene_prompt: String,
    pub lat: f64,
    pub lng: f64,
    pub created_at: Timestamp,
}

impl From<Creation> for CreationSummary {
    fn from(creation: Creation) -> Self {
        Self {
            id: creation.id,
            monument_prompt: creation.monument_prompt,
            scene_prompt: creation.scene_prompt,
            lat: creation.lat,
            lng: creation.lng,
            created_at: creation.created_at,
        }
    }
}

/// DTO for inserting a creation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCreation {
    pub monument_prompt: String,
    pub scene_prompt: String,
    pub image_data: String,
    pub lat: f64,
    pub lng: f64,
}
