//! Repository for the `creations` table.

use sqlx::PgPool;

use monument_core::types::DbId;

use crate::models::creation::{CreateCreation, Creation, CreationSummary};

/// Column list for full-row queries.
const CREATION_COLUMNS: &str =
    "id, monument_prompt, scene_prompt, image_data, lat, lng, created_at";

/// Column list for summary queries. Deliberately excludes `image_data` so
/// list reads never pull payloads off disk.
const SUMMARY_COLUMNS: &str = "id, monument_prompt, scene_prompt, lat, lng, created_at";

/// Read/write operations for creations. Rows are insert-only: there is no
/// update or delete.
pub struct CreationRepo;

impl CreationRepo {
    /// Insert a new creation, returning the stored row.
    pub async fn insert(pool: &PgPool, input: &CreateCreation) -> Result<Creation, sqlx::Error> {
        let query = format!(
            "INSERT INTO creations (monument_prompt, scene_prompt, image_data, lat, lng) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {CREATION_COLUMNS}"
        );
        sqlx::query_as::<_, Creation>(&query)
            .bind(&input.monument_prompt)
            .bind(&input.scene_prompt)
            .bind(&input.image_data)
            .bind(input.lat)
            .bind(input.lng)
            .fetch_one(pool)
            .await
    }

    /// List all creations newest-first, without image payloads.
    pub async fn list_summaries(pool: &PgPool) -> Result<Vec<CreationSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM creations ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, CreationSummary>(&query)
            .fetch_all(pool)
            .await
    }

    /// Fetch one creation with its image payload.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Creation>, sqlx::Error> {
        let query = format!("SELECT {CREATION_COLUMNS} FROM creations WHERE id = $1");
        sqlx::query_as::<_, Creation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Total number of creations.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM creations")
            .fetch_one(pool)
            .await
    }
}
