//! Repository for the `races` table.

use sqlx::PgPool;

use dorsal_core::catalog::RaceDraft;
use dorsal_core::types::DbId;

use crate::models::race::{Race, RaceListItem};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, category_id, description, image_url, created_at, updated_at";

/// Provides CRUD operations for races.
pub struct RaceRepo;

impl RaceRepo {
    /// Insert a new race, returning the created row.
    pub async fn create(pool: &PgPool, draft: &RaceDraft) -> Result<Race, sqlx::Error> {
        let query = format!(
            "INSERT INTO races (name, category_id, description, image_url)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Race>(&query)
            .bind(&draft.name)
            .bind(draft.category_id)
            .bind(&draft.description)
            .bind(&draft.image_url)
            .fetch_one(pool)
            .await
    }

    /// Find a race by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Race>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM races WHERE id = $1");
        sqlx::query_as::<_, Race>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a race by name under case-insensitive comparison.
    pub async fn find_by_name_ci(pool: &PgPool, name: &str) -> Result<Option<Race>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM races WHERE LOWER(name) = LOWER($1)");
        sqlx::query_as::<_, Race>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// List all races ordered by name, with each race's category resolved.
    pub async fn list(pool: &PgPool) -> Result<Vec<RaceListItem>, sqlx::Error> {
        sqlx::query_as::<_, RaceListItem>(
            "SELECT r.id, r.name, r.category_id, c.name AS category_name
             FROM races r
             JOIN categories c ON c.id = r.category_id
             ORDER BY r.name ASC",
        )
        .fetch_all(pool)
        .await
    }

    /// List the races referencing a category (its delete blockers).
    pub async fn list_by_category(
        pool: &PgPool,
        category_id: DbId,
    ) -> Result<Vec<Race>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM races WHERE category_id = $1 ORDER BY name ASC");
        sqlx::query_as::<_, Race>(&query)
            .bind(category_id)
            .fetch_all(pool)
            .await
    }

    /// Replace a race's fields in place, preserving its id.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        draft: &RaceDraft,
    ) -> Result<Option<Race>, sqlx::Error> {
        let query = format!(
            "UPDATE races
             SET name = $2, category_id = $3, description = $4, image_url = $5, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Race>(&query)
            .bind(id)
            .bind(&draft.name)
            .bind(draft.category_id)
            .bind(&draft.description)
            .bind(&draft.image_url)
            .fetch_optional(pool)
            .await
    }

    /// Delete a race by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM races WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count all races.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM races")
            .fetch_one(pool)
            .await
    }
}
