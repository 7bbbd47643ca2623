//! Repository for the `locations` table.

use sqlx::PgPool;

use dorsal_core::catalog::LocationDraft;
use dorsal_core::types::DbId;

use crate::models::location::Location;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, city, community, created_at, updated_at";

/// Provides CRUD operations for locations.
pub struct LocationRepo;

impl LocationRepo {
    /// Insert a new location, returning the created row.
    pub async fn create(pool: &PgPool, draft: &LocationDraft) -> Result<Location, sqlx::Error> {
        let query = format!(
            "INSERT INTO locations (city, community)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(&draft.city)
            .bind(&draft.community)
            .fetch_one(pool)
            .await
    }

    /// Find a location by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Location>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM locations WHERE id = $1");
        sqlx::query_as::<_, Location>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a location by city name under case-insensitive comparison.
    pub async fn find_by_city_ci(
        pool: &PgPool,
        city: &str,
    ) -> Result<Option<Location>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM locations WHERE LOWER(city) = LOWER($1)");
        sqlx::query_as::<_, Location>(&query)
            .bind(city)
            .fetch_optional(pool)
            .await
    }

    /// List all locations ordered by city name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Location>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM locations ORDER BY city ASC");
        sqlx::query_as::<_, Location>(&query).fetch_all(pool).await
    }

    /// Replace a location's fields in place, preserving its id.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        draft: &LocationDraft,
    ) -> Result<Option<Location>, sqlx::Error> {
        let query = format!(
            "UPDATE locations
             SET city = $2, community = $3, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(id)
            .bind(&draft.city)
            .bind(&draft.community)
            .fetch_optional(pool)
            .await
    }

    /// Delete a location by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM locations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count all locations.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM locations")
            .fetch_one(pool)
            .await
    }
}
