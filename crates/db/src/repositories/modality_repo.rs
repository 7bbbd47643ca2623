//! Repository for the `modalities` table.

use sqlx::PgPool;

use dorsal_core::catalog::ModalityDraft;
use dorsal_core::types::DbId;

use crate::models::modality::{Modality, ModalityListItem};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, race_id, start_location_id, end_location_id, distance, elevation, \
                       track, created_at, updated_at";

/// Populated projection shared by the location-facing queries.
const LIST_ITEM_SELECT: &str =
    "SELECT m.id, m.race_id, r.name AS race_name, m.start_location_id, m.end_location_id, \
            m.distance, m.elevation
     FROM modalities m
     JOIN races r ON r.id = m.race_id";

/// Provides CRUD operations for modalities.
pub struct ModalityRepo;

impl ModalityRepo {
    /// Insert a new modality, returning the created row.
    pub async fn create(pool: &PgPool, draft: &ModalityDraft) -> Result<Modality, sqlx::Error> {
        let query = format!(
            "INSERT INTO modalities (race_id, start_location_id, end_location_id, distance, elevation, track)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Modality>(&query)
            .bind(draft.race_id)
            .bind(draft.start_location_id)
            .bind(draft.end_location_id)
            .bind(draft.distance)
            .bind(draft.elevation)
            .bind(&draft.track)
            .fetch_one(pool)
            .await
    }

    /// Find a modality by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Modality>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM modalities WHERE id = $1");
        sqlx::query_as::<_, Modality>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the modality of a race at a given distance, the pair under
    /// which modalities are unique.
    pub async fn find_by_race_and_distance(
        pool: &PgPool,
        race_id: DbId,
        distance: f64,
    ) -> Result<Option<Modality>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM modalities WHERE race_id = $1 AND distance = $2");
        sqlx::query_as::<_, Modality>(&query)
            .bind(race_id)
            .bind(distance)
            .fetch_optional(pool)
            .await
    }

    /// List all modalities in insertion order.
    pub async fn list(pool: &PgPool) -> Result<Vec<Modality>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM modalities ORDER BY id ASC");
        sqlx::query_as::<_, Modality>(&query).fetch_all(pool).await
    }

    /// List the modalities referencing a race (its delete blockers).
    pub async fn list_by_race(pool: &PgPool, race_id: DbId) -> Result<Vec<Modality>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM modalities WHERE race_id = $1 ORDER BY id ASC");
        sqlx::query_as::<_, Modality>(&query)
            .bind(race_id)
            .fetch_all(pool)
            .await
    }

    /// List the modalities starting or ending at a location, with their
    /// races resolved. These are the location's delete blockers.
    pub async fn list_touching_location(
        pool: &PgPool,
        location_id: DbId,
    ) -> Result<Vec<ModalityListItem>, sqlx::Error> {
        let query = format!(
            "{LIST_ITEM_SELECT}
             WHERE m.start_location_id = $1 OR m.end_location_id = $1
             ORDER BY m.id ASC"
        );
        sqlx::query_as::<_, ModalityListItem>(&query)
            .bind(location_id)
            .fetch_all(pool)
            .await
    }

    /// Replace a modality's fields in place, preserving its id.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        draft: &ModalityDraft,
    ) -> Result<Option<Modality>, sqlx::Error> {
        let query = format!(
            "UPDATE modalities
             SET race_id = $2, start_location_id = $3, end_location_id = $4,
                 distance = $5, elevation = $6, track = $7, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Modality>(&query)
            .bind(id)
            .bind(draft.race_id)
            .bind(draft.start_location_id)
            .bind(draft.end_location_id)
            .bind(draft.distance)
            .bind(draft.elevation)
            .bind(&draft.track)
            .fetch_optional(pool)
            .await
    }

    /// Delete a modality by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM modalities WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count all modalities.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM modalities")
            .fetch_one(pool)
            .await
    }
}
