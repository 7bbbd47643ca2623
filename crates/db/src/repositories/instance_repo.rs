//! Repository for the `instances` table.

use sqlx::PgPool;

use dorsal_core::catalog::InstanceDraft;
use dorsal_core::types::DbId;

use crate::models::instance::{Instance, InstanceListItem};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, modality_id, date, price, created_at, updated_at";

/// Provides CRUD operations for instances.
pub struct InstanceRepo;

impl InstanceRepo {
    /// Insert a new instance, returning the created row.
    pub async fn create(pool: &PgPool, draft: &InstanceDraft) -> Result<Instance, sqlx::Error> {
        let query = format!(
            "INSERT INTO instances (modality_id, date, price)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Instance>(&query)
            .bind(draft.modality_id)
            .bind(draft.date)
            .bind(draft.price)
            .fetch_one(pool)
            .await
    }

    /// Find an instance by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Instance>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM instances WHERE id = $1");
        sqlx::query_as::<_, Instance>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all instances ordered by date, with modality and race resolved.
    pub async fn list(pool: &PgPool) -> Result<Vec<InstanceListItem>, sqlx::Error> {
        sqlx::query_as::<_, InstanceListItem>(
            "SELECT i.id, i.date, i.price, i.modality_id, m.distance, r.name AS race_name
             FROM instances i
             JOIN modalities m ON m.id = i.modality_id
             JOIN races r ON r.id = m.race_id
             ORDER BY i.date ASC",
        )
        .fetch_all(pool)
        .await
    }

    /// List the instances referencing a modality (its delete blockers).
    pub async fn list_by_modality(
        pool: &PgPool,
        modality_id: DbId,
    ) -> Result<Vec<Instance>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM instances WHERE modality_id = $1 ORDER BY date ASC");
        sqlx::query_as::<_, Instance>(&query)
            .bind(modality_id)
            .fetch_all(pool)
            .await
    }

    /// Replace an instance's fields in place, preserving its id.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        draft: &InstanceDraft,
    ) -> Result<Option<Instance>, sqlx::Error> {
        let query = format!(
            "UPDATE instances
             SET modality_id = $2, date = $3, price = $4, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Instance>(&query)
            .bind(id)
            .bind(draft.modality_id)
            .bind(draft.date)
            .bind(draft.price)
            .fetch_optional(pool)
            .await
    }

    /// Delete an instance by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM instances WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count all instances.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM instances")
            .fetch_one(pool)
            .await
    }
}
