//! Race entity model and populated list view.

use serde::Serialize;
use sqlx::FromRow;

use dorsal_core::types::{DbId, Timestamp};

/// A race row from the `races` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Race {
    pub id: DbId,
    pub name: String,
    pub category_id: DbId,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Race {
    /// Canonical detail path for this race.
    pub fn url(&self) -> String {
        format!("/catalog/race/{}", self.id)
    }
}

/// Race list row with its category resolved at read time.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RaceListItem {
    pub id: DbId,
    pub name: String,
    pub category_id: DbId,
    pub category_name: String,
}
