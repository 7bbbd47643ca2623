//! Location entity model.

use serde::Serialize;
use sqlx::FromRow;

use dorsal_core::types::{DbId, Timestamp};

/// A location row from the `locations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Location {
    pub id: DbId,
    pub city: String,
    pub community: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Location {
    /// Canonical detail path for this location.
    pub fn url(&self) -> String {
        format!("/catalog/location/{}", self.id)
    }
}
