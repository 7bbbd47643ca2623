//! Instance entity model and populated list view.

use serde::Serialize;
use sqlx::FromRow;

use dorsal_core::types::{DbId, Timestamp};

/// An instance row from the `instances` table: one dated, priced
/// occurrence of a modality.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Instance {
    pub id: DbId,
    pub modality_id: DbId,
    pub date: Timestamp,
    pub price: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Instance {
    /// Canonical detail path for this instance.
    pub fn url(&self) -> String {
        format!("/catalog/instance/{}", self.id)
    }
}

/// Instance list row with its modality and race resolved at read time.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InstanceListItem {
    pub id: DbId,
    pub date: Timestamp,
    pub price: f64,
    pub modality_id: DbId,
    pub distance: f64,
    pub race_name: String,
}
