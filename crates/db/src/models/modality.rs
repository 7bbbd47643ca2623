//! Modality entity model and populated list view.

use serde::Serialize;
use sqlx::FromRow;

use dorsal_core::types::{DbId, Timestamp};

/// A modality row from the `modalities` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Modality {
    pub id: DbId,
    pub race_id: DbId,
    pub start_location_id: DbId,
    pub end_location_id: DbId,
    pub distance: f64,
    pub elevation: f64,
    pub track: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Modality {
    /// Canonical detail path for this modality.
    pub fn url(&self) -> String {
        format!("/catalog/modality/{}", self.id)
    }
}

/// Modality list row with its race resolved at read time. Used where the
/// rendered view names the race (location detail, delete confirmations).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ModalityListItem {
    pub id: DbId,
    pub race_id: DbId,
    pub race_name: String,
    pub start_location_id: DbId,
    pub end_location_id: DbId,
    pub distance: f64,
    pub elevation: f64,
}
