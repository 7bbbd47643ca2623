//! Category entity model.

use serde::Serialize;
use sqlx::FromRow;

use dorsal_core::types::{DbId, Timestamp};

/// A category row from the `categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Category {
    /// Canonical detail path for this category.
    pub fn url(&self) -> String {
        format!("/catalog/category/{}", self.id)
    }
}
