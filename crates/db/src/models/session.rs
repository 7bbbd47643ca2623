//! Session model and the deferred-action payload.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use dorsal_core::types::{DbId, Timestamp};

/// A session row from the `sessions` table.
///
/// `authenticated` is the long-lived step-up elevation flag; the
/// `pending_*` columns hold at most one captured mutation awaiting
/// password confirmation.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: DbId,
    pub token: Uuid,
    pub authenticated: bool,
    pub pending_method: Option<String>,
    pub pending_path: Option<String>,
    pub pending_body: Option<serde_json::Value>,
    pub return_to: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A mutation captured by the step-up gate, replayed after confirmation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingAction {
    pub method: String,
    pub path: String,
    pub body: serde_json::Value,
    pub return_to: String,
}
