//! Repository for the `sessions` table.

use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use dorsal_core::types::DbId;

use crate::models::session::{PendingAction, Session};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, token, authenticated, pending_method, pending_path, pending_body, \
                       return_to, created_at, updated_at";

/// Row shape returned by the take-and-clear query: the pending columns as
/// they were before being cleared.
#[derive(FromRow)]
struct TakenPending {
    pending_method: Option<String>,
    pending_path: Option<String>,
    pending_body: Option<serde_json::Value>,
    return_to: Option<String>,
}

/// Provides operations for caller sessions and their deferred actions.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a new, unauthenticated session for the given cookie token.
    pub async fn create(pool: &PgPool, token: Uuid) -> Result<Session, sqlx::Error> {
        let query = format!(
            "INSERT INTO sessions (token)
             VALUES ($1)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(token)
            .fetch_one(pool)
            .await
    }

    /// Resolve a cookie token to its session.
    pub async fn find_by_token(pool: &PgPool, token: Uuid) -> Result<Option<Session>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sessions WHERE token = $1");
        sqlx::query_as::<_, Session>(&query)
            .bind(token)
            .fetch_optional(pool)
            .await
    }

    /// Mark a session as password-confirmed. The flag is long-lived; it is
    /// never cleared for the lifetime of the session.
    pub async fn set_authenticated(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE sessions SET authenticated = TRUE, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Capture a deferred mutation on the session, replacing any previous one.
    pub async fn store_pending(
        pool: &PgPool,
        id: DbId,
        action: &PendingAction,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE sessions
             SET pending_method = $2, pending_path = $3, pending_body = $4,
                 return_to = $5, updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(&action.method)
        .bind(&action.path)
        .bind(&action.body)
        .bind(&action.return_to)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Consume the session's deferred action, if any.
    ///
    /// Single-use by construction: the row is locked, the previous values
    /// are returned, and the columns are cleared in one statement, so two
    /// replays cannot both observe the same capture.
    pub async fn take_pending(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<PendingAction>, sqlx::Error> {
        let taken = sqlx::query_as::<_, TakenPending>(
            "UPDATE sessions s
             SET pending_method = NULL, pending_path = NULL, pending_body = NULL,
                 return_to = NULL, updated_at = NOW()
             FROM (SELECT id, pending_method, pending_path, pending_body, return_to
                   FROM sessions WHERE id = $1 FOR UPDATE) prev
             WHERE s.id = prev.id AND prev.pending_body IS NOT NULL
             RETURNING prev.pending_method, prev.pending_path, prev.pending_body, prev.return_to",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(taken.and_then(|row| {
            let body = row.pending_body?;
            Some(PendingAction {
                method: row.pending_method.unwrap_or_default(),
                path: row.pending_path.clone().unwrap_or_default(),
                body,
                return_to: row.return_to.or(row.pending_path).unwrap_or_default(),
            })
        }))
    }
}
