//! Step-up authentication gate for sensitive mutations.
//!
//! A gated handler asks the gate for permission before doing anything
//! else. For an unelevated session the gate captures the mutation as a
//! [`PendingAction`] on the session row and answers with a redirect to the
//! password confirmation page; once the caller confirms the shared secret,
//! the 307 replay reaches the handler again and the gate hands back the
//! captured body (single use) in place of the literal request body, which
//! by then carries the password form's fields.

use axum::response::{IntoResponse, Redirect, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use dorsal_db::models::session::PendingAction;
use dorsal_db::repositories::SessionRepo;
use dorsal_db::DbPool;

use crate::error::AppError;
use crate::middleware::session::SessionContext;

/// Outcome of the gate for one mutating request.
pub enum Gate<T> {
    /// The session is elevated; run the mutation with this input.
    Proceed(T),
    /// The caller must confirm the shared password first.
    Deferred(Response),
}

/// Gate a mutating request behind the step-up password.
///
/// `path` is the request's own path; it doubles as the `returnTo` target
/// the confirmation page redirects back to.
pub async fn require_elevated<T>(
    pool: &DbPool,
    session: &SessionContext,
    method: &str,
    path: &str,
    input: T,
) -> Result<Gate<T>, AppError>
where
    T: Serialize + DeserializeOwned,
{
    if session.authenticated {
        // Prefer a body captured before the password redirect; the literal
        // body of a replayed request is the password form's.
        let input = match SessionRepo::take_pending(pool, session.id).await? {
            Some(pending) => serde_json::from_value(pending.body).unwrap_or(input),
            None => input,
        };
        return Ok(Gate::Proceed(input));
    }

    let body = serde_json::to_value(&input)
        .map_err(|e| AppError::InternalError(format!("failed to capture request body: {e}")))?;
    let action = PendingAction {
        method: method.to_string(),
        path: path.to_string(),
        body,
        return_to: path.to_string(),
    };
    SessionRepo::store_pending(pool, session.id, &action).await?;

    tracing::debug!(session = session.id, %path, "Deferred gated mutation pending password confirmation");
    let target = format!("/confirm-password?returnTo={}", urlencoding::encode(path));
    Ok(Gate::Deferred(Redirect::to(&target).into_response()))
}
