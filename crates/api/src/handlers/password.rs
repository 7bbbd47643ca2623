//! Password confirmation handlers for the step-up gate.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Form, Json};
use serde::Deserialize;

use dorsal_db::repositories::SessionRepo;

use crate::error::AppResult;
use crate::middleware::session::SessionContext;
use crate::response::PasswordView;
use crate::state::AppState;

/// Fallback target when no `returnTo` was supplied or it is not a local path.
const DEFAULT_RETURN_TO: &str = "/catalog";

#[derive(Debug, Deserialize)]
pub struct PasswordQuery {
    #[serde(rename = "returnTo")]
    pub return_to: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PasswordSubmission {
    pub password: Option<String>,
    #[serde(rename = "returnTo")]
    pub return_to: Option<String>,
}

/// Only redirect back to local paths.
fn safe_return_to(return_to: Option<String>) -> String {
    match return_to {
        Some(target) if target.starts_with('/') => target,
        _ => DEFAULT_RETURN_TO.to_string(),
    }
}

// ---------------------------------------------------------------------------
// GET /confirm-password
// ---------------------------------------------------------------------------

/// Render the password form view.
pub async fn form(Query(query): Query<PasswordQuery>) -> Json<PasswordView> {
    Json(PasswordView {
        return_to: safe_return_to(query.return_to),
        error: None,
    })
}

// ---------------------------------------------------------------------------
// POST /confirm-password
// ---------------------------------------------------------------------------

/// Check the submitted password against the configured shared secret.
///
/// On match, the session's `authenticated` flag is set and the caller is
/// redirected with 307 so the original method reaches `returnTo` again.
/// On mismatch the form view is re-rendered with an error and the captured
/// pending action is left intact for a retry.
pub async fn confirm(
    State(state): State<AppState>,
    session: SessionContext,
    Form(form): Form<PasswordSubmission>,
) -> AppResult<Response> {
    let return_to = safe_return_to(form.return_to);

    if form.password.as_deref() == Some(state.config.step_up.password.as_str()) {
        SessionRepo::set_authenticated(&state.pool, session.id).await?;
        tracing::info!(session = session.id, %return_to, "Step-up password confirmed");
        return Ok(Redirect::temporary(&return_to).into_response());
    }

    tracing::warn!(session = session.id, "Step-up password rejected");
    Ok((
        StatusCode::UNAUTHORIZED,
        Json(PasswordView {
            return_to,
            error: Some("Incorrect password. Please try again.".to_string()),
        }),
    )
        .into_response())
}
