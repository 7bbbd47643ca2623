//! Cookie-backed server-side sessions.
//!
//! The session middleware resolves the `sid` cookie to a row in the
//! `sessions` table, creating a fresh session (and setting the cookie on
//! the response) when the cookie is absent or stale. Handlers access the
//! resolved session through the [`SessionContext`] extractor.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

use dorsal_core::error::CoreError;
use dorsal_core::types::DbId;
use dorsal_db::repositories::SessionRepo;

use crate::error::AppError;
use crate::state::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "sid";

/// The caller's resolved session, stored in request extensions by
/// [`session_layer`].
#[derive(Debug, Clone)]
pub struct SessionContext {
    /// The session's internal database id.
    pub id: DbId,
    /// Whether the caller has confirmed the step-up password. Long-lived:
    /// once set it persists for the lifetime of the session.
    pub authenticated: bool,
}

/// Middleware resolving (or creating) the caller's session.
pub async fn session_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = cookie_value(req.headers().get_all(COOKIE).iter(), SESSION_COOKIE)
        .and_then(|v| Uuid::parse_str(&v).ok());

    let (session, is_new) = match token {
        Some(token) => match SessionRepo::find_by_token(&state.pool, token).await? {
            Some(session) => (session, false),
            None => (SessionRepo::create(&state.pool, Uuid::new_v4()).await?, true),
        },
        None => (SessionRepo::create(&state.pool, Uuid::new_v4()).await?, true),
    };

    if is_new {
        tracing::debug!(session = session.id, "Created new session");
    }

    let token = session.token;
    req.extensions_mut().insert(SessionContext {
        id: session.id,
        authenticated: session.authenticated,
    });

    let mut response = next.run(req).await;

    if is_new {
        let cookie = format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax");
        let value = HeaderValue::from_str(&cookie)
            .map_err(|e| AppError::InternalError(format!("invalid session cookie: {e}")))?;
        response.headers_mut().append(SET_COOKIE, value);
    }

    Ok(response)
}

/// Extract a named cookie's value from `Cookie` headers.
fn cookie_value<'a>(
    headers: impl Iterator<Item = &'a HeaderValue>,
    name: &str,
) -> Option<String> {
    for header in headers {
        let Ok(header) = header.to_str() else {
            continue;
        };
        for pair in header.split(';') {
            if let Some((key, value)) = pair.trim().split_once('=') {
                if key == name {
                    return Some(value.to_string());
                }
            }
        }
    }
    None
}

impl FromRequestParts<AppState> for SessionContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<SessionContext>().cloned().ok_or_else(|| {
            AppError::Core(CoreError::Internal(
                "session middleware not installed on this route".into(),
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_value_finds_named_cookie() {
        let header = HeaderValue::from_static("theme=dark; sid=abc-123; lang=es");
        assert_eq!(
            cookie_value([&header].into_iter(), "sid"),
            Some("abc-123".to_string())
        );
        assert_eq!(cookie_value([&header].into_iter(), "missing"), None);
    }
}
