//! Route definitions for the password confirmation flow.
//!
//! ```text
//! GET  /confirm-password  -> password::form     (renders the form view)
//! POST /confirm-password  -> password::confirm  (checks the shared secret)
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::password;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/confirm-password",
        get(password::form).post(password::confirm),
    )
}
