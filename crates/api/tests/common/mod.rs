//! Shared helpers for HTTP-level integration tests.
//!
//! Requests are sent straight to the router with `tower::ServiceExt` --
//! no TCP listener. Mutations use url-encoded form bodies like the real
//! clients, and the cookie helpers thread one caller's session across
//! requests for the step-up flow tests.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use dorsal_api::config::{ServerConfig, StepUpConfig};
use dorsal_api::router::build_app_router;
use dorsal_api::state::AppState;

/// The shared secret configured for tests.
pub const TEST_PASSWORD: &str = "s3cret";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        step_up: StepUpConfig {
            password: TEST_PASSWORD.to_string(),
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (sessions, CORS, request ID,
/// timeout, tracing, panic recovery) that production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

async fn request(
    app: Router,
    method: Method,
    path: &str,
    form_body: Option<&str>,
    cookie: Option<&str>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(path);
    if form_body.is_some() {
        builder = builder.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    }
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let body = form_body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty);
    let request = builder.body(body).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, path: &str) -> Response {
    request(app, Method::GET, path, None, None).await
}

pub async fn get_with_cookie(app: Router, path: &str, cookie: &str) -> Response {
    request(app, Method::GET, path, None, Some(cookie)).await
}

pub async fn post_form(app: Router, path: &str, body: &str) -> Response {
    request(app, Method::POST, path, Some(body), None).await
}

pub async fn post_form_with_cookie(app: Router, path: &str, body: &str, cookie: &str) -> Response {
    request(app, Method::POST, path, Some(body), Some(cookie)).await
}

/// Parse the response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// The `Location` header of a redirect response.
pub fn location_header(response: &Response) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .expect("response carries no Location header")
        .to_str()
        .unwrap()
        .to_string()
}

/// The `sid=...` pair from a `Set-Cookie` header, if one was issued.
pub fn session_cookie(response: &Response) -> Option<String> {
    let value = response.headers().get(header::SET_COOKIE)?.to_str().ok()?;
    value.split(';').next().map(|s| s.trim().to_string())
}

/// Extract the trailing id from a detail path like `/catalog/category/7`.
pub fn id_from_path(path: &str) -> i64 {
    path.rsplit('/').next().unwrap().parse().unwrap()
}
