//! Integration tests for the step-up authentication gate.
//!
//! An unelevated mutation on a gated route is captured and deferred; the
//! caller confirms the shared password and the original mutation replays
//! exactly once, with its original body.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, get, get_with_cookie, id_from_path, location_header, post_form,
    post_form_with_cookie, session_cookie, TEST_PASSWORD,
};
use sqlx::PgPool;

/// Create a location through the HTTP surface; returns (id, detail path).
async fn seed_location(pool: &PgPool) -> (i64, String) {
    let app = common::build_test_app(pool.clone());
    let response = post_form(app, "/catalog/location/create", "city=Vigo&community=Galicia").await;
    let path = location_header(&response);
    (id_from_path(&path), path)
}

// ---------------------------------------------------------------------------
// Deferral
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn unauthenticated_update_is_deferred(pool: PgPool) {
    let (id, detail_path) = seed_location(&pool).await;

    let app = common::build_test_app(pool.clone());
    let response = post_form(
        app,
        &format!("{detail_path}/update"),
        "city=Pontevedra&community=Galicia",
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let target = location_header(&response);
    assert!(target.starts_with("/confirm-password?returnTo="));
    assert!(target.contains(&format!("location%2F{id}%2Fupdate")));

    // The store is unchanged until the password is confirmed.
    let app = common::build_test_app(pool);
    let json = body_json(get(app, &detail_path).await).await;
    assert_eq!(json["data"]["location"]["city"], "Vigo");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn password_form_carries_return_target(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/confirm-password?returnTo=/catalog/location/1/update").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["return_to"], "/catalog/location/1/update");
    assert_eq!(json["error"], serde_json::Value::Null);
}

// ---------------------------------------------------------------------------
// Wrong password
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn wrong_password_rerenders_and_preserves_capture(pool: PgPool) {
    let (_, detail_path) = seed_location(&pool).await;

    let app = common::build_test_app(pool.clone());
    let deferred = post_form(
        app,
        &format!("{detail_path}/update"),
        "city=Pontevedra&community=Galicia",
    )
    .await;
    let cookie = session_cookie(&deferred).unwrap();

    let app = common::build_test_app(pool.clone());
    let rejected = post_form_with_cookie(
        app,
        "/confirm-password",
        &format!("password=wrong&returnTo={detail_path}/update"),
        &cookie,
    )
    .await;
    assert_eq!(rejected.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(rejected).await;
    assert_eq!(json["error"], "Incorrect password. Please try again.");

    // Store unchanged.
    let app = common::build_test_app(pool.clone());
    let json = body_json(get(app, &detail_path).await).await;
    assert_eq!(json["data"]["location"]["city"], "Vigo");

    // The capture survives the failed attempt: a correct retry still
    // replays the original body.
    let app = common::build_test_app(pool.clone());
    let confirmed = post_form_with_cookie(
        app,
        "/confirm-password",
        &format!("password={TEST_PASSWORD}&returnTo={detail_path}/update"),
        &cookie,
    )
    .await;
    assert_eq!(confirmed.status(), StatusCode::TEMPORARY_REDIRECT);

    let app = common::build_test_app(pool.clone());
    let replay = post_form_with_cookie(
        app,
        &location_header(&confirmed),
        &format!("password={TEST_PASSWORD}&returnTo={detail_path}/update"),
        &cookie,
    )
    .await;
    assert_eq!(replay.status(), StatusCode::SEE_OTHER);

    let app = common::build_test_app(pool);
    let json = body_json(get(app, &detail_path).await).await;
    assert_eq!(json["data"]["location"]["city"], "Pontevedra");
}

// ---------------------------------------------------------------------------
// Happy path: confirm then replay, exactly once
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn confirmed_update_applies_captured_body_once(pool: PgPool) {
    let (id, detail_path) = seed_location(&pool).await;
    let update_path = format!("{detail_path}/update");

    // 1. Deferred: the original body is captured on the session.
    let app = common::build_test_app(pool.clone());
    let deferred = post_form(app, &update_path, "city=Pontevedra&community=Galicia").await;
    let cookie = session_cookie(&deferred).unwrap();

    // 2. Confirm: 307 back to the update path, method preserved.
    let app = common::build_test_app(pool.clone());
    let confirmed = post_form_with_cookie(
        app,
        "/confirm-password",
        &format!("password={TEST_PASSWORD}&returnTo={update_path}"),
        &cookie,
    )
    .await;
    assert_eq!(confirmed.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location_header(&confirmed), update_path);

    // 3. Replay: the literal body is the password form's; the handler must
    //    use the captured one.
    let app = common::build_test_app(pool.clone());
    let replay = post_form_with_cookie(
        app,
        &update_path,
        &format!("password={TEST_PASSWORD}&returnTo={update_path}"),
        &cookie,
    )
    .await;
    assert_eq!(replay.status(), StatusCode::SEE_OTHER);
    assert_eq!(id_from_path(&location_header(&replay)), id);

    let app = common::build_test_app(pool.clone());
    let json = body_json(get(app, &detail_path).await).await;
    assert_eq!(json["data"]["location"]["city"], "Pontevedra");

    // 4. The capture was single-use: a further authenticated update uses
    //    its literal body, not the stale capture.
    let app = common::build_test_app(pool.clone());
    let response = post_form_with_cookie(
        app,
        &update_path,
        "city=Ourense&community=Galicia",
        &cookie,
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let app = common::build_test_app(pool);
    let json = body_json(get(app, &detail_path).await).await;
    assert_eq!(json["data"]["location"]["city"], "Ourense");
}

// ---------------------------------------------------------------------------
// Elevation is long-lived
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn elevation_persists_across_gated_operations(pool: PgPool) {
    let (_, detail_path) = seed_location(&pool).await;
    let update_path = format!("{detail_path}/update");

    // Elevate the session through one full gate round trip.
    let app = common::build_test_app(pool.clone());
    let deferred = post_form(app, &update_path, "city=Pontevedra&community=Galicia").await;
    let cookie = session_cookie(&deferred).unwrap();

    let app = common::build_test_app(pool.clone());
    post_form_with_cookie(
        app,
        "/confirm-password",
        &format!("password={TEST_PASSWORD}&returnTo={update_path}"),
        &cookie,
    )
    .await;
    let app = common::build_test_app(pool.clone());
    post_form_with_cookie(app, &update_path, "", &cookie).await;

    // A later gated delete proceeds without another password round trip.
    let app = common::build_test_app(pool.clone());
    let response = post_form_with_cookie(app, &format!("{detail_path}/delete"), "", &cookie).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location_header(&response), "/catalog/locations");

    let app = common::build_test_app(pool);
    let response = get_with_cookie(app, &detail_path, &cookie).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Ungated routes stay ungated
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn category_update_is_not_gated(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let created = post_form(app, "/catalog/category/create", "name=Trail").await;
    let detail_path = location_header(&created);

    let app = common::build_test_app(pool);
    let response = post_form(app, &format!("{detail_path}/update"), "name=Trail+Running").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}
