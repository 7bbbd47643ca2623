//! HTTP-level integration tests for the catalog CRUD surface.
//!
//! Covers the create -> detail round trip, case-insensitive duplicate
//! redirects, validation re-renders, list ordering, and the index counts.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, id_from_path, location_header, post_form};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Create -> detail round trip
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn create_category_then_detail(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let response = post_form(
        app,
        "/catalog/category/create",
        "name=Road+Running&description=Paved+road+events",
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let detail_path = location_header(&response);
    assert!(detail_path.starts_with("/catalog/category/"));

    let app = common::build_test_app(pool);
    let response = get(app, &detail_path).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["category"]["name"], "Road Running");
    assert_eq!(json["data"]["category"]["description"], "Paved road events");
    assert_eq!(json["data"]["races"], serde_json::json!([]));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn detail_of_missing_category_is_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/catalog/category/999999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Case-insensitive duplicate creates
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn duplicate_create_redirects_to_existing(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let first = post_form(app, "/catalog/category/create", "name=Road+Running").await;
    let first_id = id_from_path(&location_header(&first));

    let app = common::build_test_app(pool.clone());
    let second = post_form(app, "/catalog/category/create", "name=ROAD+RUNNING").await;
    assert_eq!(second.status(), StatusCode::SEE_OTHER);
    assert_eq!(id_from_path(&location_header(&second)), first_id);

    // Still exactly one category.
    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/catalog/categories").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["name"], "Road Running");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn duplicate_location_by_city(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let first = post_form(app, "/catalog/location/create", "city=Vigo&community=Galicia").await;
    let first_id = id_from_path(&location_header(&first));

    let app = common::build_test_app(pool);
    let second = post_form(app, "/catalog/location/create", "city=VIGO&community=Galicia").await;
    assert_eq!(id_from_path(&location_header(&second)), first_id);
}

// ---------------------------------------------------------------------------
// Validation failures re-render the form
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn invalid_category_returns_form_with_errors(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let response = post_form(app, "/catalog/category/create", "description=no+name").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["errors"][0]["field"], "name");
    assert_eq!(json["record"]["description"], "no name");

    // No mutation happened.
    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/catalog/categories").await).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn location_rejects_unknown_community(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_form(app, "/catalog/location/create", "city=Vigo&community=Atlantis").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["errors"][0]["field"], "community");
    // Choice list is echoed for the re-render.
    assert!(json["communities"].as_array().unwrap().contains(&serde_json::json!("Galicia")));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn race_with_dangling_category_is_a_field_error(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_form(
        app,
        "/catalog/race/create",
        "name=Ghost+Race&category=999999",
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["errors"][0]["field"], "category");
}

// ---------------------------------------------------------------------------
// Updates
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn update_category_preserves_id(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let created = post_form(app, "/catalog/category/create", "name=Trail").await;
    let detail_path = location_header(&created);
    let id = id_from_path(&detail_path);

    let app = common::build_test_app(pool.clone());
    let response = post_form(
        app,
        &format!("{detail_path}/update"),
        "name=Trail+Running&description=mountain+paths",
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(id_from_path(&location_header(&response)), id);

    let app = common::build_test_app(pool);
    let json = body_json(get(app, &detail_path).await).await;
    assert_eq!(json["data"]["category"]["name"], "Trail Running");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn update_of_missing_category_falls_back_to_list(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_form(app, "/catalog/category/999999/update", "name=Ghost").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location_header(&response), "/catalog/categories");
}

// ---------------------------------------------------------------------------
// Lists and index
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn categories_list_sorted_by_name(pool: PgPool) {
    for name in ["name=Trail+Running", "name=Obstacle+Course", "name=Road+Running"] {
        let app = common::build_test_app(pool.clone());
        post_form(app, "/catalog/category/create", name).await;
    }

    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/catalog/categories").await).await;
    let names: Vec<_> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Obstacle Course", "Road Running", "Trail Running"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn index_counts_every_entity(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    post_form(app, "/catalog/category/create", "name=Road+Running").await;
    let app = common::build_test_app(pool.clone());
    post_form(app, "/catalog/location/create", "city=Vigo&community=Galicia").await;

    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/catalog").await).await;
    assert_eq!(json["data"]["category_count"], 1);
    assert_eq!(json["data"]["location_count"], 1);
    assert_eq!(json["data"]["race_count"], 0);
}

// ---------------------------------------------------------------------------
// Populated reads
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn race_list_resolves_category_names(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let category = post_form(app, "/catalog/category/create", "name=Trail+Running").await;
    let category_id = id_from_path(&location_header(&category));

    let app = common::build_test_app(pool.clone());
    let response = post_form(
        app,
        "/catalog/race/create",
        &format!("name=Transvulcania&category={category_id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/catalog/races").await).await;
    assert_eq!(json["data"][0]["name"], "Transvulcania");
    assert_eq!(json["data"][0]["category_name"], "Trail Running");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn instance_list_resolves_modality_and_race(pool: PgPool) {
    let (modality_id, _) = seed_modality(&pool).await;

    let app = common::build_test_app(pool.clone());
    let response = post_form(
        app,
        "/catalog/instance/create",
        &format!("modality={modality_id}&date=2026-12-01&price=30"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/catalog/instances").await).await;
    assert_eq!(json["data"][0]["race_name"], "Maraton de Valencia");
    assert_eq!(json["data"][0]["price"], 30.0);
}

/// Create category -> location -> race -> modality through the HTTP
/// surface, returning (modality_id, location_id).
async fn seed_modality(pool: &PgPool) -> (i64, i64) {
    let app = common::build_test_app(pool.clone());
    let category = post_form(app, "/catalog/category/create", "name=Road+Running").await;
    let category_id = id_from_path(&location_header(&category));

    let app = common::build_test_app(pool.clone());
    let location = post_form(app, "/catalog/location/create", "city=Valencia&community=Galicia").await;
    let location_id = id_from_path(&location_header(&location));

    let app = common::build_test_app(pool.clone());
    let race = post_form(
        app,
        "/catalog/race/create",
        &format!("name=Maraton+de+Valencia&category={category_id}"),
    )
    .await;
    let race_id = id_from_path(&location_header(&race));

    let app = common::build_test_app(pool.clone());
    let modality = post_form(
        app,
        "/catalog/modality/create",
        &format!(
            "race={race_id}&start_location={location_id}&end_location={location_id}\
             &distance=42.195&elevation=0&track=flat+city+circuit"
        ),
    )
    .await;
    (id_from_path(&location_header(&modality)), location_id)
}

#[sqlx::test(migrations = "../db/migrations")]
async fn duplicate_modality_by_race_and_distance(pool: PgPool) {
    let (modality_id, location_id) = seed_modality(&pool).await;

    // Race id 1 is the only race; same distance resolves to the same row.
    let app = common::build_test_app(pool.clone());
    let json = body_json(get(app, &format!("/catalog/modality/{modality_id}")).await).await;
    let race_id = json["data"]["modality"]["race_id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let second = post_form(
        app,
        "/catalog/modality/create",
        &format!(
            "race={race_id}&start_location={location_id}&end_location={location_id}\
             &distance=42.195&elevation=100&track=another+description"
        ),
    )
    .await;
    assert_eq!(second.status(), StatusCode::SEE_OTHER);
    assert_eq!(id_from_path(&location_header(&second)), modality_id);
}
