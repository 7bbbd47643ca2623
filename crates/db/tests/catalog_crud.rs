//! Integration tests for catalog repository CRUD operations.
//!
//! Exercises the repository layer against a real database:
//! - Create full hierarchy (category -> race -> modality -> instance)
//! - Case-insensitive duplicate lookups and unique indexes
//! - Dependent-child queries backing the delete protocol
//! - Session pending-action capture and single-use consume

use sqlx::PgPool;
use uuid::Uuid;

use dorsal_core::catalog::{
    CategoryDraft, InstanceDraft, LocationDraft, ModalityDraft, RaceDraft,
};
use dorsal_db::models::session::PendingAction;
use dorsal_db::repositories::{
    CategoryRepo, InstanceRepo, LocationRepo, ModalityRepo, RaceRepo, SessionRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_category(name: &str) -> CategoryDraft {
    CategoryDraft {
        name: name.to_string(),
        description: None,
    }
}

fn new_location(city: &str, community: &str) -> LocationDraft {
    LocationDraft {
        city: city.to_string(),
        community: community.to_string(),
    }
}

fn new_race(name: &str, category_id: i64) -> RaceDraft {
    RaceDraft {
        name: name.to_string(),
        category_id,
        description: None,
        image_url: None,
    }
}

fn new_modality(race_id: i64, location_id: i64, distance: f64) -> ModalityDraft {
    ModalityDraft {
        race_id,
        start_location_id: location_id,
        end_location_id: location_id,
        distance,
        elevation: 0.0,
        track: "flat city circuit".to_string(),
    }
}

fn new_instance(modality_id: i64, price: f64) -> InstanceDraft {
    InstanceDraft {
        modality_id,
        date: "2026-12-01T00:00:00Z".parse().unwrap(),
        price,
    }
}

// ---------------------------------------------------------------------------
// Entity CRUD
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn create_full_hierarchy(pool: PgPool) {
    let category = CategoryRepo::create(&pool, &new_category("Road Running"))
        .await
        .unwrap();
    let location = LocationRepo::create(&pool, &new_location("Valencia", "Comunidad Valenciana"))
        .await
        .unwrap();
    let race = RaceRepo::create(&pool, &new_race("Maratón de Valencia", category.id))
        .await
        .unwrap();
    let modality = ModalityRepo::create(&pool, &new_modality(race.id, location.id, 42.195))
        .await
        .unwrap();
    let instance = InstanceRepo::create(&pool, &new_instance(modality.id, 60.0))
        .await
        .unwrap();

    let fetched = InstanceRepo::find_by_id(&pool, instance.id).await.unwrap().unwrap();
    assert_eq!(fetched.modality_id, modality.id);
    assert_eq!(fetched.price, 60.0);

    assert_eq!(CategoryRepo::count(&pool).await.unwrap(), 1);
    assert_eq!(RaceRepo::count(&pool).await.unwrap(), 1);
    assert_eq!(InstanceRepo::count(&pool).await.unwrap(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn update_preserves_id(pool: PgPool) {
    let category = CategoryRepo::create(&pool, &new_category("Trail")).await.unwrap();
    let updated = CategoryRepo::update(
        &pool,
        category.id,
        &CategoryDraft {
            name: "Trail Running".to_string(),
            description: Some("mountain paths".to_string()),
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.id, category.id);
    assert_eq!(updated.name, "Trail Running");
    assert_eq!(updated.description.as_deref(), Some("mountain paths"));
}

#[sqlx::test(migrations = "./migrations")]
async fn update_missing_row_returns_none(pool: PgPool) {
    let result = CategoryRepo::update(&pool, 999_999, &new_category("Ghost")).await.unwrap();
    assert!(result.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn list_orders_by_canonical_field(pool: PgPool) {
    LocationRepo::create(&pool, &new_location("Sevilla", "Andalucía")).await.unwrap();
    LocationRepo::create(&pool, &new_location("Granada", "Andalucía")).await.unwrap();

    let cities: Vec<_> = LocationRepo::list(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|l| l.city)
        .collect();
    assert_eq!(cities, vec!["Granada", "Sevilla"]);
}

// ---------------------------------------------------------------------------
// Case-insensitive uniqueness
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn find_by_name_ci_ignores_case(pool: PgPool) {
    let created = CategoryRepo::create(&pool, &new_category("Road Running")).await.unwrap();
    let found = CategoryRepo::find_by_name_ci(&pool, "ROAD RUNNING").await.unwrap().unwrap();
    assert_eq!(found.id, created.id);

    assert!(CategoryRepo::find_by_name_ci(&pool, "Trail Running").await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn unique_index_rejects_duplicate_name(pool: PgPool) {
    CategoryRepo::create(&pool, &new_category("Road Running")).await.unwrap();
    let err = CategoryRepo::create(&pool, &new_category("road running")).await.unwrap_err();

    match err {
        sqlx::Error::Database(db_err) => {
            assert!(db_err.constraint().unwrap_or_default().starts_with("uq_"));
        }
        other => panic!("expected database error, got {other:?}"),
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn modality_unique_on_race_and_distance(pool: PgPool) {
    let category = CategoryRepo::create(&pool, &new_category("Road Running")).await.unwrap();
    let location = LocationRepo::create(&pool, &new_location("Valencia", "Comunidad Valenciana"))
        .await
        .unwrap();
    let race = RaceRepo::create(&pool, &new_race("Maratón de Valencia", category.id))
        .await
        .unwrap();

    let first = ModalityRepo::create(&pool, &new_modality(race.id, location.id, 42.195))
        .await
        .unwrap();
    let found = ModalityRepo::find_by_race_and_distance(&pool, race.id, 42.195)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, first.id);

    // Same race, different distance is fine.
    ModalityRepo::create(&pool, &new_modality(race.id, location.id, 21.0))
        .await
        .unwrap();
    // Same pair is not.
    assert!(ModalityRepo::create(&pool, &new_modality(race.id, location.id, 42.195))
        .await
        .is_err());
}

// ---------------------------------------------------------------------------
// Dependent-child queries
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn location_dependents_cover_both_endpoints(pool: PgPool) {
    let category = CategoryRepo::create(&pool, &new_category("Trail Running")).await.unwrap();
    let start = LocationRepo::create(&pool, &new_location("Granada", "Andalucía")).await.unwrap();
    let end = LocationRepo::create(&pool, &new_location("Huesca", "Aragón")).await.unwrap();
    let race = RaceRepo::create(&pool, &new_race("Ultra Trail Sierra Nevada", category.id))
        .await
        .unwrap();

    ModalityRepo::create(
        &pool,
        &ModalityDraft {
            race_id: race.id,
            start_location_id: start.id,
            end_location_id: end.id,
            distance: 105.0,
            elevation: 5500.0,
            track: "from the Alhambra to the Veleta peak".to_string(),
        },
    )
    .await
    .unwrap();

    let at_start = ModalityRepo::list_touching_location(&pool, start.id).await.unwrap();
    let at_end = ModalityRepo::list_touching_location(&pool, end.id).await.unwrap();
    assert_eq!(at_start.len(), 1);
    assert_eq!(at_end.len(), 1);
    assert_eq!(at_start[0].race_name, "Ultra Trail Sierra Nevada");
}

#[sqlx::test(migrations = "./migrations")]
async fn delete_returns_whether_row_existed(pool: PgPool) {
    let category = CategoryRepo::create(&pool, &new_category("OCR")).await.unwrap();
    assert!(CategoryRepo::delete(&pool, category.id).await.unwrap());
    assert!(!CategoryRepo::delete(&pool, category.id).await.unwrap());
    assert!(CategoryRepo::find_by_id(&pool, category.id).await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn session_roundtrip_and_elevation(pool: PgPool) {
    let token = Uuid::new_v4();
    let session = SessionRepo::create(&pool, token).await.unwrap();
    assert!(!session.authenticated);

    let found = SessionRepo::find_by_token(&pool, token).await.unwrap().unwrap();
    assert_eq!(found.id, session.id);

    assert!(SessionRepo::set_authenticated(&pool, session.id).await.unwrap());
    let elevated = SessionRepo::find_by_token(&pool, token).await.unwrap().unwrap();
    assert!(elevated.authenticated);
}

#[sqlx::test(migrations = "./migrations")]
async fn pending_action_is_single_use(pool: PgPool) {
    let session = SessionRepo::create(&pool, Uuid::new_v4()).await.unwrap();

    let action = PendingAction {
        method: "POST".to_string(),
        path: "/catalog/location/1/update".to_string(),
        body: serde_json::json!({"city": "Granada", "community": "Andalucía"}),
        return_to: "/catalog/location/1/update".to_string(),
    };
    SessionRepo::store_pending(&pool, session.id, &action).await.unwrap();

    let taken = SessionRepo::take_pending(&pool, session.id).await.unwrap().unwrap();
    assert_eq!(taken.method, "POST");
    assert_eq!(taken.body["city"], "Granada");

    // Cleared on first take.
    assert!(SessionRepo::take_pending(&pool, session.id).await.unwrap().is_none());
}
