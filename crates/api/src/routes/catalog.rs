//! Route definitions for the catalog, mounted at `/catalog`.
//!
//! The create routes must be registered on their literal paths so they are
//! matched ahead of the `{id}` detail routes.
//!
//! ```text
//! GET  /                          -> home::index (entity counts)
//!
//! GET  /categories                -> category::list
//! GET  /category/create           -> category::create_form
//! POST /category/create           -> category::create
//! GET  /category/{id}             -> category::detail
//! GET  /category/{id}/update      -> category::update_form
//! POST /category/{id}/update      -> category::update
//! GET  /category/{id}/delete      -> category::confirm_delete
//! POST /category/{id}/delete      -> category::execute_delete
//! ```
//!
//! and the same eight routes per entity for `location`, `race`,
//! `modality`, and `instance`. Location and instance update/delete POSTs
//! pass through the step-up gate inside their handlers.

use axum::routing::get;
use axum::Router;

use crate::handlers::{category, home, instance, location, modality, race};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        // Category
        .route("/categories", get(category::list))
        .route(
            "/category/create",
            get(category::create_form).post(category::create),
        )
        .route("/category/{id}", get(category::detail))
        .route(
            "/category/{id}/update",
            get(category::update_form).post(category::update),
        )
        .route(
            "/category/{id}/delete",
            get(category::confirm_delete).post(category::execute_delete),
        )
        // Location
        .route("/locations", get(location::list))
        .route(
            "/location/create",
            get(location::create_form).post(location::create),
        )
        .route("/location/{id}", get(location::detail))
        .route(
            "/location/{id}/update",
            get(location::update_form).post(location::update),
        )
        .route(
            "/location/{id}/delete",
            get(location::confirm_delete).post(location::execute_delete),
        )
        // Race
        .route("/races", get(race::list))
        .route("/race/create", get(race::create_form).post(race::create))
        .route("/race/{id}", get(race::detail))
        .route(
            "/race/{id}/update",
            get(race::update_form).post(race::update),
        )
        .route(
            "/race/{id}/delete",
            get(race::confirm_delete).post(race::execute_delete),
        )
        // Modality
        .route("/modalities", get(modality::list))
        .route(
            "/modality/create",
            get(modality::create_form).post(modality::create),
        )
        .route("/modality/{id}", get(modality::detail))
        .route(
            "/modality/{id}/update",
            get(modality::update_form).post(modality::update),
        )
        .route(
            "/modality/{id}/delete",
            get(modality::confirm_delete).post(modality::execute_delete),
        )
        // Instance
        .route("/instances", get(instance::list))
        .route(
            "/instance/create",
            get(instance::create_form).post(instance::create),
        )
        .route("/instance/{id}", get(instance::detail))
        .route(
            "/instance/{id}/update",
            get(instance::update_form).post(instance::update),
        )
        .route(
            "/instance/{id}/delete",
            get(instance::confirm_delete).post(instance::execute_delete),
        )
}
