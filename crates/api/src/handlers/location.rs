//! Handlers for the location resource.
//!
//! Location update and delete are step-up gated: an unelevated caller is
//! redirected to the password confirmation page and the mutation replays
//! after the shared secret is confirmed.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Form, Json};
use serde::Serialize;
use sqlx::PgPool;

use dorsal_core::catalog::{validate_location, LocationForm, COMMUNITIES};
use dorsal_core::error::CoreError;
use dorsal_core::forms::FieldError;
use dorsal_core::types::DbId;
use dorsal_db::models::location::Location;
use dorsal_db::models::modality::ModalityListItem;
use dorsal_db::repositories::{LocationRepo, ModalityRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::delete_protocol::{self, DeleteProtocol};
use crate::middleware::session::SessionContext;
use crate::middleware::step_up::{self, Gate};
use crate::response::{DataResponse, FormView};
use crate::state::AppState;

const LIST_PATH: &str = "/catalog/locations";

/// The location form's only choice list is the fixed community set.
#[derive(Debug, Serialize)]
struct LocationChoices {
    communities: &'static [&'static str],
}

/// Location detail view: the location and the modalities that start or
/// end there, with their races resolved.
#[derive(Debug, Serialize)]
struct LocationDetail {
    location: Location,
    modalities: Vec<ModalityListItem>,
}

fn form_view(status: StatusCode, record: Option<LocationForm>, errors: Vec<FieldError>) -> Response {
    (
        status,
        Json(FormView {
            record,
            choices: LocationChoices {
                communities: COMMUNITIES,
            },
            errors,
        }),
    )
        .into_response()
}

// ---------------------------------------------------------------------------
// GET /catalog/locations
// ---------------------------------------------------------------------------

/// List all locations, sorted by city.
pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let items = LocationRepo::list(&state.pool).await?;
    tracing::debug!(count = items.len(), "Listed locations");
    Ok(Json(DataResponse { data: items }))
}

// ---------------------------------------------------------------------------
// GET /catalog/location/{id}
// ---------------------------------------------------------------------------

/// Location detail with the modalities touching it, fetched concurrently.
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let (location, modalities) = tokio::try_join!(
        LocationRepo::find_by_id(&state.pool, id),
        ModalityRepo::list_touching_location(&state.pool, id),
    )?;

    let location = location.ok_or(AppError::Core(CoreError::NotFound {
        entity: "Location",
        id,
    }))?;

    Ok(Json(DataResponse {
        data: LocationDetail {
            location,
            modalities,
        },
    }))
}

// ---------------------------------------------------------------------------
// GET|POST /catalog/location/create
// ---------------------------------------------------------------------------

/// Blank create form with the community choices.
pub async fn create_form() -> Response {
    form_view(StatusCode::OK, None, Vec::new())
}

/// Create a location, or redirect to an existing one with the same city
/// under case-insensitive comparison.
pub async fn create(
    State(state): State<AppState>,
    Form(form): Form<LocationForm>,
) -> AppResult<Response> {
    let draft = match validate_location(&form) {
        Ok(draft) => draft,
        Err(errors) => return Ok(form_view(StatusCode::BAD_REQUEST, Some(form.sanitized()), errors)),
    };

    if let Some(existing) = LocationRepo::find_by_city_ci(&state.pool, &draft.city).await? {
        return Ok(Redirect::to(&existing.url()).into_response());
    }

    let created = LocationRepo::create(&state.pool, &draft).await?;
    tracing::info!(id = created.id, city = %created.city, "Location created");
    Ok(Redirect::to(&created.url()).into_response())
}

// ---------------------------------------------------------------------------
// GET|POST /catalog/location/{id}/update  (gated)
// ---------------------------------------------------------------------------

/// Update form prefilled with the current record.
pub async fn update_form(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Response> {
    let location = LocationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Location",
            id,
        }))?;

    let record = LocationForm {
        city: Some(location.city),
        community: Some(location.community),
    };
    Ok(form_view(StatusCode::OK, Some(record), Vec::new()))
}

/// Update a location in place. Step-up gated.
pub async fn update(
    State(state): State<AppState>,
    session: SessionContext,
    Path(id): Path<DbId>,
    Form(form): Form<LocationForm>,
) -> AppResult<Response> {
    let path = format!("/catalog/location/{id}/update");
    let form = match step_up::require_elevated(&state.pool, &session, "POST", &path, form).await? {
        Gate::Proceed(form) => form,
        Gate::Deferred(redirect) => return Ok(redirect),
    };

    let draft = match validate_location(&form) {
        Ok(draft) => draft,
        Err(errors) => return Ok(form_view(StatusCode::BAD_REQUEST, Some(form.sanitized()), errors)),
    };

    match LocationRepo::update(&state.pool, id, &draft).await? {
        Some(updated) => {
            tracing::info!(id = updated.id, "Location updated");
            Ok(Redirect::to(&updated.url()).into_response())
        }
        None => Ok(Redirect::to(LIST_PATH).into_response()),
    }
}

// ---------------------------------------------------------------------------
// GET|POST /catalog/location/{id}/delete  (gated)
// ---------------------------------------------------------------------------

/// Deleting a location is blocked by the modalities starting or ending
/// there.
pub struct LocationDelete;

impl DeleteProtocol for LocationDelete {
    const ENTITY: &'static str = "Location";
    const LIST_PATH: &'static str = LIST_PATH;

    type Entity = Location;
    type Dependent = ModalityListItem;

    fn fetch(
        pool: &PgPool,
        id: DbId,
    ) -> impl std::future::Future<Output = Result<Option<Location>, sqlx::Error>> + Send {
        LocationRepo::find_by_id(pool, id)
    }

    fn dependents(
        pool: &PgPool,
        id: DbId,
    ) -> impl std::future::Future<Output = Result<Vec<ModalityListItem>, sqlx::Error>> + Send {
        ModalityRepo::list_touching_location(pool, id)
    }

    fn delete(
        pool: &PgPool,
        id: DbId,
    ) -> impl std::future::Future<Output = Result<bool, sqlx::Error>> + Send {
        LocationRepo::delete(pool, id)
    }
}

/// Delete confirmation view.
pub async fn confirm_delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Response> {
    delete_protocol::confirm::<LocationDelete>(&state.pool, id).await
}

/// Delete execution. Step-up gated.
pub async fn execute_delete(
    State(state): State<AppState>,
    session: SessionContext,
    Path(id): Path<DbId>,
) -> AppResult<Response> {
    let path = format!("/catalog/location/{id}/delete");
    let gate =
        step_up::require_elevated(&state.pool, &session, "POST", &path, serde_json::json!({}))
            .await?;
    match gate {
        Gate::Proceed(_) => delete_protocol::execute::<LocationDelete>(&state.pool, id).await,
        Gate::Deferred(redirect) => Ok(redirect),
    }
}
