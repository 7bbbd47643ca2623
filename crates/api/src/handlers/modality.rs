//! Handlers for the modality resource.
//!
//! A modality is a route/distance variant of a race; its uniqueness key is
//! the (race, distance) pair rather than a name.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Form, Json};
use serde::Serialize;
use sqlx::PgPool;

use dorsal_core::catalog::{validate_modality, ModalityForm};
use dorsal_core::error::CoreError;
use dorsal_core::forms::FieldError;
use dorsal_core::types::DbId;
use dorsal_db::models::instance::Instance;
use dorsal_db::models::location::Location;
use dorsal_db::models::modality::Modality;
use dorsal_db::models::race::{Race, RaceListItem};
use dorsal_db::repositories::{InstanceRepo, LocationRepo, ModalityRepo, RaceRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::delete_protocol::{self, DeleteProtocol};
use crate::response::{DataResponse, FormView};
use crate::state::AppState;

const LIST_PATH: &str = "/catalog/modalities";

/// Modality form choices: races and locations for the reference selects.
#[derive(Debug, Serialize)]
struct ModalityChoices {
    races: Vec<RaceListItem>,
    locations: Vec<Location>,
}

/// Modality detail view with race and endpoints resolved.
#[derive(Debug, Serialize)]
struct ModalityDetail {
    modality: Modality,
    race: Race,
    start_location: Location,
    end_location: Location,
}

async fn form_view(
    pool: &PgPool,
    status: StatusCode,
    record: Option<ModalityForm>,
    errors: Vec<FieldError>,
) -> AppResult<Response> {
    let (races, locations) = tokio::try_join!(RaceRepo::list(pool), LocationRepo::list(pool))?;
    Ok((
        status,
        Json(FormView {
            record,
            choices: ModalityChoices { races, locations },
            errors,
        }),
    )
        .into_response())
}

/// Check that every reference on a modality draft resolves, pushing one
/// field error per missing referent.
async fn check_references(
    pool: &PgPool,
    draft: &dorsal_core::catalog::ModalityDraft,
) -> AppResult<Vec<FieldError>> {
    let (race, start, end) = tokio::try_join!(
        RaceRepo::find_by_id(pool, draft.race_id),
        LocationRepo::find_by_id(pool, draft.start_location_id),
        LocationRepo::find_by_id(pool, draft.end_location_id),
    )?;

    let mut errors = Vec::new();
    if race.is_none() {
        errors.push(FieldError::new("race", "referenced race does not exist"));
    }
    if start.is_none() {
        errors.push(FieldError::new(
            "start_location",
            "referenced start location does not exist",
        ));
    }
    if end.is_none() {
        errors.push(FieldError::new(
            "end_location",
            "referenced end location does not exist",
        ));
    }
    Ok(errors)
}

// ---------------------------------------------------------------------------
// GET /catalog/modalities
// ---------------------------------------------------------------------------

/// List all modalities in insertion order.
pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let items = ModalityRepo::list(&state.pool).await?;
    tracing::debug!(count = items.len(), "Listed modalities");
    Ok(Json(DataResponse { data: items }))
}

// ---------------------------------------------------------------------------
// GET /catalog/modality/{id}
// ---------------------------------------------------------------------------

/// Modality detail with its race and both endpoint locations resolved.
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let modality = ModalityRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Modality",
            id,
        }))?;

    let (race, start_location, end_location) = tokio::try_join!(
        RaceRepo::find_by_id(&state.pool, modality.race_id),
        LocationRepo::find_by_id(&state.pool, modality.start_location_id),
        LocationRepo::find_by_id(&state.pool, modality.end_location_id),
    )?;

    let (Some(race), Some(start_location), Some(end_location)) =
        (race, start_location, end_location)
    else {
        return Err(AppError::Core(CoreError::Internal(format!(
            "modality {id} carries a dangling reference"
        ))));
    };

    Ok(Json(DataResponse {
        data: ModalityDetail {
            modality,
            race,
            start_location,
            end_location,
        },
    }))
}

// ---------------------------------------------------------------------------
// GET|POST /catalog/modality/create
// ---------------------------------------------------------------------------

/// Blank create form with race and location choices.
pub async fn create_form(State(state): State<AppState>) -> AppResult<Response> {
    form_view(&state.pool, StatusCode::OK, None, Vec::new()).await
}

/// Create a modality, or redirect to the existing modality of the same
/// race at the same distance.
pub async fn create(
    State(state): State<AppState>,
    Form(form): Form<ModalityForm>,
) -> AppResult<Response> {
    let draft = match validate_modality(&form) {
        Ok(draft) => draft,
        Err(errors) => {
            return form_view(&state.pool, StatusCode::BAD_REQUEST, Some(form.sanitized()), errors)
                .await
        }
    };

    let ref_errors = check_references(&state.pool, &draft).await?;
    if !ref_errors.is_empty() {
        return form_view(
            &state.pool,
            StatusCode::BAD_REQUEST,
            Some(form.sanitized()),
            ref_errors,
        )
        .await;
    }

    if let Some(existing) =
        ModalityRepo::find_by_race_and_distance(&state.pool, draft.race_id, draft.distance).await?
    {
        return Ok(Redirect::to(&existing.url()).into_response());
    }

    let created = ModalityRepo::create(&state.pool, &draft).await?;
    tracing::info!(
        id = created.id,
        race_id = created.race_id,
        distance = created.distance,
        "Modality created"
    );
    Ok(Redirect::to(&created.url()).into_response())
}

// ---------------------------------------------------------------------------
// GET|POST /catalog/modality/{id}/update
// ---------------------------------------------------------------------------

/// Update form prefilled with the current record.
pub async fn update_form(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Response> {
    let modality = ModalityRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Modality",
            id,
        }))?;

    let record = ModalityForm {
        race: Some(modality.race_id.to_string()),
        start_location: Some(modality.start_location_id.to_string()),
        end_location: Some(modality.end_location_id.to_string()),
        distance: Some(modality.distance.to_string()),
        elevation: Some(modality.elevation.to_string()),
        track: Some(modality.track),
    };
    form_view(&state.pool, StatusCode::OK, Some(record), Vec::new()).await
}

/// Update a modality in place, preserving its id.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Form(form): Form<ModalityForm>,
) -> AppResult<Response> {
    let draft = match validate_modality(&form) {
        Ok(draft) => draft,
        Err(errors) => {
            return form_view(&state.pool, StatusCode::BAD_REQUEST, Some(form.sanitized()), errors)
                .await
        }
    };

    let ref_errors = check_references(&state.pool, &draft).await?;
    if !ref_errors.is_empty() {
        return form_view(
            &state.pool,
            StatusCode::BAD_REQUEST,
            Some(form.sanitized()),
            ref_errors,
        )
        .await;
    }

    match ModalityRepo::update(&state.pool, id, &draft).await? {
        Some(updated) => {
            tracing::info!(id = updated.id, "Modality updated");
            Ok(Redirect::to(&updated.url()).into_response())
        }
        None => Ok(Redirect::to(LIST_PATH).into_response()),
    }
}

// ---------------------------------------------------------------------------
// GET|POST /catalog/modality/{id}/delete
// ---------------------------------------------------------------------------

/// Deleting a modality is blocked by the instances referencing it.
pub struct ModalityDelete;

impl DeleteProtocol for ModalityDelete {
    const ENTITY: &'static str = "Modality";
    const LIST_PATH: &'static str = LIST_PATH;

    type Entity = Modality;
    type Dependent = Instance;

    fn fetch(
        pool: &PgPool,
        id: DbId,
    ) -> impl std::future::Future<Output = Result<Option<Modality>, sqlx::Error>> + Send {
        ModalityRepo::find_by_id(pool, id)
    }

    fn dependents(
        pool: &PgPool,
        id: DbId,
    ) -> impl std::future::Future<Output = Result<Vec<Instance>, sqlx::Error>> + Send {
        InstanceRepo::list_by_modality(pool, id)
    }

    fn delete(
        pool: &PgPool,
        id: DbId,
    ) -> impl std::future::Future<Output = Result<bool, sqlx::Error>> + Send {
        ModalityRepo::delete(pool, id)
    }
}

/// Delete confirmation view.
pub async fn confirm_delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Response> {
    delete_protocol::confirm::<ModalityDelete>(&state.pool, id).await
}

/// Delete execution.
pub async fn execute_delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Response> {
    delete_protocol::execute::<ModalityDelete>(&state.pool, id).await
}
