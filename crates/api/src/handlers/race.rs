//! Handlers for the race resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Form, Json};
use serde::Serialize;
use sqlx::PgPool;

use dorsal_core::catalog::{validate_race, RaceForm};
use dorsal_core::error::CoreError;
use dorsal_core::forms::FieldError;
use dorsal_core::types::DbId;
use dorsal_db::models::category::Category;
use dorsal_db::models::modality::Modality;
use dorsal_db::models::race::Race;
use dorsal_db::repositories::{CategoryRepo, ModalityRepo, RaceRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::delete_protocol::{self, DeleteProtocol};
use crate::response::{DataResponse, FormView};
use crate::state::AppState;

const LIST_PATH: &str = "/catalog/races";

/// Race form choices: the categories a race can belong to.
#[derive(Debug, Serialize)]
struct RaceChoices {
    categories: Vec<Category>,
}

/// Race detail view: the race with its category resolved, plus its
/// modalities.
#[derive(Debug, Serialize)]
struct RaceDetail {
    race: Race,
    category: Category,
    modalities: Vec<Modality>,
}

async fn form_view(
    pool: &PgPool,
    status: StatusCode,
    record: Option<RaceForm>,
    errors: Vec<FieldError>,
) -> AppResult<Response> {
    // Re-fetch the category list so the re-rendered form can repopulate
    // its select, exactly as the blank form does.
    let categories = CategoryRepo::list(pool).await?;
    Ok((
        status,
        Json(FormView {
            record,
            choices: RaceChoices { categories },
            errors,
        }),
    )
        .into_response())
}

// ---------------------------------------------------------------------------
// GET /catalog/races
// ---------------------------------------------------------------------------

/// List all races, sorted by name, with their categories resolved.
pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let items = RaceRepo::list(&state.pool).await?;
    tracing::debug!(count = items.len(), "Listed races");
    Ok(Json(DataResponse { data: items }))
}

// ---------------------------------------------------------------------------
// GET /catalog/race/{id}
// ---------------------------------------------------------------------------

/// Race detail with its category and modalities.
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let race = RaceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Race", id }))?;

    let (category, modalities) = tokio::try_join!(
        CategoryRepo::find_by_id(&state.pool, race.category_id),
        ModalityRepo::list_by_race(&state.pool, id),
    )?;

    let category = category.ok_or_else(|| {
        AppError::Core(CoreError::Internal(format!(
            "race {id} references missing category {}",
            race.category_id
        )))
    })?;

    Ok(Json(DataResponse {
        data: RaceDetail {
            race,
            category,
            modalities,
        },
    }))
}

// ---------------------------------------------------------------------------
// GET|POST /catalog/race/create
// ---------------------------------------------------------------------------

/// Blank create form with the current category choices.
pub async fn create_form(State(state): State<AppState>) -> AppResult<Response> {
    form_view(&state.pool, StatusCode::OK, None, Vec::new()).await
}

/// Create a race, or redirect to an existing one with the same name under
/// case-insensitive comparison.
pub async fn create(
    State(state): State<AppState>,
    Form(form): Form<RaceForm>,
) -> AppResult<Response> {
    let draft = match validate_race(&form) {
        Ok(draft) => draft,
        Err(errors) => {
            return form_view(&state.pool, StatusCode::BAD_REQUEST, Some(form.sanitized()), errors)
                .await
        }
    };

    // The category id must name an existing row; a dangling reference is a
    // field error, not a silent write.
    if CategoryRepo::find_by_id(&state.pool, draft.category_id).await?.is_none() {
        let errors = vec![FieldError::new("category", "referenced category does not exist")];
        return form_view(&state.pool, StatusCode::BAD_REQUEST, Some(form.sanitized()), errors)
            .await;
    }

    if let Some(existing) = RaceRepo::find_by_name_ci(&state.pool, &draft.name).await? {
        return Ok(Redirect::to(&existing.url()).into_response());
    }

    let created = RaceRepo::create(&state.pool, &draft).await?;
    tracing::info!(id = created.id, name = %created.name, "Race created");
    Ok(Redirect::to(&created.url()).into_response())
}

// ---------------------------------------------------------------------------
// GET|POST /catalog/race/{id}/update
// ---------------------------------------------------------------------------

/// Update form prefilled with the current record.
pub async fn update_form(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Response> {
    let race = RaceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Race", id }))?;

    let record = RaceForm {
        name: Some(race.name),
        category: Some(race.category_id.to_string()),
        description: race.description,
        image_url: race.image_url,
    };
    form_view(&state.pool, StatusCode::OK, Some(record), Vec::new()).await
}

/// Update a race in place, preserving its id.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Form(form): Form<RaceForm>,
) -> AppResult<Response> {
    let draft = match validate_race(&form) {
        Ok(draft) => draft,
        Err(errors) => {
            return form_view(&state.pool, StatusCode::BAD_REQUEST, Some(form.sanitized()), errors)
                .await
        }
    };

    if CategoryRepo::find_by_id(&state.pool, draft.category_id).await?.is_none() {
        let errors = vec![FieldError::new("category", "referenced category does not exist")];
        return form_view(&state.pool, StatusCode::BAD_REQUEST, Some(form.sanitized()), errors)
            .await;
    }

    match RaceRepo::update(&state.pool, id, &draft).await? {
        Some(updated) => {
            tracing::info!(id = updated.id, "Race updated");
            Ok(Redirect::to(&updated.url()).into_response())
        }
        None => Ok(Redirect::to(LIST_PATH).into_response()),
    }
}

// ---------------------------------------------------------------------------
// GET|POST /catalog/race/{id}/delete
// ---------------------------------------------------------------------------

/// Deleting a race is blocked by the modalities referencing it.
pub struct RaceDelete;

impl DeleteProtocol for RaceDelete {
    const ENTITY: &'static str = "Race";
    const LIST_PATH: &'static str = LIST_PATH;

    type Entity = Race;
    type Dependent = Modality;

    fn fetch(
        pool: &PgPool,
        id: DbId,
    ) -> impl std::future::Future<Output = Result<Option<Race>, sqlx::Error>> + Send {
        RaceRepo::find_by_id(pool, id)
    }

    fn dependents(
        pool: &PgPool,
        id: DbId,
    ) -> impl std::future::Future<Output = Result<Vec<Modality>, sqlx::Error>> + Send {
        ModalityRepo::list_by_race(pool, id)
    }

    fn delete(
        pool: &PgPool,
        id: DbId,
    ) -> impl std::future::Future<Output = Result<bool, sqlx::Error>> + Send {
        RaceRepo::delete(pool, id)
    }
}

/// Delete confirmation view.
pub async fn confirm_delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Response> {
    delete_protocol::confirm::<RaceDelete>(&state.pool, id).await
}

/// Delete execution.
pub async fn execute_delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Response> {
    delete_protocol::execute::<RaceDelete>(&state.pool, id).await
}
