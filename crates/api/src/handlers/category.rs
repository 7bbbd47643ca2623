//! Handlers for the category resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Form, Json};
use serde::Serialize;
use sqlx::PgPool;

use dorsal_core::catalog::{validate_category, CategoryForm};
use dorsal_core::error::CoreError;
use dorsal_core::forms::FieldError;
use dorsal_core::types::DbId;
use dorsal_db::models::category::Category;
use dorsal_db::models::race::Race;
use dorsal_db::repositories::{CategoryRepo, RaceRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::delete_protocol::{self, DeleteProtocol};
use crate::response::{DataResponse, FormView};
use crate::state::AppState;

const LIST_PATH: &str = "/catalog/categories";

/// The category form needs no choice lists.
#[derive(Debug, Serialize)]
struct NoChoices {}

/// Category detail view: the category and the races in it.
#[derive(Debug, Serialize)]
struct CategoryDetail {
    category: Category,
    races: Vec<Race>,
}

fn form_view(status: StatusCode, record: Option<CategoryForm>, errors: Vec<FieldError>) -> Response {
    (
        status,
        Json(FormView {
            record,
            choices: NoChoices {},
            errors,
        }),
    )
        .into_response()
}

// ---------------------------------------------------------------------------
// GET /catalog/categories
// ---------------------------------------------------------------------------

/// List all categories, sorted by name.
pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let items = CategoryRepo::list(&state.pool).await?;
    tracing::debug!(count = items.len(), "Listed categories");
    Ok(Json(DataResponse { data: items }))
}

// ---------------------------------------------------------------------------
// GET /catalog/category/{id}
// ---------------------------------------------------------------------------

/// Category detail with the races in the category, fetched concurrently.
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let (category, races) = tokio::try_join!(
        CategoryRepo::find_by_id(&state.pool, id),
        RaceRepo::list_by_category(&state.pool, id),
    )?;

    let category = category.ok_or(AppError::Core(CoreError::NotFound {
        entity: "Category",
        id,
    }))?;

    Ok(Json(DataResponse {
        data: CategoryDetail { category, races },
    }))
}

// ---------------------------------------------------------------------------
// GET|POST /catalog/category/create
// ---------------------------------------------------------------------------

/// Blank create form.
pub async fn create_form() -> Response {
    form_view(StatusCode::OK, None, Vec::new())
}

/// Create a category, or redirect to an existing one with the same name
/// under case-insensitive comparison.
pub async fn create(
    State(state): State<AppState>,
    Form(form): Form<CategoryForm>,
) -> AppResult<Response> {
    let draft = match validate_category(&form) {
        Ok(draft) => draft,
        Err(errors) => return Ok(form_view(StatusCode::BAD_REQUEST, Some(form.sanitized()), errors)),
    };

    if let Some(existing) = CategoryRepo::find_by_name_ci(&state.pool, &draft.name).await? {
        return Ok(Redirect::to(&existing.url()).into_response());
    }

    let created = CategoryRepo::create(&state.pool, &draft).await?;
    tracing::info!(id = created.id, name = %created.name, "Category created");
    Ok(Redirect::to(&created.url()).into_response())
}

// ---------------------------------------------------------------------------
// GET|POST /catalog/category/{id}/update
// ---------------------------------------------------------------------------

/// Update form prefilled with the current record.
pub async fn update_form(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Response> {
    let category = CategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }))?;

    let record = CategoryForm {
        name: Some(category.name),
        description: category.description,
    };
    Ok(form_view(StatusCode::OK, Some(record), Vec::new()))
}

/// Update a category in place, preserving its id.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Form(form): Form<CategoryForm>,
) -> AppResult<Response> {
    let draft = match validate_category(&form) {
        Ok(draft) => draft,
        Err(errors) => return Ok(form_view(StatusCode::BAD_REQUEST, Some(form.sanitized()), errors)),
    };

    match CategoryRepo::update(&state.pool, id, &draft).await? {
        Some(updated) => {
            tracing::info!(id = updated.id, "Category updated");
            Ok(Redirect::to(&updated.url()).into_response())
        }
        // Already gone: treat like the delete flows and fall back to the list.
        None => Ok(Redirect::to(LIST_PATH).into_response()),
    }
}

// ---------------------------------------------------------------------------
// GET|POST /catalog/category/{id}/delete
// ---------------------------------------------------------------------------

/// Deleting a category is blocked by the races referencing it.
pub struct CategoryDelete;

impl DeleteProtocol for CategoryDelete {
    const ENTITY: &'static str = "Category";
    const LIST_PATH: &'static str = LIST_PATH;

    type Entity = Category;
    type Dependent = Race;

    fn fetch(
        pool: &PgPool,
        id: DbId,
    ) -> impl std::future::Future<Output = Result<Option<Category>, sqlx::Error>> + Send {
        CategoryRepo::find_by_id(pool, id)
    }

    fn dependents(
        pool: &PgPool,
        id: DbId,
    ) -> impl std::future::Future<Output = Result<Vec<Race>, sqlx::Error>> + Send {
        RaceRepo::list_by_category(pool, id)
    }

    fn delete(
        pool: &PgPool,
        id: DbId,
    ) -> impl std::future::Future<Output = Result<bool, sqlx::Error>> + Send {
        CategoryRepo::delete(pool, id)
    }
}

/// Delete confirmation view.
pub async fn confirm_delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Response> {
    delete_protocol::confirm::<CategoryDelete>(&state.pool, id).await
}

/// Delete execution.
pub async fn execute_delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Response> {
    delete_protocol::execute::<CategoryDelete>(&state.pool, id).await
}
