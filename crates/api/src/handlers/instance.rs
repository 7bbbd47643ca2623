//! Handlers for the instance resource.
//!
//! An instance is one dated, priced occurrence of a modality. Update and
//! delete are step-up gated. Instances have no dependents, so a delete
//! succeeds whenever the gate passes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Form, Json};
use serde::Serialize;
use sqlx::PgPool;

use dorsal_core::catalog::{validate_instance, InstanceForm};
use dorsal_core::error::CoreError;
use dorsal_core::forms::FieldError;
use dorsal_core::types::DbId;
use dorsal_db::models::instance::Instance;
use dorsal_db::models::modality::Modality;
use dorsal_db::models::race::Race;
use dorsal_db::repositories::{InstanceRepo, ModalityRepo, RaceRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::delete_protocol::{self, DeleteProtocol};
use crate::middleware::session::SessionContext;
use crate::middleware::step_up::{self, Gate};
use crate::response::{DataResponse, FormView};
use crate::state::AppState;

const LIST_PATH: &str = "/catalog/instances";

/// Instance form choices: the modalities an instance can belong to.
#[derive(Debug, Serialize)]
struct InstanceChoices {
    modalities: Vec<Modality>,
}

/// Instance detail view with modality and race resolved.
#[derive(Debug, Serialize)]
struct InstanceDetail {
    instance: Instance,
    modality: Modality,
    race: Race,
}

async fn form_view(
    pool: &PgPool,
    status: StatusCode,
    record: Option<InstanceForm>,
    errors: Vec<FieldError>,
) -> AppResult<Response> {
    let modalities = ModalityRepo::list(pool).await?;
    Ok((
        status,
        Json(FormView {
            record,
            choices: InstanceChoices { modalities },
            errors,
        }),
    )
        .into_response())
}

// ---------------------------------------------------------------------------
// GET /catalog/instances
// ---------------------------------------------------------------------------

/// List all instances, sorted by date, with modality and race resolved.
pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let items = InstanceRepo::list(&state.pool).await?;
    tracing::debug!(count = items.len(), "Listed instances");
    Ok(Json(DataResponse { data: items }))
}

// ---------------------------------------------------------------------------
// GET /catalog/instance/{id}
// ---------------------------------------------------------------------------

/// Instance detail with its modality and that modality's race.
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let instance = InstanceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Instance",
            id,
        }))?;

    let modality = ModalityRepo::find_by_id(&state.pool, instance.modality_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Internal(format!(
                "instance {id} references missing modality {}",
                instance.modality_id
            )))
        })?;

    let race = RaceRepo::find_by_id(&state.pool, modality.race_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Internal(format!(
                "modality {} references missing race {}",
                modality.id, modality.race_id
            )))
        })?;

    Ok(Json(DataResponse {
        data: InstanceDetail {
            instance,
            modality,
            race,
        },
    }))
}

// ---------------------------------------------------------------------------
// GET|POST /catalog/instance/create
// ---------------------------------------------------------------------------

/// Blank create form with modality choices.
pub async fn create_form(State(state): State<AppState>) -> AppResult<Response> {
    form_view(&state.pool, StatusCode::OK, None, Vec::new()).await
}

/// Create an instance. Instances carry no uniqueness key; every valid
/// submission inserts.
pub async fn create(
    State(state): State<AppState>,
    Form(form): Form<InstanceForm>,
) -> AppResult<Response> {
    let draft = match validate_instance(&form) {
        Ok(draft) => draft,
        Err(errors) => {
            return form_view(&state.pool, StatusCode::BAD_REQUEST, Some(form.sanitized()), errors)
                .await
        }
    };

    if ModalityRepo::find_by_id(&state.pool, draft.modality_id).await?.is_none() {
        let errors = vec![FieldError::new("modality", "referenced modality does not exist")];
        return form_view(&state.pool, StatusCode::BAD_REQUEST, Some(form.sanitized()), errors)
            .await;
    }

    let created = InstanceRepo::create(&state.pool, &draft).await?;
    tracing::info!(id = created.id, modality_id = created.modality_id, "Instance created");
    Ok(Redirect::to(&created.url()).into_response())
}

// ---------------------------------------------------------------------------
// GET|POST /catalog/instance/{id}/update  (gated)
// ---------------------------------------------------------------------------

/// Update form prefilled with the current record.
pub async fn update_form(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Response> {
    let instance = InstanceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Instance",
            id,
        }))?;

    let record = InstanceForm {
        modality: Some(instance.modality_id.to_string()),
        date: Some(instance.date.to_rfc3339()),
        price: Some(instance.price.to_string()),
    };
    form_view(&state.pool, StatusCode::OK, Some(record), Vec::new()).await
}

/// Update an instance in place. Step-up gated.
pub async fn update(
    State(state): State<AppState>,
    session: SessionContext,
    Path(id): Path<DbId>,
    Form(form): Form<InstanceForm>,
) -> AppResult<Response> {
    let path = format!("/catalog/instance/{id}/update");
    let form = match step_up::require_elevated(&state.pool, &session, "POST", &path, form).await? {
        Gate::Proceed(form) => form,
        Gate::Deferred(redirect) => return Ok(redirect),
    };

    let draft = match validate_instance(&form) {
        Ok(draft) => draft,
        Err(errors) => {
            return form_view(&state.pool, StatusCode::BAD_REQUEST, Some(form.sanitized()), errors)
                .await
        }
    };

    if ModalityRepo::find_by_id(&state.pool, draft.modality_id).await?.is_none() {
        let errors = vec![FieldError::new("modality", "referenced modality does not exist")];
        return form_view(&state.pool, StatusCode::BAD_REQUEST, Some(form.sanitized()), errors)
            .await;
    }

    match InstanceRepo::update(&state.pool, id, &draft).await? {
        Some(updated) => {
            tracing::info!(id = updated.id, "Instance updated");
            Ok(Redirect::to(&updated.url()).into_response())
        }
        None => Ok(Redirect::to(LIST_PATH).into_response()),
    }
}

// ---------------------------------------------------------------------------
// GET|POST /catalog/instance/{id}/delete  (gated)
// ---------------------------------------------------------------------------

/// Instances block nothing; their dependent set is always empty.
pub struct InstanceDelete;

impl DeleteProtocol for InstanceDelete {
    const ENTITY: &'static str = "Instance";
    const LIST_PATH: &'static str = LIST_PATH;

    type Entity = Instance;
    type Dependent = Instance;

    fn fetch(
        pool: &PgPool,
        id: DbId,
    ) -> impl std::future::Future<Output = Result<Option<Instance>, sqlx::Error>> + Send {
        InstanceRepo::find_by_id(pool, id)
    }

    fn dependents(
        _pool: &PgPool,
        _id: DbId,
    ) -> impl std::future::Future<Output = Result<Vec<Instance>, sqlx::Error>> + Send {
        std::future::ready(Ok(Vec::new()))
    }

    fn delete(
        pool: &PgPool,
        id: DbId,
    ) -> impl std::future::Future<Output = Result<bool, sqlx::Error>> + Send {
        InstanceRepo::delete(pool, id)
    }
}

/// Delete confirmation view.
pub async fn confirm_delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Response> {
    delete_protocol::confirm::<InstanceDelete>(&state.pool, id).await
}

/// Delete execution. Step-up gated.
pub async fn execute_delete(
    State(state): State<AppState>,
    session: SessionContext,
    Path(id): Path<DbId>,
) -> AppResult<Response> {
    let path = format!("/catalog/instance/{id}/delete");
    let gate =
        step_up::require_elevated(&state.pool, &session, "POST", &path, serde_json::json!({}))
            .await?;
    match gate {
        Gate::Proceed(_) => delete_protocol::execute::<InstanceDelete>(&state.pool, id).await,
        Gate::Deferred(redirect) => Ok(redirect),
    }
}
