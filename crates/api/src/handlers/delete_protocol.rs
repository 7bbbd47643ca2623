//! The shared referential-integrity delete protocol.
//!
//! All five catalog entities delete the same way: a GET renders a
//! confirmation view with the dependents that would block the deletion,
//! and a POST re-fetches both at execution time, refusing while any
//! dependent remains. The state machine is written once here and
//! parameterized over a per-entity [`DeleteProtocol`] descriptor.

use std::future::Future;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde::Serialize;
use sqlx::PgPool;

use dorsal_core::types::DbId;

use crate::error::AppResult;
use crate::response::DeleteConfirmation;

/// Wires one catalog entity into the shared delete protocol.
pub trait DeleteProtocol {
    /// Entity name used in log lines.
    const ENTITY: &'static str;
    /// Collection list path, redirected to after deletion and when the
    /// target is already gone.
    const LIST_PATH: &'static str;

    type Entity: Serialize + Send;
    type Dependent: Serialize + Send;

    fn fetch(
        pool: &PgPool,
        id: DbId,
    ) -> impl Future<Output = Result<Option<Self::Entity>, sqlx::Error>> + Send;

    fn dependents(
        pool: &PgPool,
        id: DbId,
    ) -> impl Future<Output = Result<Vec<Self::Dependent>, sqlx::Error>> + Send;

    fn delete(pool: &PgPool, id: DbId) -> impl Future<Output = Result<bool, sqlx::Error>> + Send;
}

/// `confirm` state (GET): render the entity and its current dependents.
///
/// An already-deleted target redirects to the list view rather than
/// erroring; from the caller's perspective the delete is already done.
pub async fn confirm<P: DeleteProtocol>(pool: &PgPool, id: DbId) -> AppResult<Response> {
    let (entity, dependents) = tokio::try_join!(P::fetch(pool, id), P::dependents(pool, id))?;

    let Some(entity) = entity else {
        return Ok(Redirect::to(P::LIST_PATH).into_response());
    };

    Ok(Json(DeleteConfirmation { entity, dependents }).into_response())
}

/// `execute` state (POST): re-fetch at request time, refuse while
/// dependents remain, delete otherwise.
///
/// The confirm-time snapshot is never trusted; a dependent created between
/// confirm and execute still blocks the deletion.
pub async fn execute<P: DeleteProtocol>(pool: &PgPool, id: DbId) -> AppResult<Response> {
    let (entity, dependents) = tokio::try_join!(P::fetch(pool, id), P::dependents(pool, id))?;

    let Some(entity) = entity else {
        return Ok(Redirect::to(P::LIST_PATH).into_response());
    };

    if !dependents.is_empty() {
        tracing::debug!(
            id,
            entity = P::ENTITY,
            blockers = dependents.len(),
            "Delete refused while dependents exist"
        );
        return Ok((
            StatusCode::CONFLICT,
            Json(DeleteConfirmation { entity, dependents }),
        )
            .into_response());
    }

    P::delete(pool, id).await?;
    tracing::info!(id, entity = P::ENTITY, "Deleted");
    Ok(Redirect::to(P::LIST_PATH).into_response())
}
