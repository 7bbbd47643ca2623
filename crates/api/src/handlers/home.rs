//! The catalog index: record counts per entity.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use dorsal_db::repositories::{CategoryRepo, InstanceRepo, LocationRepo, ModalityRepo, RaceRepo};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Per-entity record counts shown on the catalog home page.
#[derive(Debug, Serialize)]
pub struct CatalogCounts {
    pub category_count: i64,
    pub instance_count: i64,
    pub modality_count: i64,
    pub location_count: i64,
    pub race_count: i64,
}

/// GET /catalog -- count every entity type concurrently.
pub async fn index(State(state): State<AppState>) -> AppResult<Json<DataResponse<CatalogCounts>>> {
    let (category_count, instance_count, modality_count, location_count, race_count) = tokio::try_join!(
        CategoryRepo::count(&state.pool),
        InstanceRepo::count(&state.pool),
        ModalityRepo::count(&state.pool),
        LocationRepo::count(&state.pool),
        RaceRepo::count(&state.pool),
    )?;

    Ok(Json(DataResponse {
        data: CatalogCounts {
            category_count,
            instance_count,
            modality_count,
            location_count,
            race_count,
        },
    }))
}
