//! Incident listing endpoint

pub mod types;

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::extractors::ValidatedQuery;
use crate::api::types::{ApiError, PaginatedResponse};
use crate::data::StoreService;
use crate::data::types::IncidentFilter;

use types::{IncidentDto, ListIncidentsQuery};

/// Shared state for the incidents endpoint
#[derive(Clone)]
pub struct IncidentsApiState {
    pub store: Arc<StoreService>,
}

/// Build incidents API routes
pub fn routes(store: Arc<StoreService>) -> Router<()> {
    Router::new()
        .route("/", get(list_incidents))
        .with_state(IncidentsApiState { store })
}

/// List incidents matching the filters, newest first
#[utoipa::path(
    get,
    path = "/api/incidents",
    tag = "incidents",
    params(ListIncidentsQuery),
    responses(
        (status = 200, description = "Page of incidents with page, page_size, total, total_pages and items"),
        (status = 422, description = "Invalid query parameter"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn list_incidents(
    State(state): State<IncidentsApiState>,
    ValidatedQuery(query): ValidatedQuery<ListIncidentsQuery>,
) -> Result<Json<PaginatedResponse<IncidentDto>>, ApiError> {
    let filter = IncidentFilter::parse(query.filter_params())?;
    let repo = state.store.repository();

    let total = repo.count(&filter).await.map_err(ApiError::from_data)?;

    let limit = i64::from(query.page_size);
    let offset = (i64::from(query.page) - 1) * limit;
    let rows = repo
        .list_page(&filter, limit, offset)
        .await
        .map_err(ApiError::from_data)?;

    let items: Vec<IncidentDto> = rows.into_iter().map(IncidentDto::from).collect();

    Ok(Json(PaginatedResponse::new(
        items,
        query.page,
        query.page_size,
        u64::try_from(total).unwrap_or_default(),
    )))
}
