//! Aggregate metrics endpoints

pub mod types;

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::extractors::ValidatedQuery;
use crate::api::types::ApiError;
use crate::data::StoreService;
use crate::data::types::{Bucket, IncidentFilter};

use types::{
    ByDirectionQuery, BySourceQuery, HeatmapCellDto, HeatmapQuery, KeyCountDto, PeriodCountDto,
    SummaryDto, SummaryQuery, TimeseriesQuery,
};

/// Shared state for metrics endpoints
#[derive(Clone)]
pub struct MetricsApiState {
    pub store: Arc<StoreService>,
}

/// Build metrics API routes
pub fn routes(store: Arc<StoreService>) -> Router<()> {
    Router::new()
        .route("/summary", get(summary))
        .route("/timeseries", get(timeseries))
        .route("/by_source", get(by_source))
        .route("/by_direction", get(by_direction))
        .route("/heatmap", get(heatmap))
        .with_state(MetricsApiState { store })
}

/// Totals, mean intensity and most frequent direction/sector
#[utoipa::path(
    get,
    path = "/api/metrics/summary",
    tag = "metrics",
    params(SummaryQuery),
    responses(
        (status = 200, description = "Summary metrics", body = SummaryDto),
        (status = 422, description = "Invalid query parameter")
    )
)]
pub async fn summary(
    State(state): State<MetricsApiState>,
    ValidatedQuery(query): ValidatedQuery<SummaryQuery>,
) -> Result<Json<SummaryDto>, ApiError> {
    let filter = IncidentFilter::parse(query.filter_params())?;
    let summary = state
        .store
        .repository()
        .summary(&filter)
        .await
        .map_err(ApiError::from_data)?;
    Ok(Json(summary.into()))
}

/// Incident counts per day or week, ascending; empty periods are omitted
#[utoipa::path(
    get,
    path = "/api/metrics/timeseries",
    tag = "metrics",
    params(TimeseriesQuery),
    responses(
        (status = 200, description = "Counts per period", body = [PeriodCountDto]),
        (status = 422, description = "Invalid or missing bucket, or invalid filter")
    )
)]
pub async fn timeseries(
    State(state): State<MetricsApiState>,
    ValidatedQuery(query): ValidatedQuery<TimeseriesQuery>,
) -> Result<Json<Vec<PeriodCountDto>>, ApiError> {
    let bucket = Bucket::parse(&query.bucket)?;
    let filter = IncidentFilter::parse(query.filter_params())?;
    let rows = state
        .store
        .repository()
        .timeseries(&filter, bucket)
        .await
        .map_err(ApiError::from_data)?;
    Ok(Json(rows.into_iter().map(PeriodCountDto::from).collect()))
}

/// Incident counts per source type, descending
#[utoipa::path(
    get,
    path = "/api/metrics/by_source",
    tag = "metrics",
    params(BySourceQuery),
    responses(
        (status = 200, description = "Counts per source type", body = [KeyCountDto]),
        (status = 422, description = "Invalid query parameter")
    )
)]
pub async fn by_source(
    State(state): State<MetricsApiState>,
    ValidatedQuery(query): ValidatedQuery<BySourceQuery>,
) -> Result<Json<Vec<KeyCountDto>>, ApiError> {
    let filter = IncidentFilter::parse(query.filter_params())?;
    let rows = state
        .store
        .repository()
        .by_source(&filter)
        .await
        .map_err(ApiError::from_data)?;
    Ok(Json(rows.into_iter().map(KeyCountDto::from).collect()))
}

/// Incident counts per direction, descending
#[utoipa::path(
    get,
    path = "/api/metrics/by_direction",
    tag = "metrics",
    params(ByDirectionQuery),
    responses(
        (status = 200, description = "Counts per direction", body = [KeyCountDto]),
        (status = 422, description = "Invalid query parameter")
    )
)]
pub async fn by_direction(
    State(state): State<MetricsApiState>,
    ValidatedQuery(query): ValidatedQuery<ByDirectionQuery>,
) -> Result<Json<Vec<KeyCountDto>>, ApiError> {
    let filter = IncidentFilter::parse(query.filter_params())?;
    let rows = state
        .store
        .repository()
        .by_direction(&filter)
        .await
        .map_err(ApiError::from_data)?;
    Ok(Json(rows.into_iter().map(KeyCountDto::from).collect()))
}

/// Incident counts per (sector, period), by sector then period
#[utoipa::path(
    get,
    path = "/api/metrics/heatmap",
    tag = "metrics",
    params(HeatmapQuery),
    responses(
        (status = 200, description = "Counts per sector and period", body = [HeatmapCellDto]),
        (status = 422, description = "Invalid bucket or filter")
    )
)]
pub async fn heatmap(
    State(state): State<MetricsApiState>,
    ValidatedQuery(query): ValidatedQuery<HeatmapQuery>,
) -> Result<Json<Vec<HeatmapCellDto>>, ApiError> {
    let bucket = match query.bucket.as_deref() {
        Some(b) => Bucket::parse(b)?,
        None => Bucket::default(),
    };
    let filter = IncidentFilter::parse(query.filter_params())?;
    let rows = state
        .store
        .repository()
        .heatmap(&filter, bucket)
        .await
        .map_err(ApiError::from_data)?;
    Ok(Json(rows.into_iter().map(HeatmapCellDto::from).collect()))
}
