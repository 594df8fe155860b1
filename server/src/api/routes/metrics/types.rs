//! Metrics API types
//!
//! Each endpoint has its own query struct. The breakdown and heatmap queries
//! leave out the dimension they group by, so that parameter is ignored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::data::types::{FilterParams, HeatmapCell, IncidentSummary, KeyCount, PeriodCount};

/// Filters accepted by `/api/metrics/summary`
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SummaryQuery {
    /// First day included (YYYY-MM-DD, UTC)
    pub date_from: Option<String>,
    /// Last day included (YYYY-MM-DD, UTC)
    pub date_to: Option<String>,
    /// Exact sector code (1-32 characters)
    pub sector: Option<String>,
    /// N, NE, E, SE, S, SW, W or NW
    pub direction: Option<String>,
    /// ARTILLERY, MORTAR, MLRS, UAV_DROP or OTHER
    pub source_type: Option<String>,
    /// Minimum intensity (1-5)
    pub min_intensity: Option<i64>,
}

impl SummaryQuery {
    pub fn filter_params(&self) -> FilterParams {
        FilterParams {
            date_from: self.date_from.clone(),
            date_to: self.date_to.clone(),
            sector: self.sector.clone(),
            direction: self.direction.clone(),
            source_type: self.source_type.clone(),
            min_intensity: self.min_intensity,
        }
    }
}

/// Query for `/api/metrics/timeseries`; `bucket` is required
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TimeseriesQuery {
    /// `day` or `week`
    pub bucket: String,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub sector: Option<String>,
    pub direction: Option<String>,
    pub source_type: Option<String>,
    pub min_intensity: Option<i64>,
}

impl TimeseriesQuery {
    pub fn filter_params(&self) -> FilterParams {
        FilterParams {
            date_from: self.date_from.clone(),
            date_to: self.date_to.clone(),
            sector: self.sector.clone(),
            direction: self.direction.clone(),
            source_type: self.source_type.clone(),
            min_intensity: self.min_intensity,
        }
    }
}

/// Query for `/api/metrics/by_source` (no source_type filter)
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BySourceQuery {
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub sector: Option<String>,
    pub direction: Option<String>,
    pub min_intensity: Option<i64>,
}

impl BySourceQuery {
    pub fn filter_params(&self) -> FilterParams {
        FilterParams {
            date_from: self.date_from.clone(),
            date_to: self.date_to.clone(),
            sector: self.sector.clone(),
            direction: self.direction.clone(),
            source_type: None,
            min_intensity: self.min_intensity,
        }
    }
}

/// Query for `/api/metrics/by_direction` (no direction filter)
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ByDirectionQuery {
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub sector: Option<String>,
    pub source_type: Option<String>,
    pub min_intensity: Option<i64>,
}

impl ByDirectionQuery {
    pub fn filter_params(&self) -> FilterParams {
        FilterParams {
            date_from: self.date_from.clone(),
            date_to: self.date_to.clone(),
            sector: self.sector.clone(),
            direction: None,
            source_type: self.source_type.clone(),
            min_intensity: self.min_intensity,
        }
    }
}

/// Query for `/api/metrics/heatmap` (no sector filter)
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HeatmapQuery {
    /// `day` or `week` (default `week`)
    pub bucket: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub direction: Option<String>,
    pub source_type: Option<String>,
    pub min_intensity: Option<i64>,
}

impl HeatmapQuery {
    pub fn filter_params(&self) -> FilterParams {
        FilterParams {
            date_from: self.date_from.clone(),
            date_to: self.date_to.clone(),
            sector: None,
            direction: self.direction.clone(),
            source_type: self.source_type.clone(),
            min_intensity: self.min_intensity,
        }
    }
}

/// Summary metrics DTO
#[derive(Debug, Serialize, ToSchema)]
pub struct SummaryDto {
    pub total_incidents: i64,
    /// 0.0 when nothing matches
    pub avg_intensity: f64,
    pub total_rounds_est: i64,
    pub top_direction: Option<String>,
    pub top_sector: Option<String>,
}

impl From<IncidentSummary> for SummaryDto {
    fn from(s: IncidentSummary) -> Self {
        Self {
            total_incidents: s.total_incidents,
            avg_intensity: s.avg_intensity,
            total_rounds_est: s.total_rounds_est,
            top_direction: s.top_direction,
            top_sector: s.top_sector,
        }
    }
}

/// One time bucket of the series
#[derive(Debug, Serialize, ToSchema)]
pub struct PeriodCountDto {
    pub period_start: DateTime<Utc>,
    pub count: i64,
}

impl From<PeriodCount> for PeriodCountDto {
    fn from(p: PeriodCount) -> Self {
        Self {
            period_start: p.period_start,
            count: p.count,
        }
    }
}

/// One categorical bucket of a breakdown
#[derive(Debug, Serialize, ToSchema)]
pub struct KeyCountDto {
    pub key: String,
    pub count: i64,
}

impl From<KeyCount> for KeyCountDto {
    fn from(k: KeyCount) -> Self {
        Self {
            key: k.key,
            count: k.count,
        }
    }
}

/// One (sector, period) cell of the heatmap
#[derive(Debug, Serialize, ToSchema)]
pub struct HeatmapCellDto {
    pub sector_code: String,
    pub period_start: DateTime<Utc>,
    pub count: i64,
}

impl From<HeatmapCell> for HeatmapCellDto {
    fn from(c: HeatmapCell) -> Self {
        Self {
            sector_code: c.sector_code,
            period_start: c.period_start,
            count: c.count,
        }
    }
}
