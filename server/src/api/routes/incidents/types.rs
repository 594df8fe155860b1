//! Incident listing API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::api::types::{default_page, default_page_size, validate_page, validate_page_size};
use crate::data::types::{FilterParams, IncidentRow};

/// Incident DTO for API responses
#[derive(Debug, Serialize, ToSchema)]
pub struct IncidentDto {
    pub id: i64,
    pub event_time: DateTime<Utc>,
    pub sector_code: String,
    /// One of N, NE, E, SE, S, SW, W, NW
    pub direction: String,
    /// One of ARTILLERY, MORTAR, MLRS, UAV_DROP, OTHER
    pub source_type: String,
    pub caliber_mm: Option<f64>,
    pub rounds_est: Option<i64>,
    pub duration_min: Option<f64>,
    /// 1..5
    pub intensity: i32,
    pub target_type: Option<String>,
    pub effect_level: Option<String>,
    pub notes: Option<String>,
}

impl From<IncidentRow> for IncidentDto {
    fn from(row: IncidentRow) -> Self {
        Self {
            id: row.id,
            event_time: row.event_time,
            sector_code: row.sector_code,
            direction: row.direction,
            source_type: row.source_type,
            caliber_mm: row.caliber_mm,
            rounds_est: row.rounds_est,
            duration_min: row.duration_min,
            intensity: row.intensity,
            target_type: row.target_type,
            effect_level: row.effect_level,
            notes: row.notes,
        }
    }
}

/// Query params for listing incidents
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListIncidentsQuery {
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

    /// Page number (>= 1)
    #[serde(default = "default_page")]
    #[validate(custom(function = "validate_page"))]
    pub page: u32,

    /// Items per page (1-200)
    #[serde(default = "default_page_size")]
    #[validate(custom(function = "validate_page_size"))]
    pub page_size: u32,
}

impl ListIncidentsQuery {
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
