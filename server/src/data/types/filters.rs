//! Incident filter validation
//!
//! Raw query values arrive as [`FilterParams`] and are checked once by
//! [`IncidentFilter::parse`]. Every store backend consumes only the validated
//! [`IncidentFilter`], so an invalid request never reaches a query.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::core::constants::{MAX_INTENSITY, MAX_SECTOR_LENGTH, MIN_INTENSITY};
use crate::utils::time::{start_of_day_utc, start_of_next_day_utc};

use super::enums::{Direction, SourceType};
use super::incident::IncidentRow;

/// Rejected query parameter
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("date_from must be <= date_to")]
    DateRange,

    #[error("{field} must be a date in YYYY-MM-DD format, got '{value}'")]
    InvalidDate { field: &'static str, value: String },

    #[error("sector must be 1..{} characters", MAX_SECTOR_LENGTH)]
    SectorLength,

    #[error("{field} must be one of [{}]", .allowed.join(", "))]
    InvalidChoice {
        field: &'static str,
        allowed: Vec<&'static str>,
    },

    #[error("min_intensity must be {}..{}", MIN_INTENSITY, MAX_INTENSITY)]
    MinIntensity,

    #[error("bucket must be day|week")]
    InvalidBucket,
}

impl ValidationError {
    /// Machine-readable error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::DateRange => "INVALID_DATE_RANGE",
            Self::InvalidDate { .. } => "INVALID_DATE",
            Self::SectorLength => "INVALID_SECTOR",
            Self::InvalidChoice { field, .. } => match *field {
                "direction" => "INVALID_DIRECTION",
                "source_type" => "INVALID_SOURCE_TYPE",
                _ => "INVALID_CHOICE",
            },
            Self::MinIntensity => "INVALID_MIN_INTENSITY",
            Self::InvalidBucket => "INVALID_BUCKET",
        }
    }
}

/// Unvalidated filter values, as taken from the query string
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterParams {
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub sector: Option<String>,
    pub direction: Option<String>,
    pub source_type: Option<String>,
    pub min_intensity: Option<i64>,
}

/// Validated incident filter; all present conditions are ANDed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncidentFilter {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub sector: Option<String>,
    pub direction: Option<Direction>,
    pub source_type: Option<SourceType>,
    pub min_intensity: Option<i32>,
}

impl IncidentFilter {
    pub fn parse(params: FilterParams) -> Result<Self, ValidationError> {
        let date_from = params
            .date_from
            .as_deref()
            .map(|v| parse_date("date_from", v))
            .transpose()?;
        let date_to = params
            .date_to
            .as_deref()
            .map(|v| parse_date("date_to", v))
            .transpose()?;

        if let Some(sector) = &params.sector {
            let len = sector.chars().count();
            if len == 0 || len > MAX_SECTOR_LENGTH {
                return Err(ValidationError::SectorLength);
            }
        }

        if let (Some(from), Some(to)) = (date_from, date_to)
            && from > to
        {
            return Err(ValidationError::DateRange);
        }

        let direction = params
            .direction
            .as_deref()
            .map(Direction::parse)
            .transpose()?;
        let source_type = params
            .source_type
            .as_deref()
            .map(SourceType::parse)
            .transpose()?;

        let min_intensity = match params.min_intensity {
            Some(v) if (MIN_INTENSITY..=MAX_INTENSITY).contains(&v) => Some(v as i32),
            Some(_) => return Err(ValidationError::MinIntensity),
            None => None,
        };

        Ok(Self {
            date_from,
            date_to,
            sector: params.sector,
            direction,
            source_type,
            min_intensity,
        })
    }

    /// Half-open UTC interval `[start_of(date_from), start_of(date_to) + 1 day)`
    ///
    /// An upper bound past the last representable day is dropped.
    pub fn time_range(&self) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        (
            self.date_from.map(start_of_day_utc),
            self.date_to.and_then(start_of_next_day_utc),
        )
    }

    /// Same filter without the direction condition (for the by-direction breakdown)
    pub fn without_direction(&self) -> Self {
        Self {
            direction: None,
            ..self.clone()
        }
    }

    /// Same filter without the source type condition (for the by-source breakdown)
    pub fn without_source_type(&self) -> Self {
        Self {
            source_type: None,
            ..self.clone()
        }
    }

    /// Same filter without the sector condition (for the heatmap)
    pub fn without_sector(&self) -> Self {
        Self {
            sector: None,
            ..self.clone()
        }
    }

    /// Evaluate the filter against a single row in memory
    pub fn matches(&self, row: &IncidentRow) -> bool {
        let (start, end) = self.time_range();
        if start.is_some_and(|s| row.event_time < s) {
            return false;
        }
        if end.is_some_and(|e| row.event_time >= e) {
            return false;
        }
        if self.sector.as_ref().is_some_and(|s| *s != row.sector_code) {
            return false;
        }
        if self.direction.is_some_and(|d| d.as_str() != row.direction) {
            return false;
        }
        if self.source_type.is_some_and(|t| t.as_str() != row.source_type) {
            return false;
        }
        if self.min_intensity.is_some_and(|m| row.intensity < m) {
            return false;
        }
        true
    }
}

/// Strict `YYYY-MM-DD` with a year in 1..=9999
fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ValidationError> {
    let invalid = || ValidationError::InvalidDate {
        field,
        value: value.to_string(),
    };
    let bytes = value.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !well_formed {
        return Err(invalid());
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| invalid())?;
    if !(1..=9999).contains(&date.year()) {
        return Err(invalid());
    }
    Ok(date)
}
