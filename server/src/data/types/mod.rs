//! Shared data types for all store backends
//!
//! Row and aggregate types are backend-neutral: PostgreSQL decodes into them via
//! `sqlx::FromRow`, the memory store builds them directly.

mod enums;
mod filters;
mod incident;

pub use enums::{Bucket, Direction, SourceType};
pub use filters::{FilterParams, IncidentFilter, ValidationError};
pub use incident::{HeatmapCell, IncidentRow, IncidentSummary, KeyCount, PeriodCount};
