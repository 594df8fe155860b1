//! Incident rows and aggregate result rows

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One shelling/attack event as stored in the `incidents` table
///
/// `direction` and `source_type` are kept as the stored text so rows
/// written outside this service still decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct IncidentRow {
    pub id: i64,
    pub event_time: DateTime<Utc>,
    pub sector_code: String,
    pub direction: String,
    pub source_type: String,
    pub caliber_mm: Option<f64>,
    pub rounds_est: Option<i64>,
    pub duration_min: Option<f64>,
    pub intensity: i32,
    pub target_type: Option<String>,
    pub effect_level: Option<String>,
    pub notes: Option<String>,
}

/// Headline numbers over the filtered set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncidentSummary {
    pub total_incidents: i64,
    /// 0.0 when no rows match
    pub avg_intensity: f64,
    /// Missing estimates count as 0
    pub total_rounds_est: i64,
    pub top_direction: Option<String>,
    pub top_sector: Option<String>,
}

/// Row count for one time bucket
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PeriodCount {
    pub period_start: DateTime<Utc>,
    pub count: i64,
}

/// Row count for one categorical value
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct KeyCount {
    pub key: String,
    pub count: i64,
}

/// Row count for one (sector, time bucket) pair
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct HeatmapCell {
    pub sector_code: String,
    pub period_start: DateTime<Utc>,
    pub count: i64,
}
