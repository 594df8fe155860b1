//! Repository trait for incident store backends
//!
//! PostgreSQL and the in-memory store both implement [`IncidentRepository`],
//! so handlers stay backend-agnostic.

use async_trait::async_trait;

use crate::data::error::DataError;
use crate::data::types::{
    Bucket, HeatmapCell, IncidentFilter, IncidentRow, IncidentSummary, KeyCount, PeriodCount,
};

/// Read-only queries over the `incidents` table
///
/// Every method receives an already validated [`IncidentFilter`]. Breakdown and
/// heatmap methods ignore the dimension they group by.
#[async_trait]
pub trait IncidentRepository: Send + Sync {
    /// Count rows matching the filter
    async fn count(&self, filter: &IncidentFilter) -> Result<i64, DataError>;

    /// One page of matching rows, newest first (`event_time DESC, id DESC`)
    async fn list_page(
        &self,
        filter: &IncidentFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<IncidentRow>, DataError>;

    /// Totals, mean intensity and most frequent direction/sector
    async fn summary(&self, filter: &IncidentFilter) -> Result<IncidentSummary, DataError>;

    /// Row counts per time bucket, ascending, empty buckets omitted
    async fn timeseries(
        &self,
        filter: &IncidentFilter,
        bucket: Bucket,
    ) -> Result<Vec<PeriodCount>, DataError>;

    /// Row counts per source type, descending by count (source_type filter ignored)
    async fn by_source(&self, filter: &IncidentFilter) -> Result<Vec<KeyCount>, DataError>;

    /// Row counts per direction, descending by count (direction filter ignored)
    async fn by_direction(&self, filter: &IncidentFilter) -> Result<Vec<KeyCount>, DataError>;

    /// Row counts per (sector, bucket), ascending by sector then period (sector filter ignored)
    async fn heatmap(
        &self,
        filter: &IncidentFilter,
        bucket: Bucket,
    ) -> Result<Vec<HeatmapCell>, DataError>;

    /// Verify the store is reachable and the incidents table readable; returns the row count
    async fn ping(&self) -> Result<i64, DataError>;
}
