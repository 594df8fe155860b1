//! IncidentRepository trait implementation for PostgreSQL
//!
//! Implements the trait for `Arc<PostgresService>` by delegating to the
//! free functions in `repositories::incidents`.

use std::sync::Arc;

use async_trait::async_trait;

use crate::data::error::DataError;
use crate::data::traits::IncidentRepository;
use crate::data::types::{
    Bucket, HeatmapCell, IncidentFilter, IncidentRow, IncidentSummary, KeyCount, PeriodCount,
};

use super::PostgresService;
use super::repositories::incidents;

#[async_trait]
impl IncidentRepository for Arc<PostgresService> {
    async fn count(&self, filter: &IncidentFilter) -> Result<i64, DataError> {
        incidents::count(self.pool(), filter)
            .await
            .map_err(Into::into)
    }

    async fn list_page(
        &self,
        filter: &IncidentFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<IncidentRow>, DataError> {
        incidents::list_page(self.pool(), filter, limit, offset)
            .await
            .map_err(Into::into)
    }

    async fn summary(&self, filter: &IncidentFilter) -> Result<IncidentSummary, DataError> {
        incidents::summary(self.pool(), filter)
            .await
            .map_err(Into::into)
    }

    async fn timeseries(
        &self,
        filter: &IncidentFilter,
        bucket: Bucket,
    ) -> Result<Vec<PeriodCount>, DataError> {
        incidents::timeseries(self.pool(), filter, bucket)
            .await
            .map_err(Into::into)
    }

    async fn by_source(&self, filter: &IncidentFilter) -> Result<Vec<KeyCount>, DataError> {
        incidents::by_source(self.pool(), filter)
            .await
            .map_err(Into::into)
    }

    async fn by_direction(&self, filter: &IncidentFilter) -> Result<Vec<KeyCount>, DataError> {
        incidents::by_direction(self.pool(), filter)
            .await
            .map_err(Into::into)
    }

    async fn heatmap(
        &self,
        filter: &IncidentFilter,
        bucket: Bucket,
    ) -> Result<Vec<HeatmapCell>, DataError> {
        incidents::heatmap(self.pool(), filter, bucket)
            .await
            .map_err(Into::into)
    }

    async fn ping(&self) -> Result<i64, DataError> {
        incidents::ping(self.pool()).await.map_err(Into::into)
    }
}
