//! In-memory incident store
//!
//! Holds an immutable snapshot of incidents loaded from a JSON seed file (an
//! array of incident objects). Aggregates are computed on the fly with the same
//! ordering rules as the PostgreSQL queries, which makes it suitable for local
//! development and for exercising the HTTP layer in tests.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::data::error::DataError;
use crate::data::traits::IncidentRepository;
use crate::data::types::{
    Bucket, HeatmapCell, IncidentFilter, IncidentRow, IncidentSummary, KeyCount, PeriodCount,
};
use crate::utils::time::{truncate_to_day, truncate_to_week};

/// Read-only incident snapshot
pub struct MemoryStore {
    rows: Vec<IncidentRow>,
}

impl MemoryStore {
    pub fn new(rows: Vec<IncidentRow>) -> Self {
        Self { rows }
    }

    /// Load a JSON array of incidents
    pub async fn load(path: &Path) -> Result<Self, DataError> {
        let content = tokio::fs::read_to_string(path).await?;
        let rows: Vec<IncidentRow> =
            serde_json::from_str(&content).map_err(|e| DataError::Seed {
                path: path.display().to_string(),
                error: e.to_string(),
            })?;
        tracing::debug!(path = %path.display(), rows = rows.len(), "Loaded incident seed file");
        Ok(Self::new(rows))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    fn matching<'a>(&'a self, filter: &'a IncidentFilter) -> impl Iterator<Item = &'a IncidentRow> {
        self.rows.iter().filter(move |row| filter.matches(row))
    }
}

/// Counts per key, descending by count, ties broken by key ascending
fn key_counts<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<KeyCount> {
    let mut counts: HashMap<&str, i64> = HashMap::new();
    for key in keys {
        *counts.entry(key).or_default() += 1;
    }
    let mut result: Vec<KeyCount> = counts
        .into_iter()
        .map(|(key, count)| KeyCount {
            key: key.to_string(),
            count,
        })
        .collect();
    result.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
    result
}

fn truncator(bucket: Bucket) -> fn(chrono::DateTime<chrono::Utc>) -> chrono::DateTime<chrono::Utc> {
    match bucket {
        Bucket::Day => truncate_to_day,
        Bucket::Week => truncate_to_week,
    }
}

#[async_trait]
impl IncidentRepository for Arc<MemoryStore> {
    async fn count(&self, filter: &IncidentFilter) -> Result<i64, DataError> {
        Ok(self.matching(filter).count() as i64)
    }

    async fn list_page(
        &self,
        filter: &IncidentFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<IncidentRow>, DataError> {
        let mut rows: Vec<&IncidentRow> = self.matching(filter).collect();
        rows.sort_by(|a, b| {
            b.event_time
                .cmp(&a.event_time)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(rows
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect())
    }

    async fn summary(&self, filter: &IncidentFilter) -> Result<IncidentSummary, DataError> {
        let rows: Vec<&IncidentRow> = self.matching(filter).collect();
        if rows.is_empty() {
            return Ok(IncidentSummary::default());
        }

        let total = rows.len() as i64;
        let intensity_sum: i64 = rows.iter().map(|r| i64::from(r.intensity)).sum();
        let rounds: i64 = rows.iter().filter_map(|r| r.rounds_est).sum();

        Ok(IncidentSummary {
            total_incidents: total,
            avg_intensity: intensity_sum as f64 / total as f64,
            total_rounds_est: rounds,
            top_direction: key_counts(rows.iter().map(|r| r.direction.as_str()))
                .into_iter()
                .next()
                .map(|k| k.key),
            top_sector: key_counts(rows.iter().map(|r| r.sector_code.as_str()))
                .into_iter()
                .next()
                .map(|k| k.key),
        })
    }

    async fn timeseries(
        &self,
        filter: &IncidentFilter,
        bucket: Bucket,
    ) -> Result<Vec<PeriodCount>, DataError> {
        let truncate = truncator(bucket);
        let mut periods: BTreeMap<_, i64> = BTreeMap::new();
        for row in self.matching(filter) {
            *periods.entry(truncate(row.event_time)).or_default() += 1;
        }
        Ok(periods
            .into_iter()
            .map(|(period_start, count)| PeriodCount {
                period_start,
                count,
            })
            .collect())
    }

    async fn by_source(&self, filter: &IncidentFilter) -> Result<Vec<KeyCount>, DataError> {
        let filter = filter.without_source_type();
        Ok(key_counts(
            self.matching(&filter).map(|r| r.source_type.as_str()),
        ))
    }

    async fn by_direction(&self, filter: &IncidentFilter) -> Result<Vec<KeyCount>, DataError> {
        let filter = filter.without_direction();
        Ok(key_counts(self.matching(&filter).map(|r| r.direction.as_str())))
    }

    async fn heatmap(
        &self,
        filter: &IncidentFilter,
        bucket: Bucket,
    ) -> Result<Vec<HeatmapCell>, DataError> {
        let filter = filter.without_sector();
        let truncate = truncator(bucket);
        let mut cells: BTreeMap<(&str, _), i64> = BTreeMap::new();
        for row in self.matching(&filter) {
            *cells
                .entry((row.sector_code.as_str(), truncate(row.event_time)))
                .or_default() += 1;
        }
        Ok(cells
            .into_iter()
            .map(|((sector_code, period_start), count)| HeatmapCell {
                sector_code: sector_code.to_string(),
                period_start,
                count,
            })
            .collect())
    }

    async fn ping(&self) -> Result<i64, DataError> {
        Ok(self.len() as i64)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::data::types::{Direction, SourceType};
    use chrono::{NaiveDate, TimeZone, Utc};

    pub(crate) fn incident(
        id: i64,
        (y, m, d, h): (i32, u32, u32, u32),
        sector: &str,
        direction: &str,
        source_type: &str,
        intensity: i32,
        rounds_est: Option<i64>,
    ) -> IncidentRow {
        IncidentRow {
            id,
            event_time: Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap(),
            sector_code: sector.to_string(),
            direction: direction.to_string(),
            source_type: source_type.to_string(),
            caliber_mm: Some(122.0),
            rounds_est,
            duration_min: None,
            intensity,
            target_type: None,
            effect_level: None,
            notes: None,
        }
    }

    /// Three incidents on consecutive days: (2, N), (4, N), (5, S)
    pub(crate) fn three_day_store() -> Arc<MemoryStore> {
        Arc::new(MemoryStore::new(vec![
            incident(1, (2024, 1, 1, 6), "A1", "N", "ARTILLERY", 2, Some(10)),
            incident(2, (2024, 1, 2, 12), "A1", "N", "MORTAR", 4, None),
            incident(3, (2024, 1, 3, 18), "B2", "S", "ARTILLERY", 5, Some(5)),
        ]))
    }

    fn range(from: (i32, u32, u32), to: (i32, u32, u32)) -> IncidentFilter {
        IncidentFilter {
            date_from: NaiveDate::from_ymd_opt(from.0, from.1, from.2),
            date_to: NaiveDate::from_ymd_opt(to.0, to.1, to.2),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_summary_over_date_range() {
        let store = three_day_store();
        let summary = store.summary(&range((2024, 1, 1), (2024, 1, 2))).await.unwrap();

        assert_eq!(summary.total_incidents, 2);
        assert_eq!(summary.avg_intensity, 3.0);
        assert_eq!(summary.total_rounds_est, 10);
        assert_eq!(summary.top_direction.as_deref(), Some("N"));
        assert_eq!(summary.top_sector.as_deref(), Some("A1"));
    }

    #[tokio::test]
    async fn test_summary_empty_is_zeroed() {
        let store = three_day_store();
        let summary = store.summary(&range((2023, 1, 1), (2023, 1, 2))).await.unwrap();
        assert_eq!(summary, IncidentSummary::default());
        assert_eq!(summary.avg_intensity, 0.0);
        assert!(summary.top_direction.is_none());
    }

    #[tokio::test]
    async fn test_by_direction_descending() {
        let store = three_day_store();
        let result = store.by_direction(&IncidentFilter::default()).await.unwrap();
        assert_eq!(
            result,
            vec![
                KeyCount { key: "N".into(), count: 2 },
                KeyCount { key: "S".into(), count: 1 },
            ]
        );
    }

    #[tokio::test]
    async fn test_by_direction_ignores_direction_filter() {
        let store = three_day_store();
        let filter = IncidentFilter {
            direction: Some(Direction::S),
            ..Default::default()
        };
        assert_eq!(store.by_direction(&filter).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_by_source_ignores_source_filter_but_keeps_others() {
        let store = three_day_store();
        let filter = IncidentFilter {
            source_type: Some(SourceType::Mortar),
            min_intensity: Some(4),
            ..Default::default()
        };
        let result = store.by_source(&filter).await.unwrap();
        // ties broken by key ascending
        assert_eq!(
            result,
            vec![
                KeyCount { key: "ARTILLERY".into(), count: 1 },
                KeyCount { key: "MORTAR".into(), count: 1 },
            ]
        );
    }

    #[tokio::test]
    async fn test_timeseries_day_is_sparse_and_ascending() {
        let store = Arc::new(MemoryStore::new(vec![
            incident(1, (2024, 1, 5, 1), "A1", "N", "OTHER", 1, None),
            incident(2, (2024, 1, 1, 1), "A1", "N", "OTHER", 1, None),
            incident(3, (2024, 1, 1, 23), "A1", "N", "OTHER", 1, None),
        ]));
        let series = store
            .timeseries(&IncidentFilter::default(), Bucket::Day)
            .await
            .unwrap();

        assert_eq!(
            series,
            vec![
                PeriodCount {
                    period_start: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
                    count: 2,
                },
                PeriodCount {
                    period_start: Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap(),
                    count: 1,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_timeseries_week_groups_by_monday() {
        let store = three_day_store();
        let series = store
            .timeseries(&IncidentFilter::default(), Bucket::Week)
            .await
            .unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(
            series[0].period_start,
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(series[0].count, 3);
    }

    #[tokio::test]
    async fn test_heatmap_orders_by_sector_then_period_and_ignores_sector() {
        let store = three_day_store();
        let filter = IncidentFilter {
            sector: Some("B2".into()),
            ..Default::default()
        };
        let cells = store.heatmap(&filter, Bucket::Day).await.unwrap();

        let keys: Vec<(&str, u32)> = cells
            .iter()
            .map(|c| (c.sector_code.as_str(), chrono::Datelike::day(&c.period_start)))
            .collect();
        assert_eq!(keys, vec![("A1", 1), ("A1", 2), ("B2", 3)]);
    }

    #[tokio::test]
    async fn test_list_page_newest_first_with_offset() {
        let store = three_day_store();
        let filter = IncidentFilter::default();

        let first = store.list_page(&filter, 2, 0).await.unwrap();
        assert_eq!(first.iter().map(|r| r.id).collect::<Vec<_>>(), vec![3, 2]);

        let second = store.list_page(&filter, 2, 2).await.unwrap();
        assert_eq!(second.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1]);

        assert!(store.list_page(&filter, 2, 4).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_load_seed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json");
        std::fs::write(
            &path,
            r#"[{
                "id": 7,
                "event_time": "2024-03-01T10:15:00Z",
                "sector_code": "C3",
                "direction": "NW",
                "source_type": "MLRS",
                "intensity": 4,
                "rounds_est": 12
            }]"#,
        )
        .unwrap();

        let store = Arc::new(MemoryStore::load(&path).await.unwrap());
        assert_eq!(store.ping().await.unwrap(), 1);
        let rows = store.list_page(&IncidentFilter::default(), 10, 0).await.unwrap();
        assert_eq!(rows[0].sector_code, "C3");
        assert!(rows[0].caliber_mm.is_none());
    }

    #[tokio::test]
    async fn test_load_invalid_seed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = MemoryStore::load(&path).await.err().unwrap();
        assert!(matches!(err, DataError::Seed { .. }));
    }
}
