//! Incident queries for PostgreSQL
//!
//! Each function runs read-only statements against the pool; a connection is
//! checked out per statement and returned when the statement completes or fails.

use sqlx::PgPool;

use crate::data::postgres::PostgresError;
use crate::data::postgres::filters::{Predicate, SqlValue, build_predicate};
use crate::data::types::{
    Bucket, HeatmapCell, IncidentFilter, IncidentRow, IncidentSummary, KeyCount, PeriodCount,
};

/// Projection matching [`IncidentRow`]; casts pin the decoded Rust types
const INCIDENT_COLUMNS: &str = "id::BIGINT AS id, event_time::TIMESTAMPTZ AS event_time, sector_code, \
     direction::TEXT AS direction, source_type::TEXT AS source_type, \
     caliber_mm::FLOAT8 AS caliber_mm, rounds_est::BIGINT AS rounds_est, \
     duration_min::FLOAT8 AS duration_min, intensity::INT4 AS intensity, \
     target_type, effect_level, notes";

#[derive(sqlx::FromRow)]
struct SummaryTotalsRow {
    total_incidents: i64,
    avg_intensity: f64,
    total_rounds_est: i64,
}

fn count_sql(predicate: &Predicate) -> String {
    format!("SELECT count(*) FROM incidents{}", predicate.where_clause())
}

fn list_sql(predicate: &Predicate) -> String {
    format!(
        "SELECT {} FROM incidents{} ORDER BY event_time DESC, id DESC LIMIT {} OFFSET {}",
        INCIDENT_COLUMNS,
        predicate.where_clause(),
        predicate.next_placeholder(0),
        predicate.next_placeholder(1),
    )
}

fn summary_totals_sql(predicate: &Predicate) -> String {
    format!(
        "SELECT count(*) AS total_incidents, \
         COALESCE(avg(intensity), 0)::FLOAT8 AS avg_intensity, \
         COALESCE(sum(rounds_est), 0)::BIGINT AS total_rounds_est \
         FROM incidents{}",
        predicate.where_clause()
    )
}

/// Group-by-key counts, descending by count with the key as tie-break
fn key_counts_sql(column: &str, predicate: &Predicate, limit: Option<u32>) -> String {
    let mut sql = format!(
        "SELECT {col}::TEXT AS key, count(*) AS count FROM incidents{} \
         GROUP BY {col} ORDER BY count(*) DESC, {col}::TEXT ASC",
        predicate.where_clause(),
        col = column,
    );
    if let Some(limit) = limit {
        sql.push_str(&format!(" LIMIT {}", limit));
    }
    sql
}

fn timeseries_sql(predicate: &Predicate, bucket: Bucket) -> String {
    format!(
        "SELECT date_trunc('{}', event_time)::TIMESTAMPTZ AS period_start, count(*) AS count \
         FROM incidents{} GROUP BY 1 ORDER BY 1",
        bucket.as_str(),
        predicate.where_clause()
    )
}

fn heatmap_sql(predicate: &Predicate, bucket: Bucket) -> String {
    format!(
        "SELECT sector_code, date_trunc('{}', event_time)::TIMESTAMPTZ AS period_start, count(*) AS count \
         FROM incidents{} GROUP BY 1, 2 ORDER BY 1, 2",
        bucket.as_str(),
        predicate.where_clause()
    )
}

/// Count rows matching the filter
pub async fn count(pool: &PgPool, filter: &IncidentFilter) -> Result<i64, PostgresError> {
    let predicate = build_predicate(filter);
    let total = sqlx::query_scalar_with::<_, i64, _>(&count_sql(&predicate), predicate.arguments(&[])?)
        .fetch_one(pool)
        .await?;
    Ok(total)
}

/// Fetch one page of matching rows, newest first
pub async fn list_page(
    pool: &PgPool,
    filter: &IncidentFilter,
    limit: i64,
    offset: i64,
) -> Result<Vec<IncidentRow>, PostgresError> {
    let predicate = build_predicate(filter);
    let args = predicate.arguments(&[SqlValue::Int(limit), SqlValue::Int(offset)])?;
    let rows = sqlx::query_as_with::<_, IncidentRow, _>(&list_sql(&predicate), args)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Totals plus the most frequent direction and sector
pub async fn summary(
    pool: &PgPool,
    filter: &IncidentFilter,
) -> Result<IncidentSummary, PostgresError> {
    let predicate = build_predicate(filter);

    let totals = sqlx::query_as_with::<_, SummaryTotalsRow, _>(
        &summary_totals_sql(&predicate),
        predicate.arguments(&[])?,
    )
    .fetch_one(pool)
    .await?;

    let top_direction = sqlx::query_as_with::<_, KeyCount, _>(
        &key_counts_sql("direction", &predicate, Some(1)),
        predicate.arguments(&[])?,
    )
    .fetch_optional(pool)
    .await?;

    let top_sector = sqlx::query_as_with::<_, KeyCount, _>(
        &key_counts_sql("sector_code", &predicate, Some(1)),
        predicate.arguments(&[])?,
    )
    .fetch_optional(pool)
    .await?;

    Ok(IncidentSummary {
        total_incidents: totals.total_incidents,
        avg_intensity: totals.avg_intensity,
        total_rounds_est: totals.total_rounds_est,
        top_direction: top_direction.map(|r| r.key),
        top_sector: top_sector.map(|r| r.key),
    })
}

/// Row counts per truncated period, ascending
pub async fn timeseries(
    pool: &PgPool,
    filter: &IncidentFilter,
    bucket: Bucket,
) -> Result<Vec<PeriodCount>, PostgresError> {
    let predicate = build_predicate(filter);
    let rows = sqlx::query_as_with::<_, PeriodCount, _>(
        &timeseries_sql(&predicate, bucket),
        predicate.arguments(&[])?,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Row counts per source type; the filter's source_type is ignored
pub async fn by_source(
    pool: &PgPool,
    filter: &IncidentFilter,
) -> Result<Vec<KeyCount>, PostgresError> {
    let predicate = build_predicate(&filter.without_source_type());
    let rows = sqlx::query_as_with::<_, KeyCount, _>(
        &key_counts_sql("source_type", &predicate, None),
        predicate.arguments(&[])?,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Row counts per direction; the filter's direction is ignored
pub async fn by_direction(
    pool: &PgPool,
    filter: &IncidentFilter,
) -> Result<Vec<KeyCount>, PostgresError> {
    let predicate = build_predicate(&filter.without_direction());
    let rows = sqlx::query_as_with::<_, KeyCount, _>(
        &key_counts_sql("direction", &predicate, None),
        predicate.arguments(&[])?,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Row counts per (sector, period); the filter's sector is ignored
pub async fn heatmap(
    pool: &PgPool,
    filter: &IncidentFilter,
    bucket: Bucket,
) -> Result<Vec<HeatmapCell>, PostgresError> {
    let predicate = build_predicate(&filter.without_sector());
    let rows = sqlx::query_as_with::<_, HeatmapCell, _>(
        &heatmap_sql(&predicate, bucket),
        predicate.arguments(&[])?,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Total row count, used as a readability probe for the incidents table
pub async fn ping(pool: &PgPool) -> Result<i64, PostgresError> {
    count(pool, &IncidentFilter::default()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::types::{Direction, SourceType};

    fn sector_and_direction() -> IncidentFilter {
        IncidentFilter {
            sector: Some("A1".into()),
            direction: Some(Direction::N),
            source_type: Some(SourceType::Mortar),
            ..Default::default()
        }
    }

    #[test]
    fn test_count_sql_unfiltered() {
        let predicate = build_predicate(&IncidentFilter::default());
        assert_eq!(count_sql(&predicate), "SELECT count(*) FROM incidents");
    }

    #[test]
    fn test_list_sql_appends_limit_offset_after_filter_params() {
        let predicate = build_predicate(&sector_and_direction());
        let sql = list_sql(&predicate);

        assert!(sql.contains(
            " WHERE sector_code = $1 AND direction::TEXT = $2 AND source_type::TEXT = $3 "
        ));
        assert!(sql.ends_with("ORDER BY event_time DESC, id DESC LIMIT $4 OFFSET $5"));
    }

    #[test]
    fn test_list_sql_unfiltered_uses_first_placeholders() {
        let predicate = build_predicate(&IncidentFilter::default());
        assert!(list_sql(&predicate).ends_with("FROM incidents ORDER BY event_time DESC, id DESC LIMIT $1 OFFSET $2"));
    }

    #[test]
    fn test_summary_totals_sql_coalesces() {
        let predicate = build_predicate(&IncidentFilter::default());
        let sql = summary_totals_sql(&predicate);
        assert!(sql.contains("COALESCE(avg(intensity), 0)::FLOAT8"));
        assert!(sql.contains("COALESCE(sum(rounds_est), 0)::BIGINT"));
    }

    #[test]
    fn test_key_counts_sql_tie_break_and_limit() {
        let predicate = build_predicate(&IncidentFilter::default());
        assert_eq!(
            key_counts_sql("direction", &predicate, Some(1)),
            "SELECT direction::TEXT AS key, count(*) AS count FROM incidents \
             GROUP BY direction ORDER BY count(*) DESC, direction::TEXT ASC LIMIT 1"
        );
        assert!(!key_counts_sql("source_type", &predicate, None).contains("LIMIT"));
    }

    #[test]
    fn test_timeseries_and_heatmap_sql_use_bucket_unit() {
        let predicate = build_predicate(&IncidentFilter::default());
        assert!(timeseries_sql(&predicate, Bucket::Day).starts_with("SELECT date_trunc('day', event_time)"));
        assert!(heatmap_sql(&predicate, Bucket::Week).contains("date_trunc('week', event_time)"));
        assert!(heatmap_sql(&predicate, Bucket::Week).ends_with("GROUP BY 1, 2 ORDER BY 1, 2"));
    }

    #[test]
    fn test_breakdowns_drop_their_own_dimension() {
        let filter = sector_and_direction();

        let by_source = build_predicate(&filter.without_source_type());
        assert!(!by_source.sql.contains("source_type"));
        assert!(by_source.sql.contains("direction"));

        let by_direction = build_predicate(&filter.without_direction());
        assert!(!by_direction.sql.contains("direction"));
        assert!(by_direction.sql.contains("source_type"));

        let heatmap = build_predicate(&filter.without_sector());
        assert!(!heatmap.sql.contains("sector_code"));
        assert_eq!(heatmap.params.len(), 2);
    }
}
