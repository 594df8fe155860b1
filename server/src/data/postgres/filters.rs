//! SQL predicate generation for incident filters
//!
//! Clauses are emitted in a fixed order (date_from, date_to, sector, direction,
//! source_type, min_intensity) with `$n` placeholders numbered in that same
//! order, so the parameter list binds positionally.

use chrono::{DateTime, Utc};
use sqlx::Arguments;
use sqlx::postgres::PgArguments;

use crate::data::types::IncidentFilter;

use super::PostgresError;

/// A bound query parameter
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Timestamp(DateTime<Utc>),
    Text(String),
    Int(i64),
}

/// WHERE-clause conjunction plus its positional parameters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    /// Clauses joined with `AND`; empty when the filter is unconditional
    pub sql: String,
    pub params: Vec<SqlValue>,
}

impl Predicate {
    /// ` WHERE ...` or an empty string
    pub fn where_clause(&self) -> String {
        if self.sql.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.sql)
        }
    }

    /// Placeholder for the next parameter appended after the predicate's own
    pub fn next_placeholder(&self, offset: usize) -> String {
        format!("${}", self.params.len() + offset + 1)
    }

    /// Encode the predicate parameters followed by `extra`
    pub fn arguments(&self, extra: &[SqlValue]) -> Result<PgArguments, PostgresError> {
        let mut args = PgArguments::default();
        for value in self.params.iter().chain(extra) {
            let result = match value {
                SqlValue::Timestamp(ts) => args.add(*ts),
                SqlValue::Text(s) => args.add(s.clone()),
                SqlValue::Int(n) => args.add(*n),
            };
            result.map_err(|e| PostgresError::Encode(e.to_string()))?;
        }
        Ok(args)
    }
}

/// Build the WHERE predicate for a validated filter
pub fn build_predicate(filter: &IncidentFilter) -> Predicate {
    let mut clauses: Vec<String> = Vec::new();
    let mut params: Vec<SqlValue> = Vec::new();

    let mut push = |clause: &str, value: SqlValue| {
        params.push(value);
        clauses.push(format!("{} ${}", clause, params.len()));
    };

    let (start, end) = filter.time_range();
    if let Some(start) = start {
        push("event_time >=", SqlValue::Timestamp(start));
    }
    if let Some(end) = end {
        push("event_time <", SqlValue::Timestamp(end));
    }
    if let Some(sector) = &filter.sector {
        push("sector_code =", SqlValue::Text(sector.clone()));
    }
    if let Some(direction) = filter.direction {
        push(
            "direction::TEXT =",
            SqlValue::Text(direction.as_str().to_string()),
        );
    }
    if let Some(source_type) = filter.source_type {
        push(
            "source_type::TEXT =",
            SqlValue::Text(source_type.as_str().to_string()),
        );
    }
    if let Some(min) = filter.min_intensity {
        push("intensity >=", SqlValue::Int(i64::from(min)));
    }

    Predicate {
        sql: clauses.join(" AND "),
        params,
    }
}
