//! Time utility functions
//!
//! All incident timestamps are handled in UTC. Week truncation follows
//! ISO weeks (Monday start), the same convention as PostgreSQL `date_trunc('week', ..)`.

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};

/// Midnight UTC at the start of the given calendar date
pub fn start_of_day_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(0, 0, 0)
        .unwrap_or_default()
        .and_utc()
}

/// Midnight UTC at the start of the day after `date`
///
/// Returns `None` past the end of the representable calendar.
pub fn start_of_next_day_utc(date: NaiveDate) -> Option<DateTime<Utc>> {
    date.checked_add_days(Days::new(1)).map(start_of_day_utc)
}

/// Truncate a timestamp to the start of its UTC day
pub fn truncate_to_day(ts: DateTime<Utc>) -> DateTime<Utc> {
    start_of_day_utc(ts.date_naive())
}

/// Truncate a timestamp to the start of its ISO week (Monday 00:00 UTC)
pub fn truncate_to_week(ts: DateTime<Utc>) -> DateTime<Utc> {
    let date = ts.date_naive();
    let offset = u64::from(date.weekday().num_days_from_monday());
    let monday = date.checked_sub_days(Days::new(offset)).unwrap_or(date);
    start_of_day_utc(monday)
}

/// Current time formatted as RFC 3339 with a `Z` suffix
pub fn now_utc_iso() -> String {
    Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}
