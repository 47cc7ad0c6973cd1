//! DateTime parsing utilities with consistent error handling.

use chrono::{DateTime, SecondsFormat, Utc};

/// Parses an RFC3339 timestamp string, returning an error if parsing fails.
///
/// # Examples
///
/// ```
/// use sheetkeep_domain::common::parse_datetime;
/// use chrono::Datelike;
///
/// let dt = parse_datetime("2026-01-17T10:30:00Z").unwrap();
/// assert_eq!(dt.year(), 2026);
/// ```
///
/// # Errors
///
/// Returns `chrono::ParseError` if the string is not valid RFC3339.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc))
}

/// Parses an optional `updated_at` column value.
///
/// Hosted rows store timestamps as text; a missing or malformed value means
/// "never saved" rather than an error.
pub fn parse_updated_at(s: Option<&str>) -> Option<DateTime<Utc>> {
    s.and_then(|raw| parse_datetime(raw).ok())
}

/// Formats a timestamp the way rows store it (`2026-01-17T10:30:00.000Z`).
pub fn format_timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}
