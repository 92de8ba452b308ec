//! Naive-UTC timestamp formatting and lenient parsing.
//!
//! Log entries carry ISO-8601 timestamps without an offset, exactly as the
//! historical log files were written (`2024-03-01T09:15:00.123456`). Readers
//! must also accept entries written by other tooling that appended a `Z` or
//! a numeric offset, so parsing strips any trailing zone designator and
//! compares everything as naive UTC.

use chrono::{NaiveDate, NaiveDateTime, Utc};

/// Timestamp format written to the conversation log.
///
/// Microsecond precision keeps new entries lexicographically sortable against
/// entries written by the previous generation of the system.
const WRITE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Current time as naive UTC.
pub fn now_naive_utc() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// Current UTC calendar day.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Format a naive-UTC timestamp in the log's write format.
pub fn format_timestamp(dt: NaiveDateTime) -> String {
    dt.format(WRITE_FORMAT).to_string()
}

/// Current time formatted for a log entry.
pub fn utc_timestamp() -> String {
    format_timestamp(now_naive_utc())
}

/// Parse an ISO-8601 timestamp into naive UTC, ignoring any zone designator.
///
/// Accepts `2024-03-01T09:15:00`, with or without fractional seconds, and
/// with a trailing `Z` or `+HH:MM`/`-HH:MM` offset (stripped, not applied —
/// timestamps are compared naively). Returns `None` for anything else.
pub fn parse_naive_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = strip_zone(raw.trim());
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

/// Strip a trailing `Z` or `±HH:MM`/`±HHMM` offset from a timestamp string.
fn strip_zone(s: &str) -> &str {
    if let Some(stripped) = s.strip_suffix('Z') {
        return stripped;
    }
    // An offset sign can only appear after the time separator; a '-' before
    // it belongs to the date.
    if let Some(t_pos) = s.find('T')
        && let Some(sign_pos) = s[t_pos..].rfind(['+', '-']).map(|i| i + t_pos)
        && sign_pos > t_pos
    {
        return &s[..sign_pos];
    }
    s
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
