//! Listing — one timestamped observation of a ticket offer.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single ticket offer observed at a point in time.
///
/// `section` and `row` are categorical labels. They stay strings even when
/// they look numeric ("112"), so exact-match filtering compares labels.
/// The same `id` appears on many rows, one per observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: Option<String>,
    pub section: String,
    pub row: String,
    pub price: f64,
    pub grade: f64,
    pub timestamp: NaiveDateTime,
}

impl Listing {
    /// Case-insensitive substring test against `id`.
    ///
    /// `needle_lower` must already be lowercased. A listing without an id
    /// never matches.
    pub fn id_contains_lowercase(&self, needle_lower: &str) -> bool {
        match &self.id {
            Some(id) => id.to_lowercase().contains(needle_lower),
            None => false,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("unrecognized timestamp '{0}'")]
pub struct TimestampError(pub String);

const NAIVE_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Parse an ISO-like timestamp.
///
/// Accepted forms, tried in order:
/// - RFC 3339 with offset (`2024-09-16T19:10:00-04:00`, `...Z`), normalized to UTC
/// - `YYYY-MM-DDTHH:MM:SS[.fff]` or with a space separator
/// - `YYYY-MM-DDTHH:MM`
/// - bare `YYYY-MM-DD`, read as midnight
///
/// Forms without an offset are taken to be UTC already, so a file mixing
/// offset and naive timestamps orders them on one UTC timeline.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, TimestampError> {
    let s = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_utc());
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| TimestampError(raw.to_string()))
}
