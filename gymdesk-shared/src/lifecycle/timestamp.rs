/// Timestamp normalization for membership end dates
///
/// An incoming `membership_end` may be a native timestamp or an ISO-8601 string
/// (with an offset, without one, or a bare `YYYY-MM-DD` date). Everything is
/// resolved to a single `DateTime<Utc>` before any comparison, so offset-aware
/// and naive values can never be compared against each other.
///
/// Strings without an offset are read as UTC. Strings with an offset are
/// converted to UTC.
///
/// # Fallback
///
/// [`normalize_or_now`] treats an unparsable string as "now". This makes the
/// membership look like it ends at this instant, which classifies as Expired
/// and renews from today. The fallback is reported through
/// [`NormalizedTimestamp::fell_back`] and a warning log; callers that cannot
/// accept it should use [`parse_timestamp`] and handle the error.
///
/// # Example
///
/// ```
/// use chrono::Utc;
/// use gymdesk_shared::lifecycle::timestamp::{normalize_or_now, RawTimestamp};
///
/// let now = Utc::now();
/// let normalized = normalize_or_now(&RawTimestamp::Text("2025-06-01".into()), now);
/// assert!(!normalized.fell_back);
///
/// let garbage = normalize_or_now(&RawTimestamp::Text("next tuesday".into()), now);
/// assert!(garbage.fell_back);
/// assert_eq!(garbage.instant, now);
/// ```

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::LifecycleError;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// A membership end date as received, before normalization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    /// Native timestamp
    Instant(DateTime<Utc>),

    /// Textual timestamp, parsed on normalization
    Text(String),
}

impl From<DateTime<Utc>> for RawTimestamp {
    fn from(instant: DateTime<Utc>) -> Self {
        RawTimestamp::Instant(instant)
    }
}

/// Outcome of [`normalize_or_now`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedTimestamp {
    /// Resolved UTC instant
    pub instant: DateTime<Utc>,

    /// True when the input could not be parsed and `now` was substituted
    pub fell_back: bool,
}

/// Parses an ISO-8601 timestamp string into a UTC instant
///
/// # Errors
///
/// Returns `LifecycleError::UnparsableTimestamp` if no supported format matches.
pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>, LifecycleError> {
    let trimmed = input.trim();

    if let Ok(aware) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(aware.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }

    Err(LifecycleError::UnparsableTimestamp(input.to_string()))
}

/// Resolves a raw timestamp strictly
///
/// # Errors
///
/// Returns `LifecycleError::UnparsableTimestamp` for unparsable text.
pub fn normalize(raw: &RawTimestamp) -> Result<DateTime<Utc>, LifecycleError> {
    match raw {
        RawTimestamp::Instant(instant) => Ok(*instant),
        RawTimestamp::Text(text) => parse_timestamp(text),
    }
}

/// Resolves a raw timestamp, substituting `now` for unparsable text
pub fn normalize_or_now(raw: &RawTimestamp, now: DateTime<Utc>) -> NormalizedTimestamp {
    match normalize(raw) {
        Ok(instant) => NormalizedTimestamp {
            instant,
            fell_back: false,
        },
        Err(err) => {
            warn!(error = %err, "Treating unparsable membership end as now");
            NormalizedTimestamp {
                instant: now,
                fell_back: true,
            }
        }
    }
}
