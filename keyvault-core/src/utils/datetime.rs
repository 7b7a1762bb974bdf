//! Datetime formatting and serde helpers.
//!
//! Timestamps are stored as fixed-width UTC RFC 3339 strings with microsecond
//! precision (`2025-01-01T12:00:00.123456Z`), so text ordering in SQL matches
//! chronological ordering.
//!
//! Deserialization is lenient:
//! - any RFC 3339 string (any offset, any fraction width)
//! - Unix timestamp in seconds or milliseconds

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// Current time truncated to the precision we persist.
///
/// Truncating up front keeps the value handed back to callers identical to what
/// a later read returns.
#[must_use]
pub fn now() -> DateTime<Utc> {
    let now = Utc::now();
    parse(&format(&now)).unwrap_or(now)
}

/// Formats a timestamp in the persisted layout.
#[must_use]
pub fn format(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parses an RFC 3339 timestamp into UTC.
pub fn parse(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc))
}

/// Serializes `DateTime<Utc>` in the persisted layout.
pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format(dt))
}

/// Deserializes `DateTime<Utc>` from RFC 3339 or Unix timestamp.
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TimestampOrString {
        String(String),
        I64(i64),
    }

    match TimestampOrString::deserialize(deserializer)? {
        TimestampOrString::String(s) => {
            parse(&s).map_err(|e| Error::custom(format!("Invalid RFC3339 timestamp: {e}")))
        }
        TimestampOrString::I64(ts) => {
            parse_unix_timestamp(ts).ok_or_else(|| Error::custom("Invalid Unix timestamp"))
        }
    }
}

/// Parses a Unix timestamp with second/millisecond auto-detection.
fn parse_unix_timestamp(ts: i64) -> Option<DateTime<Utc>> {
    // Values larger than 10^11 are interpreted as milliseconds.
    if ts > 100_000_000_000 {
        DateTime::from_timestamp_millis(ts)
    } else {
        DateTime::from_timestamp(ts, 0)
    }
}
