//! Time helpers.
//!
//! Timestamps are `i64` milliseconds since the Unix epoch, UTC, throughout the crate.

use crate::error::{ParseError, Result};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

/// Current time in milliseconds since the Unix epoch.
#[inline]
pub fn milliseconds() -> i64 {
    Utc::now().timestamp_millis()
}

/// Current time in seconds since the Unix epoch.
#[inline]
pub fn seconds() -> i64 {
    Utc::now().timestamp()
}

/// Formats a millisecond timestamp as ISO 8601, e.g. `2024-01-01T12:00:00.000Z`.
///
/// ```rust
/// use bitex_core::time::iso8601;
///
/// assert_eq!(iso8601(1704110400000).unwrap(), "2024-01-01T12:00:00.000Z");
/// ```
pub fn iso8601(timestamp: i64) -> Result<String> {
    let dt = Utc
        .timestamp_millis_opt(timestamp)
        .single()
        .ok_or_else(|| ParseError::timestamp(format!("out of range: {timestamp}")))?;
    Ok(dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string())
}

/// Parses an ISO 8601 / RFC 3339 date string into milliseconds.
///
/// Accepts offsets (`+00:00`, `Z`) as well as naive strings, which are read as UTC.
///
/// ```rust
/// use bitex_core::time::parse_iso8601;
///
/// let a = parse_iso8601("2017-10-19T14:43:41.327Z").unwrap();
/// let b = parse_iso8601("2017-10-19 14:43:41.327").unwrap();
/// assert_eq!(a, b);
/// ```
pub fn parse_iso8601(datetime: &str) -> Result<i64> {
    if datetime.is_empty() {
        return Err(ParseError::timestamp("Empty datetime string").into());
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(datetime) {
        return Ok(dt.timestamp_millis());
    }

    let formats = [
        "%Y-%m-%dT%H:%M:%S%.f", // "2024-01-01T12:00:00.389"
        "%Y-%m-%d %H:%M:%S%.f", // "2024-01-01 12:00:43.928"
        "%Y-%m-%dT%H:%M:%S",    // "2024-01-01T12:00:00"
        "%Y-%m-%d %H:%M:%S",    // "2024-01-01 12:00:00"
    ];

    for format in &formats {
        if let Ok(naive) = NaiveDateTime::parse_from_str(datetime, format) {
            return Ok(Utc.from_utc_datetime(&naive).timestamp_millis());
        }
    }

    Err(ParseError::timestamp(format!("Unable to parse ISO 8601 datetime: {datetime}")).into())
}

/// Converts seconds to milliseconds.
#[inline]
pub fn seconds_to_ms(seconds: i64) -> i64 {
    seconds.saturating_mul(1000)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_is_recent() {
        assert!(milliseconds() > 1_600_000_000_000);
        assert!(seconds() > 1_600_000_000);
    }

    #[test]
    fn test_iso8601_round_trip() {
        let ts = 1_704_110_400_123;
        assert_eq!(parse_iso8601(&iso8601(ts).unwrap()).unwrap(), ts);
    }

    #[test]
    fn test_parse_iso8601_variants() {
        let expected = 1_508_424_221_327;
        assert_eq!(parse_iso8601("2017-10-19T14:43:41.327Z").unwrap(), expected);
        assert_eq!(parse_iso8601("2017-10-19T14:43:41.327+00:00").unwrap(), expected);
        assert_eq!(parse_iso8601("2017-10-19T14:43:41.327").unwrap(), expected);
        assert_eq!(parse_iso8601("2017-10-19T14:43:41").unwrap(), expected - 327);
    }

    #[test]
    fn test_parse_iso8601_rejects_garbage() {
        assert!(parse_iso8601("").is_err());
        assert!(parse_iso8601("yesterday").is_err());
    }

    #[test]
    fn test_seconds_to_ms() {
        assert_eq!(seconds_to_ms(1_704_110_400), 1_704_110_400_000);
    }
}
