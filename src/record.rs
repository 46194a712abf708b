//! Structured log records parsed from tab-delimited lines.
//!
//! A line looks like
//! `2024-01-01T10:00:00.123Z<TAB>session<TAB>INFO<TAB>message`. Every
//! segment is optional: absent segments become `None`, and anything past
//! the fourth segment is dropped.

use crate::error::{AnalyzerError, Result, TimestampError};
use chrono::{DateTime, Timelike, Utc};
use log::debug;
use regex::Regex;
use std::sync::OnceLock;

fn timestamp_re() -> &'static Regex {
    static TIMESTAMP_RE: OnceLock<Regex> = OnceLock::new();
    TIMESTAMP_RE.get_or_init(|| {
        Regex::new(r"^([0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}\.[0-9]+Z)")
            .expect("valid timestamp regex")
    })
}

/// The four raw segments of a log line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogLine {
    pub timestamp: Option<String>,
    pub session_id: Option<String>,
    pub message_type: Option<String>,
    pub message: Option<String>,
}

/// Splits one line into its segments.
///
/// Returns `None` for empty or whitespace-only lines. Never fails otherwise:
/// a line without a leading timestamp still yields a line with
/// `timestamp == None`.
pub fn parse_line(raw: &str) -> Option<LogLine> {
    let line = raw.trim();
    if line.is_empty() {
        return None;
    }

    let segments: Vec<&str> = line.split('\t').collect();
    let segment = |idx: usize| segments.get(idx).map(|s| s.to_string());

    Some(LogLine {
        timestamp: timestamp_re()
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string()),
        session_id: segment(1),
        message_type: segment(2),
        message: segment(3),
    })
}

/// A parsed log line with its timestamp converted to a comparable value.
///
/// `datetime` is `Some` exactly when `timestamp` is `Some`.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub timestamp: Option<String>,
    pub session_id: Option<String>,
    pub message_type: Option<String>,
    pub message: Option<String>,
    pub datetime: Option<DateTime<Utc>>,
}

impl LogRecord {
    /// Converts a parsed line, resolving its timestamp.
    ///
    /// `position` is the 1-based index of the record in its batch and is only
    /// used for diagnostics.
    pub fn from_line(line: LogLine, position: usize) -> Result<Self> {
        let datetime = match line.timestamp.as_deref() {
            Some(ts) => Some(parse_timestamp(ts).map_err(|source| {
                AnalyzerError::InvalidTimestamp {
                    line: position,
                    value: ts.to_string(),
                    source,
                }
            })?),
            None => None,
        };

        Ok(LogRecord {
            timestamp: line.timestamp,
            session_id: line.session_id,
            message_type: line.message_type,
            message: line.message,
            datetime,
        })
    }
}

/// Strict ISO-8601 conversion of an anchored timestamp.
///
/// Leap seconds (`:60`) are rejected.
pub fn parse_timestamp(ts: &str) -> std::result::Result<DateTime<Utc>, TimestampError> {
    let dt = DateTime::parse_from_rfc3339(ts)?.with_timezone(&Utc);
    // chrono encodes second 60 as a nanosecond overflow of second 59
    if dt.nanosecond() >= 1_000_000_000 {
        return Err(TimestampError::LeapSecond);
    }
    Ok(dt)
}

/// Parses a batch of lines into records.
///
/// Empty lines are skipped. A timestamp that matched the anchor pattern but
/// does not convert halts the whole batch.
pub fn parse_records<I, S>(lines: I) -> Result<Vec<LogRecord>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let parsed: Vec<LogLine> = lines
        .into_iter()
        .filter_map(|line| parse_line(line.as_ref()))
        .collect();

    let records = parsed
        .into_iter()
        .enumerate()
        .map(|(idx, line)| LogRecord::from_line(line, idx + 1))
        .collect::<Result<Vec<_>>>()?;

    let undated = records.iter().filter(|r| r.datetime.is_none()).count();
    if undated > 0 {
        debug!("{} records have no timestamp", undated);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_parse_full_line() {
        let line = parse_line("2024-01-01T10:00:00.123Z\tsess-1\tINFO\tProcessing message").unwrap();
        assert_eq!(line.timestamp.as_deref(), Some("2024-01-01T10:00:00.123Z"));
        assert_eq!(line.session_id.as_deref(), Some("sess-1"));
        assert_eq!(line.message_type.as_deref(), Some("INFO"));
        assert_eq!(line.message.as_deref(), Some("Processing message"));
    }

    #[test]
    fn test_missing_segments_degrade_to_none() {
        let line = parse_line("2024-01-01T10:00:00.5Z\tsess-1").unwrap();
        assert_eq!(line.session_id.as_deref(), Some("sess-1"));
        assert_eq!(line.message_type, None);
        assert_eq!(line.message, None);
    }

    #[test]
    fn test_extra_segments_are_dropped() {
        let line = parse_line("2024-01-01T10:00:00.5Z\ts\tINFO\tmsg\ttrailing\tmore").unwrap();
        assert_eq!(line.message.as_deref(), Some("msg"));
    }

    #[test]
    fn test_timestamp_must_be_anchored_at_start() {
        let line = parse_line("prefix 2024-01-01T10:00:00.5Z\ts\tINFO\tmsg").unwrap();
        assert_eq!(line.timestamp, None);
        assert_eq!(line.session_id.as_deref(), Some("s"));
    }

    #[test]
    fn test_timestamp_requires_fraction_and_zulu() {
        assert_eq!(parse_line("2024-01-01T10:00:00Z\ts").unwrap().timestamp, None);
        assert_eq!(parse_line("2024-01-01T10:00:00.1+01:00\ts").unwrap().timestamp, None);
    }

    #[test]
    fn test_empty_line_yields_nothing() {
        assert!(parse_line("").is_none());
        assert!(parse_line("   \t  ").is_none());
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        let line = parse_line("  2024-01-01T10:00:00.5Z\ts\tINFO\tmsg \n").unwrap();
        assert_eq!(line.timestamp.as_deref(), Some("2024-01-01T10:00:00.5Z"));
        assert_eq!(line.message.as_deref(), Some("msg"));
    }

    #[test]
    fn test_parse_records_converts_datetime() {
        let records = parse_records(["2024-03-05T07:08:09.250Z\ts\tINFO\tm"]).unwrap();
        let dt = records[0].datetime.unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2024, 3, 5));
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (7, 8, 9));
        assert_eq!(dt.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn test_record_without_timestamp_is_retained() {
        let records = parse_records(["no timestamp\ts\tINFO\tm", ""]).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].timestamp, None);
        assert_eq!(records[0].datetime, None);
    }

    #[test]
    fn test_leap_second_is_rejected() {
        assert_eq!(
            parse_timestamp("2016-12-31T23:59:60.5Z"),
            Err(TimestampError::LeapSecond)
        );
        assert!(parse_timestamp("2016-12-31T23:59:59.999Z").is_ok());

        let err = parse_records(["2016-12-31T23:59:60.5Z\ts\tINFO\tm"]).unwrap_err();
        assert!(matches!(
            err,
            AnalyzerError::InvalidTimestamp {
                source: TimestampError::LeapSecond,
                ..
            }
        ));
    }

    #[test]
    fn test_unconvertible_timestamp_is_fatal() {
        let err = parse_records([
            "2024-01-01T10:00:00.5Z\ts\tINFO\tok",
            "2024-02-30T10:00:00.5Z\ts\tINFO\tbad day",
        ])
        .unwrap_err();

        match err {
            AnalyzerError::InvalidTimestamp { line, value, .. } => {
                assert_eq!(line, 2);
                assert_eq!(value, "2024-02-30T10:00:00.5Z");
            }
            other => panic!("Expected InvalidTimestamp, got {:?}", other),
        }
    }
}
