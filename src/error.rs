//! Error types for the log analyzer.
//!
//! Field-level problems (missing segments, unmatched payload keys) never
//! surface here; they degrade to `None` inside the record types. Only
//! batch-level and I/O failures are modeled as errors.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for analyzer operations
pub type Result<T> = std::result::Result<T, AnalyzerError>;

/// Errors that can occur during an analysis run.
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// Failed to read input or write output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The input path does not exist
    #[error("Input not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    /// A timestamp matched the anchor pattern but is not a valid date-time.
    ///
    /// Fatal for the whole batch: chronological ordering depends on it.
    #[error("Invalid timestamp '{value}' in record {line}: {source}")]
    InvalidTimestamp {
        line: usize,
        value: String,
        #[source]
        source: TimestampError,
    },

    /// Missing log directory argument
    #[error("Missing log directory argument. Usage: txlog-analyzer <log-dir> [output-dir]")]
    MissingArgument,
}

/// Why an anchored timestamp could not be converted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimestampError {
    /// Not a valid ISO-8601 date-time (bad month, day, hour, ...)
    #[error(transparent)]
    Malformed(#[from] chrono::ParseError),

    /// Second 60 is not accepted
    #[error("leap seconds are not supported")]
    LeapSecond,
}

impl AnalyzerError {
    /// Returns `true` when the input source could not be found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, AnalyzerError::InputNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn bad_timestamp() -> AnalyzerError {
        let source = chrono::DateTime::parse_from_rfc3339("2024-13-01T00:00:00.0Z")
            .unwrap_err()
            .into();
        AnalyzerError::InvalidTimestamp {
            line: 7,
            value: "2024-13-01T00:00:00.0Z".to_string(),
            source,
        }
    }

    #[rstest]
    #[case::not_found(
        AnalyzerError::InputNotFound { path: PathBuf::from("logs/missing") },
        "Input not found: logs/missing"
    )]
    #[case::missing_argument(
        AnalyzerError::MissingArgument,
        "Missing log directory argument. Usage: txlog-analyzer <log-dir> [output-dir]"
    )]
    fn test_error_display(#[case] error: AnalyzerError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[test]
    fn test_invalid_timestamp_mentions_value_and_line() {
        let msg = bad_timestamp().to_string();
        assert!(msg.starts_with("Invalid timestamp '2024-13-01T00:00:00.0Z' in record 7"));
    }

    #[test]
    fn test_leap_second_display() {
        let err = AnalyzerError::InvalidTimestamp {
            line: 1,
            value: "2016-12-31T23:59:60.5Z".to_string(),
            source: TimestampError::LeapSecond,
        };
        assert_eq!(
            err.to_string(),
            "Invalid timestamp '2016-12-31T23:59:60.5Z' in record 1: leap seconds are not supported"
        );
    }

    #[test]
    fn test_not_found_is_distinguishable() {
        let missing = AnalyzerError::InputNotFound {
            path: PathBuf::from("x"),
        };
        let io: AnalyzerError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();

        assert!(missing.is_not_found());
        assert!(!io.is_not_found());
        assert!(!bad_timestamp().is_not_found());
    }
}
