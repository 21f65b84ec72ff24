//! Error types for the statement_import library.

use crate::types::Direction;
use std::io;
use thiserror::Error;

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while reading, parsing or exporting statements.
///
/// OFX parsing itself never fails; malformed blocks are dropped instead.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error occurred during read or write operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error reading or writing CSV.
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error writing JSON output.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Unknown format name, or content whose format cannot be detected.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// CSV statement without a header and at least one data line.
    #[error("CSV statement is empty or has no data rows")]
    EmptyStatement,

    /// CSV header lacks one of the columns needed to build a transaction.
    #[error("Could not detect required columns ({0}); expected date, description and value")]
    MissingColumns(String),

    /// A summary total does not fit in a `Decimal`.
    #[error("{0} total overflowed")]
    TotalOverflow(Direction),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_message() {
        let err = Error::MissingColumns("value".into());
        assert_eq!(
            err.to_string(),
            "Could not detect required columns (value); expected date, description and value"
        );
    }

    #[test]
    fn test_total_overflow_message() {
        assert_eq!(Error::TotalOverflow(Direction::Debit).to_string(), "debit total overflowed");
    }

    #[test]
    fn test_io_conversion() {
        let err: Error = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, Error::Io(_)));
    }
}
