//! Statement Import Library
//!
//! Turns bank statement exports into a flat list of normalized transactions
//! ready to be filed into a budget tracker.
//!
//! # Supported Formats
//!
//! - **OFX**: Open Financial Exchange (SGML 1.x and XML 2.x dialects)
//! - **CSV**: Nubank, Inter and generic Brazilian bank exports
//!
//! Parsing is best effort: transactions missing a date or a description are
//! dropped, unreadable amounts become zero. Every record carries a
//! non-negative `amount` and a [`Direction`].
//!
//! # Examples
//!
//! ## Parsing an OFX file
//!
//! ```no_run
//! use statement_import::ofx_format;
//!
//! let content = std::fs::read_to_string("extrato.ofx")?;
//! if ofx_format::detect_format(&content) {
//!     for record in ofx_format::parse(&content) {
//!         println!("{} {} {} {}", record.date, record.direction.label(), record.amount, record.description);
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Detecting the format first
//!
//! ```no_run
//! use statement_import::{parse_statement, Format};
//!
//! let content = std::fs::read_to_string("extrato.csv")?;
//! let format = Format::detect(&content).unwrap_or(Format::Csv);
//! let records = parse_statement(&content, format)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod types;
pub mod ofx_format;
pub mod csv_format;
pub mod export;

use std::path::Path;
use std::str::FromStr;
use tracing::debug;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::{Direction, Summary, TransactionRecord};

/// Supported statement formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Open Financial Exchange
    Ofx,
    /// Bank CSV export
    Csv,
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "ofx" | "qfx" => Ok(Format::Ofx),
            "csv" => Ok(Format::Csv),
            _ => Err(Error::InvalidFormat(s.to_string())),
        }
    }
}

impl Format {
    /// Get file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Ofx => "ofx",
            Format::Csv => "csv",
        }
    }

    /// Guess the format from the content alone.
    ///
    /// OFX markers win; otherwise a first non-blank line with at least two
    /// comma separated columns is taken as CSV.
    pub fn detect(content: &str) -> Option<Self> {
        if ofx_format::detect_format(content) {
            return Some(Format::Ofx);
        }

        let header = content.lines().find(|line| !line.trim().is_empty())?;
        if header.contains(',') {
            Some(Format::Csv)
        } else {
            None
        }
    }

    /// Settle the format of an import.
    ///
    /// An explicit `requested` name wins unless it is `auto`; then the content
    /// is sniffed with [`Format::detect`], then the extension of `path` is
    /// tried. Anything else is [`Error::InvalidFormat`].
    pub fn resolve(requested: &str, path: Option<&str>, content: &str) -> Result<Self> {
        if !requested.eq_ignore_ascii_case("auto") {
            return requested.parse();
        }

        if let Some(format) = Format::detect(content) {
            debug!(?format, "format detected from content");
            return Ok(format);
        }

        path.and_then(|path| Path::new(path).extension())
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse::<Format>().ok())
            .ok_or_else(|| Error::InvalidFormat("could not detect statement format; pass --format".to_string()))
    }
}

/// Parse statement content in the given format.
///
/// OFX parsing never fails; CSV parsing fails on a missing header or
/// undetectable columns.
pub fn parse_statement(content: &str, format: Format) -> Result<Vec<TransactionRecord>> {
    match format {
        Format::Ofx => Ok(ofx_format::parse(content)),
        Format::Csv => csv_format::parse(content),
    }
}
