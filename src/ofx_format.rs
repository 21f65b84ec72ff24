//! OFX (Open Financial Exchange) statement parser.
//!
//! OFX 1.x is SGML, not XML: leaf tags such as `<MEMO>` are usually left
//! unclosed and banks disagree on which fields they fill in. The parser
//! therefore scans the text with patterns instead of building a tree, and
//! degrades per transaction block:
//!
//! ```text
//! <STMTTRN>
//!   <DTPOSTED>20240115093000
//!   <MEMO>Padaria Silva
//!   <TRNAMT>-45.90
//! </STMTTRN>
//! ```
//!
//! Only the outer `<STMTTRN>...</STMTTRN>` pair has to be closed.
//!
//! # Examples
//!
//! ```
//! use statement_import::ofx_format;
//!
//! let content = "<OFX><STMTTRN><DTPOSTED>20240115<MEMO>Padaria<TRNAMT>-4.50</STMTTRN></OFX>";
//! assert!(ofx_format::detect_format(content));
//!
//! let records = ofx_format::parse(content);
//! assert_eq!(records[0].date, "2024-01-15");
//! ```

use crate::types::{parse_amount, TransactionRecord};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use tracing::debug;

/// Markers whose presence anywhere in the text identifies an OFX document.
const OFX_MARKERS: [&str; 3] = ["<OFX>", "<?OFX", "<STMTTRN>"];

static BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<STMTTRN>(.*?)</STMTTRN>").expect("valid block pattern"));
static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<DTPOSTED>([0-9]{8})(?:[0-9]{6})?").expect("valid date pattern"));
static MEMO_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<MEMO>([^<]+)").expect("valid memo pattern"));
static NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<NAME>([^<]+)").expect("valid name pattern"));
static AMOUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<TRNAMT>([^<]+)").expect("valid amount pattern"));

/// Cheap sniff for OFX content.
///
/// True when the text contains `<OFX>`, `<?OFX` or `<STMTTRN>`. No validation
/// beyond that is performed.
pub fn detect_format(content: &str) -> bool {
    OFX_MARKERS.iter().any(|marker| content.contains(marker))
}

/// Extract the transactions of an OFX document, in source order.
///
/// Blocks without a posting date or a description are skipped. A missing or
/// non-numeric `<TRNAMT>` counts as zero. This function never fails; text
/// without any transaction block yields an empty vector.
pub fn parse(content: &str) -> Vec<TransactionRecord> {
    let mut records = Vec::new();
    let mut blocks = 0usize;

    for caps in BLOCK_RE.captures_iter(content) {
        blocks += 1;
        let block = caps.get(1).map_or("", |m| m.as_str());

        match parse_block(block) {
            Some(record) => records.push(record),
            None => debug!(block = blocks, "skipping OFX transaction without date or description"),
        }
    }

    debug!(blocks, parsed = records.len(), "parsed OFX statement");
    records
}

fn parse_block(block: &str) -> Option<TransactionRecord> {
    let date = extract_date(block);
    let description = extract_description(block);

    if date.is_empty() || description.is_empty() {
        return None;
    }

    Some(TransactionRecord::from_signed(date, description, extract_amount(block)))
}

/// `YYYYMMDD[HHMMSS]` to `YYYY-MM-DD` by position; the time part is ignored.
fn extract_date(block: &str) -> String {
    DATE_RE
        .captures(block)
        .and_then(|caps| caps.get(1))
        .map(|stamp| {
            let stamp = stamp.as_str();
            format!("{}-{}-{}", &stamp[0..4], &stamp[4..6], &stamp[6..8])
        })
        .unwrap_or_default()
}

/// `<MEMO>` when it has visible text, otherwise `<NAME>`, otherwise empty.
fn extract_description(block: &str) -> String {
    first_value(&MEMO_RE, block)
        .filter(|memo| !memo.is_empty())
        .or_else(|| first_value(&NAME_RE, block))
        .unwrap_or_default()
        .to_string()
}

fn extract_amount(block: &str) -> Decimal {
    first_value(&AMOUNT_RE, block)
        .map(parse_amount)
        .unwrap_or(Decimal::ZERO)
}

fn first_value<'a>(re: &Regex, block: &'a str) -> Option<&'a str> {
    re.captures(block)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}
