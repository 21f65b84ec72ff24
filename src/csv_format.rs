//! CSV bank statement parser.
//!
//! Handles the exports of Brazilian banks: Nubank (`Data,Descrição,Valor`),
//! Inter (`Data,Historico,Valor`) and a generic layout whose columns are
//! located by keyword. Values use Brazilian notation (`-1.234,56`).
//!
//! Like the OFX parser, rows without a usable date or description are
//! skipped; only a missing header or missing columns are reported as errors.

use crate::error::{Error, Result};
use crate::types::{parse_amount, TransactionRecord};
use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, StringRecord, Trim};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static DD_MM_YYYY_SLASH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{2})/([0-9]{2})/([0-9]{4})").expect("valid date pattern"));
static YYYY_MM_DD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{4})-([0-9]{2})-([0-9]{2})").expect("valid date pattern"));
static DD_MM_YYYY_DASH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{2})-([0-9]{2})-([0-9]{4})").expect("valid date pattern"));

/// Known CSV export layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvLayout {
    /// Nubank account export.
    Nubank,
    /// Banco Inter account export.
    Inter,
    /// Anything else; columns found by keyword.
    Generic,
}

impl CsvLayout {
    /// Pick the layout from the lowercased header line.
    pub fn detect(header: &str) -> Self {
        let has = |needle: &str| header.contains(needle);

        if has("data") && has("descrição") && has("valor") {
            CsvLayout::Nubank
        } else if has("data") && has("historico") && has("valor") {
            CsvLayout::Inter
        } else {
            CsvLayout::Generic
        }
    }

    fn date_keywords(&self) -> &'static [&'static str] {
        match self {
            CsvLayout::Nubank | CsvLayout::Inter => &["data"],
            CsvLayout::Generic => &["data", "date", "dt"],
        }
    }

    fn description_keywords(&self) -> &'static [&'static str] {
        match self {
            CsvLayout::Nubank => &["descrição", "descricao"],
            CsvLayout::Inter => &["historico", "histórico"],
            CsvLayout::Generic => &["desc", "historico", "histórico", "descrição", "descricao", "memo"],
        }
    }

    fn value_keywords(&self) -> &'static [&'static str] {
        match self {
            CsvLayout::Nubank | CsvLayout::Inter => &["valor"],
            CsvLayout::Generic => &["valor", "value", "amount", "vlr", "saldo"],
        }
    }
}

/// Column positions of the fields a transaction is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Columns {
    date: usize,
    description: usize,
    value: usize,
}

impl Columns {
    fn locate(layout: CsvLayout, header: &[String]) -> Result<Self> {
        let find = |keywords: &[&str]| {
            header
                .iter()
                .position(|col| keywords.iter().any(|keyword| col.contains(keyword)))
        };

        let date = find(layout.date_keywords());
        let description = find(layout.description_keywords());
        let value = find(layout.value_keywords());

        match (date, description, value) {
            (Some(date), Some(description), Some(value)) => Ok(Columns {
                date,
                description,
                value,
            }),
            _ => {
                let missing: Vec<&str> = [("date", date), ("description", description), ("value", value)]
                    .iter()
                    .filter(|(_, index)| index.is_none())
                    .map(|(name, _)| *name)
                    .collect();
                Err(Error::MissingColumns(missing.join(", ")))
            }
        }
    }

    fn min_len(&self) -> usize {
        self.date.max(self.description).max(self.value) + 1
    }
}

/// Parse a CSV bank statement.
///
/// # Examples
///
/// ```
/// use statement_import::csv_format;
///
/// let content = "Data,Descrição,Valor\n15/01/2024,Padaria,\"-45,90\"\n";
/// let records = csv_format::parse(content)?;
/// assert_eq!(records[0].date, "2024-01-15");
/// # Ok::<(), statement_import::Error>(())
/// ```
pub fn parse(content: &str) -> Result<Vec<TransactionRecord>> {
    if content.lines().filter(|line| !line.trim().is_empty()).count() < 2 {
        return Err(Error::EmptyStatement);
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(content.as_bytes());

    let header: Vec<String> = reader
        .headers()?
        .iter()
        .map(|col| col.replace('"', "").trim().to_lowercase())
        .collect();
    let layout = CsvLayout::detect(&header.join(","));
    let columns = Columns::locate(layout, &header)?;
    debug!(?layout, ?columns, "detected CSV layout");

    let mut records = Vec::new();
    let mut rows = 0usize;

    for row in reader.records() {
        let row = row?;
        rows += 1;

        match parse_row(&row, columns) {
            Some(record) => records.push(record),
            None => debug!(row = rows, "skipping CSV row without usable date or description"),
        }
    }

    debug!(rows, parsed = records.len(), "parsed CSV statement");
    Ok(records)
}

fn parse_row(row: &StringRecord, columns: Columns) -> Option<TransactionRecord> {
    if row.len() < columns.min_len() {
        return None;
    }

    let field = |index: usize| row.get(index).unwrap_or("").replace('"', "").trim().to_string();

    let date_str = field(columns.date);
    let description = field(columns.description);
    if date_str.is_empty() || description.is_empty() {
        return None;
    }

    let date = parse_date(&date_str)?;
    let amount = parse_amount(&normalize_value(&field(columns.value)));

    Some(TransactionRecord::from_signed(date, description, amount))
}

/// Turn Brazilian notation (`-1.234,56`) into a plain decimal literal.
///
/// Values without a comma are left alone.
fn normalize_value(value: &str) -> String {
    if value.contains(',') {
        value.replace('.', "").replace(',', ".")
    } else {
        value.to_string()
    }
}

/// Normalize the date formats seen in bank exports to `YYYY-MM-DD`.
fn parse_date(date_str: &str) -> Option<String> {
    if let Some(caps) = DD_MM_YYYY_SLASH.captures(date_str) {
        return Some(format!("{}-{}-{}", &caps[3], &caps[2], &caps[1]));
    }

    if let Some(m) = YYYY_MM_DD.find(date_str) {
        return Some(m.as_str().to_string());
    }

    if let Some(caps) = DD_MM_YYYY_DASH.captures(date_str) {
        return Some(format!("{}-{}-{}", &caps[3], &caps[2], &caps[1]));
    }

    DateTime::parse_from_rfc3339(date_str)
        .or_else(|_| DateTime::parse_from_rfc2822(date_str))
        .ok()
        .map(|dt| dt.with_timezone(&Utc).date_naive().format("%Y-%m-%d").to_string())
}
