//! Writers for parsed transactions.

use crate::error::{Error, Result};
use crate::types::TransactionRecord;
use csv::Writer;
use serde::Serialize;
use std::io::Write;
use std::str::FromStr;

/// Output encodings for parsed records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty-printed JSON array.
    Json,
    /// CSV with a `date,description,amount,direction` header.
    Csv,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(Error::InvalidFormat(s.to_string())),
        }
    }
}

/// Flat CSV row; amounts keep their exact decimal text.
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    date: &'a str,
    description: &'a str,
    amount: String,
    direction: &'static str,
}

/// Write records in the requested format.
pub fn write_records<W: Write>(writer: &mut W, records: &[TransactionRecord], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => write_json(writer, records),
        OutputFormat::Csv => write_csv(writer, records),
    }
}

/// Write records as a pretty JSON array followed by a newline.
pub fn write_json<W: Write>(writer: &mut W, records: &[TransactionRecord]) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, records)?;
    writeln!(writer)?;
    Ok(())
}

/// Write records as CSV.
pub fn write_csv<W: Write>(writer: &mut W, records: &[TransactionRecord]) -> Result<()> {
    let mut csv_writer = Writer::from_writer(writer);

    for record in records {
        csv_writer.serialize(CsvRow {
            date: &record.date,
            description: &record.description,
            amount: record.amount.to_string(),
            direction: record.direction.as_str(),
        })?;
    }

    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    fn sample() -> Vec<TransactionRecord> {
        vec![
            TransactionRecord::from_signed("2024-01-15".into(), "Padaria, Silva".into(), Decimal::new(-4590, 2)),
            TransactionRecord::from_signed("2024-02-10".into(), "Salario".into(), Decimal::new(500000, 2)),
        ]
    }

    #[test]
    fn test_write_csv() {
        let mut out = Vec::new();
        write_csv(&mut out, &sample()).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "date,description,amount,direction\n\
             2024-01-15,\"Padaria, Silva\",45.90,debit\n\
             2024-02-10,Salario,5000.00,credit\n"
        );
    }

    #[test]
    fn test_write_json_shape() {
        let mut out = Vec::new();
        write_json(&mut out, &sample()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["date"], "2024-01-15");
        assert_eq!(value[0]["amount"], 45.9);
        assert_eq!(value[0]["direction"], "debit");
        assert_eq!(value[1]["direction"], "credit");
    }

    #[test]
    fn test_empty_records() {
        let mut out = Vec::new();
        write_json(&mut out, &[]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "[]\n");
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("csv".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert!("xml".parse::<OutputFormat>().is_err());
    }
}
