//! Common types shared by the statement parsers.

use crate::error::Error;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A normalized statement line, independent of the source format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Posting date as `YYYY-MM-DD`.
    ///
    /// Kept as text: OFX stamps are sliced into place without calendar
    /// validation, so `2024-13-40` is a legal value here.
    pub date: String,

    /// Trimmed, non-empty label of the transaction.
    pub description: String,

    /// Magnitude of money moved, always `>= 0`.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,

    /// Whether money came in or went out.
    pub direction: Direction,
}

impl TransactionRecord {
    /// Build a record from a signed source amount.
    pub fn from_signed(date: String, description: String, signed_amount: Decimal) -> Self {
        let (amount, direction) = Direction::split(signed_amount);
        Self {
            date,
            description,
            amount,
            direction,
        }
    }

    /// Amount with the sign restored (`-` for debits).
    pub fn signed_amount(&self) -> Decimal {
        match self.direction {
            Direction::Credit => self.amount,
            Direction::Debit => -self.amount,
        }
    }
}

/// Direction of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Incoming money ("Entrada").
    Credit,
    /// Outgoing money ("Saída").
    Debit,
}

impl Direction {
    /// Split a signed amount into its magnitude and direction.
    ///
    /// Zero (including `-0`) counts as a credit.
    pub fn split(signed_amount: Decimal) -> (Decimal, Direction) {
        if signed_amount < Decimal::ZERO {
            (signed_amount.abs(), Direction::Debit)
        } else {
            (signed_amount.abs(), Direction::Credit)
        }
    }

    /// Ledger label used by the finance dashboards.
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Credit => "Entrada",
            Direction::Debit => "Saída",
        }
    }

    /// Lowercase name used in JSON and CSV output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Credit => "credit",
            Direction::Debit => "debit",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "credit" | "c" | "entrada" => Ok(Direction::Credit),
            "debit" | "d" | "saida" | "saída" => Ok(Direction::Debit),
            _ => Err(format!("Invalid direction: {}", s)),
        }
    }
}

/// Totals over a set of parsed records.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Summary {
    /// Number of records summed.
    pub count: usize,
    /// Sum of credit amounts.
    pub total_credit: Decimal,
    /// Sum of debit amounts.
    pub total_debit: Decimal,
    /// Credits minus debits.
    pub net: Decimal,
}

impl Summary {
    /// Sum the records by direction.
    ///
    /// Fails with [`Error::TotalOverflow`] when a total leaves the `Decimal`
    /// range, even though every single amount fits.
    pub fn from_records(records: &[TransactionRecord]) -> crate::Result<Self> {
        let mut summary = Summary::default();
        for record in records {
            summary.count += 1;
            let total = match record.direction {
                Direction::Credit => &mut summary.total_credit,
                Direction::Debit => &mut summary.total_debit,
            };
            *total = total
                .checked_add(record.amount)
                .ok_or(Error::TotalOverflow(record.direction))?;
        }
        summary.net = summary
            .total_credit
            .checked_sub(summary.total_debit)
            .ok_or(Error::TotalOverflow(Direction::Credit))?;
        Ok(summary)
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Transactions: {}", self.count)?;
        writeln!(f, "  {:<8} {}", Direction::Credit.label(), self.total_credit)?;
        writeln!(f, "  {:<8} {}", Direction::Debit.label(), self.total_debit)?;
        write!(f, "  {:<8} {}", "Net", self.net)
    }
}

// Longest numeric-literal prefix, e.g. "-45.90" out of "-45.90 BRL".
static NUMBER_PREFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?").expect("valid number pattern")
});

/// Lenient numeric parse shared by the statement parsers.
///
/// Uses the leading numeric literal of `raw` and falls back to zero when there
/// is none or it does not fit a `Decimal`.
pub fn parse_amount(raw: &str) -> Decimal {
    let Some(literal) = NUMBER_PREFIX_RE.find(raw.trim()) else {
        return Decimal::ZERO;
    };

    let literal = literal.as_str().to_lowercase();
    let (sign, digits) = match literal.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", literal.strip_prefix('+').unwrap_or(&literal)),
    };
    // Decimal wants digits on both sides of the point: ".5" -> "0.5", "12." -> "12"
    let (mantissa, exponent) = digits.split_once('e').unwrap_or((digits, ""));
    let mantissa = mantissa.strip_suffix('.').unwrap_or(mantissa);
    let normalized = if mantissa.starts_with('.') {
        format!("{}0{}", sign, mantissa)
    } else {
        format!("{}{}", sign, mantissa)
    };

    let parsed = if exponent.is_empty() {
        Decimal::from_str(&normalized)
    } else {
        Decimal::from_scientific(&format!("{}e{}", normalized, exponent))
    };

    parsed.unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_split_sign() {
        assert_eq!(Direction::split(dec("-45.90")), (dec("45.90"), Direction::Debit));
        assert_eq!(Direction::split(dec("5000.00")), (dec("5000.00"), Direction::Credit));
        assert_eq!(Direction::split(Decimal::ZERO), (Decimal::ZERO, Direction::Credit));
    }

    #[test]
    fn test_negative_zero_is_credit() {
        let (amount, direction) = Direction::split(dec("-0.00"));
        assert_eq!(direction, Direction::Credit);
        assert!(amount >= Decimal::ZERO);
    }

    #[test]
    fn test_direction_labels_and_parse() {
        assert_eq!(Direction::Credit.label(), "Entrada");
        assert_eq!(Direction::Debit.label(), "Saída");
        assert_eq!("Saída".parse::<Direction>().unwrap(), Direction::Debit);
        assert_eq!("CREDIT".parse::<Direction>().unwrap(), Direction::Credit);
        assert!("sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn test_signed_amount_restores_sign() {
        let record = TransactionRecord::from_signed("2024-01-15".into(), "Padaria".into(), dec("-10.5"));
        assert_eq!(record.amount, dec("10.5"));
        assert_eq!(record.signed_amount(), dec("-10.5"));
    }

    #[test]
    fn test_summary() {
        let records = vec![
            TransactionRecord::from_signed("2024-01-01".into(), "a".into(), dec("100")),
            TransactionRecord::from_signed("2024-01-02".into(), "b".into(), dec("-30.25")),
            TransactionRecord::from_signed("2024-01-03".into(), "c".into(), dec("-19.75")),
        ];
        let summary = Summary::from_records(&records).unwrap();
        assert_eq!(summary.count, 3);
        assert_eq!(summary.total_credit, dec("100"));
        assert_eq!(summary.total_debit, dec("50.00"));
        assert_eq!(summary.net, dec("50.00"));
    }

    #[test]
    fn test_summary_overflow_is_an_error() {
        let huge = dec("70000000000000000000000000000");
        let credits = vec![
            TransactionRecord::from_signed("2024-01-01".into(), "a".into(), huge),
            TransactionRecord::from_signed("2024-01-02".into(), "b".into(), huge),
        ];
        assert!(matches!(
            Summary::from_records(&credits),
            Err(Error::TotalOverflow(Direction::Credit))
        ));

        let debits: Vec<_> = credits
            .iter()
            .map(|r| TransactionRecord::from_signed(r.date.clone(), r.description.clone(), -r.amount))
            .collect();
        assert!(matches!(
            Summary::from_records(&debits),
            Err(Error::TotalOverflow(Direction::Debit))
        ));

        let mixed = vec![credits[0].clone(), debits[0].clone()];
        assert_eq!(Summary::from_records(&mixed).unwrap().net, Decimal::ZERO);
    }

    #[test]
    fn test_parse_amount_lenient() {
        assert_eq!(parse_amount("-45.90"), dec("-45.90"));
        assert_eq!(parse_amount("+12"), dec("12"));
        assert_eq!(parse_amount(".5"), dec("0.5"));
        assert_eq!(parse_amount("-1.5e2"), dec("-150"));
        assert_eq!(parse_amount("12.00 BRL"), dec("12.00"));
        assert_eq!(parse_amount("12."), dec("12"));
        assert_eq!(parse_amount("N/D"), Decimal::ZERO);
        assert_eq!(parse_amount(""), Decimal::ZERO);
        assert_eq!(parse_amount("٤٥.٩٠"), Decimal::ZERO);
    }
}
