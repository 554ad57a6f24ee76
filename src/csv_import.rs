//! Importing a 2x2 contingency table from CSV text
//!
//! The format is two lines of two comma-separated counts:
//!
//! ```text
//! 30, 20
//! 15, 35
//! ```
//!
//! Tokens that are not numbers are dropped before a line is judged, and lines that do not end
//! up with exactly two numbers are ignored. What remains must be exactly two rows of
//! non-negative whole numbers, anything else is rejected as malformed.

use std::io::Read;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::error::{Error, Result};
use crate::stats::contingency::ContingencyTable;

const SHAPE: &str = "expected a CSV file with a 2x2 contingency table";

/// Parses a 2x2 contingency table from CSV text
///
/// # Example
///
/// ```
/// use statlab::csv_import::parse_contingency_csv;
///
/// let table = parse_contingency_csv("30,20\n15,35\n").unwrap();
///
/// assert_eq!(table.counts(), &[vec![30, 20], vec![15, 35]][..]);
/// assert!(parse_contingency_csv("30,20,10\n15,35,5\n").is_err());
/// ```
pub fn parse_contingency_csv(text: &str) -> Result<ContingencyTable> {
    read_contingency_csv(text.as_bytes())
}

/// Like [`parse_contingency_csv`], reading from any byte source
pub fn read_contingency_csv<R: Read>(source: R) -> Result<ContingencyTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(source);

    let mut rows = Vec::with_capacity(2);
    for record in reader.records() {
        let values = numbers(&record?);

        if values.len() == 2 {
            rows.push(values);
        } else {
            debug!("skipping CSV line with {} numeric values", values.len());
        }
    }

    if rows.len() != 2 {
        return Err(Error::MalformedInput(format!(
            "{}, found {} rows of two numbers",
            SHAPE,
            rows.len()
        )));
    }

    let counts = rows
        .iter()
        .map(|row| row.iter().map(|&value| count(value)).collect())
        .collect::<Result<Vec<Vec<u64>>>>()?;

    ContingencyTable::new(counts)
}

// The numeric fields of a line, in order
fn numbers(record: &StringRecord) -> Vec<f64> {
    record
        .iter()
        .filter_map(|field| field.parse::<f64>().ok())
        .filter(|value| !value.is_nan())
        .collect()
}

fn count(value: f64) -> Result<u64> {
    if value.is_finite() && value >= 0. && value.fract() == 0. && value < u64::MAX as f64 {
        Ok(value as u64)
    } else {
        Err(Error::MalformedInput(format!(
            "{}, {} is not a count",
            SHAPE, value
        )))
    }
}
