use std::error::Error as StdError;
use std::fmt;

/// The ways an input can be too degenerate for a statistic to be defined
#[derive(Debug, Clone, PartialEq)]
pub enum Degenerate {
    /// A series has zero variance, so a denominator vanished
    ZeroVariance {
        /// Which series was constant
        what: &'static str,
    },
    /// Fewer observations than the statistic needs
    InsufficientData {
        /// Minimum number of observations
        needed: usize,
        /// Number of observations supplied
        got: usize,
    },
    /// Parallel series of different lengths
    LengthMismatch {
        /// Length of the first series
        left: usize,
        /// Length of the offending series
        right: usize,
    },
    /// The input contains a `NaN`
    NotANumber,
    /// A contingency cell whose expected frequency is zero
    ZeroExpected {
        /// Row of the cell
        row: usize,
        /// Column of the cell
        col: usize,
    },
    /// A contingency table with fewer than two rows or columns
    EmptyTable {
        /// Number of rows
        rows: usize,
        /// Number of columns
        cols: usize,
    },
    /// A contingency table whose rows have different widths
    Ragged {
        /// Index of the first row whose width differs from row 0
        row: usize,
    },
}

impl fmt::Display for Degenerate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Degenerate::ZeroVariance { what } => write!(f, "{} has zero variance", what),
            Degenerate::InsufficientData { needed, got } => write!(
                f,
                "at least {} observations are required, got {}",
                needed, got
            ),
            Degenerate::LengthMismatch { left, right } => {
                write!(f, "series lengths differ ({} vs {})", left, right)
            }
            Degenerate::NotANumber => f.write_str("input contains NaN"),
            Degenerate::ZeroExpected { row, col } => {
                write!(f, "expected frequency of cell ({}, {}) is zero", row, col)
            }
            Degenerate::EmptyTable { rows, cols } => write!(
                f,
                "a {}x{} table has no degrees of freedom; at least 2x2 is required",
                rows, cols
            ),
            Degenerate::Ragged { row } => {
                write!(f, "row {} has a different number of columns than row 0", row)
            }
        }
    }
}

/// Everything that can go wrong inside a single computation
#[derive(Debug)]
pub enum Error {
    /// The statistic is undefined for this input
    DegenerateInput(Degenerate),
    /// A value left the representable range even after clamping
    NumericOverflow {
        /// The quantity that overflowed
        what: &'static str,
    },
    /// User supplied data that does not have the expected shape
    MalformedInput(String),
    /// The CSV reader failed
    Csv(csv::Error),
}

impl From<Degenerate> for Error {
    fn from(other: Degenerate) -> Self {
        Error::DegenerateInput(other)
    }
}

impl From<csv::Error> for Error {
    fn from(other: csv::Error) -> Self {
        Error::Csv(other)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::DegenerateInput(inner) => write!(f, "Degenerate input: {}", inner),
            Error::NumericOverflow { what } => {
                write!(f, "Numeric overflow: {} is out of range", what)
            }
            Error::MalformedInput(msg) => write!(f, "Invalid data format: {}", msg),
            Error::Csv(inner) => write!(f, "CSV error: {}", inner),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Csv(err) => Some(err),
            Error::DegenerateInput(_) | Error::NumericOverflow { .. } | Error::MalformedInput(_) => {
                None
            }
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = ::std::result::Result<T, Error>;

/// Logs an error together with its chain of causes
pub fn log_error(e: &Error) {
    error!("error: {}", e);

    let mut cause = e.source();
    while let Some(inner) = cause {
        error!("caused by: {}", inner);
        cause = inner.source();
    }
}

/// Checks that a computed quantity is finite
pub(crate) fn finite(value: f64, what: &'static str) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::NumericOverflow { what })
    }
}
