//! Contingency tables and the chi-square test of independence

pub mod gamma;

use crate::error::{finite, Degenerate, Error, Result};
use crate::stats::rand_util::{new_rng, Rng};

/// Observed counts, indexed by `[row][column]`
///
/// Invariants:
///
/// - At least 2 rows and 2 columns
/// - Every row has the same number of columns
/// - The sum of all counts fits in a `u64`, so no total can overflow
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContingencyTable(Vec<Vec<u64>>);

impl ContingencyTable {
    /// Validates and wraps the counts
    pub fn new(rows: Vec<Vec<u64>>) -> Result<ContingencyTable> {
        let cols = rows.first().map_or(0, Vec::len);

        if let Some(row) = rows.iter().position(|r| r.len() != cols) {
            return Err(Degenerate::Ragged { row }.into());
        }
        if rows.len() < 2 || cols < 2 {
            return Err(Degenerate::EmptyTable {
                rows: rows.len(),
                cols,
            }
            .into());
        }

        let total = rows
            .iter()
            .flatten()
            .try_fold(0_u64, |acc, &n| acc.checked_add(n));
        if total.is_none() {
            return Err(Error::NumericOverflow {
                what: "grand total",
            });
        }

        Ok(ContingencyTable(rows))
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.0.len()
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.0[0].len()
    }

    /// The counts
    pub fn counts(&self) -> &[Vec<u64>] {
        &self.0
    }

    /// Count at `(row, col)`
    pub fn get(&self, row: usize, col: usize) -> Option<u64> {
        self.0.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Sum of each row
    pub fn row_totals(&self) -> Vec<u64> {
        self.0.iter().map(|row| row.iter().sum()).collect()
    }

    /// Sum of each column
    pub fn col_totals(&self) -> Vec<u64> {
        (0..self.cols())
            .map(|j| self.0.iter().map(|row| row[j]).sum())
            .collect()
    }

    /// Sum of every cell
    pub fn grand_total(&self) -> u64 {
        self.row_totals().iter().sum()
    }

    /// Degrees of freedom of the independence test, `(rows − 1)·(cols − 1)`
    pub fn degrees_of_freedom(&self) -> usize {
        (self.rows() - 1) * (self.cols() - 1)
    }

    /// Expected counts under independence, `rowTotal[i]·colTotal[j] / grandTotal`
    pub fn expected(&self) -> Vec<Vec<f64>> {
        let row_totals = self.row_totals();
        let col_totals = self.col_totals();
        let total = self.grand_total() as f64;

        row_totals
            .iter()
            .map(|&r| {
                col_totals
                    .iter()
                    .map(|&c| r as f64 * c as f64 / total)
                    .collect()
            })
            .collect()
    }
}

impl<'de> serde::Deserialize<'de> for ContingencyTable {
    fn deserialize<D>(deserializer: D) -> ::std::result::Result<ContingencyTable, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let rows = Vec::<Vec<u64>>::deserialize(deserializer)?;

        ContingencyTable::new(rows).map_err(serde::de::Error::custom)
    }
}

/// Outcome of the chi-square test of independence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChiSquareResult {
    /// `Σ (observed − expected)² / expected`
    pub chi_square: f64,
    /// `(rows − 1)·(cols − 1)`
    pub degrees_of_freedom: usize,
    /// Probability of a statistic at least this large under independence
    pub p_value: f64,
    /// Expected counts under independence
    pub expected: Vec<Vec<f64>>,
}

impl ChiSquareResult {
    /// `true` when independence is rejected at significance level `alpha`
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

/// Chi-square test of independence on `table`
///
/// Every row and column total must be positive, otherwise some expected count is zero and the
/// statistic is undefined. The p-value is `1 − P(dof / 2, χ² / 2)` with `P` the regularized
/// lower incomplete gamma function, evaluated directly in the upper tail.
pub fn chi_square_test(table: &ContingencyTable) -> Result<ChiSquareResult> {
    let expected = table.expected();

    let mut chi_square = 0.;
    for (i, (observed, expected)) in table.counts().iter().zip(&expected).enumerate() {
        for (j, (&o, &e)) in observed.iter().zip(expected).enumerate() {
            // NB also catches the NaNs of an all-zero table
            if !(e > 0.) {
                return Err(Degenerate::ZeroExpected { row: i, col: j }.into());
            }

            chi_square += (o as f64 - e).powi(2) / e;
        }
    }
    let chi_square = finite(chi_square, "chi-square")?;

    let degrees_of_freedom = table.degrees_of_freedom();
    let p_value = finite(
        gamma::chi_square_sf(chi_square, degrees_of_freedom),
        "p-value",
    )?;

    debug!(
        "chi-square test on a {}x{} table: statistic {:.4}, dof {}, p = {:e}",
        table.rows(),
        table.cols(),
        chi_square,
        degrees_of_freedom,
        p_value
    );

    Ok(ChiSquareResult {
        chi_square,
        degrees_of_freedom,
        p_value,
        expected,
    })
}

/// A random 2x2 table with every count in `50..150`
pub fn generate_contingency_table() -> ContingencyTable {
    generate_contingency_table_with_rng(&mut new_rng())
}

/// Like [`generate_contingency_table`], drawing from the given generator
pub fn generate_contingency_table_with_rng(rng: &mut Rng) -> ContingencyTable {
    let mut count = || 50 + rng.rand_range(0..100);

    ContingencyTable(vec![vec![count(), count()], vec![count(), count()]])
}
