//! Univariate analysis

mod sample;

pub use self::sample::Sample;

/// Arithmetic mean of `values`
///
/// Fails when `values` is empty or contains a `NaN`.
pub fn mean(values: &[f64]) -> crate::Result<f64> {
    Ok(Sample::new(values)?.mean())
}

/// Population standard deviation of `values` around `mean_value`
///
/// Divides by `n`, not `n - 1`: this is the biased estimator.
pub fn standard_deviation(values: &[f64], mean_value: f64) -> crate::Result<f64> {
    Ok(Sample::new(values)?.std_dev(Some(mean_value)))
}
