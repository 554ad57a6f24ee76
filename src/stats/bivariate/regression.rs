//! Regression analysis
//!
//! Three fits share one result record:
//!
//! - [`fit_linear`]: closed-form ordinary least squares with a single predictor
//! - [`fit_multiple`]: the *heuristic* two-predictor fit used by the 3-D explorer. Only the first
//!   predictor is fitted (by simple least squares); the second one gets a fixed coefficient
//!   (`Config::secondary_coefficient`, 0.3 by default) and the intercept is solved so that the
//!   fitted plane goes through the means. This is not a multivariate least squares solve.
//! - [`fit_logistic_curve`]: summary statistics of a given one-predictor logistic curve
//!
//! The interval reported by every fit is an interval around the *intercept only*:
//! `intercept ± z · standard_error`.

use std::collections::BTreeMap;
use std::fmt;

use crate::config::Config;
use crate::error::{finite, Degenerate, Error, Result};
use crate::stats::bivariate::Data;
use crate::stats::dot;
use crate::stats::logistic::{clamp_probability, sigmoid};
use crate::stats::univariate::Sample;

/// Half width of the interval reported around a logistic curve's intercept
const LOGISTIC_INTERVAL_HALF_WIDTH: f64 = 0.5;

/// Which model produced a `RegressionResult`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Model {
    /// `y = slope·x + intercept`
    Linear,
    /// `y = slope·x + secondary·z + intercept`, heuristic
    Multiple,
    /// `P(y) = sigmoid(slope·x + intercept)`
    Logistic,
}

/// Lower and upper bound of an interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    /// Lower bound
    pub lower: f64,
    /// Upper bound
    pub upper: f64,
}

impl ConfidenceInterval {
    fn around(center: f64, half_width: f64) -> ConfidenceInterval {
        ConfidenceInterval {
            lower: center - half_width,
            upper: center + half_width,
        }
    }

    /// Returns `true` if `value` lies within the interval (bounds included)
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }
}

/// A fitted model and its goodness-of-fit statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegressionResult {
    /// The model that was fitted
    pub model: Model,
    /// Coefficient of the first predictor (`x`)
    pub slope: f64,
    /// Coefficient of the second predictor (`z`), multiple regression only
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub secondary_slope: Option<f64>,
    /// Intercept
    pub intercept: f64,
    /// Coefficient of determination (pseudo-R² for the logistic model)
    pub r2: f64,
    /// Residual standard error
    pub standard_error: f64,
    /// Interval around the intercept
    pub confidence_interval: ConfidenceInterval,
    /// Average of the fitted values over the data
    pub mean_prediction: f64,
}

impl RegressionResult {
    /// Coefficients keyed by predictor name (`"x"`, and `"z"` for the multiple model)
    pub fn slopes(&self) -> BTreeMap<&'static str, f64> {
        let mut slopes = BTreeMap::new();
        slopes.insert("x", self.slope);
        if let Some(z) = self.secondary_slope {
            slopes.insert("z", z);
        }
        slopes
    }

    /// Evaluates the fitted model; `z` is ignored unless the model has a second predictor
    pub fn predict(&self, x: f64, z: f64) -> f64 {
        let linear = self.slope * x + self.secondary_slope.unwrap_or(0.) * z + self.intercept;

        match self.model {
            Model::Logistic => sigmoid(linear),
            Model::Linear | Model::Multiple => linear,
        }
    }

    /// The fitted equation, with two decimals
    pub fn equation(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for RegressionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.model {
            Model::Linear => write!(f, "y = {:.2}x + {:.2}", self.slope, self.intercept),
            Model::Multiple => write!(
                f,
                "y = {:.2}x + {:.2}z + {:.2}",
                self.slope,
                self.secondary_slope.unwrap_or(0.),
                self.intercept
            ),
            Model::Logistic => write!(
                f,
                "P(Y) = 1 / (1 + e^-({:.2}x + {:.2}))",
                self.slope, self.intercept
            ),
        }
    }
}

#[derive(Clone, Copy)]
struct RegSums {
    n: f64,
    sum_x: f64,
    sum_x2: f64,
    sum_y: f64,
    sum_xy: f64,
}

impl RegSums {
    fn new(data: &Data<'_, f64, f64>) -> RegSums {
        let (x, y) = (data.x(), data.y());

        RegSums {
            n: data.len() as f64,
            sum_x: x.sum(),
            sum_x2: dot(x, x),
            sum_y: y.sum(),
            sum_xy: dot(x, y),
        }
    }

    // slope = (nΣxy − ΣxΣy) / (nΣx² − (Σx)²)
    fn slope(&self) -> f64 {
        (self.n * self.sum_xy - self.sum_x * self.sum_y)
            / (self.n * self.sum_x2 - self.sum_x * self.sum_x)
    }
}

fn require_x_variance(data: &Data<'_, f64, f64>) -> Result<()> {
    let x = data.x();

    // NB compared exactly: the closed form denominator is only zero for identical values
    if x.min() == x.max() {
        Err(Degenerate::ZeroVariance { what: "x" }.into())
    } else {
        Ok(())
    }
}

// Returns (ss_total, ss_residual) for the given fitted values
fn sums_of_squares(ys: &Sample<f64>, predicted: &[f64]) -> Result<(f64, f64)> {
    let ss_total = ys.sum_sq_dev(None);
    if ss_total == 0. {
        return Err(Degenerate::ZeroVariance { what: "y" }.into());
    }

    let ss_residual = ys
        .iter()
        .zip(predicted)
        .map(|(&y, &p)| (y - p).powi(2))
        .sum::<f64>();

    Ok((ss_total, ss_residual))
}

fn mean_of(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Fits `y = slope·x + intercept` by ordinary least squares
///
/// Needs at least three points (the standard error divides by `n − 2`) and some variation in
/// `x`. A constant `y` fits exactly: the result is the horizontal line through it, with `r2` of
/// 1 and a standard error of 0.
pub fn fit_linear(data: Data<'_, f64, f64>) -> Result<RegressionResult> {
    fit_linear_with(&Config::default(), data)
}

/// Like [`fit_linear`], with the interval multiplier taken from `config`
pub fn fit_linear_with(config: &Config, data: Data<'_, f64, f64>) -> Result<RegressionResult> {
    data.require(3)?;
    require_x_variance(&data)?;

    let y = data.y();
    if y.min() == y.max() {
        let level = y.min();

        return Ok(RegressionResult {
            model: Model::Linear,
            slope: 0.,
            secondary_slope: None,
            intercept: level,
            r2: 1.,
            standard_error: 0.,
            confidence_interval: ConfidenceInterval::around(level, 0.),
            mean_prediction: level,
        });
    }

    let sums = RegSums::new(&data);
    let slope = finite(sums.slope(), "slope")?;
    let intercept = finite((sums.sum_y - slope * sums.sum_x) / sums.n, "intercept")?;

    let predicted = data
        .x()
        .iter()
        .map(|&x| slope * x + intercept)
        .collect::<Vec<_>>();
    let (ss_total, ss_residual) = sums_of_squares(data.y(), &predicted)?;

    let standard_error = (ss_residual / (sums.n - 2.)).sqrt();

    Ok(RegressionResult {
        model: Model::Linear,
        slope,
        secondary_slope: None,
        intercept,
        r2: 1. - ss_residual / ss_total,
        standard_error,
        confidence_interval: ConfidenceInterval::around(
            intercept,
            config.confidence_z * standard_error,
        ),
        mean_prediction: mean_of(&predicted),
    })
}

/// Heuristic two-predictor fit, see the module documentation
///
/// `data` carries the first predictor and the response, `z` the second predictor. Needs at
/// least four points (the standard error divides by `n − 3`).
pub fn fit_multiple(data: Data<'_, f64, f64>, z: &[f64]) -> Result<RegressionResult> {
    fit_multiple_with(&Config::default(), data, z)
}

/// Like [`fit_multiple`], with the fixed coefficient and interval multiplier taken from `config`
pub fn fit_multiple_with(
    config: &Config,
    data: Data<'_, f64, f64>,
    z: &[f64],
) -> Result<RegressionResult> {
    if z.len() != data.len() {
        return Err(Degenerate::LengthMismatch {
            left: data.len(),
            right: z.len(),
        }
        .into());
    }
    let z = Sample::new(z)?;
    data.require(4)?;
    require_x_variance(&data)?;

    let secondary = config.secondary_coefficient;
    let sums = RegSums::new(&data);
    let slope = finite(sums.slope(), "slope")?;
    let intercept = finite(
        (sums.sum_y - slope * sums.sum_x - secondary * z.sum()) / sums.n,
        "intercept",
    )?;

    let predicted = data
        .x()
        .iter()
        .zip(z.iter())
        .map(|(&x, &z)| slope * x + secondary * z + intercept)
        .collect::<Vec<_>>();
    let (ss_total, ss_residual) = sums_of_squares(data.y(), &predicted)?;

    let standard_error = (ss_residual / (sums.n - 3.)).sqrt();

    trace!(
        "multiple fit: slope = {}, fixed z coefficient = {}, intercept = {}",
        slope,
        secondary,
        intercept
    );

    Ok(RegressionResult {
        model: Model::Multiple,
        slope,
        secondary_slope: Some(secondary),
        intercept,
        r2: 1. - ss_residual / ss_total,
        standard_error,
        confidence_interval: ConfidenceInterval::around(
            intercept,
            config.confidence_z * standard_error,
        ),
        mean_prediction: mean_of(&predicted),
    })
}

/// Summarizes how well the curve `P(y) = sigmoid(slope·x + intercept)` explains outcomes in
/// `[0, 1]`
///
/// The curve is taken as given, not fitted. `r2` is McFadden's pseudo-R²
/// `1 − LL(model) / LL(null)`, where the null model predicts the mean outcome everywhere;
/// `standard_error` is `sqrt(1 − r2)` and the interval spans `intercept ± 0.5`.
pub fn fit_logistic_curve(
    data: Data<'_, f64, f64>,
    slope: f64,
    intercept: f64,
) -> Result<RegressionResult> {
    fit_logistic_curve_with(&Config::default(), data, slope, intercept)
}

/// Like [`fit_logistic_curve`], with the probability clamp taken from `config`
pub fn fit_logistic_curve_with(
    config: &Config,
    data: Data<'_, f64, f64>,
    slope: f64,
    intercept: f64,
) -> Result<RegressionResult> {
    data.require(2)?;
    let ys = data.y();
    if let Some(y) = ys.iter().find(|&&y| !(0. ..=1.).contains(&y)) {
        return Err(Error::MalformedInput(format!(
            "logistic outcomes must lie in [0, 1], found {}",
            y
        )));
    }
    if ys.min() == ys.max() {
        return Err(Degenerate::ZeroVariance { what: "y" }.into());
    }

    let eps = config.probability_epsilon;
    let predicted = data
        .x()
        .iter()
        .map(|&x| sigmoid(slope * x + intercept))
        .collect::<Vec<_>>();

    let log_likelihood = |y: f64, p: f64| {
        let p = clamp_probability(p, eps);
        y * p.ln() + (1. - y) * (1. - p).ln()
    };

    let y_bar = ys.mean();
    let ll_null = ys.iter().map(|&y| log_likelihood(y, y_bar)).sum::<f64>();
    let ll_model = ys
        .iter()
        .zip(&predicted)
        .map(|(&y, &p)| log_likelihood(y, p))
        .sum::<f64>();
    let r2 = finite(1. - ll_model / ll_null, "pseudo r2")?;

    Ok(RegressionResult {
        model: Model::Logistic,
        slope,
        secondary_slope: None,
        intercept,
        r2,
        standard_error: (1. - r2).max(0.).sqrt(),
        confidence_interval: ConfidenceInterval::around(intercept, LOGISTIC_INTERVAL_HALF_WIDTH),
        mean_prediction: mean_of(&predicted),
    })
}

/// Root mean squared error of the line `slope·x + intercept` over the data (divides by `n`)
pub fn rmse(data: Data<'_, f64, f64>, slope: f64, intercept: f64) -> f64 {
    let sse = data
        .iter()
        .map(|(&x, &y)| (slope * x + intercept - y).powi(2))
        .sum::<f64>();

    (sse / data.len() as f64).sqrt()
}

/// Root mean squared error of the plane `b1·x + b2·z + intercept` over the data
pub fn multiple_rmse(
    data: Data<'_, f64, f64>,
    z: &[f64],
    (b1, b2): (f64, f64),
    intercept: f64,
) -> Result<f64> {
    if z.len() != data.len() {
        return Err(Degenerate::LengthMismatch {
            left: data.len(),
            right: z.len(),
        }
        .into());
    }

    let sse = data
        .iter()
        .zip(z)
        .map(|((&x, &y), &z)| (b1 * x + b2 * z + intercept - y).powi(2))
        .sum::<f64>();

    Ok((sse / data.len() as f64).sqrt())
}

#[cfg(test)]
mod test {
    use approx::{assert_relative_eq, relative_eq};
    use quickcheck::{quickcheck, TestResult};

    use super::*;

    fn sse(data: Data<'_, f64, f64>, slope: f64, intercept: f64) -> f64 {
        data.iter()
            .map(|(&x, &y)| (y - slope * x - intercept).powi(2))
            .sum()
    }

    quickcheck! {
        fn least_squares_is_a_minimum(size: u8, start: u8, ds: i8, di: i8) -> TestResult {
            let size = size as usize;
            let start = start as usize;
            let xs = crate::stats::test::vec::<f64>(size, start);
            let ys = crate::stats::test::vec::<f64>(size, start);

            match (xs, ys) {
                (Some(xs), Some(ys)) => {
                    let data = Data::new(&xs[start..], &ys[start..]).unwrap();
                    let fit = fit_linear(data).unwrap();
                    let best = sse(data, fit.slope, fit.intercept);
                    let other = sse(
                        data,
                        fit.slope + f64::from(ds) * 1e-3,
                        fit.intercept + f64::from(di) * 1e-3,
                    );

                    TestResult::from_bool(best <= other || relative_eq!(best, other))
                }
                _ => TestResult::discard(),
            }
        }
    }

    quickcheck! {
        fn r2_matches_squared_correlation(size: u8, start: u8) -> TestResult {
            let size = size as usize;
            let start = start as usize;
            let xs = crate::stats::test::vec::<f64>(size, start);
            let ys = crate::stats::test::vec::<f64>(size, start);

            match (xs, ys) {
                (Some(xs), Some(ys)) => {
                    let data = Data::new(&xs[start..], &ys[start..]).unwrap();
                    let fit = fit_linear(data).unwrap();
                    let r = data.pearson().unwrap();

                    TestResult::from_bool(relative_eq!(fit.r2, r * r, epsilon = 1e-9))
                }
                _ => TestResult::discard(),
            }
        }
    }

    #[test]
    fn perfect_line() {
        let xs = [1., 2., 3., 4., 5.];
        let ys = [2., 4., 6., 8., 10.];
        let fit = fit_linear(Data::new(&xs, &ys).unwrap()).unwrap();

        assert_eq!(fit.model, Model::Linear);
        assert_relative_eq!(fit.slope, 2.);
        assert_relative_eq!(fit.intercept, 0., epsilon = 1e-12);
        assert_relative_eq!(fit.r2, 1.);
        assert_relative_eq!(fit.standard_error, 0., epsilon = 1e-12);
        assert_relative_eq!(fit.mean_prediction, 6.);
        assert_eq!(fit.equation(), "y = 2.00x + 0.00");
    }

    #[test]
    fn interval_is_around_the_intercept_only() {
        let xs = [1., 2., 3., 4., 5.];
        let ys = [1., 3., 2., 5., 4.];
        let fit = fit_linear(Data::new(&xs, &ys).unwrap()).unwrap();

        // slope 0.8, intercept 0.6, residuals [-0.4, 0.8, -1, 1.2, -0.6]
        assert_relative_eq!(fit.slope, 0.8, epsilon = 1e-12);
        assert_relative_eq!(fit.intercept, 0.6, epsilon = 1e-12);
        assert_relative_eq!(fit.r2, 0.64, epsilon = 1e-12);
        // SSres = 3.6 over n − 2 = 3 degrees of freedom
        let se = 1.2_f64.sqrt();
        assert_relative_eq!(fit.standard_error, se, epsilon = 1e-12);
        assert_relative_eq!(fit.confidence_interval.lower, 0.6 - 1.96 * se, epsilon = 1e-12);
        assert_relative_eq!(fit.confidence_interval.upper, 0.6 + 1.96 * se, epsilon = 1e-12);
        assert!(fit.confidence_interval.contains(fit.intercept));
    }

    #[test]
    fn constant_x_is_degenerate() {
        let xs = [0.1, 0.1, 0.1, 0.1];
        let ys = [1., 2., 3., 4.];

        match fit_linear(Data::new(&xs, &ys).unwrap()) {
            Err(Error::DegenerateInput(Degenerate::ZeroVariance { what: "x" })) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn constant_y_is_a_horizontal_line() {
        let xs = [1., 2., 3., 4.];
        let ys = [5., 5., 5., 5.];
        let fit = fit_linear(Data::new(&xs, &ys).unwrap()).unwrap();

        assert_eq!(fit.slope, 0.);
        assert_eq!(fit.intercept, 5.);
        assert_eq!(fit.r2, 1.);
        assert_eq!(fit.standard_error, 0.);
        assert!(fit.confidence_interval.contains(5.));
        assert_eq!(fit.predict(100., 0.), 5.);
        assert_eq!(fit.equation(), "y = 0.00x + 5.00");

        // the fixed z coefficient can't reproduce a constant response
        match fit_multiple(Data::new(&xs, &ys).unwrap(), &[1., 3., 2., 4.]) {
            Err(Error::DegenerateInput(Degenerate::ZeroVariance { what: "y" })) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn two_points_are_not_enough() {
        let result = fit_linear(Data::new(&[1., 2.], &[1., 2.]).unwrap());

        match result {
            Err(Error::DegenerateInput(Degenerate::InsufficientData { needed: 3, got: 2 })) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn multiple_uses_the_fixed_secondary_coefficient() {
        let x = [1., 2., 3., 4., 5.];
        let z = [2., 1., 4., 3., 5.];
        let y = [3., 5., 7., 9., 11.];
        let fit = fit_multiple(Data::new(&x, &y).unwrap(), &z).unwrap();

        assert_eq!(fit.model, Model::Multiple);
        assert_relative_eq!(fit.slope, 2.);
        assert_eq!(fit.secondary_slope, Some(0.3));
        // (Σy − 2Σx − 0.3Σz) / n = (35 − 30 − 4.5) / 5
        assert_relative_eq!(fit.intercept, 0.1, epsilon = 1e-12);
        // the plane passes through the means, so the fitted values average to ȳ
        assert_relative_eq!(fit.mean_prediction, 7., epsilon = 1e-12);
        assert_eq!(fit.slopes().get("z"), Some(&0.3));
        assert_eq!(fit.equation(), "y = 2.00x + 0.30z + 0.10");
    }

    #[test]
    fn multiple_coefficient_is_configurable() {
        let x = [1., 2., 3., 4., 5.];
        let z = [2., 1., 4., 3., 5.];
        let y = [3., 5., 7., 9., 11.];
        let config = Config::default().secondary_coefficient(0.);
        let fit = fit_multiple_with(&config, Data::new(&x, &y).unwrap(), &z).unwrap();

        assert_relative_eq!(fit.intercept, 1., epsilon = 1e-12);
        assert_relative_eq!(fit.r2, 1.);
    }

    #[test]
    fn multiple_rejects_short_or_mismatched_input() {
        let x = [1., 2., 3.];
        let y = [1., 2., 4.];

        assert!(fit_multiple(Data::new(&x, &y).unwrap(), &[1., 2., 3.]).is_err());
        assert!(fit_multiple(Data::new(&x, &y).unwrap(), &[1., 2.]).is_err());
    }

    #[test]
    fn logistic_curve_summary() {
        let xs = [0., 1., 2., 3., 4.];
        let ys = [0., 0., 0., 1., 1.];
        let fit = fit_logistic_curve(Data::new(&xs, &ys).unwrap(), 2., -4.).unwrap();

        assert_eq!(fit.model, Model::Logistic);
        assert!(fit.r2 > 0. && fit.r2 <= 1.);
        assert_relative_eq!(fit.standard_error, (1. - fit.r2).sqrt());
        assert_relative_eq!(fit.confidence_interval.lower, -4.5);
        assert_relative_eq!(fit.confidence_interval.upper, -3.5);
        assert_relative_eq!(fit.predict(2., 0.), 0.5);
    }

    #[test]
    fn logistic_outcomes_must_be_probabilities() {
        let xs = [0., 1., 2.];
        let ys = [0., 2., 1.];

        match fit_logistic_curve(Data::new(&xs, &ys).unwrap(), 1., 0.) {
            Err(Error::MalformedInput(_)) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn rmse_of_exact_line_is_zero() {
        let xs = [1., 2., 3.];
        let ys = [3., 5., 7.];
        let data = Data::new(&xs, &ys).unwrap();

        assert_relative_eq!(rmse(data, 2., 1.), 0.);
        assert_relative_eq!(rmse(data, 2., 2.), 1.);
        assert_relative_eq!(
            multiple_rmse(data, &[0., 0., 0.], (2., 5.), 1.).unwrap(),
            0.
        );
    }
}
