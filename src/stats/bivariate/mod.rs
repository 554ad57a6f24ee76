//! Bivariate analysis

pub mod correlated;
pub mod regression;

use std::iter::Zip;
use std::slice::Iter;

use crate::error::{Degenerate, Error, Result};
use crate::stats::float::Float;
use crate::stats::univariate::Sample;

/// A single `(x, y)` observation, the shape the scatterplots exchange
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
}

/// Splits points into parallel `x` and `y` series
pub fn unzip(points: &[Point]) -> (Vec<f64>, Vec<f64>) {
    points.iter().map(|p| (p.x, p.y)).unzip()
}

/// Bivariate `(X, Y)` data
///
/// Invariants:
///
/// - No `NaN`s in the data
/// - At least one data point in the set
/// - Both series have the same length
pub struct Data<'a, X, Y>(&'a [X], &'a [Y]);

impl<'a, X, Y> Copy for Data<'a, X, Y> {}

#[allow(clippy::expl_impl_clone_on_copy)]
impl<'a, X, Y> Clone for Data<'a, X, Y> {
    fn clone(&self) -> Data<'a, X, Y> {
        *self
    }
}

impl<'a, X, Y> Data<'a, X, Y> {
    /// Returns the length of the data set
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the set has no points, which a constructed set never does
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the data set
    pub fn iter(&self) -> Zip<Iter<'a, X>, Iter<'a, Y>> {
        self.0.iter().zip(self.1.iter())
    }
}

impl<'a, X, Y> Data<'a, X, Y>
where
    X: Float,
    Y: Float,
{
    /// Creates a new data set from two existing slices
    pub fn new(xs: &'a [X], ys: &'a [Y]) -> Result<Data<'a, X, Y>> {
        if xs.len() != ys.len() {
            return Err(Degenerate::LengthMismatch {
                left: xs.len(),
                right: ys.len(),
            }
            .into());
        }
        if xs.is_empty() {
            return Err(Degenerate::InsufficientData { needed: 1, got: 0 }.into());
        }
        if xs.iter().any(|x| x.is_nan()) || ys.iter().any(|y| y.is_nan()) {
            return Err(Degenerate::NotANumber.into());
        }

        Ok(Data(xs, ys))
    }

    /// Returns a view into the `X` data
    pub fn x(&self) -> &'a Sample<X> {
        // NB the constructor already checked the `Sample` invariants
        match Sample::new(self.0) {
            Ok(sample) => sample,
            Err(_) => unreachable!(),
        }
    }

    /// Returns a view into the `Y` data
    pub fn y(&self) -> &'a Sample<Y> {
        match Sample::new(self.1) {
            Ok(sample) => sample,
            Err(_) => unreachable!(),
        }
    }

    /// Ensures the set holds at least `needed` points
    pub(crate) fn require(&self, needed: usize) -> Result<()> {
        if self.len() < needed {
            Err(Degenerate::InsufficientData {
                needed,
                got: self.len(),
            }
            .into())
        } else {
            Ok(())
        }
    }
}

impl<'a, A> Data<'a, A, A>
where
    A: Float,
{
    /// Returns the Pearson correlation coefficient of the data set
    ///
    /// `Σ(xᵢ-x̄)(yᵢ-ȳ) / sqrt(Σ(xᵢ-x̄)² · Σ(yᵢ-ȳ)²)`
    ///
    /// Deviations are scaled by their largest magnitude before squaring, so values near the
    /// edge of the floating point range don't overflow the sums of squares.
    ///
    /// Fails with `ZeroVariance` when either series is constant (this includes every
    /// single-point set), and with `NumericOverflow` when the deviations themselves leave the
    /// representable range.
    ///
    /// - Time: `O(length)`
    pub fn pearson(&self) -> Result<A> {
        let _0 = A::cast(0);
        let x_bar = self.x().mean();
        let y_bar = self.y().mean();

        let (mut x_scale, mut y_scale) = (_0, _0);
        for (&x, &y) in self.iter() {
            x_scale = x_scale.max((x - x_bar).abs());
            y_scale = y_scale.max((y - y_bar).abs());
        }

        if x_scale == _0 {
            return Err(Degenerate::ZeroVariance { what: "x" }.into());
        }
        if y_scale == _0 {
            return Err(Degenerate::ZeroVariance { what: "y" }.into());
        }

        let (mut sxy, mut sxx, mut syy) = (_0, _0, _0);
        for (&x, &y) in self.iter() {
            let dx = (x - x_bar) / x_scale;
            let dy = (y - y_bar) / y_scale;
            sxy = sxy + dx * dy;
            sxx = sxx + dx * dx;
            syy = syy + dy * dy;
        }

        let r = sxy / (sxx * syy).sqrt();
        if !r.is_finite() {
            return Err(Error::NumericOverflow {
                what: "correlation",
            });
        }

        Ok(r)
    }
}

/// Pearson correlation of two parallel series
pub fn pearson_correlation(xs: &[f64], ys: &[f64]) -> Result<f64> {
    Data::new(xs, ys)?.pearson()
}
