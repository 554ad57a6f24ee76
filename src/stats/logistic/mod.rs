//! Logistic regression over two features
//!
//! A [`LabeledPoint`] is scored with `sigmoid(w1·x + w2·y + bias)`. The cost is the mean binary
//! cross-entropy; predictions are clamped into `[ε, 1 − ε]` before taking logarithms so that a
//! saturated prediction never turns the cost into `inf` or `NaN`.
//!
//! Optimization is driven by the caller: compute a [`gradient`], apply
//! [`gradient_descent_step`], repeat. [`train`] packages that loop with an iteration cap, an
//! optional cost-delta tolerance and a caller supplied stop predicate.

mod train;

pub use self::train::{train, Training};

use std::convert::TryFrom;

use crate::config::Config;
use crate::error::{finite, Degenerate, Result};

/// Decision threshold on the predicted probability
pub const THRESHOLD: f64 = 0.5;

/// Binary class label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Class {
    /// Label `0`
    Zero,
    /// Label `1`
    One,
}

impl Class {
    /// The label as a number, `0.` or `1.`
    pub fn value(self) -> f64 {
        match self {
            Class::Zero => 0.,
            Class::One => 1.,
        }
    }

    /// Class predicted for a probability; `THRESHOLD` itself maps to `One`
    pub fn from_probability(p: f64) -> Class {
        if p >= THRESHOLD {
            Class::One
        } else {
            Class::Zero
        }
    }
}

impl TryFrom<u8> for Class {
    type Error = String;

    fn try_from(label: u8) -> ::std::result::Result<Class, String> {
        match label {
            0 => Ok(Class::Zero),
            1 => Ok(Class::One),
            other => Err(format!("class label must be 0 or 1, got {}", other)),
        }
    }
}

impl From<Class> for u8 {
    fn from(class: Class) -> u8 {
        match class {
            Class::Zero => 0,
            Class::One => 1,
        }
    }
}

/// A point in the feature plane with its ground truth label
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabeledPoint {
    /// First feature
    pub x: f64,
    /// Second feature
    pub y: f64,
    /// Ground truth
    pub class: Class,
}

/// Model parameters
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    /// Weight of `x`
    pub w1: f64,
    /// Weight of `y`
    pub w2: f64,
    /// Intercept
    pub bias: f64,
}

/// Mean partial derivatives of the cost
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gradient {
    /// With respect to `w1`
    pub dw1: f64,
    /// With respect to `w2`
    pub dw2: f64,
    /// With respect to `bias`
    pub dbias: f64,
}

impl Weights {
    /// Linear score `w1·x + w2·y + bias`
    pub fn linear(&self, x: f64, y: f64) -> f64 {
        self.w1 * x + self.w2 * y + self.bias
    }

    /// The `y` at which the model predicts probability `p` for the given `x`
    ///
    /// Solves `w1·x + w2·y + bias = ln(p / (1 − p))`. `p = 0.5` gives the decision boundary.
    /// Returns `None` when `w2` is zero (the contour is vertical or absent) or `p` is not in
    /// `(0, 1)`.
    pub fn logit_line(&self, p: f64, x: f64) -> Option<f64> {
        if self.w2 == 0. || !(p > 0. && p < 1.) {
            return None;
        }

        let logit = (p / (1. - p)).ln();

        Some((logit - self.w1 * x - self.bias) / self.w2)
    }
}

/// The logistic function `1 / (1 + e^(−z))`
pub fn sigmoid(z: f64) -> f64 {
    1. / (1. + (-z).exp())
}

pub(crate) fn clamp_probability(p: f64, epsilon: f64) -> f64 {
    p.max(epsilon).min(1. - epsilon)
}

/// Predicted probability of class `One` for `point`
pub fn score(point: &LabeledPoint, weights: &Weights) -> f64 {
    sigmoid(weights.linear(point.x, point.y))
}

/// Predicted probabilities for every point, in order
pub fn predictions(points: &[LabeledPoint], weights: &Weights) -> Vec<f64> {
    points.iter().map(|p| score(p, weights)).collect()
}

fn require_points(points: &[LabeledPoint]) -> Result<()> {
    if points.is_empty() {
        Err(Degenerate::InsufficientData { needed: 1, got: 0 }.into())
    } else if points.iter().any(|p| p.x.is_nan() || p.y.is_nan()) {
        Err(Degenerate::NotANumber.into())
    } else {
        Ok(())
    }
}

/// Mean binary cross-entropy `−(1/n) Σ [c·ln(ŷ) + (1 − c)·ln(1 − ŷ)]`
pub fn cost(points: &[LabeledPoint], weights: &Weights) -> Result<f64> {
    cost_with(&Config::default(), points, weights)
}

/// Like [`cost`], clamping predictions with `config.probability_epsilon`
pub fn cost_with(config: &Config, points: &[LabeledPoint], weights: &Weights) -> Result<f64> {
    require_points(points)?;

    let eps = config.probability_epsilon;
    let total = points
        .iter()
        .map(|p| {
            let y_hat = clamp_probability(score(p, weights), eps);
            let c = p.class.value();

            -(c * y_hat.ln() + (1. - c) * (1. - y_hat).ln())
        })
        .sum::<f64>();

    finite(total / points.len() as f64, "cost")
}

/// Gradient of the cost: the means of `(ŷ − c)·x`, `(ŷ − c)·y` and `(ŷ − c)`
pub fn gradient(points: &[LabeledPoint], weights: &Weights) -> Result<Gradient> {
    require_points(points)?;

    let m = points.len() as f64;
    let sum = points.iter().fold(Gradient::default(), |mut acc, p| {
        let dz = score(p, weights) - p.class.value();
        acc.dw1 += dz * p.x;
        acc.dw2 += dz * p.y;
        acc.dbias += dz;
        acc
    });

    Ok(Gradient {
        dw1: finite(sum.dw1 / m, "dw1")?,
        dw2: finite(sum.dw2 / m, "dw2")?,
        dbias: finite(sum.dbias / m, "dbias")?,
    })
}

/// One update `wᵢ' = wᵢ − α·dwᵢ`
pub fn gradient_descent_step(weights: &Weights, gradient: &Gradient, learning_rate: f64) -> Weights {
    Weights {
        w1: weights.w1 - learning_rate * gradient.dw1,
        w2: weights.w2 - learning_rate * gradient.dw2,
        bias: weights.bias - learning_rate * gradient.dbias,
    }
}

/// Percentage (0 to 100) of points whose predicted class matches the label
pub fn accuracy(points: &[LabeledPoint], weights: &Weights) -> Result<f64> {
    require_points(points)?;

    let correct = points
        .iter()
        .filter(|p| Class::from_probability(score(p, weights)) == p.class)
        .count();

    Ok(correct as f64 / points.len() as f64 * 100.)
}

/// One bin of the predicted probability histogram
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramBin {
    /// Lower edge of the bin
    pub start: f64,
    /// Upper edge of the bin
    pub end: f64,
    /// Points labeled `Zero` whose prediction falls in the bin
    pub class0: usize,
    /// Points labeled `One` whose prediction falls in the bin
    pub class1: usize,
}

/// Like [`probability_histogram`], with `config.histogram_bins` bins
pub fn probability_histogram_with(
    config: &Config,
    points: &[LabeledPoint],
    weights: &Weights,
) -> Vec<HistogramBin> {
    probability_histogram(points, weights, config.histogram_bins)
}

/// Counts the points of each class per predicted probability bin
///
/// `bins` equal-width bins cover `[0, 1]`; a probability of exactly `1` lands in the last bin.
pub fn probability_histogram(
    points: &[LabeledPoint],
    weights: &Weights,
    bins: usize,
) -> Vec<HistogramBin> {
    let width = 1. / bins as f64;
    let mut histogram = (0..bins)
        .map(|i| HistogramBin {
            start: i as f64 * width,
            end: (i + 1) as f64 * width,
            class0: 0,
            class1: 0,
        })
        .collect::<Vec<_>>();

    for point in points {
        let p = score(point, weights);
        if p.is_nan() {
            continue;
        }

        let i = ((p / width).floor() as usize).min(bins.saturating_sub(1));
        if let Some(bin) = histogram.get_mut(i) {
            match point.class {
                Class::Zero => bin.class0 += 1,
                Class::One => bin.class1 += 1,
            }
        }
    }

    histogram
}

#[cfg(test)]
mod test {
    use approx::{assert_relative_eq, relative_eq};
    use quickcheck::{quickcheck, TestResult};

    use super::*;
    use crate::error::Error;

    fn point(x: f64, y: f64, class: Class) -> LabeledPoint {
        LabeledPoint { x, y, class }
    }

    fn balanced() -> Vec<LabeledPoint> {
        vec![
            point(-2., -1., Class::Zero),
            point(-1., -2., Class::Zero),
            point(1., 2., Class::One),
            point(2., 1., Class::One),
        ]
    }

    quickcheck! {
        fn sigmoid_is_antisymmetric(z: f64) -> TestResult {
            if !z.is_finite() {
                return TestResult::discard();
            }

            TestResult::from_bool(relative_eq!(sigmoid(-z), 1. - sigmoid(z), epsilon = 1e-15))
        }
    }

    quickcheck! {
        fn sigmoid_is_a_probability(z: f64) -> bool {
            let p = sigmoid(z);

            z.is_nan() || (0. ..=1.).contains(&p)
        }
    }

    #[test]
    fn sigmoid_limits() {
        assert_eq!(sigmoid(0.), 0.5);
        assert_relative_eq!(sigmoid(50.), 1.);
        assert!(sigmoid(-50.) < 1e-20);
        assert_eq!(sigmoid(f64::INFINITY), 1.);
        assert_eq!(sigmoid(f64::NEG_INFINITY), 0.);
    }

    #[test]
    fn zero_weights_predict_one_half() {
        let points = balanced();
        let weights = Weights::default();

        assert!(predictions(&points, &weights).iter().all(|&p| p == 0.5));
        assert_relative_eq!(cost(&points, &weights).unwrap(), 2_f64.ln());
        assert_relative_eq!(accuracy(&points, &weights).unwrap(), 50.);
    }

    #[test]
    fn saturated_predictions_have_a_finite_cost() {
        let points = vec![point(1000., 0., Class::Zero), point(-1000., 0., Class::One)];
        let weights = Weights {
            w1: 1.,
            w2: 0.,
            bias: 0.,
        };

        let cost = cost(&points, &weights).unwrap();

        assert!(cost.is_finite());
        assert!(cost > 30.);
    }

    #[test]
    fn gradient_matches_hand_computation() {
        let points = vec![point(1., 2., Class::One), point(3., -1., Class::Zero)];
        let g = gradient(&points, &Weights::default()).unwrap();

        // ŷ = 0.5 everywhere: dz = [-0.5, 0.5]
        assert_relative_eq!(g.dw1, (-0.5 * 1. + 0.5 * 3.) / 2.);
        assert_relative_eq!(g.dw2, (-0.5 * 2. + 0.5 * -1.) / 2.);
        assert_relative_eq!(g.dbias, 0.);
    }

    #[test]
    fn a_step_lowers_the_cost() {
        let points = balanced();
        let weights = Weights::default();
        let g = gradient(&points, &weights).unwrap();
        let next = gradient_descent_step(&weights, &g, 0.1);

        assert!(cost(&points, &next).unwrap() < cost(&points, &weights).unwrap());
    }

    #[test]
    fn step_follows_the_update_rule() {
        let weights = Weights {
            w1: 1.,
            w2: -1.,
            bias: 2.,
        };
        let g = Gradient {
            dw1: 0.5,
            dw2: -0.5,
            dbias: 1.,
        };
        let next = gradient_descent_step(&weights, &g, 0.2);

        assert_relative_eq!(next.w1, 0.9);
        assert_relative_eq!(next.w2, -0.9);
        assert_relative_eq!(next.bias, 1.8);
    }

    #[test]
    fn empty_point_sets_are_degenerate() {
        match cost(&[], &Weights::default()) {
            Err(Error::DegenerateInput(_)) => {}
            other => panic!("unexpected {:?}", other),
        }
        assert!(gradient(&[], &Weights::default()).is_err());
        assert!(accuracy(&[], &Weights::default()).is_err());
    }

    #[test]
    fn decision_boundary() {
        let weights = Weights {
            w1: 1.5,
            w2: -1.,
            bias: 2.,
        };

        // 1.5·x − y + 2 = 0
        assert_relative_eq!(weights.logit_line(0.5, 2.).unwrap(), 5.);
        assert_relative_eq!(
            sigmoid(weights.linear(1., weights.logit_line(0.8, 1.).unwrap())),
            0.8,
            epsilon = 1e-12
        );
        assert_eq!(Weights::default().logit_line(0.5, 1.), None);
        assert_eq!(weights.logit_line(1., 1.), None);
    }

    #[test]
    fn histogram_bins_every_point() {
        let points = balanced();
        let weights = Weights {
            w1: 1.,
            w2: 1.,
            bias: 0.,
        };
        let histogram = probability_histogram(&points, &weights, 20);

        assert_eq!(histogram.len(), 20);
        assert_eq!(histogram.iter().map(|b| b.class0).sum::<usize>(), 2);
        assert_eq!(histogram.iter().map(|b| b.class1).sum::<usize>(), 2);
        // sigmoid(±3) lands in the outermost bins
        assert_eq!(histogram[0].class0, 2);
        assert_eq!(histogram[19].class1, 2);
        assert_relative_eq!(histogram[19].end, 1.);
    }

    #[test]
    fn histogram_resolution_comes_from_the_config() {
        let config = Config::default().histogram_bins(4);
        let histogram = probability_histogram_with(&config, &balanced(), &Weights::default());

        assert_eq!(histogram.len(), 4);
        // 0.5 opens the third bin
        assert_eq!((histogram[2].class0, histogram[2].class1), (2, 2));
    }

    #[test]
    fn class_labels_round_trip_through_u8() {
        assert_eq!(Class::try_from(1u8), Ok(Class::One));
        assert!(Class::try_from(2u8).is_err());
        assert_eq!(u8::from(Class::Zero), 0);
    }
}
