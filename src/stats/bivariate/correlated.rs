//! Synthesis of paired data with a controllable correlation
//!
//! Two generators live here:
//!
//! - [`generate_correlated_sample`] draws uniform `x` and `y` and nudges `y` toward a target
//!   correlation with a single linear correction. This is an approximation: the correlation of
//!   the output is *not* guaranteed to equal the target, and applying the correction again does
//!   not converge on it. Re-measure the output with [`PairedSample::correlation`].
//! - [`generate_category_sample`] picks one of four relationship kinds and builds a dataset for
//!   it, reporting both the drawn coefficient and the measured one.

use std::f64::consts::PI;

use crate::error::{Degenerate, Error, Result};
use crate::stats::bivariate::{unzip, Data, Point};
use crate::stats::rand_util::{new_rng, uniform, Rng};

/// Default number of points per synthesized dataset
pub const DEFAULT_POINTS: usize = 50;

/// Parallel `x`/`y` series produced by the synthesizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairedSample {
    /// Horizontal coordinates
    pub x: Vec<f64>,
    /// Vertical coordinates
    pub y: Vec<f64>,
}

impl PairedSample {
    /// Builds a paired sample out of points
    pub fn from_points(points: &[Point]) -> PairedSample {
        let (x, y) = unzip(points);

        PairedSample { x, y }
    }

    /// Returns a validated view of the data
    pub fn data(&self) -> Result<Data<'_, f64, f64>> {
        Data::new(&self.x, &self.y)
    }

    /// Measures the Pearson correlation actually achieved
    pub fn correlation(&self) -> Result<f64> {
        self.data()?.pearson()
    }

    /// Returns the sample as a list of points
    pub fn points(&self) -> Vec<Point> {
        self.x
            .iter()
            .zip(&self.y)
            .map(|(&x, &y)| Point { x, y })
            .collect()
    }
}

/// Synthesizes `n` points whose correlation is pulled toward `target`
///
/// See the module documentation: `target` is a direction, not a post-condition.
pub fn generate_correlated_sample(target: f64, n: usize) -> Result<PairedSample> {
    generate_correlated_sample_with_rng(&mut new_rng(), target, n)
}

/// Like [`generate_correlated_sample`], drawing from the given generator
pub fn generate_correlated_sample_with_rng(
    rng: &mut Rng,
    target: f64,
    n: usize,
) -> Result<PairedSample> {
    if !(-1. ..=1.).contains(&target) {
        return Err(Error::MalformedInput(format!(
            "target correlation {} is outside [-1, 1]",
            target
        )));
    }
    if n < 2 {
        return Err(Degenerate::InsufficientData { needed: 2, got: n }.into());
    }

    let x = (0..n).map(|_| rng.rand_float()).collect::<Vec<_>>();
    let mut y = (0..n).map(|_| rng.rand_float()).collect::<Vec<_>>();

    let (x_bar, x_sd, y_sd, current) = {
        let data = Data::new(&x, &y)?;
        let x_bar = data.x().mean();

        (
            x_bar,
            data.x().std_dev(Some(x_bar)),
            data.y().std_dev(None),
            data.pearson()?,
        )
    };

    let adjustment = target - current;
    for (y, &x) in y.iter_mut().zip(&x) {
        *y += adjustment * (x - x_bar) * (y_sd / x_sd);
    }

    let sample = PairedSample { x, y };
    if log_enabled!(log::Level::Debug) {
        debug!(
            "synthesized {} points: target r = {:.3}, raw r = {:.3}, achieved r = {:?}",
            n,
            target,
            current,
            sample.correlation().ok()
        );
    }

    Ok(sample)
}

/// A synthesized sample together with the correlation it was drawn for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetedSample {
    /// Correlation the synthesizer aimed for
    pub target: f64,
    /// The data
    pub sample: PairedSample,
}

/// Draws a target correlation uniformly from `[-1, 1)` and synthesizes `n` points for it
pub fn generate_correlation_data(n: usize) -> Result<TargetedSample> {
    generate_correlation_data_with_rng(&mut new_rng(), n)
}

/// Like [`generate_correlation_data`], drawing from the given generator
pub fn generate_correlation_data_with_rng(rng: &mut Rng, n: usize) -> Result<TargetedSample> {
    let target = uniform(rng, -1., 1.);
    let sample = generate_correlated_sample_with_rng(rng, target, n)?;

    Ok(TargetedSample { target, sample })
}

/// Kind of relationship between the two variables of a category sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relationship {
    /// Strong positive linear relationship, `ρ ∈ [0.8, 1)`
    Positive,
    /// Strong negative linear relationship, `ρ ∈ (-1, -0.8]`
    Negative,
    /// Little to no linear relationship, `ρ ∈ [-0.2, 0.2)`
    None,
    /// `y = sin(x) + noise`
    Nonlinear,
}

impl Relationship {
    /// All the kinds, in the order they are drawn from
    pub const ALL: [Relationship; 4] = [
        Relationship::Positive,
        Relationship::Negative,
        Relationship::None,
        Relationship::Nonlinear,
    ];
}

/// Output of [`generate_category_sample`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySample {
    /// The synthesized points
    pub points: Vec<Point>,
    /// For the linear kinds, the coefficient the data was mixed with; for `Nonlinear`, the
    /// measured Pearson correlation
    pub correlation: f64,
    /// The Pearson correlation measured on `points`
    pub measured: f64,
    /// Which relationship was synthesized
    #[serde(rename = "type")]
    pub kind: Relationship,
}

impl CategorySample {
    /// `true` when the measured correlation understates the dependence between the variables
    ///
    /// A sinusoid is fully determined by `x` yet its Pearson coefficient is typically small.
    pub fn is_nonlinear(&self) -> bool {
        self.kind == Relationship::Nonlinear
    }
}

/// Picks a relationship kind uniformly at random and synthesizes `n` points for it
pub fn generate_category_sample(n: usize) -> Result<CategorySample> {
    generate_category_sample_with_rng(&mut new_rng(), n)
}

/// Like [`generate_category_sample`], drawing from the given generator
pub fn generate_category_sample_with_rng(rng: &mut Rng, n: usize) -> Result<CategorySample> {
    let kind = Relationship::ALL[rng.rand_range(0..4) as usize];

    generate_relationship_with_rng(rng, kind, n)
}

/// Synthesizes `n` points for the given relationship kind
pub fn generate_relationship_with_rng(
    rng: &mut Rng,
    kind: Relationship,
    n: usize,
) -> Result<CategorySample> {
    if n < 2 {
        return Err(Degenerate::InsufficientData { needed: 2, got: n }.into());
    }

    let (points, rho) = match kind {
        Relationship::Positive => {
            let rho = uniform(rng, 0.8, 1.);
            (linear_points(rng, rho, n), Some(rho))
        }
        Relationship::Negative => {
            let rho = -uniform(rng, 0.8, 1.);
            (linear_points(rng, rho, n), Some(rho))
        }
        Relationship::None => {
            let rho = uniform(rng, -0.2, 0.2);
            (linear_points(rng, rho, n), Some(rho))
        }
        Relationship::Nonlinear => (sinusoid_points(rng, n), None),
    };

    let measured = PairedSample::from_points(&points).correlation()?;

    Ok(CategorySample {
        points,
        correlation: rho.unwrap_or(measured),
        measured,
        kind,
    })
}

// y = ρ·x + sqrt(1 - ρ²)·noise, with x and noise uniform on [-1, 1)
fn linear_points(rng: &mut Rng, rho: f64, n: usize) -> Vec<Point> {
    let spread = (1. - rho * rho).max(0.).sqrt();

    (0..n)
        .map(|_| {
            let x = uniform(rng, -1., 1.);
            let noise = spread * uniform(rng, -1., 1.);

            Point { x, y: rho * x + noise }
        })
        .collect()
}

fn sinusoid_points(rng: &mut Rng, n: usize) -> Vec<Point> {
    (0..n)
        .map(|_| {
            let x = uniform(rng, 0., 2. * PI);

            Point {
                x,
                y: x.sin() + uniform(rng, -0.25, 0.25),
            }
        })
        .collect()
}

/// Verbal description of a correlation coefficient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorrelationStrength {
    /// `r > 0.7`
    StrongPositive,
    /// `r < -0.7`
    StrongNegative,
    /// `0.3 < r <= 0.7`
    ModeratePositive,
    /// `-0.7 <= r < -0.3`
    ModerateNegative,
    /// `|r| <= 0.3`
    Weak,
    /// The data is known to follow a non-linear relationship
    Nonlinear,
}

impl CorrelationStrength {
    /// Classifies `r`; `nonlinear` overrides the coefficient
    pub fn describe(r: f64, nonlinear: bool) -> CorrelationStrength {
        use self::CorrelationStrength::*;

        if nonlinear {
            Nonlinear
        } else if r.abs() > 0.7 {
            if r > 0. {
                StrongPositive
            } else {
                StrongNegative
            }
        } else if r.abs() > 0.3 {
            if r > 0. {
                ModeratePositive
            } else {
                ModerateNegative
            }
        } else {
            Weak
        }
    }

    /// Human readable label
    pub fn label(self) -> &'static str {
        match self {
            CorrelationStrength::StrongPositive => "Strong positive correlation",
            CorrelationStrength::StrongNegative => "Strong negative correlation",
            CorrelationStrength::ModeratePositive => "Moderate positive correlation",
            CorrelationStrength::ModerateNegative => "Moderate negative correlation",
            CorrelationStrength::Weak => "Weak or no correlation",
            CorrelationStrength::Nonlinear => "Nonlinear relationship",
        }
    }
}

/// Points awarded for guessing a correlation: 10 for a perfect guess, one less per 0.05 of error
pub fn guess_score(actual: f64, guess: f64) -> u32 {
    let penalty = ((actual - guess).abs() * 20.).floor();

    if penalty.is_nan() || penalty >= 10. {
        0
    } else {
        10 - penalty as u32
    }
}
