//! The synthetic datasets the interactive pages start out with
//!
//! Every generator comes in two flavors: one that seeds a fresh generator and a `_with_rng`
//! variant for reproducible output.

use crate::config::Config;
use crate::error::Result;
use crate::stats::bivariate::correlated::{generate_category_sample_with_rng, CategorySample};
use crate::stats::bivariate::Point;
use crate::stats::logistic::{sigmoid, Class, LabeledPoint, Weights, THRESHOLD};
use crate::stats::rand_util::{new_rng, uniform, Rng};

/// Number of points in each preset
pub const PRESET_POINTS: usize = 20;

/// Number of points in the regression explorer's starting data
pub const EXPLORER_POINTS: usize = 50;

/// Number of points in the logistic regression dashboard
pub const DASHBOARD_POINTS: usize = 100;

/// Weights the logistic regression dashboard starts from
pub const DASHBOARD_WEIGHTS: Weights = Weights {
    w1: 1.5,
    w2: -1.,
    bias: 2.,
};

/// One observation of a two-predictor regression
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MultiPoint {
    /// First predictor
    pub x1: f64,
    /// Second predictor
    pub x2: f64,
    /// Response
    pub y: f64,
}

/// Splits observations into the `x1`, `x2` and `y` columns
pub fn columns(points: &[MultiPoint]) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let mut x1 = Vec::with_capacity(points.len());
    let mut x2 = Vec::with_capacity(points.len());
    let mut y = Vec::with_capacity(points.len());

    for p in points {
        x1.push(p.x1);
        x2.push(p.x2);
        y.push(p.y);
    }

    (x1, x2, y)
}

/// One observation of a three-predictor regression
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriPoint {
    /// First predictor
    pub x1: f64,
    /// Second predictor
    pub x2: f64,
    /// Third predictor
    pub x3: f64,
    /// Response
    pub y: f64,
}

/// A point of the 3D scatterplot: the plane fit reads `x`, `z` and the response `y`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpacePoint {
    /// First predictor
    pub x: f64,
    /// Response
    pub y: f64,
    /// Second predictor
    pub z: f64,
}

/// Splits space points into the `x`, `y` and `z` columns
pub fn space_columns(points: &[SpacePoint]) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let mut x = Vec::with_capacity(points.len());
    let mut y = Vec::with_capacity(points.len());
    let mut z = Vec::with_capacity(points.len());

    for p in points {
        x.push(p.x);
        y.push(p.y);
        z.push(p.z);
    }

    (x, y, z)
}

/// A named series, as listed in the regression page's dataset picker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedDataset<P> {
    /// Label shown in the legend
    pub name: String,
    /// The observations
    pub points: Vec<P>,
}

/// Parameters of a noisy line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineParams {
    /// Number of points
    pub points: usize,
    /// Width of the uniform noise added to `y`
    pub noise: f64,
    /// True slope
    pub slope: f64,
    /// True intercept
    pub intercept: f64,
}

impl Default for LineParams {
    fn default() -> LineParams {
        LineParams {
            points: PRESET_POINTS,
            noise: 2.,
            slope: 2.,
            intercept: 1.,
        }
    }
}

/// Parameters of a noisy plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaneParams {
    /// Number of points
    pub points: usize,
    /// Width of the uniform noise added to `y`
    pub noise: f64,
    /// True coefficients of `x1` and `x2`
    pub coefficients: (f64, f64),
    /// True intercept
    pub intercept: f64,
}

impl Default for PlaneParams {
    fn default() -> PlaneParams {
        PlaneParams {
            points: PRESET_POINTS,
            noise: 2.,
            coefficients: (2., 1.5),
            intercept: 1.,
        }
    }
}

/// Points around `y = slope·x + intercept`, with `x` uniform on `[-10, 10)` and noise uniform on
/// `[-noise / 2, noise / 2)`
pub fn regression_data(params: &LineParams) -> Vec<Point> {
    regression_data_with_rng(&mut new_rng(), params)
}

/// Like [`regression_data`], drawing from the given generator
pub fn regression_data_with_rng(rng: &mut Rng, params: &LineParams) -> Vec<Point> {
    (0..params.points)
        .map(|_| {
            let x = centered(rng, 20.);
            let y = params.slope * x + params.intercept + centered(rng, params.noise);

            Point { x, y }
        })
        .collect()
}

/// Points around `y = b1·x1 + b2·x2 + intercept`, predictors uniform on `[-10, 10)`
pub fn multiple_regression_data(params: &PlaneParams) -> Vec<MultiPoint> {
    multiple_regression_data_with_rng(&mut new_rng(), params)
}

/// Like [`multiple_regression_data`], drawing from the given generator
pub fn multiple_regression_data_with_rng(
    rng: &mut Rng,
    params: &PlaneParams,
) -> Vec<MultiPoint> {
    let (b1, b2) = params.coefficients;

    (0..params.points)
        .map(|_| {
            let x1 = centered(rng, 20.);
            let x2 = centered(rng, 20.);
            let y = b1 * x1 + b2 * x2 + params.intercept + centered(rng, params.noise);

            MultiPoint { x1, x2, y }
        })
        .collect()
}

/// The regression explorer's starting data
///
/// [`EXPLORER_POINTS`] points with `x` uniform on `[0, 10)` and `y = 2·x + 1` plus noise uniform
/// on `[0, 2)`, so the cloud sits above the true line.
pub fn explorer_regression_data() -> Vec<Point> {
    explorer_regression_data_with_rng(&mut new_rng())
}

/// Like [`explorer_regression_data`], drawing from the given generator
pub fn explorer_regression_data_with_rng(rng: &mut Rng) -> Vec<Point> {
    (0..EXPLORER_POINTS)
        .map(|_| {
            let x = uniform(rng, 0., 10.);
            let y = 2. * x + 1. + uniform(rng, 0., 2.);

            Point { x, y }
        })
        .collect()
}

/// Three-predictor starting data: `y = 2·x1 + 1.5·x2 + 0.5·x3` plus noise uniform on `[0, 2)`,
/// predictors uniform on `[0, 10)`
pub fn explorer_multiple_regression_data() -> Vec<TriPoint> {
    explorer_multiple_regression_data_with_rng(&mut new_rng())
}

/// Like [`explorer_multiple_regression_data`], drawing from the given generator
pub fn explorer_multiple_regression_data_with_rng(rng: &mut Rng) -> Vec<TriPoint> {
    (0..EXPLORER_POINTS)
        .map(|_| {
            let x1 = uniform(rng, 0., 10.);
            let x2 = uniform(rng, 0., 10.);
            let x3 = uniform(rng, 0., 10.);
            let y = 2. * x1 + 1.5 * x2 + 0.5 * x3 + uniform(rng, 0., 2.);

            TriPoint { x1, x2, x3, y }
        })
        .collect()
}

/// "Dataset A" of the linear model page: 100 points, `x` uniform on `[10, 30)`, `y` climbing by
/// 0.5 per point from 30, plus noise uniform on `[0, 8)`
///
/// `y` trends with the point's position rather than with `x`, so the fitted slope is weak.
pub fn linear_model_dataset() -> NamedDataset<Point> {
    linear_model_dataset_with_rng(&mut new_rng())
}

/// Like [`linear_model_dataset`], drawing from the given generator
pub fn linear_model_dataset_with_rng(rng: &mut Rng) -> NamedDataset<Point> {
    let points = (0..100)
        .map(|i| Point {
            x: uniform(rng, 10., 30.),
            y: 30. + 0.5 * i as f64 + uniform(rng, 0., 8.),
        })
        .collect();

    NamedDataset {
        name: "Dataset A".to_owned(),
        points,
    }
}

/// "Success Rate" of the logistic model page: 150 outcomes along `x = 1 + i / 20`, following
/// `sigmoid(2·x − 4)` with noise uniform on `[-0.05, 0.05)`
///
/// Outcomes are clamped into `[0, 1]` so they stay valid input for
/// [`fit_logistic_curve`](crate::stats::bivariate::regression::fit_logistic_curve).
pub fn logistic_model_dataset() -> NamedDataset<Point> {
    logistic_model_dataset_with_rng(&mut new_rng())
}

/// Like [`logistic_model_dataset`], drawing from the given generator
pub fn logistic_model_dataset_with_rng(rng: &mut Rng) -> NamedDataset<Point> {
    let points = (0..150)
        .map(|i| {
            let x = 1. + i as f64 / 20.;
            let y = sigmoid(2. * x - 4.) + uniform(rng, -0.05, 0.05);

            Point {
                x,
                y: y.max(0.).min(1.),
            }
        })
        .collect();

    NamedDataset {
        name: "Success Rate".to_owned(),
        points,
    }
}

/// "Class A" and "Class B" of the multiple regression page, 80 points each
///
/// - Class A: `x` on `[10, 25)`, `y = 20 + 0.4·i` plus noise on `[0, 5)`, `z` on `[5, 15)`
/// - Class B: `x` on `[15, 30)`, `y = 35 + 0.35·i` plus noise on `[0, 4)`, `z` on `[8, 18)`
pub fn class_datasets() -> Vec<NamedDataset<SpacePoint>> {
    class_datasets_with_rng(&mut new_rng())
}

/// Like [`class_datasets`], drawing from the given generator
pub fn class_datasets_with_rng(rng: &mut Rng) -> Vec<NamedDataset<SpacePoint>> {
    let mut class = |name: &str, x_low: f64, y_base: f64, y_step: f64, noise: f64, z_low: f64| {
        let points = (0..80)
            .map(|i| SpacePoint {
                x: uniform(rng, x_low, x_low + 15.),
                y: y_base + y_step * i as f64 + uniform(rng, 0., noise),
                z: uniform(rng, z_low, z_low + 10.),
            })
            .collect();

        NamedDataset {
            name: name.to_owned(),
            points,
        }
    };

    vec![
        class("Class A", 10., 20., 0.4, 5., 5.),
        class("Class B", 15., 35., 0.35, 4., 8.),
    ]
}

/// Ready made scatterplots for the simple regression explorer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// `y = 1.5·x` plus noise in `[-1, 1)`, `x` stepping through `-10..10`
    PositiveCorrelation,
    /// `y = -1.5·x` plus noise in `[-1, 1)`
    NegativeCorrelation,
    /// `y = 0.3·x` plus noise in `[-3, 3)`
    WeakCorrelation,
    /// Two blobs, around `(-10, -10)` and `(10, 10)`
    Clustered,
}

impl Preset {
    /// Every preset, in menu order
    pub const ALL: [Preset; 4] = [
        Preset::PositiveCorrelation,
        Preset::NegativeCorrelation,
        Preset::WeakCorrelation,
        Preset::Clustered,
    ];

    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            Preset::PositiveCorrelation => "Positive Correlation",
            Preset::NegativeCorrelation => "Negative Correlation",
            Preset::WeakCorrelation => "Weak Correlation",
            Preset::Clustered => "Clustered Data",
        }
    }

    /// Draws the preset's points
    pub fn generate(self) -> Vec<Point> {
        self.generate_with_rng(&mut new_rng())
    }

    /// Like [`Preset::generate`], drawing from the given generator
    pub fn generate_with_rng(self, rng: &mut Rng) -> Vec<Point> {
        let steps = (0..PRESET_POINTS).map(|i| i as f64 - 10.);

        match self {
            Preset::PositiveCorrelation => steps
                .map(|x| Point {
                    x,
                    y: 1.5 * x + uniform(rng, -1., 1.),
                })
                .collect(),
            Preset::NegativeCorrelation => steps
                .map(|x| Point {
                    x,
                    y: -1.5 * x + uniform(rng, -1., 1.),
                })
                .collect(),
            Preset::WeakCorrelation => steps
                .map(|x| Point {
                    x,
                    y: 0.3 * x + uniform(rng, -3., 3.),
                })
                .collect(),
            Preset::Clustered => {
                let half = PRESET_POINTS / 2;
                let mut blob = |low: f64, n: usize| {
                    (0..n)
                        .map(|_| Point {
                            x: uniform(rng, low, low + 4.),
                            y: uniform(rng, low, low + 4.),
                        })
                        .collect::<Vec<_>>()
                };

                let mut points = blob(-12., half);
                points.extend(blob(8., PRESET_POINTS - half));
                points
            }
        }
    }
}

/// Ready made datasets for the multiple regression explorer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MultiplePreset {
    /// `y = 2·x1 + 1.5·x2` plus noise in `[-1, 1)`
    #[serde(rename = "positive_correlation")]
    BothPositive,
    /// `y = 2·x1 − 1.5·x2` plus noise in `[-1, 1)`
    #[serde(rename = "mixed_correlation")]
    Mixed,
    /// `y = 0.5·x1 + 0.3·x2` plus noise in `[-2, 2)`
    #[serde(rename = "weak_correlation")]
    Weak,
    /// `y = 0.2·x1·x2` plus noise in `[-1, 1)`
    #[serde(rename = "interaction_effect")]
    Interaction,
}

impl MultiplePreset {
    /// Every preset, in menu order
    pub const ALL: [MultiplePreset; 4] = [
        MultiplePreset::BothPositive,
        MultiplePreset::Mixed,
        MultiplePreset::Weak,
        MultiplePreset::Interaction,
    ];

    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            MultiplePreset::BothPositive => "Both Positive",
            MultiplePreset::Mixed => "Mixed Effects",
            MultiplePreset::Weak => "Weak Effects",
            MultiplePreset::Interaction => "Interaction Effect",
        }
    }

    /// Draws the preset's points
    pub fn generate(self) -> Vec<MultiPoint> {
        self.generate_with_rng(&mut new_rng())
    }

    /// Like [`MultiplePreset::generate`], drawing from the given generator
    pub fn generate_with_rng(self, rng: &mut Rng) -> Vec<MultiPoint> {
        (0..PRESET_POINTS)
            .map(|_| {
                let x1 = centered(rng, 20.);
                let x2 = centered(rng, 20.);
                let y = match self {
                    MultiplePreset::BothPositive => 2. * x1 + 1.5 * x2 + uniform(rng, -1., 1.),
                    MultiplePreset::Mixed => 2. * x1 - 1.5 * x2 + uniform(rng, -1., 1.),
                    MultiplePreset::Weak => 0.5 * x1 + 0.3 * x2 + uniform(rng, -2., 2.),
                    MultiplePreset::Interaction => 0.2 * x1 * x2 + uniform(rng, -1., 1.),
                };

                MultiPoint { x1, x2, y }
            })
            .collect()
    }
}

/// Labeled points for the logistic regression dashboard
///
/// `x` and `y` are uniform on `[-5, 5)`. The label is `One` when
/// `sigmoid(1.5·x − y + 2 + noise) > 0.5`, with noise uniform on `[-1.5, 1.5)`, so the classes
/// overlap near the line `y = 1.5·x + 2`.
pub fn generate_labeled_points(n: usize) -> Vec<LabeledPoint> {
    generate_labeled_points_with_rng(&mut new_rng(), n)
}

/// Like [`generate_labeled_points`], drawing from the given generator
pub fn generate_labeled_points_with_rng(rng: &mut Rng, n: usize) -> Vec<LabeledPoint> {
    (0..n)
        .map(|_| {
            let x = centered(rng, 10.);
            let y = centered(rng, 10.);
            let noise = centered(rng, 3.);
            let class = if sigmoid(1.5 * x - y + 2. + noise) > THRESHOLD {
                Class::One
            } else {
                Class::Zero
            };

            LabeledPoint { x, y, class }
        })
        .collect()
}

/// A fresh round of the guess-the-correlation game, with `config.sample_size` points
pub fn correlation_round(config: &Config) -> Result<CategorySample> {
    correlation_round_with_rng(&mut new_rng(), config)
}

/// Like [`correlation_round`], drawing from the given generator
pub fn correlation_round_with_rng(rng: &mut Rng, config: &Config) -> Result<CategorySample> {
    generate_category_sample_with_rng(rng, config.sample_size)
}

// Uniform on [-width / 2, width / 2)
fn centered(rng: &mut Rng, width: f64) -> f64 {
    (rng.rand_float() - 0.5) * width
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::stats::bivariate::regression::{
        fit_linear, fit_logistic_curve, fit_multiple, rmse,
    };
    use crate::stats::bivariate::{pearson_correlation, unzip, Data};
    use crate::stats::logistic::accuracy;
    use crate::stats::rand_util::seeded_rng;

    #[test]
    fn noisy_lines_recover_their_parameters() {
        let mut rng = seeded_rng(11);
        let params = LineParams::default();
        let points = regression_data_with_rng(&mut rng, &params);
        let (x, y) = unzip(&points);
        let data = Data::new(&x, &y).unwrap();
        let fit = fit_linear(data).unwrap();

        assert_eq!(points.len(), PRESET_POINTS);
        assert!(x.iter().all(|&x| x >= -10. && x < 10.));
        assert!((fit.slope - 2.).abs() < 0.2);
        assert!((fit.intercept - 1.).abs() < 1.);
        // noise is at most 1 in magnitude
        assert!(rmse(data, params.slope, params.intercept) <= 1.);
    }

    #[test]
    fn noiseless_planes_are_exact() {
        let mut rng = seeded_rng(3);
        let params = PlaneParams {
            noise: 0.,
            ..PlaneParams::default()
        };

        for p in multiple_regression_data_with_rng(&mut rng, &params) {
            assert!((p.y - (2. * p.x1 + 1.5 * p.x2 + 1.)).abs() < 1e-12);
        }
    }

    #[test]
    fn presets_have_the_advertised_shape() {
        let mut rng = seeded_rng(7);

        for &preset in &Preset::ALL {
            let points = preset.generate_with_rng(&mut rng);
            let (x, y) = unzip(&points);
            let r = pearson_correlation(&x, &y).unwrap();

            assert_eq!(points.len(), PRESET_POINTS, "{}", preset.name());
            match preset {
                Preset::PositiveCorrelation => assert!(r > 0.95),
                Preset::NegativeCorrelation => assert!(r < -0.95),
                Preset::WeakCorrelation => assert!(r.abs() < 1.),
                Preset::Clustered => {
                    assert!(r > 0.8);
                    assert!(points[..10].iter().all(|p| p.x < -8. && p.y < -8.));
                    assert!(points[10..].iter().all(|p| p.x >= 8. && p.y >= 8.));
                }
            }
        }
    }

    #[test]
    fn multiple_presets_feed_the_heuristic_fit() {
        let mut rng = seeded_rng(19);

        for &preset in &MultiplePreset::ALL {
            let points = preset.generate_with_rng(&mut rng);
            let (x1, x2, y) = columns(&points);
            let fit = fit_multiple(Data::new(&x1, &y).unwrap(), &x2).unwrap();

            assert_eq!(points.len(), PRESET_POINTS, "{}", preset.name());
            assert!(fit.standard_error.is_finite());
            assert!(fit.r2 <= 1.);
        }
    }

    #[test]
    fn dashboard_points_are_mostly_separated_by_the_starting_weights() {
        let mut rng = seeded_rng(23);
        let points = generate_labeled_points_with_rng(&mut rng, DASHBOARD_POINTS);

        assert_eq!(points.len(), DASHBOARD_POINTS);
        assert!(points.iter().all(|p| p.x.abs() <= 5. && p.y.abs() <= 5.));
        assert!(points.iter().any(|p| p.class == Class::One));
        assert!(points.iter().any(|p| p.class == Class::Zero));
        // only points within 1.5 of the boundary can be mislabeled
        assert!(accuracy(&points, &DASHBOARD_WEIGHTS).unwrap() >= 60.);
    }

    #[test]
    fn correlation_rounds_use_the_configured_size() {
        let mut rng = seeded_rng(29);
        let config = Config::default().sample_size(12);
        let round = correlation_round_with_rng(&mut rng, &config).unwrap();

        assert_eq!(round.points.len(), 12);
    }

    #[test]
    fn explorer_data_sits_above_the_true_line() {
        let mut rng = seeded_rng(31);
        let points = explorer_regression_data_with_rng(&mut rng);
        let (x, y) = unzip(&points);
        let fit = fit_linear(Data::new(&x, &y).unwrap()).unwrap();

        assert_eq!(points.len(), EXPLORER_POINTS);
        for p in &points {
            assert!(p.x >= 0. && p.x < 10.);
            let noise = p.y - (2. * p.x + 1.);
            assert!(noise > -1e-9 && noise < 2. + 1e-9);
        }
        assert!((fit.slope - 2.).abs() < 0.3);
        // the noise averages 1, which lifts the intercept
        assert!((fit.intercept - 2.).abs() < 1.);
    }

    #[test]
    fn explorer_multiple_data_follows_three_predictors() {
        let mut rng = seeded_rng(37);
        let points = explorer_multiple_regression_data_with_rng(&mut rng);

        assert_eq!(points.len(), EXPLORER_POINTS);
        for p in &points {
            assert!([p.x1, p.x2, p.x3].iter().all(|&x| x >= 0. && x < 10.));
            let noise = p.y - (2. * p.x1 + 1.5 * p.x2 + 0.5 * p.x3);
            assert!(noise > -1e-9 && noise < 2. + 1e-9);
        }
    }

    #[test]
    fn linear_model_dataset_trends_with_position() {
        let mut rng = seeded_rng(41);
        let dataset = linear_model_dataset_with_rng(&mut rng);
        let (x, y) = unzip(&dataset.points);

        assert_eq!(dataset.name, "Dataset A");
        assert_eq!(dataset.points.len(), 100);
        for (i, p) in dataset.points.iter().enumerate() {
            assert!(p.x >= 10. && p.x < 30.);
            let noise = p.y - (30. + 0.5 * i as f64);
            assert!(noise > -1e-9 && noise < 8. + 1e-9);
        }
        assert!(fit_linear(Data::new(&x, &y).unwrap()).is_ok());
    }

    #[test]
    fn logistic_model_dataset_is_a_valid_curve_input() {
        let mut rng = seeded_rng(43);
        let dataset = logistic_model_dataset_with_rng(&mut rng);
        let (x, y) = unzip(&dataset.points);

        assert_eq!(dataset.name, "Success Rate");
        assert_eq!(dataset.points.len(), 150);
        assert_eq!(x[0], 1.);
        assert_eq!(x[149], 1. + 149. / 20.);
        for p in &dataset.points {
            assert!(p.y >= 0. && p.y <= 1.);
            assert!((p.y - sigmoid(2. * p.x - 4.)).abs() <= 0.05 + 1e-12);
        }

        let fit = fit_logistic_curve(Data::new(&x, &y).unwrap(), 2., -4.).unwrap();
        // the generating curve explains the outcomes far better than their mean
        assert!(fit.r2 > 0. && fit.r2 <= 1.);
    }

    #[test]
    fn class_datasets_feed_the_heuristic_fit() {
        let mut rng = seeded_rng(47);
        let classes = class_datasets_with_rng(&mut rng);
        let names = classes.iter().map(|c| c.name.as_str()).collect::<Vec<_>>();

        assert_eq!(names, vec!["Class A", "Class B"]);
        for (class, &(x_low, z_low)) in classes.iter().zip(&[(10., 5.), (15., 8.)]) {
            let (x, y, z) = space_columns(&class.points);
            let fit = fit_multiple(Data::new(&x, &y).unwrap(), &z).unwrap();

            assert_eq!(class.points.len(), 80);
            assert!(x.iter().all(|&x| x >= x_low && x < x_low + 15.));
            assert!(z.iter().all(|&z| z >= z_low && z < z_low + 10.));
            assert!(fit.standard_error.is_finite());
            assert_eq!(fit.secondary_slope, Some(0.3));
        }
    }
}
