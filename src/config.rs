use std::convert::TryFrom;

/// Tunable constants shared by the engines and the dataset generators
///
/// Build one with `Config::default()` and the consuming setters:
///
/// ```
/// let config = statlab::Config::default()
///     .learning_rate(0.5)
///     .max_iterations(250)
///     .tolerance(1e-6);
/// assert_eq!(config.max_iterations, 250);
/// ```
///
/// Deserializing applies the same range checks as the setters, and fails instead of panicking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "UncheckedConfig")]
pub struct Config {
    /// Multiplier of the standard error in the intercept interval
    pub confidence_z: f64,
    /// Fixed coefficient of the second predictor in the heuristic multiple regression
    pub secondary_coefficient: f64,
    /// Predictions are clamped into `[epsilon, 1 - epsilon]` before taking logarithms
    pub probability_epsilon: f64,
    /// Step size of gradient descent
    pub learning_rate: f64,
    /// Upper bound on gradient descent steps
    pub max_iterations: usize,
    /// Stop gradient descent once the cost changes by less than this
    pub tolerance: Option<f64>,
    /// Number of points in a synthesized dataset
    pub sample_size: usize,
    /// Number of bins in the predicted probability histogram
    pub histogram_bins: usize,
}

// `Config` as it comes off the wire, before the range checks
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UncheckedConfig {
    confidence_z: f64,
    secondary_coefficient: f64,
    probability_epsilon: f64,
    learning_rate: f64,
    max_iterations: usize,
    tolerance: Option<f64>,
    sample_size: usize,
    histogram_bins: usize,
}

impl TryFrom<UncheckedConfig> for Config {
    type Error = String;

    fn try_from(raw: UncheckedConfig) -> ::std::result::Result<Config, String> {
        let config = Config {
            confidence_z: raw.confidence_z,
            secondary_coefficient: raw.secondary_coefficient,
            probability_epsilon: raw.probability_epsilon,
            learning_rate: raw.learning_rate,
            max_iterations: raw.max_iterations,
            tolerance: raw.tolerance,
            sample_size: raw.sample_size,
            histogram_bins: raw.histogram_bins,
        };

        match config.out_of_range() {
            Some(field) => Err(format!("{} is out of range", field)),
            None => Ok(config),
        }
    }
}

impl Default for Config {
    fn default() -> Config {
        Config {
            confidence_z: 1.96,
            secondary_coefficient: 0.3,
            probability_epsilon: 1e-15,
            learning_rate: 0.1,
            max_iterations: 100,
            tolerance: None,
            sample_size: 50,
            histogram_bins: 20,
        }
    }
}

impl Config {
    // The first field, by its serialized name, that a setter would reject
    fn out_of_range(&self) -> Option<&'static str> {
        if !(self.confidence_z.is_finite() && self.confidence_z > 0.) {
            Some("confidenceZ")
        } else if !self.secondary_coefficient.is_finite() {
            Some("secondaryCoefficient")
        } else if !(self.probability_epsilon > 0. && self.probability_epsilon < 0.5) {
            Some("probabilityEpsilon")
        } else if !(self.learning_rate.is_finite() && self.learning_rate > 0.) {
            Some("learningRate")
        } else if self.max_iterations == 0 {
            Some("maxIterations")
        } else if self
            .tolerance
            .map_or(false, |t| !(t.is_finite() && t >= 0.))
        {
            Some("tolerance")
        } else if self.sample_size < 2 {
            Some("sampleSize")
        } else if self.histogram_bins == 0 {
            Some("histogramBins")
        } else {
            None
        }
    }

    /// Changes the multiplier used for the intercept interval
    ///
    /// # Panics
    ///
    /// Panics if `z` is not a positive finite number
    #[must_use]
    pub fn confidence_z(mut self, z: f64) -> Config {
        assert!(z.is_finite() && z > 0.);

        self.confidence_z = z;
        self
    }

    /// Changes the fixed coefficient of the second predictor
    ///
    /// # Panics
    ///
    /// Panics if `coefficient` is not finite
    #[must_use]
    pub fn secondary_coefficient(mut self, coefficient: f64) -> Config {
        assert!(coefficient.is_finite());

        self.secondary_coefficient = coefficient;
        self
    }

    /// Changes the clamp used for the cross-entropy logarithms
    ///
    /// # Panics
    ///
    /// Panics if `epsilon` is not in the `(0, 0.5)` range
    #[must_use]
    pub fn probability_epsilon(mut self, epsilon: f64) -> Config {
        assert!(epsilon > 0. && epsilon < 0.5);

        self.probability_epsilon = epsilon;
        self
    }

    /// Changes the gradient descent step size
    ///
    /// # Panics
    ///
    /// Panics if `rate` is not a positive finite number
    #[must_use]
    pub fn learning_rate(mut self, rate: f64) -> Config {
        assert!(rate.is_finite() && rate > 0.);

        self.learning_rate = rate;
        self
    }

    /// Changes the maximum number of gradient descent steps
    ///
    /// # Panics
    ///
    /// Panics if `n` is zero
    #[must_use]
    pub fn max_iterations(mut self, n: usize) -> Config {
        assert!(n > 0);

        self.max_iterations = n;
        self
    }

    /// Stops gradient descent early once the cost delta drops below `tolerance`
    ///
    /// # Panics
    ///
    /// Panics if `tolerance` is negative or not finite
    #[must_use]
    pub fn tolerance(mut self, tolerance: f64) -> Config {
        assert!(tolerance.is_finite() && tolerance >= 0.);

        self.tolerance = Some(tolerance);
        self
    }

    /// Changes the number of points per synthesized dataset
    ///
    /// # Panics
    ///
    /// Panics if `n` is less than 2
    #[must_use]
    pub fn sample_size(mut self, n: usize) -> Config {
        assert!(n >= 2);

        self.sample_size = n;
        self
    }

    /// Changes the number of bins of the probability histogram
    ///
    /// # Panics
    ///
    /// Panics if `bins` is zero
    #[must_use]
    pub fn histogram_bins(mut self, bins: usize) -> Config {
        assert!(bins > 0);

        self.histogram_bins = bins;
        self
    }
}
