//! Statistics core for the interactive correlation, regression and chi-square pages.
//!
//! Every engine in this crate is a pure function of its inputs: feed it observations (or
//! generation parameters) and it hands back a freshly built result record. Rendering, animation
//! and UI state live elsewhere and only ever talk to this crate through plain numbers and the
//! serializable records defined here.
//!
//! The pieces:
//!
//! - [`stats::univariate`]: descriptive statistics over a [`Sample`](stats::univariate::Sample)
//! - [`stats::bivariate`]: Pearson correlation, least squares fits and the correlated-data
//!   synthesizer
//! - [`stats::logistic`]: sigmoid scoring, cross-entropy, gradients and a gradient descent driver
//! - [`stats::contingency`]: contingency tables and the chi-square test of independence
//! - [`csv_import`]: the 2x2 contingency table CSV format
//! - [`datasets`]: the synthetic datasets the pages start out with
//!
//! Define the `STATLAB_DEBUG` environment variable to get per-iteration tracing out of the
//! gradient descent driver (through the `log` facade; installing a logger is up to the caller).

#![warn(missing_docs)]
#![allow(clippy::many_single_char_names, clippy::just_underscores_and_digits)]

#[cfg(test)]
extern crate approx;
#[cfg(test)]
extern crate quickcheck;

#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

mod config;
mod error;

pub mod csv_import;
pub mod datasets;
pub mod stats;

pub use crate::config::Config;
pub use crate::error::{log_error, Degenerate, Error, Result};
pub use crate::stats::bivariate::regression::{ConfidenceInterval, Model, RegressionResult};
pub use crate::stats::contingency::{ChiSquareResult, ContingencyTable};
pub use crate::stats::logistic::{Class, Gradient, LabeledPoint, Weights};

lazy_static! {
    static ref DEBUG_ENABLED: bool = std::env::var_os("STATLAB_DEBUG").is_some();
}

fn debug_enabled() -> bool {
    *DEBUG_ENABLED
}
