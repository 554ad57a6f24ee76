use crate::config::Config;
use crate::error::Result;
use crate::stats::logistic::{cost_with, gradient, gradient_descent_step, LabeledPoint, Weights};

/// Outcome of a gradient descent run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Training {
    /// Weights after the last update
    pub weights: Weights,
    /// Cost evaluated before each update, in order
    pub cost_history: Vec<f64>,
    /// Number of updates applied
    pub iterations: usize,
    /// `true` if the run ended because the cost delta fell below the tolerance
    pub converged: bool,
}

/// Runs batch gradient descent from `initial`
///
/// Each iteration evaluates the cost at the current weights (recorded in `cost_history`), then:
///
/// - stops without updating if `config.tolerance` is set and the cost moved by less than it
///   since the previous iteration
/// - stops without updating if `stop(iteration, &weights, cost)` returns `true`
/// - otherwise applies one update with `config.learning_rate`
///
/// At most `config.max_iterations` updates are applied.
pub fn train<F>(
    points: &[LabeledPoint],
    initial: Weights,
    config: &Config,
    mut stop: F,
) -> Result<Training>
where
    F: FnMut(usize, &Weights, f64) -> bool,
{
    let mut weights = initial;
    let mut cost_history: Vec<f64> = Vec::with_capacity(config.max_iterations);
    let mut converged = false;
    let mut iterations = 0;

    while iterations < config.max_iterations {
        let cost = cost_with(config, points, &weights)?;

        if let (Some(tolerance), Some(&previous)) = (config.tolerance, cost_history.last()) {
            if (previous - cost).abs() < tolerance {
                cost_history.push(cost);
                converged = true;
                break;
            }
        }
        cost_history.push(cost);

        if stop(iterations, &weights, cost) {
            break;
        }

        let g = gradient(points, &weights)?;
        weights = gradient_descent_step(&weights, &g, config.learning_rate);
        iterations += 1;

        if crate::debug_enabled() {
            trace!(
                "iteration {}: cost = {:.6}, w1 = {:.4}, w2 = {:.4}, bias = {:.4}",
                iterations,
                cost,
                weights.w1,
                weights.w2,
                weights.bias
            );
        }
    }

    debug!(
        "gradient descent finished after {} iterations (converged: {}), final cost {:?}",
        iterations,
        converged,
        cost_history.last()
    );

    Ok(Training {
        weights,
        cost_history,
        iterations,
        converged,
    })
}
