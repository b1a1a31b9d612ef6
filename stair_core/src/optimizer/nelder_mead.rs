//! Nelder-Mead refinement through `argmin`.
//!
//! The simplex itself is unbounded; problems handed to [`minimize`] are
//! expected to map any trial point onto their own feasible set. The box
//! given here only shapes the starting simplex.

use argmin::core::{CostFunction, Executor, State, TerminationReason, TerminationStatus};
use argmin::solver::neldermead::NelderMead;
use serde::{Deserialize, Serialize};

use crate::errors::{StairError, StairResult};

/// Configuration for the simplex search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimplexConfig {
    /// Maximum number of simplex iterations
    pub max_iters: u64,

    /// Converged when the standard deviation of the vertex costs drops below this
    pub sd_tolerance: f64,

    /// Initial simplex edge as a fraction of each box width
    pub initial_step: f64,
}

impl Default for SimplexConfig {
    fn default() -> Self {
        SimplexConfig {
            max_iters: 400,
            sd_tolerance: 1e-10,
            initial_step: 0.1,
        }
    }
}

impl SimplexConfig {
    pub fn validate(&self) -> StairResult<()> {
        if self.max_iters == 0 {
            return Err(StairError::invalid_parameter(
                "simplex.max_iters",
                "0",
                "At least one iteration is required",
            ));
        }
        if !self.sd_tolerance.is_finite() || self.sd_tolerance < 0.0 {
            return Err(StairError::invalid_parameter(
                "simplex.sd_tolerance",
                self.sd_tolerance.to_string(),
                "Tolerance must be finite and non-negative",
            ));
        }
        if !self.initial_step.is_finite() || self.initial_step <= 0.0 || self.initial_step > 1.0 {
            return Err(StairError::invalid_parameter(
                "simplex.initial_step",
                self.initial_step.to_string(),
                "Initial step must be in (0, 1]",
            ));
        }
        Ok(())
    }
}

/// Best point found by [`minimize`].
#[derive(Debug, Clone, PartialEq)]
pub struct Minimum {
    pub x: Vec<f64>,
    pub value: f64,
    pub iterations: u64,
    pub evaluations: u64,
    /// False if the iteration limit stopped the search
    pub converged: bool,
}

/// Minimize `problem` with a simplex seeded at `seed`.
///
/// # Errors
///
/// * `InvalidParameter` - `seed`, `lower` and `upper` differ in length
/// * any error raised by the cost function, unchanged
/// * `SolverFailure` - argmin could not run the search
pub fn minimize<P>(
    problem: P,
    seed: Vec<f64>,
    lower: &[f64],
    upper: &[f64],
    config: &SimplexConfig,
) -> StairResult<Minimum>
where
    P: CostFunction<Param = Vec<f64>, Output = f64>,
{
    if seed.len() != lower.len() || seed.len() != upper.len() {
        return Err(StairError::invalid_parameter(
            "seed",
            seed.len().to_string(),
            "Seed and box must have the same dimension",
        ));
    }

    let vertices = initial_simplex(seed, lower, upper, config.initial_step);
    let solver = NelderMead::new(vertices).with_sd_tolerance(config.sd_tolerance)?;

    let result = Executor::new(problem, solver)
        .configure(|state| state.max_iters(config.max_iters))
        .run()?;
    let state = result.state();

    let x = state
        .get_best_param()
        .cloned()
        .ok_or_else(|| StairError::numeric_degenerate("simplex best point", f64::NAN))?;
    let converged = matches!(
        state.get_termination_status(),
        TerminationStatus::Terminated(TerminationReason::SolverConverged)
    );
    let evaluations = state
        .get_func_counts()
        .get("cost_count")
        .copied()
        .unwrap_or_default();

    Ok(Minimum {
        x,
        value: state.get_best_cost(),
        iterations: state.get_iter(),
        evaluations,
        converged,
    })
}

/// Seed plus one vertex per axis, stepping inward when a step would leave the box.
fn initial_simplex(seed: Vec<f64>, lower: &[f64], upper: &[f64], step: f64) -> Vec<Vec<f64>> {
    let mut vertices = Vec::with_capacity(seed.len() + 1);
    for axis in 0..seed.len() {
        let width = upper[axis] - lower[axis];
        let delta = step * if width > 0.0 { width } else { 1.0 };
        let mut vertex = seed.clone();
        vertex[axis] = if seed[axis] + delta <= upper[axis] {
            seed[axis] + delta
        } else {
            seed[axis] - delta
        };
        vertices.push(vertex);
    }
    vertices.insert(0, seed);
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use argmin::core::Error;

    struct Bowl {
        center: [f64; 2],
    }

    impl CostFunction for Bowl {
        type Param = Vec<f64>;
        type Output = f64;

        fn cost(&self, x: &Self::Param) -> Result<Self::Output, Error> {
            Ok((x[0] - self.center[0]).powi(2) + (x[1] - self.center[1]).powi(2))
        }
    }

    struct Broken;

    impl CostFunction for Broken {
        type Param = Vec<f64>;
        type Output = f64;

        fn cost(&self, _x: &Self::Param) -> Result<Self::Output, Error> {
            Err(StairError::numeric_degenerate("cost", f64::INFINITY).into())
        }
    }

    #[test]
    fn finds_bowl_minimum() {
        let bowl = Bowl { center: [1.0, -2.0] };
        let config = SimplexConfig::default();
        let min = minimize(bowl, vec![4.0, 4.0], &[-5.0, -5.0], &[5.0, 5.0], &config).unwrap();
        assert!(min.converged);
        assert!((min.x[0] - 1.0).abs() < 1e-3);
        assert!((min.x[1] + 2.0).abs() < 1e-3);
        assert!(min.value < 1e-6);
        assert!(min.evaluations >= 3);
    }

    #[test]
    fn iteration_limit_reports_not_converged() {
        let config = SimplexConfig {
            max_iters: 1,
            ..SimplexConfig::default()
        };
        let bowl = Bowl { center: [0.0, 0.0] };
        let min = minimize(bowl, vec![3.0, 3.0], &[-5.0, -5.0], &[5.0, 5.0], &config).unwrap();
        assert!(!min.converged);
        assert!(min.iterations <= 1);
    }

    #[test]
    fn cost_errors_pass_through() {
        let config = SimplexConfig::default();
        let err = minimize(Broken, vec![0.0], &[0.0], &[1.0], &config).unwrap_err();
        assert_eq!(err.error_code(), "NUMERIC_DEGENERATE");
    }

    #[test]
    fn dimension_mismatch_is_rejected() {
        let bowl = Bowl { center: [0.0, 0.0] };
        let config = SimplexConfig::default();
        let err = minimize(bowl, vec![0.0, 0.0], &[0.0], &[1.0], &config).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_PARAMETER");
    }

    #[test]
    fn initial_simplex_steps_inward_at_upper_edge() {
        let vertices = initial_simplex(vec![10.0, 0.5], &[0.0, 0.0], &[10.0, 1.0], 0.1);
        assert_eq!(vertices.len(), 3);
        assert_eq!(vertices[0], vec![10.0, 0.5]);
        assert_eq!(vertices[1], vec![9.0, 0.5]);
        assert_eq!(vertices[2], vec![10.0, 0.6]);
    }

    #[test]
    fn initial_simplex_spans_pinned_axis() {
        let vertices = initial_simplex(vec![5.0, 0.0], &[5.0, 0.0], &[5.0, 1.0], 0.1);
        assert_eq!(vertices[1], vec![4.9, 0.0]);
    }

    #[test]
    fn config_validation() {
        assert!(SimplexConfig::default().validate().is_ok());
        let bad = SimplexConfig {
            sd_tolerance: -1.0,
            ..SimplexConfig::default()
        };
        assert!(bad.validate().is_err());
        let bad = SimplexConfig {
            max_iters: 0,
            ..SimplexConfig::default()
        };
        assert!(bad.validate().is_err());
    }
}
