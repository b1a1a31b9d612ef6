//! Percentage-deviation cost of a candidate stair.
//!
//! Each of step height, tread depth, overhang and inclination is expressed
//! as a percentage of its ideal value; the cost is the (weighted) sum of
//! squared deviations from 100 %.

use serde::{Deserialize, Serialize};

use crate::errors::{StairError, StairResult};
use crate::geometry::{derive, DerivedGeometry, StairParams};
use crate::problem::StairTargets;

/// Per-residual weights. All ones reproduces the plain sum of squares.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostWeights {
    pub step_height: f64,
    pub step_depth: f64,
    pub overhang: f64,
    pub angle: f64,
}

impl Default for CostWeights {
    fn default() -> Self {
        CostWeights {
            step_height: 1.0,
            step_depth: 1.0,
            overhang: 1.0,
            angle: 1.0,
        }
    }
}

impl CostWeights {
    fn as_array(&self) -> [f64; 4] {
        [self.step_height, self.step_depth, self.overhang, self.angle]
    }

    pub fn validate(&self) -> StairResult<()> {
        let weights = self.as_array();
        if let Some(w) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(StairError::invalid_parameter(
                "weights",
                w.to_string(),
                "Weights must be non-negative and finite",
            ));
        }
        if weights.iter().all(|w| *w == 0.0) {
            return Err(StairError::invalid_parameter(
                "weights",
                "0",
                "At least one weight must be non-zero",
            ));
        }
        Ok(())
    }
}

/// Signed percentage residuals `derived / ideal * 100 - 100`, in the order
/// step height, tread depth, overhang, angle.
pub fn residuals(
    params: &StairParams,
    derived: &DerivedGeometry,
    targets: &StairTargets,
) -> StairResult<[f64; 4]> {
    targets.validate()?;
    let pairs = [
        (derived.step_height, targets.opt_step_height),
        (derived.tread_depth, targets.opt_step_depth),
        (params.overhang, targets.opt_overhang),
        (params.inclination_angle, targets.opt_angle),
    ];
    Ok(pairs.map(|(actual, ideal)| actual / ideal * 100.0 - 100.0))
}

/// Unweighted cost of `params` for a flight of `total_rise`.
///
/// # Example
///
/// ```rust
/// use stair_core::geometry::StairParams;
/// use stair_core::optimizer::cost::cost;
/// use stair_core::problem::StairTargets;
///
/// let targets = StairTargets {
///     opt_step_height: 240.0,
///     opt_step_depth: 300.0,
///     opt_overhang: 10.0,
///     opt_angle: 40.0,
/// };
/// let c = cost(&StairParams::new(8, 10.0, 40.0), &targets, 2000.0).unwrap();
/// assert!((c - 24.4).abs() < 0.1);
/// ```
///
/// # Errors
///
/// * `InvalidParameter` - a non-positive ideal value, non-positive rise or zero steps
/// * `NumericDegenerate` - angle not strictly inside (0, 90) degrees
pub fn cost(params: &StairParams, targets: &StairTargets, total_rise: f64) -> StairResult<f64> {
    weighted_cost(params, targets, total_rise, &CostWeights::default())
}

/// Cost with each squared residual scaled by its weight.
pub fn weighted_cost(
    params: &StairParams,
    targets: &StairTargets,
    total_rise: f64,
    weights: &CostWeights,
) -> StairResult<f64> {
    let derived = derive(params, total_rise)?;
    cost_of(params, &derived, targets, weights)
}

/// Cost for geometry that has already been derived.
pub(crate) fn cost_of(
    params: &StairParams,
    derived: &DerivedGeometry,
    targets: &StairTargets,
    weights: &CostWeights,
) -> StairResult<f64> {
    let r = residuals(params, derived, targets)?;
    let total: f64 = r
        .iter()
        .zip(weights.as_array())
        .map(|(r, w)| w * r * r)
        .sum();
    if !total.is_finite() {
        return Err(StairError::numeric_degenerate("cost", total));
    }
    Ok(total)
}
