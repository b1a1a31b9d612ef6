//! Step-count enumeration with a bounded continuous search per count.

use argmin::core::{CostFunction, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::errors::{StairError, StairResult};
use crate::geometry::{derive, stringer_throat, DerivedGeometry, StairParams};
use crate::problem::{StairProblem, StairTargets};
use crate::units::Degrees;

use super::cost::{cost_of, CostWeights};
use super::initial::initial_guess;
use super::nelder_mead::{self, Minimum};

/// Slack (mm) allowed on the hard limits for floating point round-off.
const LIMIT_TOLERANCE: f64 = 1e-9;

/// Outcome of a successful solve.
///
/// ## JSON Example
///
/// ```json
/// {
///   "params": { "number_of_steps": 8, "overhang": 12.4, "inclination_angle": 40.3 },
///   "derived": {
///     "step_height": 250.0,
///     "step_cut_depth": 294.1,
///     "tread_depth": 306.5,
///     "total_rise": 2000.0,
///     "total_run": 2452.0
///   },
///   "cost": 19.7,
///   "stats": { "evaluations": 812, "step_counts_tried": 10, "step_counts_feasible": 3 },
///   "candidates": [ { "number_of_steps": 8, "cost": 19.7, "converged": true } ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverResult {
    pub params: StairParams,
    pub derived: DerivedGeometry,
    /// Weighted sum of squared percentage residuals (>= 0)
    pub cost: f64,
    pub stats: SearchStats,
    /// Best candidate for every feasible step count, in ascending step order
    pub candidates: Vec<Candidate>,
}

/// Bookkeeping from one solve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Cost function evaluations across all step counts
    pub evaluations: u64,
    pub step_counts_tried: u32,
    pub step_counts_feasible: u32,
}

/// Best design found for a single step count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub number_of_steps: u32,
    pub cost: f64,
    /// False if the simplex hit its iteration limit
    pub converged: bool,
}

/// Hard constraints every accepted design must meet.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Constraints {
    min_step_depth: f64,
    max_step_depth: f64,
    max_run: f64,
    joist_width: f64,
    min_stringer_thickness: f64,
}

impl Constraints {
    pub(crate) fn new(problem: &StairProblem) -> Self {
        Constraints {
            min_step_depth: problem.bounds.min_step_depth,
            max_step_depth: problem.bounds.max_step_depth,
            max_run: problem.bounds.max_run,
            joist_width: problem.constants.joist_width,
            min_stringer_thickness: problem.bounds.min_stringer_thickness,
        }
    }

    pub(crate) fn admits(&self, params: &StairParams, derived: &DerivedGeometry) -> bool {
        let throat = stringer_throat(self.joist_width, derived.step_height, params.angle());
        derived.tread_depth >= self.min_step_depth - LIMIT_TOLERANCE
            && derived.tread_depth <= self.max_step_depth + LIMIT_TOLERANCE
            && derived.total_run <= self.max_run + LIMIT_TOLERANCE
            && throat >= self.min_stringer_thickness - LIMIT_TOLERANCE
    }
}

/// Find the step count, overhang and pitch with the lowest cost that meet
/// every hard constraint.
///
/// Step counts are enumerated. For each, the feasible (overhang, pitch)
/// region is worked out up front and searched in coordinates that only
/// reach feasible designs: a grid seeds argmin's Nelder-Mead, which refines
/// the best grid point. Ties go to the smaller step count.
///
/// # Errors
///
/// * `InvalidParameter` / `OutOfBounds` - the problem fails validation
/// * `Infeasible` - no step count admits a design meeting every constraint
///
/// # Example
///
/// ```rust
/// use stair_core::optimizer::solve;
/// use stair_core::problem::StairProblem;
///
/// let result = solve(&StairProblem::example()).unwrap();
/// assert_eq!(result.params.number_of_steps, 8);
/// assert!(result.derived.total_run <= 4000.0);
/// ```
#[instrument(skip_all, fields(label = %problem.label))]
pub fn solve(problem: &StairProblem) -> StairResult<SolverResult> {
    problem.validate()?;
    let start = initial_guess(&problem.bounds)?;
    debug!(?start, "initial guess");

    let constraints = Constraints::new(problem);
    let mut best: Option<(StairParams, DerivedGeometry, f64)> = None;
    let mut candidates = Vec::new();
    let mut stats = SearchStats {
        evaluations: 0,
        step_counts_tried: 0,
        step_counts_feasible: 0,
    };

    for steps in problem.bounds.min_steps..=problem.bounds.max_steps {
        stats.step_counts_tried += 1;
        let Some(found) = solve_for_steps(problem, &constraints, steps, &start, &mut stats)? else {
            continue;
        };
        stats.step_counts_feasible += 1;
        candidates.push(Candidate {
            number_of_steps: steps,
            cost: found.cost,
            converged: found.converged,
        });
        debug!(
            steps,
            cost = found.cost,
            overhang = found.params.overhang,
            angle = found.params.inclination_angle,
            "step count solved"
        );

        if best.as_ref().map_or(true, |(_, _, c)| found.cost < *c) {
            best = Some((found.params, found.derived, found.cost));
        }
    }

    let Some((params, derived, cost)) = best else {
        return Err(StairError::infeasible(format!(
            "no design with {} to {} steps meets the step height, tread depth, run and stringer limits",
            problem.bounds.min_steps, problem.bounds.max_steps
        )));
    };

    info!(
        steps = params.number_of_steps,
        overhang = params.overhang,
        angle = params.inclination_angle,
        cost,
        evaluations = stats.evaluations,
        "stair solved"
    );

    Ok(SolverResult {
        params,
        derived,
        cost,
        stats,
        candidates,
    })
}

struct StepSolution {
    params: StairParams,
    derived: DerivedGeometry,
    cost: f64,
    converged: bool,
}

fn solve_for_steps(
    problem: &StairProblem,
    constraints: &Constraints,
    steps: u32,
    start: &StairParams,
    stats: &mut SearchStats,
) -> StairResult<Option<StepSolution>> {
    let bounds = &problem.bounds;
    let step_height = problem.constants.total_rise / f64::from(steps);

    if step_height < bounds.min_step_height || step_height > bounds.max_step_height {
        debug!(steps, step_height, "rejected: step height outside bounds");
        return Ok(None);
    }
    if step_height <= problem.constants.tread_thickness {
        debug!(steps, step_height, "rejected: rise not taller than the tread");
        return Ok(None);
    }

    let Some(region) = FeasibleRegion::new(problem, steps, step_height) else {
        debug!(steps, "rejected: empty feasible region");
        return Ok(None);
    };

    let search = StepSearch {
        steps,
        region,
        total_rise: problem.constants.total_rise,
        targets: problem.targets,
        weights: problem.settings.weights,
    };
    let lower = [region.overhang.0, 0.0];
    let upper = [region.overhang.1, 1.0];

    // Seed from a coarse grid plus the global starting point.
    let n = problem.settings.grid_points;
    let mut seed = region.coordinates(start);
    let mut seed_cost = search.evaluate(&seed)?;
    stats.evaluations += 1;
    for i in 0..n {
        for j in 0..n {
            let t_i = i as f64 / (n - 1) as f64;
            let t_j = j as f64 / (n - 1) as f64;
            let x = [lower[0] + t_i * (upper[0] - lower[0]), t_j];
            let c = search.evaluate(&x)?;
            stats.evaluations += 1;
            if c < seed_cost {
                seed = x;
                seed_cost = c;
            }
        }
    }

    let Minimum {
        x,
        value,
        evaluations,
        converged,
        ..
    } = nelder_mead::minimize(search, seed.to_vec(), &lower, &upper, &problem.settings.simplex)?;
    stats.evaluations += evaluations;

    let params = region.params(steps, &x);
    let derived = derive(&params, problem.constants.total_rise)?;
    if !constraints.admits(&params, &derived) {
        return Err(StairError::numeric_degenerate("search result", value));
    }

    Ok(Some(StepSolution {
        params,
        derived,
        cost: value,
        converged,
    }))
}

/// Designs meeting every hard limit for one step count.
///
/// With overhang `o` and notch cut `c`, the tread depth is `o + c` and the
/// pitch is `atan(step_height / c)`. The angle bounds and the stringer
/// throat bound the pitch, hence `c`, to `cut`; the depth and run limits
/// bound `o + c` to `depth`. For each overhang in `overhang` the admissible
/// cuts form a non-empty interval.
#[derive(Debug, Clone, Copy)]
struct FeasibleRegion {
    step_height: f64,
    overhang: (f64, f64),
    cut: (f64, f64),
    depth: (f64, f64),
}

impl FeasibleRegion {
    /// Returns `None` if no design with this step count meets the limits.
    fn new(problem: &StairProblem, steps: u32, step_height: f64) -> Option<Self> {
        let bounds = &problem.bounds;
        let margin = problem.settings.angle_margin_deg;
        let mut angle_lo = bounds.min_angle.max(margin);
        let angle_hi = bounds.max_angle.min(90.0 - margin);

        // joist_width - step_height * cos(angle) >= min_stringer_thickness
        let available = problem.constants.joist_width - bounds.min_stringer_thickness;
        if available <= 0.0 {
            return None;
        }
        if available < step_height {
            angle_lo = angle_lo.max((available / step_height).acos().to_degrees());
        }
        if angle_lo > angle_hi {
            return None;
        }

        // Steeper pitch, shorter cut.
        let cut = (
            step_height / Degrees(angle_hi).tan(),
            step_height / Degrees(angle_lo).tan(),
        );
        let depth = (
            bounds.min_step_depth,
            bounds.max_step_depth.min(bounds.max_run / f64::from(steps)),
        );
        let overhang = (
            bounds.min_overhang.max(depth.0 - cut.1),
            bounds.max_overhang.min(depth.1 - cut.0),
        );
        if depth.0 > depth.1 || overhang.0 > overhang.1 {
            return None;
        }

        Some(FeasibleRegion {
            step_height,
            overhang,
            cut,
            depth,
        })
    }

    /// Pitch interval (degrees) open to a given overhang, shallowest first.
    fn pitch_range(&self, overhang: f64) -> (f64, f64) {
        let longest = self.cut.1.min(self.depth.1 - overhang);
        let shortest = self.cut.0.max(self.depth.0 - overhang);
        (
            Degrees::from_slope(self.step_height, longest).0,
            Degrees::from_slope(self.step_height, shortest).0,
        )
    }

    /// Design at search coordinates `x = [overhang, t]`, clamped into the region.
    fn params(&self, steps: u32, x: &[f64]) -> StairParams {
        let overhang = x[0].clamp(self.overhang.0, self.overhang.1);
        let t = x[1].clamp(0.0, 1.0);
        let (lo, hi) = self.pitch_range(overhang);
        StairParams::new(steps, overhang, lo + t * (hi - lo))
    }

    /// Search coordinates nearest to `params`.
    fn coordinates(&self, params: &StairParams) -> [f64; 2] {
        let overhang = params.overhang.clamp(self.overhang.0, self.overhang.1);
        let (lo, hi) = self.pitch_range(overhang);
        let t = if hi > lo {
            ((params.inclination_angle - lo) / (hi - lo)).clamp(0.0, 1.0)
        } else {
            0.5
        };
        [overhang, t]
    }
}

/// Cost over the feasible region of one step count, as an argmin problem.
struct StepSearch {
    steps: u32,
    region: FeasibleRegion,
    total_rise: f64,
    targets: StairTargets,
    weights: CostWeights,
}

impl StepSearch {
    fn evaluate(&self, x: &[f64]) -> StairResult<f64> {
        let params = self.region.params(self.steps, x);
        let derived = derive(&params, self.total_rise)?;
        cost_of(&params, &derived, &self.targets, &self.weights)
    }
}

impl CostFunction for StepSearch {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, x: &Self::Param) -> Result<Self::Output, Error> {
        Ok(self.evaluate(x)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::StairConstants;
    use crate::problem::{StairBounds, StairTargets};

    fn open_problem() -> StairProblem {
        StairProblem {
            label: "open".to_string(),
            constants: StairConstants {
                total_rise: 2000.0,
                joist_width: 300.0,
                tread_thickness: 40.0,
                backboard_thickness: 0.0,
            },
            targets: StairTargets {
                opt_step_height: 240.0,
                opt_step_depth: 300.0,
                opt_overhang: 10.0,
                opt_angle: 40.0,
            },
            bounds: StairBounds {
                min_steps: 1,
                max_steps: 10,
                min_overhang: 0.0,
                max_overhang: 50.0,
                min_step_height: 0.0,
                max_step_height: 3000.0,
                min_step_depth: 0.0,
                max_step_depth: 2000.0,
                max_run: 20000.0,
                min_stringer_thickness: 0.0,
                min_angle: 0.0,
                max_angle: 90.0,
            },
            settings: Default::default(),
        }
    }

    #[test]
    fn picks_step_count_nearest_ideal_height() {
        // 2000 / 240 = 8.33, so 8 steps of 250 mm
        let result = solve(&open_problem()).unwrap();
        assert_eq!(result.params.number_of_steps, 8);
        assert_eq!(result.derived.step_height, 250.0);
    }

    #[test]
    fn beats_the_reference_design() {
        // The hand-picked design [8, 10, 40] costs about 24.4
        let result = solve(&open_problem()).unwrap();
        assert!(result.cost < 24.36);
        assert!(result.cost >= 0.0);
    }

    #[test]
    fn respects_bounds() {
        let mut problem = open_problem();
        problem.bounds.min_steps = 9;
        problem.bounds.max_steps = 12;
        problem.bounds.min_overhang = 20.0;
        problem.bounds.max_overhang = 30.0;
        let result = solve(&problem).unwrap();
        assert!((9..=12).contains(&result.params.number_of_steps));
        assert!(result.params.overhang >= 20.0 && result.params.overhang <= 30.0);
    }

    #[test]
    fn run_limit_is_hard() {
        let mut problem = open_problem();
        problem.bounds.max_run = 2000.0;
        let result = solve(&problem).unwrap();
        assert!(result.derived.total_run <= 2000.0 + 1e-9);
    }

    #[test]
    fn stringer_throat_is_hard() {
        let mut problem = open_problem();
        problem.bounds.min_stringer_thickness = 150.0;
        let result = solve(&problem).unwrap();
        let throat = stringer_throat(
            problem.constants.joist_width,
            result.derived.step_height,
            result.params.angle(),
        );
        assert!(throat >= 150.0 - 1e-9);
    }

    #[test]
    fn tread_depth_bounds_are_hard() {
        let mut problem = open_problem();
        problem.bounds.min_step_depth = 320.0;
        problem.bounds.max_step_depth = 340.0;
        let result = solve(&problem).unwrap();
        assert!(result.derived.tread_depth >= 320.0 - 1e-9);
        assert!(result.derived.tread_depth <= 340.0 + 1e-9);
    }

    #[test]
    fn inverted_step_bounds_fail() {
        let mut problem = open_problem();
        problem.bounds.min_steps = 11;
        problem.bounds.max_steps = 3;
        assert_eq!(solve(&problem).unwrap_err().error_code(), "OUT_OF_BOUNDS");
    }

    #[test]
    fn impossible_run_is_infeasible() {
        let mut problem = open_problem();
        problem.bounds.min_step_depth = 200.0;
        problem.bounds.max_run = 100.0;
        assert_eq!(solve(&problem).unwrap_err().error_code(), "INFEASIBLE");
    }

    #[test]
    fn narrow_joist_is_infeasible() {
        let mut problem = open_problem();
        problem.constants.joist_width = 50.0;
        problem.bounds.min_stringer_thickness = 60.0;
        assert_eq!(solve(&problem).unwrap_err().error_code(), "INFEASIBLE");
    }

    #[test]
    fn candidates_cover_feasible_counts() {
        let result = solve(&open_problem()).unwrap();
        assert_eq!(result.stats.step_counts_tried, 10);
        assert_eq!(result.candidates.len() as u32, result.stats.step_counts_feasible);
        let best = result
            .candidates
            .iter()
            .map(|c| c.cost)
            .fold(f64::INFINITY, f64::min);
        assert_eq!(best, result.cost);
        assert!(result.stats.evaluations > 0);
    }

    #[test]
    fn pinned_tread_depth_finds_the_optimum() {
        let mut problem = StairProblem::example();
        problem.bounds.min_step_depth = 300.0;
        problem.bounds.max_step_depth = 300.0;
        let result = solve(&problem).unwrap();

        // [8, 10, atan(250 / 290)] has a 300 mm tread and a 110.6 mm throat
        let witness = StairParams::new(8, 10.0, Degrees::from_slope(250.0, 290.0).0);
        let witness_cost = cost_of(
            &witness,
            &derive(&witness, 2000.0).unwrap(),
            &problem.targets,
            &CostWeights::default(),
        )
        .unwrap();
        assert!((witness_cost - 21.005).abs() < 1e-2);

        assert_eq!(result.params.number_of_steps, 8);
        assert!(result.cost <= witness_cost);
        assert!((result.derived.tread_depth - 300.0).abs() < 1e-9);
    }

    #[test]
    fn run_limit_at_the_witness_finds_the_optimum() {
        let mut problem = StairProblem::example();
        problem.bounds.min_steps = 8;
        problem.bounds.max_steps = 8;
        problem.bounds.min_step_depth = 300.0;
        problem.bounds.max_run = 2400.5;
        let result = solve(&problem).unwrap();
        assert!(result.cost < 21.1);
        assert!(result.derived.total_run <= 2400.5 + 1e-9);
        assert!(result.derived.tread_depth >= 300.0 - 1e-9);
    }

    #[test]
    fn rise_must_exceed_tread_thickness() {
        let mut problem = StairProblem::example();
        problem.constants.tread_thickness = 260.0;
        let result = solve(&problem).unwrap();
        // 8 steps of 250 mm would leave no first rise on the stringer
        assert_eq!(result.params.number_of_steps, 7);
        assert!(result.derived.step_height > 260.0);
    }

    #[test]
    fn region_applies_throat_limit() {
        let mut problem = open_problem();
        problem.bounds.min_stringer_thickness = 200.0;
        // 100 mm available on a 250 mm rise: cos(angle) <= 0.4
        let region = FeasibleRegion::new(&problem, 8, 250.0).unwrap();
        let steepest_cut = 250.0 / 0.4f64.acos().tan();
        assert!((region.cut.1 - steepest_cut).abs() < 1e-9);
    }

    #[test]
    fn region_is_empty_when_run_is_too_short() {
        let mut problem = open_problem();
        problem.bounds.min_step_depth = 300.0;
        problem.bounds.max_run = 8.0 * 299.0;
        assert!(FeasibleRegion::new(&problem, 8, 250.0).is_none());
    }

    #[test]
    fn region_coordinates_only_reach_feasible_designs() {
        let mut problem = StairProblem::example();
        problem.bounds.min_step_depth = 280.0;
        problem.bounds.max_step_depth = 310.0;
        problem.bounds.max_run = 2450.0;
        let constraints = Constraints::new(&problem);
        let region = FeasibleRegion::new(&problem, 8, 250.0).unwrap();

        for i in 0..=10 {
            for j in 0..=10 {
                // Includes points outside the unit box, which are clamped.
                let span = region.overhang.1 - region.overhang.0 + 10.0;
                let x = [
                    region.overhang.0 - 5.0 + f64::from(i) * span / 10.0,
                    f64::from(j) / 8.0 - 0.1,
                ];
                let params = region.params(8, &x);
                let derived = derive(&params, 2000.0).unwrap();
                assert!(constraints.admits(&params, &derived), "{params:?}");
            }
        }
    }

    #[test]
    fn region_coordinates_round_trip() {
        let problem = StairProblem::example();
        let region = FeasibleRegion::new(&problem, 8, 250.0).unwrap();
        let params = region.params(8, &[12.0, 0.3]);
        let x = region.coordinates(&params);
        assert!((x[0] - 12.0).abs() < 1e-12);
        assert!((x[1] - 0.3).abs() < 1e-9);
    }
}
