//! # Stair Optimizer
//!
//! Chooses the number of steps, the nosing overhang and the pitch that best
//! match a set of ideal values.
//!
//! - [`cost`] - percentage-deviation cost of a candidate
//! - [`initial`] - feasible starting point from the bounds
//! - [`nelder_mead`] - argmin Nelder-Mead used for the continuous variables
//! - [`solve`] - outer enumeration over step counts
//!
//! The step count is never relaxed to a real number; each integer count in
//! the bounds gets its own continuous search over (overhang, pitch), carried
//! out in coordinates that cover exactly the feasible designs.

pub mod cost;
pub mod initial;
pub mod nelder_mead;
mod solver;

pub use cost::{cost, weighted_cost, CostWeights};
pub use initial::initial_guess;
pub use solver::{solve, Candidate, SearchStats, SolverResult};
