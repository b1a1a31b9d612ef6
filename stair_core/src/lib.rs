//! # stair_core - Stair Geometry Calculation Engine
//!
//! `stair_core` is the computational heart of Stairwise. It picks the number
//! of steps, the tread overhang and the pitch of a staircase that best match
//! a set of ergonomic targets, and turns the chosen design into stringer cut
//! values. All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, never NaN in a result
//! - **Metric**: Millimetres and degrees throughout
//!
//! ## Quick Start
//!
//! ```rust
//! use stair_core::optimizer::solve;
//! use stair_core::problem::StairProblem;
//!
//! let problem = StairProblem::example();
//! let result = solve(&problem).unwrap();
//!
//! println!(
//!     "{} steps of {:.1} mm, {:.1}° pitch",
//!     result.params.number_of_steps,
//!     result.derived.step_height,
//!     result.params.inclination_angle,
//! );
//! ```
//!
//! ## Modules
//!
//! - [`problem`] - Targets, bounds and the input bundle
//! - [`geometry`] - Constants, decision variables and derived dimensions
//! - [`optimizer`] - Cost function, initial guess and the constrained search
//! - [`calculations`] - Manual layout and stringer cut values
//! - [`profile`] - Side-view coordinates for diagram renderers
//! - [`settings`] - Solver configuration
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod errors;
pub mod geometry;
pub mod optimizer;
pub mod problem;
pub mod profile;
pub mod settings;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use errors::{StairError, StairResult};
pub use geometry::{DerivedGeometry, StairConstants, StairParams};
pub use optimizer::{solve, SolverResult};
pub use problem::{StairBounds, StairProblem, StairTargets};
pub use settings::SolverSettings;
