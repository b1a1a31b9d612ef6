//! # Stair Calculations
//!
//! Each calculation follows the pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable)
//! - `*Result` - Calculation results (JSON-serializable)
//! - `calculate(input) -> StairResult<*Result>` - Pure calculation function
//!
//! ## Available Calculations
//!
//! - [`layout`] - Manual layout from a known rise, run and step count
//! - [`stringer`] - Cut values for a notched stringer
//!
//! The optimizer lives in [`crate::optimizer`]; [`CalculationItem`] wraps
//! all three so a single JSON document can request any of them.

pub mod layout;
pub mod stringer;

use serde::{Deserialize, Serialize};

use crate::errors::StairResult;
use crate::optimizer::{solve, SolverResult};
use crate::problem::StairProblem;

// Re-export commonly used types
pub use layout::{LayoutInput, LayoutResult};
pub use stringer::{StringerCutInput, StringerCutResult};

/// Enum wrapper for all calculation types.
///
/// ## JSON Example
///
/// ```json
/// { "type": "Layout", "label": "Hall", "total_rise": 2720.0, "total_run": 4480.0, "number_of_steps": 16 }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CalculationItem {
    /// Optimize step count, overhang and pitch, then cut the stringer
    Optimize(StairProblem),
    /// Lay out a flight from known dimensions
    Layout(LayoutInput),
    /// Cut values for a given design
    Stringer(StringerCutInput),
}

/// Result of running a [`CalculationItem`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CalculationOutput {
    Optimize {
        solution: SolverResult,
        cuts: StringerCutResult,
    },
    Layout(LayoutResult),
    Stringer(StringerCutResult),
}

impl CalculationItem {
    /// Get the user-provided label for this calculation
    pub fn label(&self) -> &str {
        match self {
            CalculationItem::Optimize(p) => &p.label,
            CalculationItem::Layout(l) => &l.label,
            CalculationItem::Stringer(s) => &s.label,
        }
    }

    /// Get the calculation type as a string
    pub fn calc_type(&self) -> &'static str {
        match self {
            CalculationItem::Optimize(_) => "Optimize",
            CalculationItem::Layout(_) => "Layout",
            CalculationItem::Stringer(_) => "Stringer",
        }
    }

    /// Run the calculation.
    pub fn run(&self) -> StairResult<CalculationOutput> {
        match self {
            CalculationItem::Optimize(problem) => {
                let solution = solve(problem)?;
                let input =
                    StringerCutInput::from_solution(&problem.label, &solution, &problem.constants);
                let cuts = stringer::calculate(&input)?;
                Ok(CalculationOutput::Optimize { solution, cuts })
            }
            CalculationItem::Layout(input) => {
                Ok(CalculationOutput::Layout(layout::calculate(input)?))
            }
            CalculationItem::Stringer(input) => {
                Ok(CalculationOutput::Stringer(stringer::calculate(input)?))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_layout_json() {
        let json = r#"{ "type": "Layout", "label": "Hall", "total_rise": 2720.0, "total_run": 4480.0, "number_of_steps": 16 }"#;
        let item: CalculationItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.calc_type(), "Layout");
        assert_eq!(item.label(), "Hall");
        match item.run().unwrap() {
            CalculationOutput::Layout(result) => assert!(result.passes()),
            other => panic!("unexpected output: {other:?}"),
        }
    }

    #[test]
    fn test_optimize_item_cuts_the_solution() {
        let item = CalculationItem::Optimize(StairProblem::example());
        match item.run().unwrap() {
            CalculationOutput::Optimize { solution, cuts } => {
                assert_eq!(cuts.marks.len() as u32, solution.params.number_of_steps);
                assert!(cuts.passes(StairProblem::example().bounds.min_stringer_thickness - 1e-6));
            }
            other => panic!("unexpected output: {other:?}"),
        }
    }

    #[test]
    fn test_optimize_item_cuts_a_thick_tread() {
        let mut problem = StairProblem::example();
        problem.constants.tread_thickness = 260.0;
        problem.validate().unwrap();
        match CalculationItem::Optimize(problem).run().unwrap() {
            CalculationOutput::Optimize { solution, cuts } => {
                assert!(solution.derived.step_height > 260.0);
                assert!(cuts.first_rise_cut > 0.0);
            }
            other => panic!("unexpected output: {other:?}"),
        }
    }

    #[test]
    fn test_optimize_item_serializes_with_tag() {
        let item = CalculationItem::Optimize(StairProblem::example());
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.starts_with(r#"{"type":"Optimize""#));
        let back: CalculationItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back.label(), "Basement stair");
    }
}
