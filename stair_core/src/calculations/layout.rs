//! # Manual Stair Layout
//!
//! Lays out a flight from dimensions the user already knows (total rise,
//! total run, step count) instead of optimizing them, then checks the
//! result against two common ergonomic rules of thumb:
//!
//! - **Step formula**: `2h + g` between 590 and 650 mm (one comfortable stride)
//! - **Safety rule**: `h + g` between 440 and 480 mm
//!
//! where `h` is the rise and `g` the going (riser face to riser face).
//!
//! ## Example
//!
//! ```rust
//! use stair_core::calculations::layout::{calculate, LayoutInput};
//!
//! let input = LayoutInput {
//!     label: "Hall stair".to_string(),
//!     total_rise: 2720.0,
//!     total_run: 4480.0,
//!     number_of_steps: 16,
//!     overhang: 0.0,
//! };
//! let result = calculate(&input).unwrap();
//!
//! assert_eq!(result.derived.step_height, 170.0);
//! assert!(result.passes());
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{require_non_negative, require_positive, StairError, StairResult};
use crate::geometry::{DerivedGeometry, StairParams};
use crate::units::Degrees;

/// Comfortable stride range for `2h + g` (mm)
pub const STEP_FORMULA_RANGE: (f64, f64) = (590.0, 650.0);

/// Acceptable range for `h + g` (mm)
pub const SAFETY_RULE_RANGE: (f64, f64) = (440.0, 480.0);

/// Input parameters for a manual layout.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "Hall stair",
///   "total_rise": 2720.0,
///   "total_run": 4480.0,
///   "number_of_steps": 16,
///   "overhang": 0.0
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInput {
    /// User label for this flight
    #[serde(default)]
    pub label: String,

    /// Vertical height of the flight (mm)
    pub total_rise: f64,

    /// Horizontal length of the flight (mm)
    pub total_run: f64,

    pub number_of_steps: u32,

    /// Nosing projection (mm)
    #[serde(default)]
    pub overhang: f64,
}

impl LayoutInput {
    /// Validate input parameters.
    pub fn validate(&self) -> StairResult<()> {
        require_positive("total_rise", self.total_rise)?;
        require_positive("total_run", self.total_run)?;
        if self.number_of_steps == 0 {
            return Err(StairError::invalid_parameter(
                "number_of_steps",
                "0",
                "A stair needs at least one step",
            ));
        }
        require_non_negative("overhang", self.overhang)?;
        if self.overhang >= self.tread_depth() {
            return Err(StairError::invalid_parameter(
                "overhang",
                self.overhang.to_string(),
                format!(
                    "Overhang must be smaller than the {:.1} mm tread depth",
                    self.tread_depth()
                ),
            ));
        }
        Ok(())
    }

    /// Run per step, nosing included
    pub fn tread_depth(&self) -> f64 {
        self.total_run / f64::from(self.number_of_steps)
    }
}

/// Results of a manual layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutResult {
    /// Equivalent decision variables
    pub params: StairParams,

    pub derived: DerivedGeometry,

    /// `2h + g` (mm)
    pub step_formula: f64,

    /// `h + g` (mm)
    pub safety_rule: f64,

    pub step_formula_ok: bool,
    pub safety_rule_ok: bool,
}

impl LayoutResult {
    /// Check if both ergonomic rules are met
    pub fn passes(&self) -> bool {
        self.step_formula_ok && self.safety_rule_ok
    }
}

/// Lay out the flight.
///
/// # Errors
///
/// * `InvalidParameter` - non-positive rise or run, zero steps, or an
///   overhang that consumes the whole tread
pub fn calculate(input: &LayoutInput) -> StairResult<LayoutResult> {
    input.validate()?;

    let steps = f64::from(input.number_of_steps);
    let step_height = input.total_rise / steps;
    let tread_depth = input.tread_depth();
    let going = tread_depth - input.overhang;
    let angle = Degrees::from_slope(step_height, going);

    let step_formula = 2.0 * step_height + going;
    let safety_rule = step_height + going;

    Ok(LayoutResult {
        params: StairParams::new(input.number_of_steps, input.overhang, angle.0),
        derived: DerivedGeometry {
            step_height,
            step_cut_depth: going,
            tread_depth,
            total_rise: input.total_rise,
            total_run: input.total_run,
        },
        step_formula,
        safety_rule,
        step_formula_ok: in_range(step_formula, STEP_FORMULA_RANGE),
        safety_rule_ok: in_range(safety_rule, SAFETY_RULE_RANGE),
    })
}

fn in_range(value: f64, (lo, hi): (f64, f64)) -> bool {
    (lo..=hi).contains(&value)
}
