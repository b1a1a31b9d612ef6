//! # Stair Geometry
//!
//! The fixed site dimensions ([`StairConstants`]), the decision variables
//! ([`StairParams`]) and everything that follows from them
//! ([`DerivedGeometry`]).
//!
//! ## Formulas
//!
//! ```text
//! step_height    = total_rise / number_of_steps
//! step_cut_depth = step_height / tan(inclination_angle)
//! tread_depth    = step_cut_depth + overhang
//! total_run      = number_of_steps * tread_depth
//! ```
//!
//! ## Example
//!
//! ```rust
//! use stair_core::geometry::{derive, StairParams};
//!
//! let params = StairParams::new(8, 10.0, 40.0);
//! let derived = derive(&params, 2000.0).unwrap();
//!
//! assert_eq!(derived.step_height, 250.0);
//! assert!((derived.tread_depth - 307.94).abs() < 0.01);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{require_non_negative, require_positive, StairError, StairResult};
use crate::units::Degrees;

/// Fixed dimensions of the site and the timber being used.
///
/// ## JSON Example
///
/// ```json
/// {
///   "total_rise": 2000.0,
///   "joist_width": 300.0,
///   "tread_thickness": 40.0,
///   "backboard_thickness": 20.0
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StairConstants {
    /// Vertical height spanned by the whole flight (mm)
    pub total_rise: f64,

    /// Width of the stringer board before notching (mm)
    pub joist_width: f64,

    /// Thickness of each tread board (mm)
    pub tread_thickness: f64,

    /// Thickness of the riser (back) boards (mm), 0 for an open stair
    #[serde(default)]
    pub backboard_thickness: f64,
}

impl StairConstants {
    /// Validate the constants.
    pub fn validate(&self) -> StairResult<()> {
        require_positive("total_rise", self.total_rise)?;
        require_positive("joist_width", self.joist_width)?;
        require_non_negative("tread_thickness", self.tread_thickness)?;
        require_non_negative("backboard_thickness", self.backboard_thickness)?;
        Ok(())
    }
}

/// The decision variables of a stair design.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StairParams {
    /// Number of rises in the flight (>= 1)
    pub number_of_steps: u32,

    /// Nosing projection of each tread past the riser below it (mm)
    pub overhang: f64,

    /// Pitch of the flight from horizontal (degrees, strictly inside 0..90)
    pub inclination_angle: f64,
}

impl StairParams {
    pub fn new(number_of_steps: u32, overhang: f64, inclination_angle: f64) -> Self {
        StairParams {
            number_of_steps,
            overhang,
            inclination_angle,
        }
    }

    /// Inclination as a typed angle
    pub fn angle(&self) -> Degrees {
        Degrees(self.inclination_angle)
    }
}

/// Quantities derived from [`StairParams`] and the total rise.
///
/// These are the read-only values a diagram renderer consumes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedGeometry {
    /// Height of one rise (mm)
    pub step_height: f64,

    /// Horizontal depth of the stringer notch for one step (mm)
    pub step_cut_depth: f64,

    /// Walking depth of one tread including the nosing (mm)
    pub tread_depth: f64,

    /// Vertical height of the flight (mm)
    pub total_rise: f64,

    /// Horizontal length of the flight (mm)
    pub total_run: f64,
}

/// Derive the step geometry for `params` over `total_rise`.
///
/// # Errors
///
/// * `InvalidParameter` - non-positive rise, zero steps or negative overhang
/// * `NumericDegenerate` - angle not strictly inside (0, 90) degrees
pub fn derive(params: &StairParams, total_rise: f64) -> StairResult<DerivedGeometry> {
    require_positive("total_rise", total_rise)?;
    if params.number_of_steps == 0 {
        return Err(StairError::invalid_parameter(
            "number_of_steps",
            "0",
            "A stair needs at least one step",
        ));
    }
    require_non_negative("overhang", params.overhang)?;
    let angle = params.angle();
    if !angle.is_acute() {
        return Err(StairError::numeric_degenerate(
            "inclination_angle",
            params.inclination_angle,
        ));
    }

    let steps = f64::from(params.number_of_steps);
    let step_height = total_rise / steps;
    let step_cut_depth = step_height / angle.tan();
    let tread_depth = step_cut_depth + params.overhang;
    let total_run = steps * tread_depth;

    if !total_run.is_finite() {
        return Err(StairError::numeric_degenerate("total_run", total_run));
    }

    Ok(DerivedGeometry {
        step_height,
        step_cut_depth,
        tread_depth,
        total_rise,
        total_run,
    })
}

/// Timber left between the deepest notch corner and the bottom edge of a
/// stringer of width `joist_width`.
///
/// The notch depth measured square to the board edge is
/// `rise * run / hypot(rise, run)`, which reduces to `rise * cos(angle)`.
pub fn stringer_throat(joist_width: f64, step_height: f64, angle: Degrees) -> f64 {
    joist_width - step_height * angle.cos()
}
