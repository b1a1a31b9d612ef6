//! # Stringer Cut Values
//!
//! Turns a chosen stair design into the marks a carpenter transfers onto a
//! notched (cut) stringer.
//!
//! ## Geometry
//!
//! Each notch is a right triangle with a vertical leg of one rise and a
//! horizontal leg of one notch cut. The hypotenuse lies on the top edge of
//! the board:
//!
//! ```text
//!   hypotenuse    = sqrt(rise² + cut²)
//!   notch depth   = rise · cut / hypotenuse    (square to the board edge)
//!   throat        = joist_width − notch depth
//! ```
//!
//! The bottom rise is shortened by one tread thickness so every finished
//! rise, measured tread top to tread top, comes out equal.
//!
//! ## Example
//!
//! ```rust
//! use stair_core::calculations::stringer::{calculate, StringerCutInput};
//! use stair_core::geometry::{StairConstants, StairParams};
//!
//! let constants = StairConstants {
//!     total_rise: 2000.0,
//!     joist_width: 300.0,
//!     tread_thickness: 40.0,
//!     backboard_thickness: 20.0,
//! };
//! let params = StairParams::new(8, 10.0, 40.0);
//! let input = StringerCutInput::from_params("S-1", &params, &constants).unwrap();
//! let cuts = calculate(&input).unwrap();
//!
//! assert_eq!(cuts.rise_cut, 250.0);
//! assert_eq!(cuts.first_rise_cut, 210.0);
//! assert_eq!(cuts.marks.len(), 8);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{require_non_negative, require_positive, StairError, StairResult};
use crate::geometry::{derive, StairConstants, StairParams};
use crate::optimizer::SolverResult;
use crate::units::Degrees;

/// Input for the stringer cut calculation. All lengths in millimetres.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "S-1",
///   "number_of_steps": 8,
///   "step_height": 250.0,
///   "step_cut_depth": 297.9,
///   "overhang": 10.0,
///   "joist_width": 300.0,
///   "tread_thickness": 40.0,
///   "backboard_thickness": 20.0
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StringerCutInput {
    /// User label (e.g., "S-1", "Left stringer")
    pub label: String,

    pub number_of_steps: u32,

    /// Finished rise per step
    pub step_height: f64,

    /// Horizontal leg of each notch
    pub step_cut_depth: f64,

    /// Nosing projection of the treads
    pub overhang: f64,

    /// Stringer board width before notching
    pub joist_width: f64,

    pub tread_thickness: f64,

    #[serde(default)]
    pub backboard_thickness: f64,
}

impl StringerCutInput {
    /// Build the input for a solved design.
    pub fn from_solution(
        label: impl Into<String>,
        result: &SolverResult,
        constants: &StairConstants,
    ) -> Self {
        StringerCutInput {
            label: label.into(),
            number_of_steps: result.params.number_of_steps,
            step_height: result.derived.step_height,
            step_cut_depth: result.derived.step_cut_depth,
            overhang: result.params.overhang,
            joist_width: constants.joist_width,
            tread_thickness: constants.tread_thickness,
            backboard_thickness: constants.backboard_thickness,
        }
    }

    /// Build the input for an arbitrary design.
    pub fn from_params(
        label: impl Into<String>,
        params: &StairParams,
        constants: &StairConstants,
    ) -> StairResult<Self> {
        let derived = derive(params, constants.total_rise)?;
        Ok(StringerCutInput {
            label: label.into(),
            number_of_steps: params.number_of_steps,
            step_height: derived.step_height,
            step_cut_depth: derived.step_cut_depth,
            overhang: params.overhang,
            joist_width: constants.joist_width,
            tread_thickness: constants.tread_thickness,
            backboard_thickness: constants.backboard_thickness,
        })
    }

    /// Validate input parameters.
    pub fn validate(&self) -> StairResult<()> {
        if self.number_of_steps == 0 {
            return Err(StairError::invalid_parameter(
                "number_of_steps",
                "0",
                "A stringer needs at least one notch",
            ));
        }
        require_positive("step_height", self.step_height)?;
        require_positive("step_cut_depth", self.step_cut_depth)?;
        require_non_negative("overhang", self.overhang)?;
        require_positive("joist_width", self.joist_width)?;
        require_non_negative("tread_thickness", self.tread_thickness)?;
        require_non_negative("backboard_thickness", self.backboard_thickness)?;
        if self.tread_thickness >= self.step_height {
            return Err(StairError::invalid_parameter(
                "tread_thickness",
                self.tread_thickness.to_string(),
                "Tread must be thinner than one rise",
            ));
        }
        Ok(())
    }
}

/// Position of one notch on the stringer.
///
/// Coordinates are measured from the bottom front of the stringer where it
/// sits on the floor: `riser_offset` horizontally to the plumb (riser) cut,
/// `seat_height` vertically to the level (seat) cut.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NotchMark {
    /// 1-based step number, counted from the bottom
    pub step: u32,
    pub riser_offset: f64,
    pub seat_height: f64,
    /// Distance along the top edge from the bottom tip to this notch's tip
    pub along_edge: f64,
}

/// Cut values for one stringer. All lengths in millimetres, angles in degrees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StringerCutResult {
    /// Pitch of the stringer
    pub inclination_angle: f64,

    /// Vertical (plumb) leg of each notch
    pub rise_cut: f64,

    /// Horizontal (level) leg of each notch
    pub run_cut: f64,

    /// Bottom plumb leg, shortened by the tread thickness
    pub first_rise_cut: f64,

    /// Step-off distance along the board edge
    pub notch_hypotenuse: f64,

    /// Depth of each notch square to the board edge
    pub notch_depth: f64,

    /// Timber remaining below the deepest notch corner
    pub throat: f64,

    /// Level-cut angle against the board edge
    pub level_cut_angle: f64,

    /// Plumb-cut angle against the board edge
    pub plumb_cut_angle: f64,

    /// Length of the notched edge
    pub edge_length: f64,

    /// Stock length needed, including the bottom level cut and top plumb cut
    pub board_length: f64,

    /// Nosing visible in front of the riser boards (negative means the
    /// riser board stands proud of the tread)
    pub visible_nosing: f64,

    pub marks: Vec<NotchMark>,
}

impl StringerCutResult {
    /// Check the throat against the required minimum
    pub fn passes(&self, min_stringer_thickness: f64) -> bool {
        self.throat >= min_stringer_thickness
    }
}

/// Calculate stringer cut values.
///
/// # Errors
///
/// * `InvalidParameter` - invalid input, or a notch so deep the throat
///   would vanish
pub fn calculate(input: &StringerCutInput) -> StairResult<StringerCutResult> {
    input.validate()?;

    let rise = input.step_height;
    let cut = input.step_cut_depth;
    let angle = Degrees::from_slope(rise, cut);

    let hypotenuse = rise.hypot(cut);
    let notch_depth = rise * cut / hypotenuse;
    let throat = input.joist_width - notch_depth;
    if throat <= 0.0 {
        return Err(StairError::invalid_parameter(
            "joist_width",
            input.joist_width.to_string(),
            format!("Board too narrow for a {notch_depth:.1} mm deep notch"),
        ));
    }

    let steps = f64::from(input.number_of_steps);
    let edge_length = steps * hypotenuse;
    // cot + tan of the pitch, i.e. cut/rise + rise/cut
    let end_allowance = input.joist_width * (cut / rise + rise / cut);

    let marks = (1..=input.number_of_steps)
        .map(|step| {
            let i = f64::from(step);
            NotchMark {
                step,
                riser_offset: (i - 1.0) * cut,
                seat_height: i * rise - input.tread_thickness,
                along_edge: i * hypotenuse,
            }
        })
        .collect();

    Ok(StringerCutResult {
        inclination_angle: angle.0,
        rise_cut: rise,
        run_cut: cut,
        first_rise_cut: rise - input.tread_thickness,
        notch_hypotenuse: hypotenuse,
        notch_depth,
        throat,
        level_cut_angle: angle.0,
        plumb_cut_angle: 90.0 - angle.0,
        edge_length,
        board_length: edge_length + end_allowance,
        visible_nosing: input.overhang - input.backboard_thickness,
        marks,
    })
}
