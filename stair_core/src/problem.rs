//! # Stair Problem
//!
//! The immutable input bundle handed to the solver: site constants, ideal
//! targets, bounds and solver settings. A front end collects these once
//! and passes them in; the solver keeps no state of its own.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "label": "Basement stair",
//!   "constants": {
//!     "total_rise": 2000.0,
//!     "joist_width": 300.0,
//!     "tread_thickness": 40.0,
//!     "backboard_thickness": 20.0
//!   },
//!   "targets": {
//!     "opt_step_height": 240.0,
//!     "opt_step_depth": 300.0,
//!     "opt_overhang": 10.0,
//!     "opt_angle": 40.0
//!   },
//!   "bounds": {
//!     "min_steps": 1,
//!     "max_steps": 10,
//!     "min_overhang": 0.0,
//!     "max_overhang": 50.0,
//!     "min_step_height": 150.0,
//!     "max_step_height": 300.0,
//!     "min_step_depth": 200.0,
//!     "max_step_depth": 400.0,
//!     "max_run": 4000.0,
//!     "min_stringer_thickness": 80.0
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{require_non_negative, require_positive, StairError, StairResult};
use crate::geometry::StairConstants;
use crate::settings::SolverSettings;

/// Ideal values the cost function normalizes against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StairTargets {
    /// Ideal rise per step (mm)
    pub opt_step_height: f64,

    /// Ideal tread depth including nosing (mm)
    pub opt_step_depth: f64,

    /// Ideal nosing overhang (mm)
    pub opt_overhang: f64,

    /// Ideal pitch (degrees)
    pub opt_angle: f64,
}

impl StairTargets {
    /// Validate targets. Every ideal value is a divisor, so all must be positive.
    pub fn validate(&self) -> StairResult<()> {
        require_positive("opt_step_height", self.opt_step_height)?;
        require_positive("opt_step_depth", self.opt_step_depth)?;
        require_positive("opt_overhang", self.opt_overhang)?;
        require_positive("opt_angle", self.opt_angle)?;
        Ok(())
    }
}

fn default_max_angle() -> f64 {
    90.0
}

/// Limits on the design.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StairBounds {
    pub min_steps: u32,
    pub max_steps: u32,

    pub min_overhang: f64,
    pub max_overhang: f64,

    pub min_step_height: f64,
    pub max_step_height: f64,

    /// Lower limit on tread depth (mm)
    pub min_step_depth: f64,
    /// Upper limit on tread depth (mm)
    pub max_step_depth: f64,

    /// Longest horizontal run the site allows (mm)
    pub max_run: f64,

    /// Least timber allowed below the deepest notch (mm)
    pub min_stringer_thickness: f64,

    /// Flattest allowed pitch (degrees)
    #[serde(default)]
    pub min_angle: f64,

    /// Steepest allowed pitch (degrees)
    #[serde(default = "default_max_angle")]
    pub max_angle: f64,
}

impl StairBounds {
    /// Validate bounds.
    ///
    /// # Errors
    ///
    /// * `OutOfBounds` - any interval with min > max
    /// * `InvalidParameter` - zero step count, negative lengths, angles outside 0..=90
    pub fn validate(&self) -> StairResult<()> {
        if self.min_steps == 0 {
            return Err(StairError::invalid_parameter(
                "min_steps",
                "0",
                "A stair needs at least one step",
            ));
        }
        if self.min_steps > self.max_steps {
            return Err(StairError::out_of_bounds("steps", self.min_steps, self.max_steps));
        }

        require_non_negative("min_overhang", self.min_overhang)?;
        require_non_negative("max_overhang", self.max_overhang)?;
        require_non_negative("min_step_height", self.min_step_height)?;
        require_non_negative("max_step_height", self.max_step_height)?;
        require_non_negative("min_step_depth", self.min_step_depth)?;
        require_non_negative("max_step_depth", self.max_step_depth)?;
        require_positive("max_run", self.max_run)?;
        require_non_negative("min_stringer_thickness", self.min_stringer_thickness)?;

        for (field, angle) in [("min_angle", self.min_angle), ("max_angle", self.max_angle)] {
            if !(0.0..=90.0).contains(&angle) {
                return Err(StairError::invalid_parameter(
                    field,
                    angle.to_string(),
                    "Angle bound must be between 0 and 90 degrees",
                ));
            }
        }

        check_interval("overhang", self.min_overhang, self.max_overhang)?;
        check_interval("step_height", self.min_step_height, self.max_step_height)?;
        check_interval("step_depth", self.min_step_depth, self.max_step_depth)?;
        check_interval("inclination_angle", self.min_angle, self.max_angle)?;
        Ok(())
    }
}

fn check_interval(field: &str, min: f64, max: f64) -> StairResult<()> {
    if min > max {
        return Err(StairError::out_of_bounds(field, min, max));
    }
    Ok(())
}

/// Everything the solver needs for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StairProblem {
    /// User label (e.g., "Cellar stair")
    #[serde(default)]
    pub label: String,

    pub constants: StairConstants,
    pub targets: StairTargets,
    pub bounds: StairBounds,

    #[serde(default)]
    pub settings: SolverSettings,
}

impl StairProblem {
    /// Parse a problem from JSON. Does not validate.
    pub fn from_json(json: &str) -> StairResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> StairResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate every part of the problem.
    pub fn validate(&self) -> StairResult<()> {
        self.constants.validate()?;
        self.targets.validate()?;
        self.bounds.validate()?;
        self.settings.validate()?;
        Ok(())
    }

    /// A complete, solvable residential stair problem.
    pub fn example() -> Self {
        StairProblem {
            label: "Basement stair".to_string(),
            constants: StairConstants {
                total_rise: 2000.0,
                joist_width: 300.0,
                tread_thickness: 40.0,
                backboard_thickness: 20.0,
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
                min_step_height: 150.0,
                max_step_height: 300.0,
                min_step_depth: 200.0,
                max_step_depth: 400.0,
                max_run: 4000.0,
                min_stringer_thickness: 80.0,
                min_angle: 0.0,
                max_angle: 90.0,
            },
            settings: SolverSettings::default(),
        }
    }
}
