//! # Solver Settings
//!
//! Tuning knobs for the stair search. Every field has a sensible default, so
//! a problem file may omit the `settings` block entirely or override just
//! one value:
//!
//! ```json
//! { "grid_points": 15 }
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{StairError, StairResult};
use crate::optimizer::cost::CostWeights;
use crate::optimizer::nelder_mead::SimplexConfig;

/// Largest accepted grid; each step count costs `grid_points²` evaluations.
pub const MAX_GRID_POINTS: usize = 101;

/// Configuration for [`crate::optimizer::solve`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    /// Grid points per axis used to seed the (overhang, pitch) search
    pub grid_points: usize,

    /// Distance kept from 0° and 90° so the tangent stays finite and non-zero
    pub angle_margin_deg: f64,

    /// Nelder-Mead refinement settings
    pub simplex: SimplexConfig,

    /// Relative importance of each residual in the cost
    pub weights: CostWeights,
}

impl Default for SolverSettings {
    fn default() -> Self {
        SolverSettings {
            grid_points: 9,
            angle_margin_deg: 0.01,
            simplex: SimplexConfig::default(),
            weights: CostWeights::default(),
        }
    }
}

impl SolverSettings {
    /// Validate all settings.
    pub fn validate(&self) -> StairResult<()> {
        if !(2..=MAX_GRID_POINTS).contains(&self.grid_points) {
            return Err(StairError::invalid_parameter(
                "grid_points",
                self.grid_points.to_string(),
                format!("Grid needs between 2 and {MAX_GRID_POINTS} points per axis"),
            ));
        }
        if !self.angle_margin_deg.is_finite()
            || self.angle_margin_deg <= 0.0
            || self.angle_margin_deg >= 45.0
        {
            return Err(StairError::invalid_parameter(
                "angle_margin_deg",
                self.angle_margin_deg.to_string(),
                "Angle margin must be between 0 and 45 degrees (exclusive)",
            ));
        }
        self.simplex.validate()?;
        self.weights.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(SolverSettings::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: SolverSettings = serde_json::from_str(r#"{ "grid_points": 15 }"#).unwrap();
        assert_eq!(settings.grid_points, 15);
        assert_eq!(settings.angle_margin_deg, 0.01);
        assert_eq!(settings.simplex, SimplexConfig::default());
    }

    #[test]
    fn test_rejects_tiny_grid() {
        let settings = SolverSettings {
            grid_points: 1,
            ..SolverSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_rejects_oversized_grid() {
        let settings = SolverSettings {
            grid_points: MAX_GRID_POINTS + 1,
            ..SolverSettings::default()
        };
        assert_eq!(settings.validate().unwrap_err().error_code(), "INVALID_PARAMETER");

        let largest = SolverSettings {
            grid_points: MAX_GRID_POINTS,
            ..SolverSettings::default()
        };
        assert!(largest.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_margin() {
        let settings = SolverSettings {
            angle_margin_deg: 0.0,
            ..SolverSettings::default()
        };
        assert!(settings.validate().is_err());
    }
}
