//! Feasible starting point for the search.

use crate::errors::{StairError, StairResult};
use crate::geometry::StairParams;
use crate::problem::StairBounds;

/// Pitch used as a starting point when the angle bounds allow it (degrees)
pub const DEFAULT_START_ANGLE: f64 = 40.0;

/// Midpoint of the step and overhang intervals, with the pitch at
/// [`DEFAULT_START_ANGLE`] or, if that falls outside the angle bounds, the
/// middle of them.
///
/// Continuous values land strictly inside their interval unless the
/// interval has zero width, in which case they take the pinned value.
///
/// # Errors
///
/// * `OutOfBounds` - any interval has min > max
/// * `NumericDegenerate` - the angle bounds pin the pitch to 0 or 90 degrees
pub fn initial_guess(bounds: &StairBounds) -> StairResult<StairParams> {
    bounds.validate()?;

    let steps_mid = (f64::from(bounds.min_steps) + f64::from(bounds.max_steps)) / 2.0;
    let number_of_steps = (steps_mid.round() as u32).clamp(bounds.min_steps, bounds.max_steps);

    let overhang = (bounds.min_overhang + bounds.max_overhang) / 2.0;

    let inclination_angle =
        if bounds.min_angle < DEFAULT_START_ANGLE && DEFAULT_START_ANGLE < bounds.max_angle {
            DEFAULT_START_ANGLE
        } else {
            (bounds.min_angle + bounds.max_angle) / 2.0
        };
    if inclination_angle <= 0.0 || inclination_angle >= 90.0 {
        return Err(StairError::numeric_degenerate(
            "inclination_angle",
            inclination_angle,
        ));
    }

    Ok(StairParams::new(number_of_steps, overhang, inclination_angle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::StairProblem;

    fn bounds() -> StairBounds {
        StairProblem::example().bounds
    }

    #[test]
    fn test_midpoints() {
        let mut b = bounds();
        b.min_steps = 4;
        b.max_steps = 12;
        let guess = initial_guess(&b).unwrap();
        assert_eq!(guess.number_of_steps, 8);
        assert_eq!(guess.overhang, 25.0);
        assert_eq!(guess.inclination_angle, DEFAULT_START_ANGLE);
    }

    #[test]
    fn test_strictly_inside() {
        let b = bounds();
        let guess = initial_guess(&b).unwrap();
        assert!(guess.overhang > b.min_overhang && guess.overhang < b.max_overhang);
        assert!(guess.inclination_angle > b.min_angle && guess.inclination_angle < b.max_angle);
    }

    #[test]
    fn test_angle_falls_back_to_bound_midpoint() {
        let mut b = bounds();
        b.min_angle = 20.0;
        b.max_angle = 30.0;
        assert_eq!(initial_guess(&b).unwrap().inclination_angle, 25.0);
    }

    #[test]
    fn test_empty_interval_is_out_of_bounds() {
        let mut b = bounds();
        b.min_steps = 9;
        b.max_steps = 3;
        assert_eq!(initial_guess(&b).unwrap_err().error_code(), "OUT_OF_BOUNDS");

        let mut b = bounds();
        b.min_angle = 50.0;
        b.max_angle = 45.0;
        assert_eq!(initial_guess(&b).unwrap_err().error_code(), "OUT_OF_BOUNDS");
    }

    #[test]
    fn test_pinned_right_angle_is_degenerate() {
        let mut b = bounds();
        b.min_angle = 90.0;
        b.max_angle = 90.0;
        assert_eq!(initial_guess(&b).unwrap_err().error_code(), "NUMERIC_DEGENERATE");
    }
}
