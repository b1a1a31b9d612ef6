//! # Stair Profile
//!
//! Side-view geometry of a flight as plain coordinates, for whatever draws
//! it. Origin is the bottom front of the flight; x runs horizontally, y
//! vertically, both in millimetres.
//!
//! Each step contributes a riser (vertical) and a tread (horizontal, one
//! tread depth long), so the outline ends at `(total_run, total_rise)`.

use serde::{Deserialize, Serialize};

use crate::errors::{StairError, StairResult};
use crate::geometry::DerivedGeometry;

/// A point in the side view (mm)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

/// Side view of a flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StairProfile {
    /// Sawtooth outline: riser, tread, riser, tread, ...
    pub outline: Vec<Point2>,

    /// Straight pitch line from the bottom front to the top
    pub stringer_line: [Point2; 2],

    pub total_rise: f64,
    pub total_run: f64,
}

impl StairProfile {
    /// Build the profile for `number_of_steps` steps of `derived` geometry.
    pub fn new(number_of_steps: u32, derived: &DerivedGeometry) -> StairResult<Self> {
        if number_of_steps == 0 {
            return Err(StairError::invalid_parameter(
                "number_of_steps",
                "0",
                "A stair needs at least one step",
            ));
        }

        let mut outline = Vec::with_capacity(2 * number_of_steps as usize + 1);
        outline.push(Point2 { x: 0.0, y: 0.0 });
        for i in 0..number_of_steps {
            let x = f64::from(i) * derived.tread_depth;
            let y = f64::from(i + 1) * derived.step_height;
            outline.push(Point2 { x, y });
            outline.push(Point2 {
                x: f64::from(i + 1) * derived.tread_depth,
                y,
            });
        }

        Ok(StairProfile {
            outline,
            stringer_line: [
                Point2 { x: 0.0, y: 0.0 },
                Point2 {
                    x: derived.total_run,
                    y: derived.total_rise,
                },
            ],
            total_rise: derived.total_rise,
            total_run: derived.total_run,
        })
    }

    /// Bounding box as (min, max) corners
    pub fn bounds(&self) -> (Point2, Point2) {
        let (mut min, mut max) = (self.outline[0], self.outline[0]);
        for p in &self.outline {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        (min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{derive, StairParams};
    use approx::assert_relative_eq;

    #[test]
    fn test_outline_ends_at_top() {
        let derived = derive(&StairParams::new(8, 10.0, 40.0), 2000.0).unwrap();
        let profile = StairProfile::new(8, &derived).unwrap();

        assert_eq!(profile.outline.len(), 17);
        let last = profile.outline.last().unwrap();
        assert_relative_eq!(last.x, derived.total_run, epsilon = 1e-9);
        assert_relative_eq!(last.y, 2000.0);
        assert_eq!(profile.stringer_line[1].y, 2000.0);
    }

    #[test]
    fn test_outline_alternates_risers_and_treads() {
        let derived = derive(&StairParams::new(3, 0.0, 45.0), 600.0).unwrap();
        let profile = StairProfile::new(3, &derived).unwrap();
        for pair in profile.outline.windows(2) {
            let vertical = pair[0].x == pair[1].x;
            let horizontal = pair[0].y == pair[1].y;
            assert!(vertical ^ horizontal);
        }
    }

    #[test]
    fn test_bounds() {
        let derived = derive(&StairParams::new(4, 20.0, 35.0), 800.0).unwrap();
        let profile = StairProfile::new(4, &derived).unwrap();
        let (min, max) = profile.bounds();
        assert_eq!((min.x, min.y), (0.0, 0.0));
        assert_relative_eq!(max.x, derived.total_run, epsilon = 1e-9);
        assert_relative_eq!(max.y, 800.0);
    }

    #[test]
    fn test_zero_steps_rejected() {
        let derived = derive(&StairParams::new(1, 0.0, 45.0), 200.0).unwrap();
        assert!(StairProfile::new(0, &derived).is_err());
    }
}
