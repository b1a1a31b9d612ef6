//! # Unit Types
//!
//! Lightweight newtype wrappers for the units stair work uses. They keep
//! JSON clean (a wrapped value serializes as a bare number) while making
//! conversions explicit.
//!
//! ## Metric Units (Primary)
//!
//! Calculations run in millimetres and degrees, matching how stair
//! dimensions are given on site. Inches and radians exist for display and
//! for trigonometry respectively.
//!
//! ## Example
//!
//! ```rust
//! use stair_core::units::{Degrees, Inches, Millimeters, Radians};
//!
//! let rise = Millimeters(254.0);
//! let rise_in: Inches = rise.into();
//! assert!((rise_in.0 - 10.0).abs() < 1e-12);
//!
//! let pitch: Radians = Degrees(45.0).into();
//! assert!((pitch.0.tan() - 1.0).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};

/// Millimetres per inch (exact by definition)
pub const MM_PER_INCH: f64 = 25.4;

// ============================================================================
// Length Units
// ============================================================================

/// Length in millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

/// Length in inches
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inches(pub f64);

impl From<Millimeters> for Inches {
    fn from(mm: Millimeters) -> Self {
        Inches(mm.0 / MM_PER_INCH)
    }
}

impl From<Inches> for Millimeters {
    fn from(inches: Inches) -> Self {
        Millimeters(inches.0 * MM_PER_INCH)
    }
}

// ============================================================================
// Angle Units
// ============================================================================

/// Angle in degrees
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Degrees(pub f64);

/// Angle in radians
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Radians(pub f64);

impl From<Degrees> for Radians {
    fn from(deg: Degrees) -> Self {
        Radians(deg.0.to_radians())
    }
}

impl From<Radians> for Degrees {
    fn from(rad: Radians) -> Self {
        Degrees(rad.0.to_degrees())
    }
}

impl Degrees {
    /// Tangent of the angle
    pub fn tan(self) -> f64 {
        Radians::from(self).0.tan()
    }

    /// Cosine of the angle
    pub fn cos(self) -> f64 {
        Radians::from(self).0.cos()
    }

    /// Angle whose tangent is `rise / run`
    pub fn from_slope(rise: f64, run: f64) -> Self {
        Radians(rise.atan2(run)).into()
    }

    /// True if the angle lies strictly inside (0, 90)
    pub fn is_acute(self) -> bool {
        self.0 > 0.0 && self.0 < 90.0
    }
}
