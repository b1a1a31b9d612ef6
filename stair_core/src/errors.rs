//! # Error Types
//!
//! Structured error types for stair_core. Every failure is a distinct,
//! recoverable value carrying enough context for a front end to explain
//! what went wrong. No calculation ever returns NaN or infinity in place
//! of an error.
//!
//! ## Example
//!
//! ```rust
//! use stair_core::errors::{StairError, StairResult};
//!
//! fn validate_rise(total_rise_mm: f64) -> StairResult<()> {
//!     if total_rise_mm <= 0.0 {
//!         return Err(StairError::invalid_parameter(
//!             "total_rise",
//!             total_rise_mm.to_string(),
//!             "Total rise must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_rise(-10.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for stair_core operations
pub type StairResult<T> = Result<T, StairError>;

/// Structured error type for stair calculations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum StairError {
    /// An input value is invalid (non-positive rise, zero ideal value, etc.)
    #[error("Invalid parameter '{field}': {value} - {reason}")]
    InvalidParameter {
        field: String,
        value: String,
        reason: String,
    },

    /// A bounds interval is empty (min > max)
    #[error("Empty bounds for '{field}': min {min} > max {max}")]
    OutOfBounds { field: String, min: String, max: String },

    /// No candidate satisfies all hard constraints
    #[error("No feasible stair: {reason}")]
    Infeasible { reason: String },

    /// Evaluation hit a degenerate point (angle at 0 or 90 degrees, non-finite value)
    #[error("Numerically degenerate {quantity}: {value}")]
    NumericDegenerate { quantity: String, value: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// The numerical minimizer failed to run
    #[error("Solver failure: {reason}")]
    SolverFailure { reason: String },
}

impl StairError {
    /// Create an InvalidParameter error
    pub fn invalid_parameter(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        StairError::InvalidParameter {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an OutOfBounds error from the offending interval
    pub fn out_of_bounds(field: impl Into<String>, min: impl ToString, max: impl ToString) -> Self {
        StairError::OutOfBounds {
            field: field.into(),
            min: min.to_string(),
            max: max.to_string(),
        }
    }

    /// Create an Infeasible error
    pub fn infeasible(reason: impl Into<String>) -> Self {
        StairError::Infeasible {
            reason: reason.into(),
        }
    }

    /// Create a NumericDegenerate error
    pub fn numeric_degenerate(quantity: impl Into<String>, value: f64) -> Self {
        StairError::NumericDegenerate {
            quantity: quantity.into(),
            value: value.to_string(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            StairError::InvalidParameter { .. } => "INVALID_PARAMETER",
            StairError::OutOfBounds { .. } => "OUT_OF_BOUNDS",
            StairError::Infeasible { .. } => "INFEASIBLE",
            StairError::NumericDegenerate { .. } => "NUMERIC_DEGENERATE",
            StairError::SerializationError { .. } => "SERIALIZATION_ERROR",
            StairError::SolverFailure { .. } => "SOLVER_FAILURE",
        }
    }
}

impl From<serde_json::Error> for StairError {
    fn from(err: serde_json::Error) -> Self {
        StairError::SerializationError {
            reason: err.to_string(),
        }
    }
}

impl From<argmin::core::Error> for StairError {
    fn from(err: argmin::core::Error) -> Self {
        // Cost evaluations raise StairError; hand those back unchanged.
        match err.downcast::<StairError>() {
            Ok(inner) => inner,
            Err(err) => StairError::SolverFailure {
                reason: err.to_string(),
            },
        }
    }
}

/// Reject values that are not strictly positive and finite.
pub(crate) fn require_positive(field: &str, value: f64) -> StairResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(StairError::invalid_parameter(
            field,
            value.to_string(),
            "Must be a positive, finite number",
        ));
    }
    Ok(())
}

/// Reject values that are negative or not finite.
pub(crate) fn require_non_negative(field: &str, value: f64) -> StairResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(StairError::invalid_parameter(
            field,
            value.to_string(),
            "Must be a non-negative, finite number",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error =
            StairError::invalid_parameter("total_rise", "-5", "Total rise must be positive");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidParameter\""));
        let roundtrip: StairError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(StairError::out_of_bounds("steps", 5, 3).error_code(), "OUT_OF_BOUNDS");
        assert_eq!(StairError::infeasible("none").error_code(), "INFEASIBLE");
        assert_eq!(
            StairError::numeric_degenerate("inclination_angle", 90.0).error_code(),
            "NUMERIC_DEGENERATE"
        );
    }

    #[test]
    fn test_out_of_bounds_message() {
        let err = StairError::out_of_bounds("steps", 12, 4);
        assert_eq!(err.to_string(), "Empty bounds for 'steps': min 12 > max 4");
    }

    #[test]
    fn test_require_helpers() {
        assert!(require_positive("x", 1.0).is_ok());
        assert!(require_positive("x", 0.0).is_err());
        assert!(require_positive("x", f64::NAN).is_err());
        assert!(require_non_negative("x", 0.0).is_ok());
        assert!(require_non_negative("x", -0.1).is_err());
    }

    #[test]
    fn test_argmin_error_conversion() {
        let wrapped = argmin::core::Error::from(StairError::infeasible("boxed"));
        assert_eq!(StairError::from(wrapped), StairError::infeasible("boxed"));

        let other = argmin::core::Error::msg("simplex collapsed");
        let err = StairError::from(other);
        assert_eq!(err.error_code(), "SOLVER_FAILURE");
        assert_eq!(err.to_string(), "Solver failure: simplex collapsed");
    }

    #[test]
    fn test_json_error_conversion() {
        let err: StairError = serde_json::from_str::<f64>("not a number").unwrap_err().into();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }
}
