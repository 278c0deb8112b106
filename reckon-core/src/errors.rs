//! Error Types for Calibration Setup
//!
//! ## Design Philosophy
//!
//! The streaming operations of this crate never fail. A reference fix that is
//! too coarse, a sensor sample flagged invalid, a bracket whose ratio would
//! divide by zero: all of these are ordinary state transitions, not errors.
//!
//! Errors only appear at the edges where a caller hands in configuration or
//! persisted state:
//!
//! - `InvalidAccuracyLimit`: a channel gate that could never accept anything
//!   (zero, negative, NaN) or could never reject anything (infinity)
//! - `InvalidSnapshot`: seed accumulators that no sequence of samples could
//!   have produced
//! - `InvalidRatioTotals`: ratio totals handed to an axis that cannot use them
//!
//! Like the rest of the crate, errors are small `Copy` values carrying
//! `&'static str` reasons, so they cost nothing on embedded targets.
//!
//! ```rust
//! use reckon_core::{CalibrationError, ChannelConfig};
//!
//! let config = ChannelConfig::new(-1.0);
//! assert!(matches!(
//!     config.validate(),
//!     Err(CalibrationError::InvalidAccuracyLimit { .. })
//! ));
//! ```

use thiserror_no_std::Error;

/// Result type for calibration setup
pub type CalibrationResult<T> = Result<T, CalibrationError>;

/// Calibration setup errors - kept small for embedded use
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum CalibrationError {
    /// Accuracy limit must be finite and strictly positive
    #[error("Accuracy limit {limit} must be finite and greater than zero")]
    InvalidAccuracyLimit {
        /// The rejected limit
        limit: f64,
    },

    /// Persisted accumulators are inconsistent
    #[error("Invalid normalisation snapshot: {reason}")]
    InvalidSnapshot {
        /// What made the snapshot unusable
        reason: &'static str,
    },

    /// Seeded ratio totals cannot be used
    #[error("Invalid ratio totals: {reason}")]
    InvalidRatioTotals {
        /// Why the totals were refused
        reason: &'static str,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for CalibrationError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::InvalidAccuracyLimit { limit } =>
                defmt::write!(fmt, "Accuracy limit {} not usable", limit),
            Self::InvalidSnapshot { reason } =>
                defmt::write!(fmt, "Invalid snapshot: {}", reason),
            Self::InvalidRatioTotals { reason } =>
                defmt::write!(fmt, "Invalid ratio totals: {}", reason),
        }
    }
}
