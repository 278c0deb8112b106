//! Constants for Reckon Core
//!
//! Every tuning number used by the estimators lives here with its meaning and
//! units, so the algorithm modules stay free of magic numbers.
//!
//! ## Organization
//!
//! - **Calibration**: reliability scale, default accuracy gates, degeneracy guards
//! - **Fusion**: reliability grading thresholds for downstream consumers

/// Normalisation and calibration channel parameters.
pub mod calibration;

/// Reliability thresholds used when consuming calibration readouts.
pub mod fusion;

// Re-export commonly used constants for convenience
pub use calibration::{
    FULL_RELIABILITY, DEFAULT_BIAS_ACCURACY_LIMIT, DEFAULT_SCALE_ACCURACY_LIMIT,
    DEGENERATE_SPREAD_RATIO,
};

pub use fusion::{RELIABILITY_HIGH_THRESHOLD, RELIABILITY_LOW_THRESHOLD};
