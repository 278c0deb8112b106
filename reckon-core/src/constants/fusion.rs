//! Fusion Consumer Constants
//!
//! Thresholds used to grade calibration readouts before they are trusted by
//! the adjustment stage or blended by the fuser.

// ===== RELIABILITY GRADES =====

/// Reliability at or above which a readout is considered high quality.
///
/// With the normalisation update rule, a stream of n identical values
/// reaches `100·(n−1)/n`, so 80 needs at least five consistent observations.
pub const RELIABILITY_HIGH_THRESHOLD: f64 = 80.0;

/// Reliability below which a readout should not be applied to raw data.
///
/// Two consistent observations already give 50, so anything under 20 means
/// the estimate is still moving by about a deviation per sample.
pub const RELIABILITY_LOW_THRESHOLD: f64 = 20.0;
