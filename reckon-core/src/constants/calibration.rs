//! Calibration Constants
//!
//! Parameters for the normalisation estimator and the reference/sensor
//! calibration channels.

// ===== RELIABILITY SCALE =====

/// Reliability credit for one perfectly consistent sample.
///
/// Reliability is reported on a 0-100 scale. A sample that does not move
/// the running mean at all earns this full credit; a sample that moves it by
/// one mean linear deviation or more earns nothing.
pub const FULL_RELIABILITY: f64 = 100.0;

// ===== ACCURACY GATES =====

/// Default accuracy limit for the bias channel (reference units, 1σ).
///
/// Reference fixes whose reported accuracy is not strictly below this value
/// disarm the channel. Sized for GNSS speed, where 0.5 m/s is a typical
/// threshold between open-sky and degraded fixes.
///
/// Source: consumer GNSS receivers report 0.05-0.3 m/s speed accuracy in open sky
pub const DEFAULT_BIAS_ACCURACY_LIMIT: f64 = 0.5;

/// Default accuracy limit for the scale channel (reference units, 1σ).
///
/// Scale needs the reference to be trusted over whole brackets, so the gate
/// is tighter than the bias gate.
pub const DEFAULT_SCALE_ACCURACY_LIMIT: f64 = 0.3;

// ===== NUMERICAL GUARDS =====

/// Relative spread below which a least-squares bracket fit is degenerate.
///
/// When every bracket so far saw (almost) the same reference value, the fit
/// denominator `n·Σr² − (Σr)²` collapses to rounding noise. Fits whose
/// denominator is below this fraction of `n·Σr²` are deferred.
pub const DEGENERATE_SPREAD_RATIO: f64 = 1e-12;
