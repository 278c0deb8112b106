//! Time handling for calibration streams
//!
//! Reference and sensor streams carry their own timestamps, taken from
//! whatever clock the drivers share. The core never reads a clock itself; it
//! only remembers the last accepted timestamp of each stream and hands old and
//! new values to the adjustment capability, which integrates over the
//! interval if it needs to.

/// Timestamp in seconds on the caller's clock
pub type Timestamp = f64;
