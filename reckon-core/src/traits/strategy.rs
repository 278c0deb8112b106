//! Calibration Strategy Trait
//!
//! A calibration channel owns the accuracy gate and the `Empty → Armed →
//! Calibrating` state machine. What it does with the samples inside a bracket
//! is delegated to a strategy:
//!
//! ```text
//! accepted ref ──┐                 ┌── arm(ref)        channel was Empty/Armed
//!                ├─► ScaleCalibrator ── close(ref) ──► Option<observation>
//! sensor ────────┘        │        └── sensor(value)   while armed
//!                         └── disarm()                 on rejected ref
//! ```
//!
//! Every `Some` returned by `close` is fed to the channel's normalisation
//! estimator. Returning `None` defers the cycle without touching the
//! estimator, which is how strategies handle divide-by-zero and degenerate
//! brackets.

/// Turns bracketed reference/sensor samples into calibration observations
pub trait ScaleCalibrationStrategy {
    /// First accepted reference after a rejection (or at start), or another
    /// accepted reference before any sensor sample arrived
    fn arm(&mut self, reference: f64);

    /// Sensor sample observed while the channel is armed
    fn sensor(&mut self, value: f64);

    /// Accepted reference while calibrating; closes the current bracket and
    /// opens the next one
    ///
    /// Returns the observation to feed into the estimator, if any.
    fn close(&mut self, reference: f64) -> Option<f64>;

    /// Reference rejected; drop any partial bracket
    fn disarm(&mut self);
}
