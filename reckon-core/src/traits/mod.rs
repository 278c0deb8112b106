//! Core Traits and Extension Points
//!
//! Two seams separate the calibration core from the rest of a dead-reckoning
//! engine:
//!
//! - [`adjustment`] - the external capability that turns raw reference and
//!   sensor samples into physically adjusted ones. The core calls it, never
//!   owns it.
//! - [`strategy`] - how a calibration channel turns one bracket of
//!   reference/sensor samples into one observation for its estimator.
//!
//! Both are static-dispatch traits so the hot path stays monomorphised and
//! allocation free.

pub mod adjustment;
pub mod strategy;

pub use adjustment::{Adjustment, NullAdjustment};
pub use strategy::ScaleCalibrationStrategy;
