//! Online sensor calibration core for Reckon
//!
//! Learns, while the vehicle moves, how to turn raw readings from an
//! uncalibrated sensor (wheel ticks, gyro rate) into physical units, using a
//! trusted reference (GNSS speed or heading) whenever that reference is
//! accurate enough to be believed.
//!
//! Key constraints:
//! - Single pass, O(1) per sample, fixed-size state
//! - No heap allocation, `no_std` without the `std` feature
//! - Streaming operations never fail; bad samples are state transitions
//!
//! ```
//! use reckon_core::{AxisConfig, CalibrationMode, NullAdjustment, SensorFusion};
//!
//! let config = AxisConfig::default().with_mode(CalibrationMode::Span);
//! let mut axis = SensorFusion::new(config, NullAdjustment).unwrap();
//!
//! for (t, (reference, raw)) in [(100.0, 7.0), (200.0, 12.0), (300.0, 17.0)]
//!     .into_iter()
//!     .enumerate()
//! {
//!     axis.add_ref(t as f64, reference, Some(0.1));
//!     axis.add_sen(t as f64 + 0.5, raw, true);
//! }
//! axis.add_ref(3.0, 100.0, Some(0.1));
//!
//! assert_eq!(axis.scale().mean, 20.0);
//! assert_eq!(axis.bias().mean, 2.0);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
mod macros;

pub mod calibration;
pub mod constants;
pub mod errors;
pub mod fusion;
pub mod orchestrator;
#[cfg(feature = "std")]
pub mod shared;
pub mod time;
pub mod traits;

// Public API
pub use calibration::{
    AxisConfig, AxisStrategy, BracketFit, BracketRatio, CalibrationMode, ChannelConfig,
    ChannelRole, ChannelState, NormalisationEstimator, NormalisationSnapshot, Readout,
    ReliabilityGrade, ScaleCalibrator, SensorSample, SpanStrategy,
};
pub use errors::{CalibrationError, CalibrationResult};
pub use fusion::{FusedEstimate, KalmanFuser};
pub use orchestrator::SensorFusion;
#[cfg(feature = "std")]
pub use shared::SharedAxis;
pub use time::Timestamp;
pub use traits::{Adjustment, NullAdjustment, ScaleCalibrationStrategy};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
