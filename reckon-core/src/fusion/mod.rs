//! Accuracy-Weighted Fusion of Scalar Estimates
//!
//! ## Overview
//!
//! Several independent estimates of the same quantity (two wheel-speed
//! axes, a calibrated gyro and a GNSS course) are merged by a scalar,
//! single-state Kalman update:
//!
//! ```text
//! estimate 1 (x₁, a₁) ──┐
//! estimate 2 (x₂, a₂) ──┼─→ KalmanFuser ─→ (x̂, â)
//! estimate N (xₙ, aₙ) ──┘
//! ```
//!
//! There is no process model and no covariance matrix: each input is
//! treated as a measurement of a constant, and the accuracies act as the
//! measurement noise.
//!
//! ## Update Rule
//!
//! ```text
//! K  = â / (â + a)
//! x̂ ← x̂·(1 − K) + x·K
//! â ← â·(1 − K) + a·K
//! ```
//!
//! The first accepted input is adopted as-is. Inputs with a non-positive or
//! non-finite accuracy are no-ops.
//!
//! ## Usage Example
//!
//! ```rust
//! use reckon_core::fusion::KalmanFuser;
//!
//! let mut fuser = KalmanFuser::new();
//! fuser.add_data(10.0, 1.0);
//! fuser.add_data(20.0, 1.0);
//!
//! assert_eq!(fuser.value(), 15.0);
//! assert_eq!(fuser.accuracy(), 1.0);
//! ```

pub mod kalman;

pub use kalman::{FusedEstimate, KalmanFuser};
