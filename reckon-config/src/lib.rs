//! Axis Profiles for Reckon Calibration
//!
//! ## Overview
//!
//! The calibration core only needs two accuracy limits and a mode per axis.
//! Deployments describe more than that: which physical quantity an axis
//! measures, in what unit, and how its sensor is mounted relative to the
//! vehicle frame. This crate carries that description as JSON profiles and
//! turns them into ready-to-run axes.
//!
//! ```text
//! profiles.json ─► ProfileRegistry ─► AxisProfile ─► AxisConfig ─► SensorFusion
//!                      ▲                                              (reckon-core)
//! presets ─────────────┘
//! ```
//!
//! ## Profile Format
//!
//! ```json
//! {
//!   "name": "wheel_speed_rear_left",
//!   "unit": "m/s",
//!   "bias_accuracy_limit": 0.5,
//!   "scale_accuracy_limit": 0.3,
//!   "mode": "bracket",
//!   "mounting": { "x": -1.2, "y": 0.75, "z": 0.0, "roll": 0.0, "pitch": 0.0, "yaw": 0.0 }
//! }
//! ```
//!
//! `mode` is one of `bracket`, `span` or `ratio` and defaults to `bracket`;
//! `mounting` defaults to all zeros. Mounting offsets
//! are opaque to the calibration core; they travel with the profile for the
//! adjustment stage.
//!
//! ## Usage Example
//!
//! ```rust
//! use reckon_config::ProfileRegistry;
//! use reckon_core::NullAdjustment;
//!
//! let registry = ProfileRegistry::new();
//! registry.load_defaults()?;
//!
//! let mut axis = registry.build_axis("wheel_speed", NullAdjustment)?;
//! assert!(axis.add_ref(0.0, 12.5, Some(0.1)));
//! # Ok::<(), reckon_config::ConfigError>(())
//! ```

use reckon_core::CalibrationError;

pub mod profile;
pub mod registry;

pub use profile::{AxisProfile, MountingOffsets};
pub use registry::ProfileRegistry;

/// Profile and registry errors
#[derive(Debug, thiserror_no_std::Error)]
pub enum ConfigError {
    #[error("Failed to parse profile: {0}")]
    ParseError(String),

    #[error("Profile not found: {0}")]
    NotFound(String),

    #[error("Invalid profile {name}: {reason}")]
    InvalidProfile { name: String, reason: String },

    #[error("Calibration setup rejected: {0}")]
    Calibration(#[from] CalibrationError),

    #[error("Failed to read profiles: {0}")]
    Io(#[from] std::io::Error),

    #[error("Profile registry lock poisoned")]
    LockPoisoned,
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
