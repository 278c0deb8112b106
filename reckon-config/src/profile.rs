//! Axis Profiles
//!
//! One [`AxisProfile`] describes one calibrated sensor axis: the gates of its
//! bias and scale channels, the calibration mode and the sensor mounting.

use serde::{Deserialize, Serialize};

use reckon_core::{Adjustment, AxisConfig, CalibrationMode, ChannelConfig, SensorFusion};

use crate::ConfigError;

/// Sensor position and orientation in the vehicle frame
///
/// Metres and degrees. Not interpreted by the calibration core.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MountingOffsets {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

impl MountingOffsets {
    /// All components finite
    pub fn is_finite(&self) -> bool {
        [self.x, self.y, self.z, self.roll, self.pitch, self.yaw]
            .iter()
            .all(|v| v.is_finite())
    }
}

/// Calibration settings of one sensor axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisProfile {
    /// Registry key
    pub name: String,

    /// Unit of the reference stream, e.g. "m/s"
    pub unit: String,

    /// References must be strictly more accurate than this to update the bias
    pub bias_accuracy_limit: f64,

    /// References must be strictly more accurate than this to update the scale
    pub scale_accuracy_limit: f64,

    #[serde(default)]
    pub mode: CalibrationMode,

    #[serde(default)]
    pub mounting: MountingOffsets,
}

impl AxisProfile {
    /// Wheel-tick speed against GNSS speed
    ///
    /// GNSS speed accuracy is typically 0.05-0.3 m/s in open sky, so the
    /// gates sit just above that.
    pub fn wheel_speed() -> Self {
        Self {
            name: "wheel_speed".to_string(),
            unit: "m/s".to_string(),
            bias_accuracy_limit: 0.5,
            scale_accuracy_limit: 0.3,
            mode: CalibrationMode::Bracket,
            mounting: MountingOffsets::default(),
        }
    }

    /// Wheel ticks per fix against GNSS distance per fix
    pub fn wheel_ticks() -> Self {
        Self {
            name: "wheel_ticks".to_string(),
            unit: "m".to_string(),
            bias_accuracy_limit: 1.0,
            scale_accuracy_limit: 0.5,
            mode: CalibrationMode::Ratio,
            mounting: MountingOffsets::default(),
        }
    }

    /// Gyro yaw rate against GNSS course rate
    ///
    /// Course derived from GNSS is only trustworthy when moving; the limits
    /// are in degrees per second.
    pub fn gyro_yaw() -> Self {
        Self {
            name: "gyro_yaw".to_string(),
            unit: "deg/s".to_string(),
            bias_accuracy_limit: 2.0,
            scale_accuracy_limit: 1.0,
            mode: CalibrationMode::Bracket,
            mounting: MountingOffsets::default(),
        }
    }

    /// All built-in profiles
    pub fn presets() -> Vec<Self> {
        vec![Self::wheel_speed(), Self::wheel_ticks(), Self::gyro_yaw()]
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let profile: Self = serde_json::from_str(json)?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check name, mounting and both gates
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(self.invalid("empty name"));
        }
        if !self.mounting.is_finite() {
            return Err(self.invalid("mounting offsets must be finite"));
        }
        self.to_axis_config().validate()?;
        Ok(())
    }

    fn invalid(&self, reason: &str) -> ConfigError {
        ConfigError::InvalidProfile {
            name: self.name.clone(),
            reason: reason.to_string(),
        }
    }

    /// Core configuration for this axis
    pub fn to_axis_config(&self) -> AxisConfig {
        AxisConfig {
            bias: ChannelConfig::new(self.bias_accuracy_limit),
            scale: ChannelConfig::new(self.scale_accuracy_limit),
            mode: self.mode,
        }
    }

    /// Cold axis driven by `adjustment`
    pub fn build_axis<A: Adjustment>(&self, adjustment: A) -> Result<SensorFusion<A>, ConfigError> {
        self.validate()?;
        Ok(SensorFusion::new(self.to_axis_config(), adjustment)?)
    }
}
