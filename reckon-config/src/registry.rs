//! Profile Registry
//!
//! Thread-safe store of [`AxisProfile`]s keyed by name. Profiles come from
//! the built-in presets, from JSON text or from JSON files; a later profile
//! with the same name replaces the earlier one.

use std::{collections::HashMap, fs, path::Path, sync::RwLock};

use serde::Deserialize;

use reckon_core::{Adjustment, SensorFusion};

use crate::{AxisProfile, ConfigError};

/// JSON input: one profile or a list of them
#[derive(Deserialize)]
#[serde(untagged)]
enum ProfileDocument {
    Many(Vec<AxisProfile>),
    One(AxisProfile),
}

/// Thread-safe profile store
#[derive(Debug, Default)]
pub struct ProfileRegistry {
    profiles: RwLock<HashMap<String, AxisProfile>>,
}

impl ProfileRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and store a profile
    pub fn register(&self, profile: AxisProfile) -> Result<(), ConfigError> {
        profile.validate()?;

        let mut profiles = self.profiles.write().map_err(|_| ConfigError::LockPoisoned)?;
        if let Some(previous) = profiles.insert(profile.name.clone(), profile) {
            log::debug!("profile {} replaced", previous.name);
        }
        Ok(())
    }

    /// Get a copy of a profile by name
    pub fn get(&self, name: &str) -> Result<AxisProfile, ConfigError> {
        let profiles = self.profiles.read().map_err(|_| ConfigError::LockPoisoned)?;
        profiles
            .get(name)
            .cloned()
            .ok_or_else(|| ConfigError::NotFound(name.to_string()))
    }

    /// Registered names, sorted
    pub fn names(&self) -> Result<Vec<String>, ConfigError> {
        let profiles = self.profiles.read().map_err(|_| ConfigError::LockPoisoned)?;
        let mut names: Vec<String> = profiles.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    /// Register the built-in presets
    pub fn load_defaults(&self) -> Result<(), ConfigError> {
        for profile in AxisProfile::presets() {
            self.register(profile)?;
        }
        Ok(())
    }

    /// Register every profile in a JSON document, returning how many
    ///
    /// Nothing is registered if any profile is invalid.
    pub fn load_json(&self, json: &str) -> Result<usize, ConfigError> {
        let profiles = match serde_json::from_str(json)? {
            ProfileDocument::Many(profiles) => profiles,
            ProfileDocument::One(profile) => vec![profile],
        };
        for profile in &profiles {
            profile.validate()?;
        }

        let count = profiles.len();
        for profile in profiles {
            self.register(profile)?;
        }
        log::debug!("loaded {} axis profiles", count);
        Ok(count)
    }

    /// [`load_json`](Self::load_json) on a file
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<usize, ConfigError> {
        let json = fs::read_to_string(path)?;
        self.load_json(&json)
    }

    /// Build a cold axis from a registered profile
    pub fn build_axis<A: Adjustment>(
        &self,
        name: &str,
        adjustment: A,
    ) -> Result<SensorFusion<A>, ConfigError> {
        self.get(name)?.build_axis(adjustment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reckon_core::{CalibrationMode, NullAdjustment};
    use std::io::Write;

    const PROFILES: &str = r#"[
        {"name":"wheel_rear_left","unit":"m/s","bias_accuracy_limit":0.4,"scale_accuracy_limit":0.2},
        {"name":"wheel_rear_right","unit":"m/s","bias_accuracy_limit":0.4,"scale_accuracy_limit":0.2,"mode":"span"}
    ]"#;

    #[test]
    fn defaults_registered() {
        let registry = ProfileRegistry::new();
        registry.load_defaults().unwrap();

        assert_eq!(registry.names().unwrap(), vec!["gyro_yaw", "wheel_speed", "wheel_ticks"]);
        assert_eq!(registry.get("gyro_yaw").unwrap(), AxisProfile::gyro_yaw());
    }

    #[test]
    fn missing_profile_reported() {
        let registry = ProfileRegistry::new();
        assert!(matches!(registry.get("nope"), Err(ConfigError::NotFound(name)) if name == "nope"));
        assert!(registry.build_axis("nope", NullAdjustment).is_err());
    }

    #[test]
    fn json_list_and_single_profile() {
        let registry = ProfileRegistry::new();
        assert_eq!(registry.load_json(PROFILES).unwrap(), 2);
        assert_eq!(registry.get("wheel_rear_right").unwrap().mode, CalibrationMode::Span);

        let single = AxisProfile::gyro_yaw().to_json().unwrap();
        assert_eq!(registry.load_json(&single).unwrap(), 1);
        assert_eq!(registry.names().unwrap().len(), 3);
    }

    #[test]
    fn invalid_document_registers_nothing() {
        let registry = ProfileRegistry::new();
        let json = r#"[
            {"name":"ok","unit":"m/s","bias_accuracy_limit":0.4,"scale_accuracy_limit":0.2},
            {"name":"bad","unit":"m/s","bias_accuracy_limit":-1.0,"scale_accuracy_limit":0.2}
        ]"#;

        assert!(registry.load_json(json).is_err());
        assert!(registry.names().unwrap().is_empty());
        assert!(matches!(registry.load_json("not json"), Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn later_profile_replaces_earlier() {
        let registry = ProfileRegistry::new();
        registry.load_defaults().unwrap();

        let mut tuned = AxisProfile::wheel_speed();
        tuned.scale_accuracy_limit = 0.15;
        registry.register(tuned).unwrap();

        let axis = registry.build_axis("wheel_speed", NullAdjustment).unwrap();
        assert_eq!(axis.scale_channel().accuracy_limit(), 0.15);
    }

    #[test]
    fn profiles_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(PROFILES.as_bytes()).unwrap();

        let registry = ProfileRegistry::new();
        assert_eq!(registry.load_file(file.path()).unwrap(), 2);
        assert!(matches!(
            registry.load_file(file.path().with_extension("missing")),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn shared_between_threads() {
        let registry = std::sync::Arc::new(ProfileRegistry::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let registry = std::sync::Arc::clone(&registry);
                std::thread::spawn(move || {
                    let mut profile = AxisProfile::wheel_speed();
                    profile.name = format!("wheel_{i}");
                    registry.register(profile).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(registry.names().unwrap().len(), 4);
    }
}
