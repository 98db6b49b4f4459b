//! Physics Configuration
//!
//! World-level parameters. Loadable from JSON so example games can tune
//! gravity and stepping without a rebuild; every field is optional and falls
//! back to its default.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::error::PhysicsError;

/// Configuration for a [`PhysicsWorld`](super::world::PhysicsWorld).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity acceleration (m/s²). Applied as `gravity * mass` so every
    /// dynamic body falls at the same rate.
    pub gravity: Vec3,
    /// Minimum upward component of a contact normal for the contact to count
    /// as floor. 0.7 accepts slopes up to roughly 45°.
    pub grounded_normal_threshold: f32,
    /// Fixed simulation step (seconds) used by the frame stepper.
    pub fixed_timestep: f32,
    /// Upper bound of fixed steps run for a single frame.
    pub max_steps_per_frame: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            grounded_normal_threshold: 0.7,
            fixed_timestep: 1.0 / 60.0,
            max_steps_per_frame: 8,
        }
    }
}

impl PhysicsConfig {
    /// Default config with a custom gravity vector.
    pub fn with_gravity(gravity: Vec3) -> Self {
        Self {
            gravity,
            ..Self::default()
        }
    }

    /// Parse and validate a JSON document. Missing fields take their defaults.
    ///
    /// # Returns
    ///
    /// * `Ok(config)` - Parsed and valid
    /// * `Err(PhysicsError::ConfigParse)` - Malformed JSON or wrong field types
    /// * `Err(PhysicsError::InvalidConfig)` - Parsed but out of range
    pub fn from_json_str(json: &str) -> Result<Self, PhysicsError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a config file. IO failures map to
    /// [`PhysicsError::ConfigIo`].
    pub fn load(path: &Path) -> Result<Self, PhysicsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json_pretty(&self) -> Result<String, PhysicsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every field: finite gravity, threshold in `(0, 1]`, positive
    /// finite timestep, at least one step per frame.
    pub fn validate(&self) -> Result<(), PhysicsError> {
        if !self.gravity.is_finite() {
            return Err(PhysicsError::InvalidConfig(format!(
                "gravity must be finite, got {}",
                self.gravity
            )));
        }
        if !(self.grounded_normal_threshold > 0.0 && self.grounded_normal_threshold <= 1.0) {
            return Err(PhysicsError::InvalidConfig(format!(
                "grounded_normal_threshold must be within (0, 1], got {}",
                self.grounded_normal_threshold
            )));
        }
        if !(self.fixed_timestep.is_finite() && self.fixed_timestep > 0.0) {
            return Err(PhysicsError::InvalidConfig(format!(
                "fixed_timestep must be positive, got {}",
                self.fixed_timestep
            )));
        }
        if self.max_steps_per_frame == 0 {
            return Err(PhysicsError::InvalidConfig(
                "max_steps_per_frame must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = PhysicsConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.gravity.y, -9.81);
    }

    #[test]
    fn test_with_gravity_keeps_other_defaults() {
        let config = PhysicsConfig::with_gravity(Vec3::new(0.0, -1.62, 0.0));
        assert_eq!(config.gravity, Vec3::new(0.0, -1.62, 0.0));
        assert_eq!(
            PhysicsConfig { gravity: PhysicsConfig::default().gravity, ..config },
            PhysicsConfig::default()
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = PhysicsConfig::from_json_str(r#"{ "gravity": [0.0, -20.0, 0.0] }"#).unwrap();
        assert_eq!(config.gravity, Vec3::new(0.0, -20.0, 0.0));
        assert_eq!(config.max_steps_per_frame, 8);
        assert_eq!(config.grounded_normal_threshold, 0.7);
    }

    #[test]
    fn test_json_round_trip() {
        let config = PhysicsConfig {
            gravity: Vec3::new(1.0, -3.0, 0.5),
            grounded_normal_threshold: 0.9,
            fixed_timestep: 0.005,
            max_steps_per_frame: 3,
        };
        let json = config.to_json_pretty().unwrap();
        assert_eq!(PhysicsConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            PhysicsConfig::from_json_str(r#"{ "fixed_timestep": 0.0 }"#),
            Err(PhysicsError::InvalidConfig(_))
        ));
        assert!(matches!(
            PhysicsConfig::from_json_str(r#"{ "grounded_normal_threshold": 1.5 }"#),
            Err(PhysicsError::InvalidConfig(_))
        ));
        assert!(matches!(
            PhysicsConfig::from_json_str(r#"{ "max_steps_per_frame": 0 }"#),
            Err(PhysicsError::InvalidConfig(_))
        ));
        assert!(matches!(
            PhysicsConfig::from_json_str("{ not json"),
            Err(PhysicsError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let result = PhysicsConfig::load(Path::new("/definitely/not/here/physics.json"));
        assert!(matches!(result, Err(PhysicsError::ConfigIo(_))));
    }
}
