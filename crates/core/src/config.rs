//! Integrator configuration
//!
//! Defaults are a 6378.1 km sphere and a sampling
//! window of ±5° longitude/latitude and ±100 hPa around each query point.

use crate::error::ConfigError;
use crate::physics::geodesic::EARTH_RADIUS_KM;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration for field sampling and trajectory stepping
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrajectoryConfig {
    /// Sphere radius for the geodesic stepper (km)
    pub earth_radius_km: f64,

    /// Half-width of the longitude band selected around a query (degrees)
    pub lon_half_width: f64,

    /// Half-width of the latitude band selected around a query (degrees)
    pub lat_half_width: f64,

    /// Half-depth of the level band selected around a query (hPa)
    pub level_half_depth: f64,

    /// Lowest pressure the level band may reach (hPa)
    pub min_level: f64,
}

impl Default for TrajectoryConfig {
    fn default() -> Self {
        Self {
            earth_radius_km: EARTH_RADIUS_KM,
            lon_half_width: 5.0,
            lat_half_width: 5.0,
            level_half_depth: 100.0,
            min_level: 1.0,
        }
    }
}

impl TrajectoryConfig {
    /// Check that every parameter is finite and positive
    ///
    /// # Errors
    /// Returns `ConfigError::Invalid` naming the first bad parameter
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("earth_radius_km", self.earth_radius_km),
            ("lon_half_width", self.lon_half_width),
            ("lat_half_width", self.lat_half_width),
            ("level_half_depth", self.level_half_depth),
            ("min_level", self.min_level),
        ];
        for (name, value) in checks {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be finite and positive, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Load and validate a configuration from a JSON file
    ///
    /// Missing keys fall back to their defaults.
    ///
    /// # Errors
    /// Returns error if the file cannot be read, parsed, or fails validation
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration as pretty-printed JSON
    ///
    /// # Errors
    /// Returns error if the configuration cannot be serialized or written
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let cfg = TrajectoryConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.earth_radius_km, 6378.1);
        assert_eq!(cfg.level_half_depth, 100.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let cfg: TrajectoryConfig = serde_json::from_str(r#"{"lon_half_width": 2.5}"#).unwrap();
        assert_eq!(cfg.lon_half_width, 2.5);
        assert_eq!(cfg.lat_half_width, 5.0);
        assert_eq!(cfg.min_level, 1.0);
    }

    #[test]
    fn test_rejects_non_positive() {
        let cfg = TrajectoryConfig {
            level_half_depth: 0.0,
            ..Default::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("level_half_depth"));
    }

    #[test]
    fn test_save_and_load() {
        let cfg = TrajectoryConfig {
            earth_radius_km: 6371.0,
            ..Default::default()
        };
        let path = std::env::temp_dir().join("backtraj_config_roundtrip.json");
        cfg.save(&path).unwrap();
        let loaded = TrajectoryConfig::load(&path).unwrap();
        assert_eq!(loaded, cfg);
        let _ = fs::remove_file(path);
    }
}
