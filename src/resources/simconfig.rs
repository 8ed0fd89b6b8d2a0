//! Simulation configuration resource.
//!
//! Manages simulation settings loaded from an INI configuration file.
//! Provides defaults for safe startup and methods to load/save
//! configuration.
//!
//! # Configuration File Format
//!
//! ```ini
//! [simulation]
//! update_rate = 60
//! time_scale = 1.0
//! max_lag_ms = 67
//! position_tolerance = 0.001
//!
//! [spatial]
//! cell_size = 64
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::{info, warn};
use std::path::PathBuf;

use crate::error::ConfigError;

/// Default safe values for startup
pub const DEFAULT_UPDATE_RATE: u32 = crate::resources::worldtime::DEFAULT_UPDATE_RATE;
pub const DEFAULT_TIME_SCALE: f32 = 1.0;
pub const DEFAULT_MAX_LAG_MS: f32 = 67.0;
pub const DEFAULT_POSITION_TOLERANCE: f32 = 0.001;
pub const DEFAULT_CELL_SIZE: f32 = 64.0;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Simulation configuration resource.
///
/// Stores the tick rate, lag window and position tolerance used by the
/// movement systems, plus the spatial index cell size.
#[derive(Resource, Debug, Clone)]
pub struct SimConfig {
    /// Ticks per second requested from the loop.
    pub update_rate: u32,
    /// Initial global time scale.
    pub time_scale: f32,
    /// Longest tick, in milliseconds, that movement will integrate.
    pub max_lag_ms: f32,
    /// Position writes closer than this to the current position are dropped.
    pub position_tolerance: f32,
    /// Edge length of a spatial index cell in world units.
    pub cell_size: f32,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SimConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            update_rate: DEFAULT_UPDATE_RATE,
            time_scale: DEFAULT_TIME_SCALE,
            max_lag_ms: DEFAULT_MAX_LAG_MS,
            position_tolerance: DEFAULT_POSITION_TOLERANCE,
            cell_size: DEFAULT_CELL_SIZE,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing or invalid values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), ConfigError> {
        let mut config = Ini::new();
        config.load(&self.config_path).map_err(|e| ConfigError::Load {
            path: self.config_path.clone(),
            reason: e,
        })?;
        self.apply(&config);

        info!(
            "Loaded config: update_rate={}, time_scale={}, max_lag_ms={}, position_tolerance={}, cell_size={}",
            self.update_rate,
            self.time_scale,
            self.max_lag_ms,
            self.position_tolerance,
            self.cell_size
        );

        Ok(())
    }

    /// Load configuration from INI text instead of a file.
    pub fn load_from_str(&mut self, contents: &str) -> Result<(), ConfigError> {
        let mut config = Ini::new();
        config.read(contents.to_owned()).map_err(|e| ConfigError::Load {
            path: self.config_path.clone(),
            reason: e,
        })?;
        self.apply(&config);
        Ok(())
    }

    fn apply(&mut self, config: &Ini) {
        // [simulation] section
        if let Some(rate) = config.getuint("simulation", "update_rate").ok().flatten() {
            if rate > 0 {
                self.update_rate = rate as u32;
            } else {
                warn!("Ignoring update_rate=0");
            }
        }
        if let Some(scale) = config.getfloat("simulation", "time_scale").ok().flatten() {
            self.time_scale = (scale as f32).max(0.0);
        }
        if let Some(lag) = config.getfloat("simulation", "max_lag_ms").ok().flatten() {
            if lag > 0.0 {
                self.max_lag_ms = lag as f32;
            } else {
                warn!("Ignoring non-positive max_lag_ms={lag}");
            }
        }
        if let Some(tolerance) = config
            .getfloat("simulation", "position_tolerance")
            .ok()
            .flatten()
        {
            self.position_tolerance = (tolerance as f32).max(0.0);
        }

        // [spatial] section
        if let Some(size) = config.getfloat("spatial", "cell_size").ok().flatten() {
            if size > 0.0 {
                self.cell_size = size as f32;
            } else {
                warn!("Ignoring non-positive cell_size={size}");
            }
        }
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), ConfigError> {
        let mut config = Ini::new();

        // [simulation] section
        config.set("simulation", "update_rate", Some(self.update_rate.to_string()));
        config.set("simulation", "time_scale", Some(self.time_scale.to_string()));
        config.set("simulation", "max_lag_ms", Some(self.max_lag_ms.to_string()));
        config.set(
            "simulation",
            "position_tolerance",
            Some(self.position_tolerance.to_string()),
        );

        // [spatial] section
        config.set("spatial", "cell_size", Some(self.cell_size.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| ConfigError::Save {
                path: self.config_path.clone(),
                reason: e.to_string(),
            })?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = SimConfig::new();
        assert_eq!(c.update_rate, 60);
        assert_eq!(c.max_lag_ms, 67.0);
        assert_eq!(c.position_tolerance, 0.001);
    }

    #[test]
    fn test_load_from_str_overrides_present_keys() {
        let mut c = SimConfig::new();
        c.load_from_str(
            "[simulation]\nupdate_rate = 30\nmax_lag_ms = 100\nposition_tolerance = 0.5\n",
        )
        .unwrap();
        assert_eq!(c.update_rate, 30);
        assert_eq!(c.max_lag_ms, 100.0);
        assert_eq!(c.position_tolerance, 0.5);
        // untouched
        assert_eq!(c.time_scale, DEFAULT_TIME_SCALE);
        assert_eq!(c.cell_size, DEFAULT_CELL_SIZE);
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let mut c = SimConfig::new();
        c.load_from_str("[simulation]\nupdate_rate = 0\nmax_lag_ms = -4\n[spatial]\ncell_size = nope\n")
            .unwrap();
        assert_eq!(c.update_rate, DEFAULT_UPDATE_RATE);
        assert_eq!(c.max_lag_ms, DEFAULT_MAX_LAG_MS);
        assert_eq!(c.cell_size, DEFAULT_CELL_SIZE);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let mut c = SimConfig::with_path("/nonexistent/mobilecore/config.ini");
        assert!(matches!(c.load_from_file(), Err(ConfigError::Load { .. })));
    }
}
