use std::{path::Path, str::FromStr, time::Duration};

use crate::target::Bounds;

/// Mechanical range of the rotator, as enforced by its firmware
pub const AZIMUTH_LIMITS: Bounds = Bounds::limits(-270, 270);
pub const ELEVATION_LIMITS: Bounds = Bounds::limits(-20, 85);

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not parse config file: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid log level {0:?}")]
    LogLevel(String),
}

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Configuration {
    /// Path of the serial device the rotator is connected to
    pub uart: String,
    #[serde(default = "default_baudrate")]
    pub baudrate: u32,
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,
    #[serde(default = "default_log_path")]
    pub log_path: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Pause between two targets
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Pause before reading what the rotator answered during startup
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
    /// Stop after this many targets. Runs forever if not set.
    #[serde(default)]
    pub iterations: Option<u64>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_azimuth")]
    pub azimuth: Bounds,
    #[serde(default = "default_elevation")]
    pub elevation: Bounds,
}

fn default_baudrate() -> u32 {
    115200
}

fn default_read_timeout_ms() -> u64 {
    100
}

fn default_log_path() -> String {
    "log".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_interval_ms() -> u64 {
    4000
}

fn default_settle_ms() -> u64 {
    1000
}

fn default_azimuth() -> Bounds {
    Bounds::limits(-130, -100)
}

fn default_elevation() -> Bounds {
    Bounds::limits(0, 25)
}

impl Configuration {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    pub fn log_level(&self) -> Result<log::LevelFilter, ConfigError> {
        log::LevelFilter::from_str(&self.log_level)
            .map_err(|_| ConfigError::LogLevel(self.log_level.clone()))
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    /// Returns a warning for every range the rotator can not physically reach
    pub fn range_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        for (name, bounds, limits) in [
            ("azimuth", self.azimuth, AZIMUTH_LIMITS),
            ("elevation", self.elevation, ELEVATION_LIMITS),
        ] {
            if !bounds.is_within(&limits) {
                warnings.push(format!(
                    "{name} range {}..={} exceeds rotator limits {}..={}",
                    bounds.min(),
                    bounds.max(),
                    limits.min(),
                    limits.max()
                ));
            }
        }
        warnings
    }
}

impl FromStr for Configuration {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: Configuration = toml::from_str(s)?;
        config.log_level()?;
        Ok(config)
    }
}
