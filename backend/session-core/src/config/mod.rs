use crate::DEVICE_BINARY;
use crate::error::config::ConfigError;
use crate::wait::DEFAULT_POLL_INTERVAL;

use common::ErrorLocation;
use models::OperationalDataset;

use std::panic::Location;
use std::path::Path;
use std::time::Duration;

use log::{info, warn};
use serde::{Deserialize, Serialize};

const CONFIG_FILE_NAME: &str = "ftd-ctl.json";
const CONFIG_VERSION: u32 = 1;

/// Largest node id the simulation platform accepts.
pub const MAX_SIMULATION_NODE_ID: u32 = 33;

const MAX_POLL_INTERVAL_MS: u64 = 1000;

// ============================================
// CONFIG STRUCTS
// ============================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeviceSettings {
    #[serde(default = "default_binary")]
    pub binary: String,
    #[serde(default = "default_node_id")]
    pub node_id: u32,
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            node_id: default_node_id(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimingSettings {
    #[serde(default = "default_state_timeout_secs")]
    pub state_timeout_secs: u64,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            state_timeout_secs: default_state_timeout_secs(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl TimingSettings {
    pub fn state_timeout(&self) -> Duration {
        Duration::from_secs(self.state_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeviceConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub device: DeviceSettings,

    #[serde(default)]
    pub timing: TimingSettings,

    /// Dataset used by the `join` action.
    #[serde(default)]
    pub network: Option<OperationalDataset>,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            device: DeviceSettings::default(),
            timing: TimingSettings::default(),
            network: None,
        }
    }
}

// ============================================
// DEFAULT FUNCTIONS
// ============================================

fn default_version() -> u32 {
    CONFIG_VERSION
}
fn default_binary() -> String {
    DEVICE_BINARY.to_string()
}
fn default_node_id() -> u32 {
    1
}
fn default_state_timeout_secs() -> u64 {
    30
}
fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL.as_millis() as u64
}

// ============================================
// IMPLEMENTATION
// ============================================

impl DeviceConfig {
    /// Load config from {config_dir}/ftd-ctl.json.
    ///
    /// # Returns
    ///
    /// Returns `Ok(DeviceConfig)` if loaded successfully or defaults if file missing.
    /// Returns `Err(ConfigError)` if file exists but is corrupted/invalid.
    pub fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            info!(
                "Config file not found at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path).map_err(|e| {
            warn!("Failed to read config file: {}", e);
            ConfigError::ReadError {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                source: e,
            }
        })?;

        let config: DeviceConfig = serde_json::from_str(&contents).map_err(|e| {
            warn!("Failed to parse config JSON: {}", e);
            ConfigError::ParseError {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                line: e.line(),
                column: e.column(),
                reason: e.to_string(),
            }
        })?;

        config.validate()?;

        info!("Config loaded from {}", config_path.display());
        Ok(config)
    }

    /// Save config to {config_dir}/ftd-ctl.json using atomic write.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if validation, directory creation, serialization,
    /// the temp-file write or the rename fails.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        self.validate()?;

        std::fs::create_dir_all(config_dir).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: config_dir.to_path_buf(),
            source: e,
        })?;

        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let temp_path = config_dir.join(format!("{}.tmp", CONFIG_FILE_NAME));

        let json = serde_json::to_string_pretty(self).map_err(|e| ConfigError::SerializeError {
            location: ErrorLocation::from(Location::caller()),
            reason: e.to_string(),
        })?;

        std::fs::write(&temp_path, json).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: temp_path.clone(),
            source: e,
        })?;

        // Atomic rename (POSIX guarantees atomicity)
        std::fs::rename(&temp_path, &config_path).map_err(|e| ConfigError::WriteError {
            location: ErrorLocation::from(Location::caller()),
            path: config_path.clone(),
            source: e,
        })?;

        info!("Config saved to {}", config_path.display());
        Ok(())
    }

    /// Validate config values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSetting`] naming the first out-of-range field.
    /// A network dataset is already checked when the file is parsed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version == 0 || self.version > CONFIG_VERSION {
            return Err(invalid(
                "version",
                format!("{} (expected 1-{})", self.version, CONFIG_VERSION),
            ));
        }

        if self.device.binary.trim().is_empty() {
            return Err(invalid("device.binary", "cannot be empty".to_string()));
        }

        if !(1..=MAX_SIMULATION_NODE_ID).contains(&self.device.node_id) {
            return Err(invalid(
                "device.node_id",
                format!("{} (must be 1-{})", self.device.node_id, MAX_SIMULATION_NODE_ID),
            ));
        }

        if self.timing.state_timeout_secs == 0 {
            return Err(invalid(
                "timing.state_timeout_secs",
                "must be positive".to_string(),
            ));
        }

        if !(1..=MAX_POLL_INTERVAL_MS).contains(&self.timing.poll_interval_ms) {
            return Err(invalid(
                "timing.poll_interval_ms",
                format!(
                    "{}ms (must be 1-{}ms)",
                    self.timing.poll_interval_ms, MAX_POLL_INTERVAL_MS
                ),
            ));
        }

        Ok(())
    }
}

#[track_caller]
fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::InvalidSetting {
        location: ErrorLocation::from(Location::caller()),
        field,
        reason,
    }
}
