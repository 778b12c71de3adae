//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.
//!
//! Every field has a default, so an empty file (or no file at all, via
//! [`Config::default`]) yields a working configuration.

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{CubepadError, Result};

/// Log levels accepted by `logging.level`
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub frame: FrameConfig,
    #[serde(default)]
    pub host: HostConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub event_log: EventLogConfig,
}

/// Gamepad input policy
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct InputConfig {
    /// Magnitude at or below which GUI-facing analog events read as released.
    #[serde(default = "default_deadzone")]
    pub deadzone: f32,

    /// Scale from raw axis value to cube rotation per frame.
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f32,
}

/// Frame loop timing
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct FrameConfig {
    #[serde(default = "default_rate_hz")]
    pub rate_hz: u32,

    #[serde(default = "default_status_interval_frames")]
    pub status_interval_frames: u64,
}

/// Host (evdev) configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct HostConfig {
    #[serde(default = "default_input_dir")]
    pub input_dir: String,

    #[serde(default = "default_scan_interval_frames")]
    pub scan_interval_frames: u64,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for rolling log files. Empty logs to the console only.
    #[serde(default)]
    pub log_dir: String,
}

/// GUI event log configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct EventLogConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_event_log_path")]
    pub path: String,
}

// Default value functions
fn default_deadzone() -> f32 { 0.1 }
fn default_sensitivity() -> f32 { 0.05 }

fn default_rate_hz() -> u32 { 60 }
fn default_status_interval_frames() -> u64 { 600 }

fn default_input_dir() -> String { "/dev/input".to_string() }
fn default_scan_interval_frames() -> u64 { 30 }

fn default_log_level() -> String { "info".to_string() }

fn default_event_log_path() -> String { "gui-events.jsonl".to_string() }

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            deadzone: default_deadzone(),
            sensitivity: default_sensitivity(),
        }
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            rate_hz: default_rate_hz(),
            status_interval_frames: default_status_interval_frames(),
        }
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            scan_interval_frames: default_scan_interval_frames(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_dir: String::new(),
        }
    }
}

impl Default for EventLogConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_event_log_path(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use cubepad::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=0.5).contains(&self.input.deadzone) {
            return Err(invalid("deadzone must be between 0.0 and 0.5"));
        }

        if !(self.input.sensitivity > 0.0 && self.input.sensitivity.is_finite()) {
            return Err(invalid("sensitivity must be a positive number"));
        }

        if self.frame.rate_hz == 0 || self.frame.rate_hz > 240 {
            return Err(invalid("rate_hz must be between 1 and 240"));
        }

        if self.frame.status_interval_frames == 0 {
            return Err(invalid("status_interval_frames must be greater than 0"));
        }

        if self.host.input_dir.is_empty() {
            return Err(invalid("input_dir cannot be empty"));
        }

        if self.host.scan_interval_frames == 0 {
            return Err(invalid("scan_interval_frames must be greater than 0"));
        }

        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(invalid("level must be one of: trace, debug, info, warn, error"));
        }

        if self.event_log.enabled && self.event_log.path.is_empty() {
            return Err(invalid("event_log path cannot be empty when enabled"));
        }

        Ok(())
    }
}

fn invalid(msg: &str) -> CubepadError {
    CubepadError::Config(toml::de::Error::custom(msg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.input.deadzone, 0.1);
        assert_eq!(config.input.sensitivity, 0.05);
        assert_eq!(config.frame.rate_hz, 60);
        assert_eq!(config.host.input_dir, "/dev/input");
        assert!(!config.event_log.enabled);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = Config::from_toml("[input]\ndeadzone = 0.2\n").unwrap();
        assert_eq!(config.input.deadzone, 0.2);
        assert_eq!(config.input.sensitivity, default_sensitivity());
    }

    #[test]
    fn test_invalid_deadzone() {
        let mut config = Config::default();
        config.input.deadzone = 0.75; // Invalid: > 0.5
        assert!(config.validate().is_err());

        config.input.deadzone = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_sensitivity() {
        let mut config = Config::default();
        config.input.sensitivity = 0.0;
        assert!(config.validate().is_err());

        config.input.sensitivity = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_frame_rate() {
        let mut config = Config::default();
        config.frame.rate_hz = 0;
        assert!(config.validate().is_err());

        config.frame.rate_hz = 500;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_intervals() {
        let mut config = Config::default();
        config.frame.status_interval_frames = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.host.scan_interval_frames = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_event_log_requires_path_when_enabled() {
        let mut config = Config::default();
        config.event_log.enabled = true;
        config.event_log.path = String::new();
        assert!(config.validate().is_err());

        config.event_log.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_config_from_file() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let toml_content = r#"
[input]
deadzone = 0.15
sensitivity = 0.02

[frame]
rate_hz = 120

[host]
input_dir = "/tmp/input"
scan_interval_frames = 10

[logging]
level = "debug"
log_dir = "./logs"

[event_log]
enabled = true
path = "events.jsonl"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = Config::load(temp_file.path()).unwrap();
        assert_eq!(config.input.deadzone, 0.15);
        assert_eq!(config.input.sensitivity, 0.02);
        assert_eq!(config.frame.rate_hz, 120);
        assert_eq!(config.frame.status_interval_frames, 600);
        assert_eq!(config.host.input_dir, "/tmp/input");
        assert_eq!(config.host.scan_interval_frames, 10);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.log_dir, "./logs");
        assert!(config.event_log.enabled);
        assert_eq!(config.event_log.path, "events.jsonl");
    }

    #[test]
    fn test_load_invalid_file_is_rejected() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[frame]\nrate_hz = 0\n").unwrap();

        assert!(matches!(
            Config::load(temp_file.path()),
            Err(CubepadError::Config(_))
        ));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(dir.path().join("missing.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_shipped_default_file_matches_defaults() {
        let config = Config::from_toml(include_str!("../config/default.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_malformed_toml() {
        assert!(Config::from_toml("[input\ndeadzone = ").is_err());
    }
}
