//! Configuration schema types
//!
//! This module defines the configuration structure for Spool.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Policy applied when a read on the relay sees no data within the timeout
///
/// The observed behavior of the system this library replaces was to treat a
/// stalled producer as a soft end-of-stream, which bounds worst-case hang
/// time but reports very slow producers as truncated output. That behavior
/// is kept as the default, with `Error` available for callers that prefer
/// an explicit failure over silent truncation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StallPolicy {
    /// Report end-of-stream when the timeout expires
    #[default]
    Truncate,
    /// Report an I/O error when the timeout expires
    Error,
}

/// Main Spool configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SpoolConfig {
    /// Byte-relay settings
    #[serde(default)]
    pub relay: RelayConfig,

    /// Attachment storage settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SpoolConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.relay.validate()?;
        self.storage.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Byte-relay configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Payloads with a known length below this many bytes are materialized
    /// in memory instead of going through the relay channel
    #[serde(default = "default_spool_threshold")]
    pub spool_threshold: usize,

    /// Maximum bytes carried per queue slot
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Number of queue slots; together with `chunk_size` this bounds the
    /// data buffered in flight
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Timeout in milliseconds applied to both blocked writes and blocked
    /// reads on the relay channel
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// What a read that times out waiting for data reports
    #[serde(default)]
    pub stall_policy: StallPolicy,
}

impl RelayConfig {
    /// The channel timeout as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Validates the relay configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.chunk_size == 0 {
            return Err("relay.chunk_size must be greater than 0".to_string());
        }
        if self.queue_capacity == 0 {
            return Err("relay.queue_capacity must be greater than 0".to_string());
        }
        if self.timeout_ms == 0 {
            return Err("relay.timeout_ms must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            spool_threshold: default_spool_threshold(),
            chunk_size: default_chunk_size(),
            queue_capacity: default_queue_capacity(),
            timeout_ms: default_timeout_ms(),
            stall_policy: StallPolicy::default(),
        }
    }
}

/// Attachment storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory for stored data
    #[serde(default = "default_base_dir")]
    pub base_dir: String,

    /// Subdirectory of `base_dir` used for temporary data
    #[serde(default = "default_temp_subdir")]
    pub temp_subdir: String,
}

impl StorageConfig {
    /// Validates the storage configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.base_dir.trim().is_empty() {
            return Err("storage.base_dir must not be empty".to_string());
        }
        if self.temp_subdir.trim().is_empty() || self.temp_subdir.contains('/') {
            return Err("storage.temp_subdir must be a single path segment".to_string());
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            temp_subdir: default_temp_subdir(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to also write JSON logs to a local file
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for local log files
    #[serde(default = "default_log_path")]
    pub local_path: String,

    /// Log file rotation: "daily" or "hourly"
    #[serde(default = "default_log_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    /// Validates the logging configuration
    pub fn validate(&self) -> Result<(), String> {
        match self.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(format!(
                    "logging.level must be one of trace, debug, info, warn, error; got: {}",
                    other
                ))
            }
        }
        match self.local_rotation.as_str() {
            "daily" | "hourly" => Ok(()),
            other => Err(format!(
                "logging.local_rotation must be \"daily\" or \"hourly\", got: {}",
                other
            )),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            local_enabled: false,
            local_path: default_log_path(),
            local_rotation: default_log_rotation(),
        }
    }
}

fn default_spool_threshold() -> usize {
    128 * 1024
}

fn default_chunk_size() -> usize {
    8 * 1024
}

fn default_queue_capacity() -> usize {
    16
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_base_dir() -> String {
    "data".to_string()
}

fn default_temp_subdir() -> String {
    "tmp".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_path() -> String {
    "logs".to_string()
}

fn default_log_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relay_config_defaults() {
        let config = RelayConfig::default();
        assert_eq!(config.spool_threshold, 128 * 1024);
        assert_eq!(config.chunk_size, 8 * 1024);
        assert_eq!(config.queue_capacity, 16);
        assert_eq!(config.timeout_ms, 30_000);
        assert_eq!(config.stall_policy, StallPolicy::Truncate);
        // Default in-flight bound matches the spool threshold
        assert_eq!(config.chunk_size * config.queue_capacity, config.spool_threshold);
    }

    #[test]
    fn test_relay_config_timeout() {
        let config = RelayConfig {
            timeout_ms: 250,
            ..RelayConfig::default()
        };
        assert_eq!(config.timeout(), Duration::from_millis(250));
    }

    #[test]
    fn test_relay_config_validation() {
        let mut config = RelayConfig::default();
        assert!(config.validate().is_ok());

        config.chunk_size = 0;
        assert!(config.validate().is_err());

        config = RelayConfig {
            queue_capacity: 0,
            ..RelayConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_stall_policy_deserialization() {
        let config: RelayConfig = toml::from_str("stall_policy = \"error\"").unwrap();
        assert_eq!(config.stall_policy, StallPolicy::Error);

        let config: RelayConfig = toml::from_str("").unwrap();
        assert_eq!(config.stall_policy, StallPolicy::Truncate);
    }

    #[test]
    fn test_storage_config_validation() {
        let mut config = StorageConfig::default();
        assert!(config.validate().is_ok());

        config.base_dir = "  ".to_string();
        assert!(config.validate().is_err());

        config = StorageConfig {
            temp_subdir: "a/b".to_string(),
            ..StorageConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_logging_config_validation() {
        let mut config = LoggingConfig::default();
        assert!(config.validate().is_ok());

        config.level = "verbose".to_string();
        assert!(config.validate().is_err());

        config = LoggingConfig {
            local_rotation: "weekly".to_string(),
            ..LoggingConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_spool_config_validates_all_sections() {
        let config = SpoolConfig::default();
        assert!(config.validate().is_ok());

        let config = SpoolConfig {
            relay: RelayConfig {
                timeout_ms: 0,
                ..RelayConfig::default()
            },
            ..SpoolConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
