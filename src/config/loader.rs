//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{SpoolConfig, StallPolicy};
use crate::domain::errors::SpoolError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into SpoolConfig
/// 4. Applies environment variable overrides (SPOOL_* prefix)
/// 5. Validates the configuration
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use spool::config::load_config;
///
/// let config = load_config("spool.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<SpoolConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(SpoolError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        SpoolError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: SpoolConfig = toml::from_str(&contents)
        .map_err(|e| SpoolError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        SpoolError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Arguments
///
/// * `input` - String containing ${VAR} placeholders
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("valid placeholder pattern");
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    // Process line by line to skip comments
    for line in input.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(SpoolError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the SPOOL_* prefix
///
/// Environment variables follow the pattern: SPOOL_<SECTION>_<KEY>
/// For example: SPOOL_RELAY_TIMEOUT_MS, SPOOL_STORAGE_BASE_DIR
///
/// # Arguments
///
/// * `config` - Mutable reference to the configuration to update
fn apply_env_overrides(config: &mut SpoolConfig) {
    // Relay overrides
    if let Ok(val) = std::env::var("SPOOL_RELAY_SPOOL_THRESHOLD") {
        if let Ok(threshold) = val.parse() {
            config.relay.spool_threshold = threshold;
        }
    }
    if let Ok(val) = std::env::var("SPOOL_RELAY_CHUNK_SIZE") {
        if let Ok(size) = val.parse() {
            config.relay.chunk_size = size;
        }
    }
    if let Ok(val) = std::env::var("SPOOL_RELAY_QUEUE_CAPACITY") {
        if let Ok(capacity) = val.parse() {
            config.relay.queue_capacity = capacity;
        }
    }
    if let Ok(val) = std::env::var("SPOOL_RELAY_TIMEOUT_MS") {
        if let Ok(timeout) = val.parse() {
            config.relay.timeout_ms = timeout;
        }
    }
    if let Ok(val) = std::env::var("SPOOL_RELAY_STALL_POLICY") {
        match val.to_lowercase().as_str() {
            "truncate" => config.relay.stall_policy = StallPolicy::Truncate,
            "error" => config.relay.stall_policy = StallPolicy::Error,
            _ => {}
        }
    }

    // Storage overrides
    if let Ok(val) = std::env::var("SPOOL_STORAGE_BASE_DIR") {
        config.storage.base_dir = val;
    }
    if let Ok(val) = std::env::var("SPOOL_STORAGE_TEMP_SUBDIR") {
        config.storage.temp_subdir = val;
    }

    // Logging overrides
    if let Ok(val) = std::env::var("SPOOL_LOGGING_LEVEL") {
        config.logging.level = val;
    }
    if let Ok(val) = std::env::var("SPOOL_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("SPOOL_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
