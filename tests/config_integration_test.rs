//! Integration tests for configuration loading
//!
//! These tests verify that:
//! - Missing files and invalid values are rejected
//! - Defaults apply for unset sections
//! - Environment variable substitution and overrides work end-to-end

use spool::config::{load_config, SpoolConfig, StallPolicy};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn defaults_apply_for_empty_config() {
    let file = write_config("");
    let config = load_config(file.path()).unwrap();

    assert_eq!(config.relay.spool_threshold, 128 * 1024);
    assert_eq!(config.relay.chunk_size, 8 * 1024);
    assert_eq!(config.relay.queue_capacity, 16);
    assert_eq!(config.relay.timeout_ms, 30_000);
    assert_eq!(config.relay.stall_policy, StallPolicy::Truncate);
    assert_eq!(config.storage.base_dir, "data");
    assert_eq!(config.storage.temp_subdir, "tmp");
    assert_eq!(config.logging.level, "info");
    assert!(!config.logging.local_enabled);
}

#[test]
fn full_config_loads() {
    let file = write_config(
        r#"
[relay]
spool_threshold = 65536
chunk_size = 4096
queue_capacity = 32
timeout_ms = 10000
stall_policy = "error"

[storage]
base_dir = "/var/lib/spool"
temp_subdir = "staging"

[logging]
level = "debug"
local_enabled = true
local_path = "/var/log/spool"
local_rotation = "hourly"
"#,
    );
    let config = load_config(file.path()).unwrap();

    assert_eq!(config.relay.spool_threshold, 65536);
    assert_eq!(config.relay.chunk_size, 4096);
    assert_eq!(config.relay.queue_capacity, 32);
    assert_eq!(config.relay.timeout_ms, 10_000);
    assert_eq!(config.relay.stall_policy, StallPolicy::Error);
    assert_eq!(config.storage.base_dir, "/var/lib/spool");
    assert_eq!(config.storage.temp_subdir, "staging");
    assert_eq!(config.logging.level, "debug");
    assert!(config.logging.local_enabled);
    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn env_substitution_fills_placeholders() {
    std::env::set_var("SPOOL_IT_BASE_DIR", "/srv/spool-data");
    let file = write_config("[storage]\nbase_dir = \"${SPOOL_IT_BASE_DIR}\"\n");

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.storage.base_dir, "/srv/spool-data");

    std::env::remove_var("SPOOL_IT_BASE_DIR");
}

#[test]
fn env_overrides_take_precedence() {
    std::env::set_var("SPOOL_RELAY_TIMEOUT_MS", "1234");
    std::env::set_var("SPOOL_RELAY_STALL_POLICY", "error");
    let file = write_config("[relay]\ntimeout_ms = 9999\n");

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.relay.timeout_ms, 1234);
    assert_eq!(config.relay.stall_policy, StallPolicy::Error);

    std::env::remove_var("SPOOL_RELAY_TIMEOUT_MS");
    std::env::remove_var("SPOOL_RELAY_STALL_POLICY");
}

#[test]
fn invalid_values_fail_validation() {
    let file = write_config("[relay]\nqueue_capacity = 0\n");
    assert!(load_config(file.path()).is_err());

    let file = write_config("[logging]\nlevel = \"verbose\"\n");
    assert!(load_config(file.path()).is_err());
}

#[test]
fn missing_file_is_an_error() {
    assert!(load_config("does-not-exist.toml").is_err());
}

#[test]
fn programmatic_default_config_is_valid() {
    let config = SpoolConfig::default();
    assert!(config.validate().is_ok());
}
