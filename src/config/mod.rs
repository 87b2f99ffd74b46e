//! Configuration management for Spool.
//!
//! This module provides TOML-based configuration loading, parsing, and
//! validation.
//!
//! # Overview
//!
//! Spool uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - Default values for optional settings
//! - Environment variable overrides (`SPOOL_*` prefix)
//! - Type-safe configuration structs
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use spool::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Load configuration from file
//! let config = load_config("spool.toml")?;
//!
//! // Access configuration sections
//! println!("Spool threshold: {}", config.relay.spool_threshold);
//! println!("Storage dir: {}", config.storage.base_dir);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! The configuration is organized into sections:
//!
//! - [`RelayConfig`] - Byte-relay buffering and timeout settings
//! - [`StorageConfig`] - Attachment storage directories
//! - [`LoggingConfig`] - Logging configuration
//!
//! # Example Configuration
//!
//! ```toml
//! [relay]
//! spool_threshold = 131072
//! chunk_size = 8192
//! queue_capacity = 16
//! timeout_ms = 30000
//! stall_policy = "truncate"
//!
//! [storage]
//! base_dir = "/var/lib/spool"
//!
//! [logging]
//! level = "info"
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{LoggingConfig, RelayConfig, SpoolConfig, StallPolicy, StorageConfig};
