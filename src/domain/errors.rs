//! Domain error types
//!
//! This module defines the error hierarchy for Spool. All errors are
//! domain-specific and don't expose third-party types.

use std::time::Duration;
use thiserror::Error;

/// Main Spool error type
///
/// This is the primary error type used throughout the library.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum SpoolError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Relay-related errors
    #[error("Relay error: {0}")]
    Relay(#[from] RelayError),

    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Relay-specific errors
///
/// Failures of the bounded byte-relay. The write side surfaces
/// `WriteTimeout` and `Abandoned`; the read side surfaces `ProducerFailed`,
/// `ReadTimeout` and `ClosedEarly` depending on how the channel terminated.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The producer task failed while writing into the relay
    #[error("Producer failed: {0}")]
    ProducerFailed(String),

    /// The relay buffer stayed full past the configured timeout
    #[error("Relay buffer full: write timed out after {0:?}")]
    WriteTimeout(Duration),

    /// No data arrived within the configured timeout
    #[error("No data from producer: read timed out after {0:?}")]
    ReadTimeout(Duration),

    /// The channel closed without an end-of-stream marker
    #[error("Relay closed before end of stream")]
    ClosedEarly,

    /// The consumer dropped its end of the relay
    #[error("Relay abandoned by consumer")]
    Abandoned,
}

/// Storage-specific errors
///
/// Errors raised by the attachment storage layer.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No data stored under the given key
    #[error("Key not found: {0}")]
    KeyNotFound(String),

    /// Data already stored under the given key
    #[error("Key already exists: {0}")]
    KeyAlreadyExists(String),

    /// Copying data into storage failed
    #[error("Copy failed: {0}")]
    CopyFailed(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for SpoolError {
    fn from(err: std::io::Error) -> Self {
        SpoolError::Io(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for SpoolError {
    fn from(err: toml::de::Error) -> Self {
        SpoolError::Configuration(format!("TOML parse error: {err}"))
    }
}
