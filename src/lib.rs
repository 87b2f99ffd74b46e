// Spool - Streaming relay and attachment storage for clinical data services
// Copyright (c) 2026 Spool Contributors
// Licensed under the MIT License

//! # Spool - Bounded byte-relay and attachment storage
//!
//! Spool is the streaming plumbing of a clinical record service: it turns
//! "write into a sink" operations (serializing a report, exporting an
//! attachment) into "read from a source" streams with bounded memory use,
//! and stores the results as keyed attachments on the local filesystem.
//!
//! ## Overview
//!
//! This library provides:
//! - **Relaying** byte producers into readable streams with bounded
//!   buffering, backpressure, and failure propagation
//! - **Bypassing** the relay entirely for small payloads of known length
//! - **Storing** streams as keyed attachments with validated, namespaced
//!   keys and atomic writes
//!
//! ## Architecture
//!
//! Spool follows a layered architecture:
//!
//! - [`core`] - Streaming machinery (relay channel, sink, source, service)
//! - [`adapters`] - External integrations (attachment storage)
//! - [`domain`] - Core domain types, keys, and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use spool::config::RelayConfig;
//! use spool::core::relay::StreamService;
//! use tokio::io::AsyncReadExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = StreamService::new(RelayConfig::default());
//!
//!     // Length unknown: the producer streams through a bounded channel
//!     // on a background task while we read
//!     let mut source = service
//!         .relay(
//!             |mut sink| async move {
//!                 for _ in 0..1000 {
//!                     sink.write(&[0u8; 1024]).await?;
//!                 }
//!                 Ok(())
//!             },
//!             None,
//!         )
//!         .await?;
//!
//!     let mut payload = Vec::new();
//!     source.read_to_end(&mut payload).await?;
//!     assert_eq!(payload.len(), 1000 * 1024);
//!     Ok(())
//! }
//! ```
//!
//! ## Failure Semantics
//!
//! A producer that fails on the asynchronous path does not vanish: its
//! failure is recorded on the channel and raised by the read that reaches
//! the failure point, after already-buffered bytes have been delivered.
//! A producer stalled past the configured timeout is reported according to
//! the configured [`StallPolicy`](config::StallPolicy): soft end-of-stream
//! by default, or an explicit error.
//!
//! ## Error Handling
//!
//! Spool uses the [`domain::SpoolError`] type for all errors:
//!
//! ```rust,no_run
//! use spool::domain::SpoolError;
//!
//! fn example() -> Result<(), SpoolError> {
//!     // Errors are automatically converted using the ? operator
//!     let config = spool::config::load_config("spool.toml")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! Spool uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn, error};
//!
//! info!("Starting relay");
//! warn!(timeout_ms = 30_000u64, "Relay read stalled");
//! error!(error = "boom", "Producer failed");
//! ```

pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
