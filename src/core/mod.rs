//! Core logic for Spool.
//!
//! This module contains the streaming machinery the rest of the library is
//! built on.
//!
//! # Modules
//!
//! - [`relay`] - Bounded byte-relay: channel, sink, source, and service
//! - [`spawn`] - Task spawner abstraction for running producer tasks
//!
//! # Relay Workflow
//!
//! 1. A caller hands [`relay::StreamService::relay`] a producer capability
//!    and, when available, the payload length
//! 2. Small known-length payloads run synchronously into memory
//! 3. Everything else streams through a bounded channel, producer on one
//!    task, consumer wherever the returned source is read
//! 4. Termination, backpressure, and failure propagation are handled by the
//!    channel; the consumer just reads to end-of-stream

pub mod relay;
pub mod spawn;

// Re-export commonly used types
pub use relay::{ByteSink, ByteSource, StreamService};
pub use spawn::{TaskSpawner, TokioSpawner};
