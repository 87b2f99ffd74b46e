//! Bounded byte-relay
//!
//! Converts a "write into an output sink" operation into a "read from an
//! input source" operation without materializing the whole payload, with
//! an in-memory bypass for small payloads of known length.
//!
//! # Semantics
//!
//! - **Bounded buffering**: data in flight is capped at
//!   `queue_capacity * chunk_size` bytes; a full queue blocks the producer
//!   (backpressure) up to the timeout, then fails the write.
//! - **Ordering**: bytes reach the consumer in exactly the order written;
//!   single producer, single consumer.
//! - **Termination**: an out-of-band end-of-stream marker is enqueued once,
//!   when the producer completes; once observed, further reads report
//!   end-of-stream forever.
//! - **Failure propagation**: a producer failure is recorded on the channel
//!   and raised by the read that reaches it, after all previously buffered
//!   bytes have been delivered.
//! - **Stalls**: a read that sees no data within the timeout either reports
//!   end-of-stream or an error, per [`StallPolicy`](crate::config::StallPolicy).
//!
//! # Example
//!
//! ```rust,no_run
//! use spool::config::RelayConfig;
//! use spool::core::relay::StreamService;
//! use tokio::io::AsyncReadExt;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = StreamService::new(RelayConfig::default());
//!
//! // Unknown length: the producer streams through a bounded channel
//! let mut source = service
//!     .relay(
//!         |mut sink| async move {
//!             for chunk in [&b"abc"[..], &b"def"[..]] {
//!                 sink.write(chunk).await?;
//!             }
//!             Ok(())
//!         },
//!         None,
//!     )
//!     .await?;
//!
//! let mut payload = Vec::new();
//! source.read_to_end(&mut payload).await?;
//! assert_eq!(payload, b"abcdef");
//! # Ok(())
//! # }
//! ```

pub(crate) mod channel;
pub mod service;
pub mod sink;
pub mod source;

// Re-export commonly used types
pub use service::StreamService;
pub use sink::ByteSink;
pub use source::ByteSource;
