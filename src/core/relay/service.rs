//! Stream service - entry point for the bounded byte-relay
//!
//! Turns a "write into a sink" capability into a "read from a source"
//! handle. Small payloads of known length are materialized in memory;
//! everything else streams through a bounded channel with a producer task
//! running on the configured spawner.

use crate::config::RelayConfig;
use crate::core::spawn::{TaskSpawner, TokioSpawner};
use crate::domain::result::Result;
use futures::FutureExt;
use std::future::Future;
use std::io;
use std::mem;
use std::sync::{Arc, Mutex};

use super::channel;
use super::sink::ByteSink;
use super::source::ByteSource;

/// Relay service converting byte producers into byte sources
///
/// Owns the relay configuration and the executor handle producers run on.
/// One instance is shared across a whole service; each [`relay`](Self::relay)
/// call creates its own channel, which is never reused.
pub struct StreamService {
    config: RelayConfig,
    spawner: Arc<dyn TaskSpawner>,
}

impl StreamService {
    /// Creates a stream service running producers on the tokio runtime
    pub fn new(config: RelayConfig) -> Self {
        Self::with_spawner(config, Arc::new(TokioSpawner))
    }

    /// Creates a stream service with an explicit task spawner
    pub fn with_spawner(config: RelayConfig, spawner: Arc<dyn TaskSpawner>) -> Self {
        Self { config, spawner }
    }

    /// The relay configuration in effect
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Relays the bytes written by `producer` as a readable [`ByteSource`]
    ///
    /// When `known_length` is present and below the configured spool
    /// threshold, the producer runs synchronously against an in-memory sink
    /// before this call returns: no task is spawned, and any producer error
    /// propagates directly to the caller.
    ///
    /// Otherwise a bounded channel is created, the producer is scheduled on
    /// the spawner, and the source is returned immediately; reads deliver
    /// bytes as the producer writes them. A producer failure on this path
    /// is observed by the consumer as an error on the read that reaches the
    /// failure point; bytes buffered before the failure read normally.
    ///
    /// The returned source needs no explicit release. Dropping it early
    /// does not cancel the producer; an abandoned producer either completes
    /// into the closed channel or fails its next write once the queue fills.
    ///
    /// # Errors
    ///
    /// On the synchronous path, whatever the producer fails with. The
    /// asynchronous path only fails at read time, never here.
    pub async fn relay<F, Fut>(&self, producer: F, known_length: Option<u64>) -> Result<ByteSource>
    where
        F: FnOnce(ByteSink) -> Fut + Send + 'static,
        Fut: Future<Output = io::Result<()>> + Send + 'static,
    {
        match known_length {
            Some(len) if len < self.config.spool_threshold as u64 => {
                self.relay_buffered(producer, len as usize).await
            }
            _ => Ok(self.relay_channel(producer)),
        }
    }

    /// Synchronous bypass: run the producer against an in-memory buffer
    async fn relay_buffered<F, Fut>(&self, producer: F, len: usize) -> Result<ByteSource>
    where
        F: FnOnce(ByteSink) -> Fut + Send + 'static,
        Fut: Future<Output = io::Result<()>> + Send + 'static,
    {
        let buf = Arc::new(Mutex::new(Vec::with_capacity(len)));
        let sink = ByteSink::memory(buf.clone());

        producer(sink).await?;

        let data = mem::take(
            &mut *buf.lock().unwrap_or_else(|poisoned| poisoned.into_inner()),
        );
        Ok(ByteSource::from_vec(data))
    }

    /// Asynchronous path: bounded channel plus a spawned producer task
    fn relay_channel<F, Fut>(&self, producer: F) -> ByteSource
    where
        F: FnOnce(ByteSink) -> Fut + Send + 'static,
        Fut: Future<Output = io::Result<()>> + Send + 'static,
    {
        let (sink, terminator, source) = channel::channel(&self.config);

        let task = async move {
            match producer(sink).await {
                Ok(()) => terminator.complete().await,
                Err(err) => terminator.fail(&err),
            }
        }
        .boxed();
        self.spawner.spawn(task);

        source
    }
}
