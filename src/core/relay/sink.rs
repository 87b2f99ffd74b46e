//! Write half of the relay
//!
//! Producers receive a [`ByteSink`] and write into it; they never see the
//! queue, the terminator, or the in-memory bypass. The same sink type backs
//! both paths so producer code is identical either way.

use crate::domain::errors::RelayError;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::SendTimeoutError;

use super::channel::Frame;

/// Writable sink handed to a relay producer
///
/// Writes are chunked into frames of at most the configured chunk size and
/// enqueued one at a time. A full queue blocks the write up to the timeout
/// (backpressure); past the timeout the write fails with a
/// [`RelayError::WriteTimeout`] I/O error.
///
/// Dropping the sink ends the producer's part of the stream; termination is
/// handled by the relay, not by the producer.
#[derive(Debug)]
pub struct ByteSink {
    inner: SinkInner,
}

#[derive(Debug)]
enum SinkInner {
    Channel {
        tx: mpsc::Sender<Frame>,
        chunk_size: usize,
        timeout: Duration,
    },
    Memory {
        buf: Arc<Mutex<Vec<u8>>>,
    },
}

impl ByteSink {
    pub(crate) fn channel(tx: mpsc::Sender<Frame>, chunk_size: usize, timeout: Duration) -> Self {
        Self {
            inner: SinkInner::Channel {
                tx,
                chunk_size,
                timeout,
            },
        }
    }

    pub(crate) fn memory(buf: Arc<Mutex<Vec<u8>>>) -> Self {
        Self {
            inner: SinkInner::Memory { buf },
        }
    }

    /// Writes a buffer of bytes into the relay
    ///
    /// Bytes are delivered to the consumer in write order. On the channel
    /// path this may block up to the configured timeout per chunk when the
    /// queue is full.
    ///
    /// # Errors
    ///
    /// - [`RelayError::WriteTimeout`] (kind `TimedOut`) when the queue stays
    ///   full past the timeout
    /// - [`RelayError::Abandoned`] (kind `BrokenPipe`) when the consumer has
    ///   dropped the read half
    pub async fn write(&mut self, buf: &[u8]) -> io::Result<()> {
        match &mut self.inner {
            SinkInner::Channel {
                tx,
                chunk_size,
                timeout,
            } => {
                for chunk in buf.chunks(*chunk_size) {
                    match tx.send_timeout(Frame::Data(chunk.to_vec()), *timeout).await {
                        Ok(()) => {}
                        Err(SendTimeoutError::Timeout(_)) => {
                            return Err(io::Error::new(
                                io::ErrorKind::TimedOut,
                                RelayError::WriteTimeout(*timeout),
                            ));
                        }
                        Err(SendTimeoutError::Closed(_)) => {
                            return Err(io::Error::new(
                                io::ErrorKind::BrokenPipe,
                                RelayError::Abandoned,
                            ));
                        }
                    }
                }
                Ok(())
            }
            SinkInner::Memory { buf: mem } => {
                mem.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
                    .extend_from_slice(buf);
                Ok(())
            }
        }
    }
}
