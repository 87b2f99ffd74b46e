//! Relay channel internals
//!
//! A relay channel is a bounded queue of [`Frame`]s plus a poison slot.
//! Frames carry data in `chunk_size` batches; `Frame::Eof` is the
//! out-of-band terminator, distinct from any byte value. The poison slot
//! carries a producer failure to the read side when the channel closes
//! without a terminator.

use crate::config::RelayConfig;
use crate::domain::errors::RelayError;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::SendTimeoutError;

use super::sink::ByteSink;
use super::source::ByteSource;

/// Queue element: a batch of bytes or the end-of-stream marker
#[derive(Debug)]
pub(crate) enum Frame {
    /// A batch of payload bytes, at most `chunk_size` long
    Data(Vec<u8>),
    /// End of stream; enqueued exactly once, on successful completion
    Eof,
}

/// Write-once failure slot shared between the producer task and the source
///
/// Set before the write side drops its senders, so the read side observes
/// the failure instead of a bare channel close.
#[derive(Debug, Default)]
pub(crate) struct PoisonSlot(OnceLock<String>);

impl PoisonSlot {
    pub(crate) fn set(&self, message: String) {
        // First failure wins; later ones are already downstream of it
        let _ = self.0.set(message);
    }

    pub(crate) fn get(&self) -> Option<&str> {
        self.0.get().map(String::as_str)
    }
}

/// Write-side completion handle held by the relay runner, not the producer
///
/// Keeps its own sender clone so the terminator can be enqueued after the
/// producer has consumed (or dropped) its sink.
pub(crate) struct Terminator {
    tx: mpsc::Sender<Frame>,
    poison: Arc<PoisonSlot>,
    timeout: Duration,
}

impl Terminator {
    /// Enqueue the end-of-stream marker after a successful producer run
    ///
    /// A queue that stays full past the timeout is a hard error at the
    /// write side: the failure is logged, and poisoned into the channel so
    /// the consumer does not mistake the missing terminator for a stall.
    pub(crate) async fn complete(self) {
        match self.tx.send_timeout(Frame::Eof, self.timeout).await {
            Ok(()) => {}
            Err(SendTimeoutError::Timeout(_)) => {
                let err = RelayError::WriteTimeout(self.timeout);
                tracing::error!(error = %err, "failed to enqueue end-of-stream marker");
                self.poison.set(err.to_string());
            }
            Err(SendTimeoutError::Closed(_)) => {
                // Consumer dropped the source; nothing is reading
                tracing::debug!("relay consumer gone before end of stream");
            }
        }
    }

    /// Record a producer failure for the consumer to observe
    pub(crate) fn fail(self, err: &std::io::Error) {
        tracing::warn!(error = %err, "relay producer failed");
        self.poison.set(err.to_string());
    }
}

/// Creates a bounded relay channel
///
/// Returns the producer-facing sink, the runner-facing terminator, and the
/// consumer-facing source. Total buffered data is bounded by
/// `queue_capacity * chunk_size` bytes.
pub(crate) fn channel(config: &RelayConfig) -> (ByteSink, Terminator, ByteSource) {
    let (tx, rx) = mpsc::channel(config.queue_capacity);
    let poison = Arc::new(PoisonSlot::default());

    let sink = ByteSink::channel(tx.clone(), config.chunk_size, config.timeout());
    let terminator = Terminator {
        tx,
        poison: poison.clone(),
        timeout: config.timeout(),
    };
    let source = ByteSource::channel(rx, poison, config.timeout(), config.stall_policy);

    (sink, terminator, source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poison_slot_first_write_wins() {
        let slot = PoisonSlot::default();
        assert!(slot.get().is_none());

        slot.set("first".to_string());
        slot.set("second".to_string());
        assert_eq!(slot.get(), Some("first"));
    }

    #[tokio::test]
    async fn test_terminator_complete_enqueues_eof() {
        let config = RelayConfig::default();
        let (_sink, terminator, _source) = channel(&config);
        // With an empty queue the terminator always fits
        terminator.complete().await;
    }

    #[tokio::test]
    async fn test_terminator_fail_sets_poison() {
        let config = RelayConfig::default();
        let (tx, _rx) = mpsc::channel(1);
        let poison = Arc::new(PoisonSlot::default());
        let terminator = Terminator {
            tx,
            poison: poison.clone(),
            timeout: config.timeout(),
        };

        let err = std::io::Error::other("boom");
        terminator.fail(&err);
        assert_eq!(poison.get(), Some("boom"));
    }
}
