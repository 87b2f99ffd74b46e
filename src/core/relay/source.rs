//! Read half of the relay
//!
//! A [`ByteSource`] is what callers get back from the relay: an
//! [`AsyncRead`] over whatever backs the stream: the relay channel, an
//! in-memory buffer from the bypass path, or a storage file. It needs no
//! explicit release; dropping it early is safe.

use crate::config::StallPolicy;
use crate::domain::errors::RelayError;
use std::future::Future;
use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::io::{AsyncRead, ReadBuf};
use tokio::sync::mpsc;
use tokio::time::Sleep;

use super::channel::{Frame, PoisonSlot};

/// Byte stream returned by the relay and the storage layer
///
/// Reads deliver bytes in producer order. On the channel path a read with
/// no data available blocks up to the configured timeout; what happens
/// then is decided by the [`StallPolicy`]. Once end-of-stream has been
/// observed, every further read reports end-of-stream immediately.
#[derive(Debug)]
pub struct ByteSource {
    inner: SourceInner,
}

#[derive(Debug)]
enum SourceInner {
    Memory(io::Cursor<Vec<u8>>),
    File(tokio::fs::File),
    Channel(Box<ChannelSource>),
}

#[derive(Debug)]
struct ChannelSource {
    rx: mpsc::Receiver<Frame>,
    poison: Arc<PoisonSlot>,
    timeout: Duration,
    stall_policy: StallPolicy,
    /// Bytes of the frame currently being served
    pending: Vec<u8>,
    offset: usize,
    state: ChannelState,
    /// Armed while a read is waiting on an empty queue
    deadline: Option<Pin<Box<Sleep>>>,
}

#[derive(Debug)]
enum ChannelState {
    Open,
    Done,
    Failed(FailCause),
}

/// Terminal failure, kept so repeated reads keep raising the same error
#[derive(Debug, Clone)]
enum FailCause {
    Producer(String),
    ClosedEarly,
    Stalled(Duration),
}

impl FailCause {
    fn to_io_error(&self) -> io::Error {
        match self {
            FailCause::Producer(msg) => {
                io::Error::other(RelayError::ProducerFailed(msg.clone()))
            }
            FailCause::ClosedEarly => {
                io::Error::new(io::ErrorKind::UnexpectedEof, RelayError::ClosedEarly)
            }
            FailCause::Stalled(timeout) => {
                io::Error::new(io::ErrorKind::TimedOut, RelayError::ReadTimeout(*timeout))
            }
        }
    }
}

impl ByteSource {
    /// Creates a source over a completed in-memory buffer
    pub fn from_vec(data: Vec<u8>) -> Self {
        Self {
            inner: SourceInner::Memory(io::Cursor::new(data)),
        }
    }

    /// Creates a source over an open file
    pub fn from_file(file: tokio::fs::File) -> Self {
        Self {
            inner: SourceInner::File(file),
        }
    }

    pub(crate) fn channel(
        rx: mpsc::Receiver<Frame>,
        poison: Arc<PoisonSlot>,
        timeout: Duration,
        stall_policy: StallPolicy,
    ) -> Self {
        Self {
            inner: SourceInner::Channel(Box::new(ChannelSource {
                rx,
                poison,
                timeout,
                stall_policy,
                pending: Vec::new(),
                offset: 0,
                state: ChannelState::Open,
                deadline: None,
            })),
        }
    }

    /// Whether a producer failure has been recorded on this source
    ///
    /// Buffered bytes written before the failure are still readable; the
    /// read that drains past them raises the failure.
    pub fn is_poisoned(&self) -> bool {
        match &self.inner {
            SourceInner::Channel(ch) => {
                ch.poison.get().is_some() || matches!(ch.state, ChannelState::Failed(_))
            }
            _ => false,
        }
    }
}

impl AsyncRead for ByteSource {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match &mut self.get_mut().inner {
            SourceInner::Memory(cursor) => {
                let data = cursor.get_ref();
                let len = data.len();
                let pos = (cursor.position() as usize).min(len);
                let n = buf.remaining().min(len - pos);
                buf.put_slice(&data[pos..pos + n]);
                cursor.set_position((pos + n) as u64);
                Poll::Ready(Ok(()))
            }
            SourceInner::File(file) => Pin::new(file).poll_read(cx, buf),
            SourceInner::Channel(ch) => ch.poll_read(cx, buf),
        }
    }
}

impl ChannelSource {
    fn poll_read(&mut self, cx: &mut Context<'_>, buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
        loop {
            match &self.state {
                ChannelState::Done => return Poll::Ready(Ok(())),
                ChannelState::Failed(cause) => return Poll::Ready(Err(cause.to_io_error())),
                ChannelState::Open => {}
            }

            // Serve the frame in hand before touching the queue
            if self.offset < self.pending.len() {
                let n = buf.remaining().min(self.pending.len() - self.offset);
                buf.put_slice(&self.pending[self.offset..self.offset + n]);
                self.offset += n;
                if self.offset == self.pending.len() {
                    self.pending.clear();
                    self.offset = 0;
                }
                return Poll::Ready(Ok(()));
            }

            match self.rx.poll_recv(cx) {
                Poll::Ready(Some(Frame::Data(bytes))) => {
                    self.deadline = None;
                    self.pending = bytes;
                    self.offset = 0;
                }
                Poll::Ready(Some(Frame::Eof)) => {
                    self.deadline = None;
                    self.state = ChannelState::Done;
                }
                Poll::Ready(None) => {
                    // Write side gone without a terminator: either a recorded
                    // failure or an unexpected producer death
                    self.deadline = None;
                    self.state = match self.poison.get() {
                        Some(msg) => ChannelState::Failed(FailCause::Producer(msg.to_string())),
                        None => ChannelState::Failed(FailCause::ClosedEarly),
                    };
                }
                Poll::Pending => {
                    let deadline = self
                        .deadline
                        .get_or_insert_with(|| Box::pin(tokio::time::sleep(self.timeout)));
                    match deadline.as_mut().poll(cx) {
                        Poll::Ready(()) => {
                            self.deadline = None;
                            match self.stall_policy {
                                StallPolicy::Truncate => {
                                    tracing::warn!(
                                        timeout_ms = self.timeout.as_millis() as u64,
                                        "relay read stalled; reporting end of stream"
                                    );
                                    self.state = ChannelState::Done;
                                }
                                StallPolicy::Error => {
                                    self.state =
                                        ChannelState::Failed(FailCause::Stalled(self.timeout));
                                }
                            }
                        }
                        Poll::Pending => return Poll::Pending,
                    }
                }
            }
        }
    }
}
