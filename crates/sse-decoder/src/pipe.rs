use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use sse_types::SseMessage;
use tokio::sync::mpsc;

use crate::config::TransformConfig;
use crate::error::DecodeError;
use crate::transform::{SseTransform, TransformState};

type Item = Result<SseMessage, DecodeError>;

/// Create a bounded, single-consumer SSE pipe.
///
/// The producer pushes raw byte chunks into the [`ChunkSink`]; the
/// consumer pulls parsed messages from the [`MessageSource`]. At most
/// `capacity` messages (minimum 1) wait between the two ends; when the
/// channel is full, [`ChunkSink::send`] suspends until the consumer
/// catches up, so input never outruns output.
///
/// ```text
///   producer ──send(chunk)──▶ ChunkSink ──[ capacity ]──▶ MessageSource ──next()──▶ consumer
///                             (owns SseTransform)
/// ```
///
/// Both ends are scoped resources: the sink acquires the transform when
/// the pipe is created and releases it on [`close`](ChunkSink::close),
/// [`abort`](ChunkSink::abort), or drop. Only `close` ends the output
/// cleanly: a sink dropped without `close` or `abort` shows up at the
/// consumer as [`DecodeError::Aborted`] after the delivered messages.
/// Dropping the source makes the next `send` that has a message to
/// deliver fail with [`DecodeError::Disconnected`].
///
/// # Example
///
/// ```rust
/// use sse_decoder::{TransformConfig, pipe};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let (mut sink, mut source) = pipe(TransformConfig::default(), 8);
/// let producer = tokio::spawn(async move {
///     sink.send(b"data: one\n\nda").await?;
///     sink.send(b"ta: two\n\n").await?;
///     sink.close().await
/// });
///
/// let mut data = Vec::new();
/// while let Some(message) = source.next().await {
///     data.push(message.unwrap().data().unwrap().to_owned());
/// }
/// producer.await.unwrap().unwrap();
/// assert_eq!(data, ["one", "two"]);
/// # }
/// ```
#[must_use]
pub fn pipe(config: TransformConfig, capacity: usize) -> (ChunkSink, MessageSource) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    let ended = Arc::new(AtomicBool::new(false));
    let sink = ChunkSink {
        transform: SseTransform::new(config),
        tx,
        ended: Arc::clone(&ended),
    };
    let source = MessageSource {
        rx,
        ended,
        reported: false,
    };
    (sink, source)
}

/// Producer end of a [`pipe`]: accepts byte chunks.
#[derive(Debug)]
pub struct ChunkSink {
    transform: SseTransform,
    tx: mpsc::Sender<Item>,
    /// Set once the consumer has been given a terminal signal: a clean
    /// close, an abort, or a decode error.
    ended: Arc<AtomicBool>,
}

impl ChunkSink {
    /// Push one chunk and deliver every message it completes.
    ///
    /// Suspends while the channel is full.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::Wire`] on invalid UTF-8. The consumer receives
    ///   the same error, and the sink is closed.
    /// - [`DecodeError::Disconnected`] if the consumer is gone. The
    ///   transform is released.
    /// - [`DecodeError::Closed`] after any earlier failure.
    pub async fn send(&mut self, chunk: &[u8]) -> Result<(), DecodeError> {
        let mut messages = Vec::new();
        let pushed = self
            .transform
            .push_with(chunk, |message| messages.push(message));

        for message in messages {
            self.deliver(message).await?;
        }

        match pushed {
            Ok(_) => Ok(()),
            Err(DecodeError::Wire(err)) => {
                self.ended.store(true, Ordering::Release);
                // Best effort: the consumer may already be gone.
                let _ = self.tx.send(Err(DecodeError::Wire(err.clone()))).await;
                Err(DecodeError::Wire(err))
            }
            Err(err) => Err(err),
        }
    }

    async fn deliver(&mut self, message: SseMessage) -> Result<(), DecodeError> {
        if self.tx.send(Ok(message)).await.is_err() {
            tracing::debug!("consumer disconnected, releasing transform");
            self.transform.abort();
            return Err(DecodeError::Disconnected);
        }
        Ok(())
    }

    /// Signal end-of-input.
    ///
    /// With [`flush_on_close`](TransformConfig::flush_on_close) the
    /// trailing partial frame is delivered first; otherwise it is
    /// discarded. The consumer then sees end-of-output.
    ///
    /// # Errors
    ///
    /// [`DecodeError::Closed`] if the sink already failed, or
    /// [`DecodeError::Disconnected`] if the trailing message cannot be
    /// delivered.
    pub async fn close(mut self) -> Result<(), DecodeError> {
        if let Some(tail) = self.transform.finish()? {
            self.deliver(tail).await?;
        }
        self.ended.store(true, Ordering::Release);
        Ok(())
    }

    /// Abandon the stream: discard buffered input and deliver
    /// [`DecodeError::Aborted`] to the consumer.
    pub async fn abort(mut self) {
        let discarded = self.transform.abort();
        tracing::debug!(discarded, "pipe aborted by producer");
        self.ended.store(true, Ordering::Release);
        let _ = self.tx.send(Err(DecodeError::Aborted)).await;
    }

    /// `true` once the consumer end has been dropped or closed.
    #[must_use]
    pub fn is_disconnected(&self) -> bool {
        self.tx.is_closed()
    }

    #[must_use]
    pub fn state(&self) -> TransformState {
        self.transform.state()
    }
}

impl Drop for ChunkSink {
    fn drop(&mut self) {
        if self.transform.state() != TransformState::Closed {
            let discarded = self.transform.abort();
            tracing::debug!(discarded, "sink dropped before end of input");
        }
    }
}

/// Consumer end of a [`pipe`]: yields parsed messages.
#[derive(Debug)]
pub struct MessageSource {
    rx: mpsc::Receiver<Item>,
    ended: Arc<AtomicBool>,
    /// An abandoned sink has already been reported as `Aborted`.
    reported: bool,
}

impl MessageSource {
    /// Wait for the next message.
    ///
    /// Returns `None` (end-of-output) once every delivered message was
    /// consumed and the sink has finished. If the sink was dropped
    /// without [`close`](ChunkSink::close) or
    /// [`abort`](ChunkSink::abort), one `Some(Err(DecodeError::Aborted))`
    /// comes first.
    pub async fn next(&mut self) -> Option<Result<SseMessage, DecodeError>> {
        if let Some(item) = self.rx.recv().await {
            return Some(item);
        }
        if self.reported || self.ended.load(Ordering::Acquire) {
            return None;
        }
        self.reported = true;
        Some(Err(DecodeError::Aborted))
    }

    /// Drain the pipe until end-of-output, stopping at the first error.
    ///
    /// # Errors
    ///
    /// The first error delivered by the sink.
    pub async fn collect(mut self) -> Result<Vec<SseMessage>, DecodeError> {
        let mut messages = Vec::new();
        while let Some(item) = self.next().await {
            messages.push(item?);
        }
        Ok(messages)
    }

    /// Stop receiving. Messages already queued are dropped and the
    /// producer's next delivery fails with [`DecodeError::Disconnected`].
    pub fn close(mut self) {
        self.rx.close();
    }
}
