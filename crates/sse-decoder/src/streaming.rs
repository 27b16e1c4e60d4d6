use std::collections::VecDeque;

use bytes::BytesMut;
use sse_types::SseMessage;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::config::TransformConfig;
use crate::error::DecodeError;
use crate::transform::SseTransform;

/// Read buffer size. Chunk size has no effect on output, only on how
/// many reads a stream takes.
const READ_CHUNK: usize = 8 * 1024;

/// Asynchronous streaming decoder: yields SSE messages one at a time
/// from any `AsyncRead` source (HTTP response bodies, sockets, files).
///
/// Backpressure is handled naturally: the decoder only reads more bytes
/// when the caller awaits the next message and every message from the
/// previous read has been handed out.
///
/// ```text
///   reader ──read──▶ SseTransform ──▶ ready queue ──next()──▶ caller
/// ```
///
/// # Example
///
/// ```rust,no_run
/// use sse_decoder::StreamingDecoder;
/// use tokio::io::AsyncRead;
///
/// async fn print_events(reader: impl AsyncRead + Unpin) {
///     let mut stream = StreamingDecoder::new(reader);
///     while let Some(message) = stream.next().await.transpose().unwrap() {
///         println!("{:?}: {:?}", message.event(), message.data());
///     }
/// }
/// ```
pub struct StreamingDecoder<R> {
    reader: R,
    transform: SseTransform,
    /// Messages completed by the last read but not yet handed out.
    ready: VecDeque<SseMessage>,
    buf: BytesMut,
    state: StreamState,
    /// Error waiting behind the messages in `ready`.
    failed: Option<DecodeError>,
}

/// Internal state of the streaming decoder.
///
/// ```text
///   Reading → Done
/// ```
///
/// `Done` is entered at end-of-input or on the first error. Messages
/// already queued are still delivered after that, and the error comes
/// after them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StreamState {
    Reading,
    Done,
}

impl<R: AsyncRead + Unpin> StreamingDecoder<R> {
    /// Create a streaming decoder with the default configuration.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self::with_config(reader, TransformConfig::default())
    }

    #[must_use]
    pub fn with_config(reader: R, config: TransformConfig) -> Self {
        Self {
            reader,
            transform: SseTransform::new(config),
            ready: VecDeque::new(),
            buf: BytesMut::with_capacity(READ_CHUNK),
            state: StreamState::Reading,
            failed: None,
        }
    }

    /// Read the next message from the stream.
    ///
    /// Returns `Some(Ok(message))` for each message, `None` once the
    /// reader is exhausted and every message has been delivered, or
    /// `Some(Err(_))` on an I/O or decode error. Messages completed by
    /// the failing read are yielded before the error. After the error the
    /// stream yields `None`.
    pub async fn next(&mut self) -> Option<Result<SseMessage, DecodeError>> {
        loop {
            if let Some(message) = self.ready.pop_front() {
                return Some(Ok(message));
            }
            if let Some(err) = self.failed.take() {
                return Some(Err(err));
            }
            if self.state == StreamState::Done {
                return None;
            }
            if let Err(err) = self.fill().await {
                self.state = StreamState::Done;
                self.transform.abort();
                self.failed = Some(err);
            }
        }
    }

    /// Perform one read and run it through the transform.
    async fn fill(&mut self) -> Result<(), DecodeError> {
        self.buf.clear();
        self.buf.reserve(READ_CHUNK);
        let n = self.reader.read_buf(&mut self.buf).await?;

        if n == 0 {
            self.state = StreamState::Done;
            if let Some(tail) = self.transform.finish()? {
                self.ready.push_back(tail);
            }
            return Ok(());
        }

        let ready = &mut self.ready;
        self.transform
            .push_with(&self.buf, |message| ready.push_back(message))?;
        Ok(())
    }

    /// The transform driving this stream, for state and counters.
    #[must_use]
    pub fn transform(&self) -> &SseTransform {
        &self.transform
    }

    /// Release the decoder and return the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}
