use sse_types::{SseMessage, parse_frame};
use sse_wire::{FrameBuffer, Utf8Decoder};

use crate::config::TransformConfig;
use crate::error::DecodeError;

/// Observable lifecycle of an [`SseTransform`].
///
/// ```text
///   Idle ⇄ Accumulating ──(finish / abort / decode error)──▶ Closed
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransformState {
    /// Nothing buffered: no partial frame and no partial character.
    Idle,
    /// A partial frame or partial character is waiting for more input.
    Accumulating,
    /// Terminal. Buffers are released and further input is rejected.
    Closed,
}

/// Running counters for one transform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransformStats {
    /// Bytes accepted by [`SseTransform::push`].
    pub bytes_in: u64,
    /// Messages handed downstream.
    pub messages: u64,
    /// Delimited frames that parsed to an empty record and were dropped.
    pub suppressed_frames: u64,
    /// Bytes (text and undecoded) thrown away at close or abort.
    pub discarded_bytes: u64,
}

/// Incremental SSE transform: byte chunks in, message records out.
///
/// The transform owns all per-stream state explicitly: a [`Utf8Decoder`]
/// holding any split character, and a [`FrameBuffer`] holding any
/// undelimited text. Each call to [`push`](Self::push) runs one full
/// cycle:
///
/// ```text
///   chunk ─▶ Utf8Decoder ─▶ FrameBuffer ─▶ frame ─▶ parse_frame ─▶ record
///                                 │                                 │
///                         remainder stays               empty → dropped
/// ```
///
/// When a cycle returns, the buffer holds no complete frame. Output is
/// identical however the input is split into chunks.
///
/// At end-of-input ([`finish`](Self::finish)) an unterminated frame is
/// discarded unless [`TransformConfig::flush_on_close`] is set;
/// [`flush`](Self::flush) forces it out explicitly.
///
/// # Example
///
/// ```rust
/// use sse_decoder::{SseTransform, TransformConfig};
///
/// let mut transform = SseTransform::new(TransformConfig::default());
/// assert!(transform.push(b"event: greet\nda").unwrap().is_empty());
///
/// let messages = transform.push(b"ta: hi\n\ndata: partial").unwrap();
/// assert_eq!(messages.len(), 1);
/// assert_eq!(messages[0].event(), Some("greet"));
/// assert_eq!(messages[0].data(), Some("hi"));
///
/// // "data: partial" was never terminated, so it is dropped.
/// assert_eq!(transform.finish().unwrap(), None);
/// ```
#[derive(Debug)]
pub struct SseTransform {
    config: TransformConfig,
    decoder: Utf8Decoder,
    frames: FrameBuffer,
    /// Reused decode target, so a push does not allocate a fresh `String`.
    scratch: String,
    closed: bool,
    /// Decode error withheld by [`push`](Self::push) because the same
    /// chunk also completed messages. Returned by the next call.
    failure: Option<DecodeError>,
    stats: TransformStats,
}

impl SseTransform {
    #[must_use]
    pub fn new(config: TransformConfig) -> Self {
        Self {
            config,
            decoder: Utf8Decoder::new(),
            frames: new_frame_buffer(&config),
            scratch: String::new(),
            closed: false,
            failure: None,
            stats: TransformStats::default(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    /// Feed one chunk and collect the messages it completes.
    ///
    /// If the chunk holds invalid UTF-8 after one or more complete
    /// frames, those messages are returned and the error is reported by
    /// the next call, so the message sequence is the same however the
    /// input was chunked.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::Wire`] if the chunk (or an earlier one, see above)
    ///   contains invalid UTF-8. The transform is closed afterwards.
    /// - [`DecodeError::Closed`] if the transform is already closed.
    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<SseMessage>, DecodeError> {
        let mut messages = Vec::new();
        match self.push_with(chunk, |message| messages.push(message)) {
            Ok(_) => Ok(messages),
            Err(err) if messages.is_empty() => Err(err),
            Err(err) => {
                self.failure = Some(err);
                Ok(messages)
            }
        }
    }

    /// Feed one chunk, handing each completed message to `emit` in order.
    ///
    /// Returns the number of messages emitted. On invalid UTF-8 every
    /// frame completed before the invalid byte is still emitted, then the
    /// error is returned.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::Wire`] on invalid UTF-8. The transform is closed
    ///   afterwards.
    /// - [`DecodeError::Closed`] if the transform is already closed, or
    ///   the error withheld by an earlier [`push`](Self::push).
    pub fn push_with<F>(&mut self, chunk: &[u8], mut emit: F) -> Result<usize, DecodeError>
    where
        F: FnMut(SseMessage),
    {
        self.ensure_open()?;

        self.scratch.clear();
        let decoded = self.decoder.decode_into(chunk, &mut self.scratch);
        self.frames.push_str(&self.scratch);

        let mut emitted = 0;
        while let Some(frame) = self.frames.next_frame() {
            if let Some(message) = self.parse(&frame) {
                emit(message);
                emitted += 1;
            }
        }

        if let Err(err) = decoded {
            tracing::debug!(%err, emitted, "decode failed, closing transform");
            self.release();
            return Err(err.into());
        }
        self.stats.bytes_in += chunk.len() as u64;
        Ok(emitted)
    }

    /// `Ok` while open; otherwise the withheld failure, or `Closed`.
    fn ensure_open(&mut self) -> Result<(), DecodeError> {
        if self.closed {
            return Err(self.failure.take().unwrap_or(DecodeError::Closed));
        }
        Ok(())
    }

    /// Parse one delimited frame; `None` if it carries no fields.
    fn parse(&mut self, frame: &str) -> Option<SseMessage> {
        let message = parse_frame(frame, self.config.data_join());
        if message.is_empty() {
            tracing::debug!(frame_len = frame.len(), "dropping frame with no fields");
            self.stats.suppressed_frames += 1;
            return None;
        }

        tracing::trace!(fields = message.len(), event = ?message.event(), "frame parsed");
        self.stats.messages += 1;
        Some(message)
    }

    /// Parse the unterminated remainder as if a blank line had arrived.
    ///
    /// An incomplete trailing character is dropped first. The transform
    /// stays open, so more input may follow.
    ///
    /// # Errors
    ///
    /// [`DecodeError::Closed`] if the transform is closed, or the error
    /// withheld by an earlier [`push`](Self::push).
    pub fn flush(&mut self) -> Result<Option<SseMessage>, DecodeError> {
        self.ensure_open()?;

        let dropped = self.decoder.discard_pending();
        if dropped > 0 {
            tracing::debug!(dropped, "incomplete UTF-8 tail dropped on flush");
            self.stats.discarded_bytes += dropped as u64;
        }

        let rest = self.frames.take_remainder();
        if rest.is_empty() {
            return Ok(None);
        }
        Ok(self.parse(&rest))
    }

    /// Signal end-of-input and close the transform.
    ///
    /// Returns the trailing message when
    /// [`flush_on_close`](TransformConfig::flush_on_close) is set and the
    /// remainder parses to a non-empty record; otherwise the remainder is
    /// discarded and `None` is returned.
    ///
    /// # Errors
    ///
    /// [`DecodeError::Closed`] if the transform is already closed, or the
    /// error withheld by an earlier [`push`](Self::push).
    pub fn finish(&mut self) -> Result<Option<SseMessage>, DecodeError> {
        self.ensure_open()?;

        let tail = if self.config.flush_on_close {
            self.flush()?
        } else {
            None
        };
        self.close("end of input");
        Ok(tail)
    }

    /// Abandon the stream without emitting anything further.
    ///
    /// Returns the number of buffered bytes that were discarded. Aborting
    /// a closed transform is a no-op.
    pub fn abort(&mut self) -> usize {
        if self.closed {
            return 0;
        }
        self.close("aborted")
    }

    fn close(&mut self, reason: &'static str) -> usize {
        let discarded = self.frames.len() + self.decoder.pending_len();
        if discarded > 0 {
            tracing::debug!(discarded, reason, "discarding unterminated input");
        }
        self.stats.discarded_bytes += discarded as u64;
        self.release();
        discarded
    }

    /// Free the buffers and enter the terminal state.
    fn release(&mut self) {
        self.decoder = Utf8Decoder::new();
        self.frames = FrameBuffer::new();
        self.scratch = String::new();
        self.closed = true;
    }

    #[must_use]
    pub fn state(&self) -> TransformState {
        if self.closed {
            TransformState::Closed
        } else if self.buffered_len() == 0 {
            TransformState::Idle
        } else {
            TransformState::Accumulating
        }
    }

    /// Bytes held between cycles: buffered text plus undecoded tail.
    #[must_use]
    pub fn buffered_len(&self) -> usize {
        self.frames.len() + self.decoder.pending_len()
    }

    #[must_use]
    pub fn stats(&self) -> TransformStats {
        self.stats
    }
}

impl Default for SseTransform {
    fn default() -> Self {
        Self::new(TransformConfig::default())
    }
}

fn new_frame_buffer(config: &TransformConfig) -> FrameBuffer {
    if config.normalize_newlines {
        FrameBuffer::with_newline_normalization()
    } else {
        FrameBuffer::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sse_wire::WireError;

    const SAMPLE: &str = "\ndata: message 1 part 1\ndata: message 1 part 2\n\ndata: message 2\n\nevent: custom\ndata: message 3\n\n";

    /// Helper: feed `input` one byte per push and collect every message.
    fn bytewise(input: &[u8], config: TransformConfig) -> Vec<SseMessage> {
        let mut transform = SseTransform::new(config);
        let mut out = Vec::new();
        for b in input {
            out.extend(transform.push(std::slice::from_ref(b)).unwrap());
        }
        out
    }

    #[test]
    fn byte_at_a_time_matches_reference_stream() {
        let messages = bytewise(SAMPLE.as_bytes(), TransformConfig::default());
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].data(), Some("message 1 part 1message 1 part 2"));
        assert_eq!(messages[1].data(), Some("message 2"));
        assert_eq!(messages[2].data(), Some("message 3"));
        assert_eq!(messages[2].event(), Some("custom"));
    }

    #[test]
    fn whole_input_matches_bytewise() {
        let mut transform = SseTransform::default();
        let whole = transform.push(SAMPLE.as_bytes()).unwrap();
        assert_eq!(whole, bytewise(SAMPLE.as_bytes(), TransformConfig::default()));
    }

    #[test]
    fn newline_join_option() {
        let config = TransformConfig {
            join_data_newlines: true,
            ..TransformConfig::default()
        };
        let messages = bytewise(b"data: a\ndata: b\n\n", config);
        assert_eq!(messages[0].data(), Some("a\nb"));
    }

    #[test]
    fn empty_frames_suppressed_and_counted() {
        let mut transform = SseTransform::default();
        let messages = transform.push(b"just text\n\n\n\nevent: only\n\n").unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].event(), Some("only"));
        assert_eq!(messages[0].data(), None);
        let stats = transform.stats();
        assert_eq!(stats.messages, 1);
        assert_eq!(stats.suppressed_frames, 2);
    }

    #[test]
    fn trailing_partial_discarded_on_finish() {
        let mut transform = SseTransform::default();
        let messages = transform.push(b"data: x\n\ndata: y").unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].data(), Some("x"));
        assert_eq!(transform.state(), TransformState::Accumulating);
        assert_eq!(transform.finish().unwrap(), None);
        assert_eq!(transform.state(), TransformState::Closed);
        assert_eq!(transform.stats().discarded_bytes, 7);
    }

    #[test]
    fn flush_on_close_emits_trailing_frame() {
        let config = TransformConfig {
            flush_on_close: true,
            ..TransformConfig::default()
        };
        let mut transform = SseTransform::new(config);
        transform.push(b"data: x\n\ndata: y\n").unwrap();
        let tail = transform.finish().unwrap().unwrap();
        assert_eq!(tail.data(), Some("y"));
    }

    #[test]
    fn explicit_flush_keeps_transform_open() {
        let mut transform = SseTransform::default();
        transform.push(b"id: 9").unwrap();
        assert_eq!(transform.flush().unwrap().unwrap().id(), Some("9"));
        assert_eq!(transform.state(), TransformState::Idle);
        assert_eq!(transform.push(b"data: more\n\n").unwrap().len(), 1);
    }

    #[test]
    fn flush_of_colonless_remainder_is_none() {
        let mut transform = SseTransform::default();
        transform.push(b"no colon").unwrap();
        assert_eq!(transform.flush().unwrap(), None);
    }

    #[test]
    fn invalid_utf8_closes_transform() {
        let mut transform = SseTransform::default();
        transform.push(b"data: ok\n\n").unwrap();
        let err = transform.push(&[b'd', 0xFF]).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::Wire(WireError::InvalidUtf8 { offset: 11 })
        ));
        assert_eq!(transform.state(), TransformState::Closed);
        assert!(matches!(transform.push(b"x"), Err(DecodeError::Closed)));
    }

    #[test]
    fn frames_before_invalid_byte_survive_whole_chunk() {
        let input = b"data: a\n\n\xFF";

        let mut whole = SseTransform::default();
        let messages = whole.push(input).unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].data(), Some("a"));
        assert_eq!(whole.state(), TransformState::Closed);
        assert!(matches!(
            whole.finish(),
            Err(DecodeError::Wire(WireError::InvalidUtf8 { offset: 9 }))
        ));
        assert!(matches!(whole.finish(), Err(DecodeError::Closed)));

        let mut split = SseTransform::default();
        let mut bytewise = Vec::new();
        let mut failure = None;
        for b in input {
            match split.push(std::slice::from_ref(b)) {
                Ok(batch) => bytewise.extend(batch),
                Err(err) => {
                    failure = Some(err);
                    break;
                }
            }
        }
        assert_eq!(bytewise, messages);
        assert!(matches!(
            failure,
            Some(DecodeError::Wire(WireError::InvalidUtf8 { offset: 9 }))
        ));
    }

    #[test]
    fn push_with_emits_then_fails_in_same_call() {
        let mut transform = SseTransform::default();
        let mut seen = Vec::new();
        let err = transform
            .push_with(b"id: 1\n\nid: 2\n\nid: \xC0", |m| seen.push(m))
            .unwrap_err();
        assert!(matches!(
            err,
            DecodeError::Wire(WireError::InvalidUtf8 { offset: 18 })
        ));
        assert_eq!(seen.len(), 2);
        assert_eq!(transform.stats().messages, 2);
        assert!(matches!(transform.push(b"x"), Err(DecodeError::Closed)));
    }

    #[test]
    fn state_tracks_partial_character() {
        let mut transform = SseTransform::default();
        assert_eq!(transform.state(), TransformState::Idle);
        transform.push(&[0xE2]).unwrap();
        assert_eq!(transform.state(), TransformState::Accumulating);
        assert_eq!(transform.buffered_len(), 1);
    }

    #[test]
    fn abort_discards_without_output() {
        let mut transform = SseTransform::default();
        transform.push(b"data: never").unwrap();
        assert_eq!(transform.abort(), 11);
        assert_eq!(transform.abort(), 0);
        assert!(matches!(transform.finish(), Err(DecodeError::Closed)));
    }

    #[test]
    fn push_with_emits_in_order() {
        let mut transform = SseTransform::default();
        let mut seen = Vec::new();
        let n = transform
            .push_with(b"id: 1\n\nid: 2\n\nid: 3\n\n", |m| {
                seen.push(m.id().map(str::to_owned));
            })
            .unwrap();
        assert_eq!(n, 3);
        assert_eq!(
            seen,
            vec![Some("1".to_owned()), Some("2".to_owned()), Some("3".to_owned())]
        );
    }

    #[test]
    fn crlf_stream_with_normalization() {
        let config = TransformConfig {
            normalize_newlines: true,
            ..TransformConfig::default()
        };
        let messages = bytewise(b"event: a\r\ndata: 1\r\n\r\ndata: 2\r\n\r\n", config);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].event(), Some("a"));
        assert_eq!(messages[1].data(), Some("2"));
    }

    #[test]
    fn empty_chunks_are_harmless() {
        let mut transform = SseTransform::default();
        assert!(transform.push(b"").unwrap().is_empty());
        assert_eq!(transform.state(), TransformState::Idle);
        assert_eq!(transform.finish().unwrap(), None);
    }
}
