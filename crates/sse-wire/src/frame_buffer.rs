use crate::whitespace::trim_field;

/// Message delimiter: a blank line.
pub const DELIMITER: &str = "\n\n";

/// Growable text buffer that cuts complete frames off its front.
///
/// Decoded text is appended with [`push_str`](Self::push_str); complete
/// frames are taken with [`next_frame`](Self::next_frame) (or the
/// [`frames`](Self::frames) iterator) in the order their delimiters
/// appear. Whatever follows the last delimiter stays buffered:
///
/// ```text
///   buffer: "data: a\n\ndata: b\n\nevent: x\nda"
///            └─ frame 1 ─┘└─ frame 2 ─┘└─ remainder ─┘
/// ```
///
/// Detection runs on the accumulated buffer, so a delimiter whose two
/// newlines arrive in different chunks is still found. Extracted frames
/// are trimmed of surrounding whitespace (see
/// [`is_field_whitespace`](crate::is_field_whitespace)).
#[derive(Debug, Default)]
pub struct FrameBuffer {
    buf: String,

    /// Byte offset below which the buffer is known not to start a
    /// delimiter. Reset whenever a frame is removed.
    scanned: usize,

    /// Rewrite `\r\n` and lone `\r` to `\n` on append.
    normalize_newlines: bool,

    /// The last appended character was a `\r` already written as `\n`.
    pending_cr: bool,
}

impl FrameBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A buffer that folds CRLF and CR line endings into `\n` as text is
    /// appended, so `\r\n\r\n` also terminates a frame.
    #[must_use]
    pub fn with_newline_normalization() -> Self {
        Self {
            normalize_newlines: true,
            ..Self::default()
        }
    }

    /// Append decoded text.
    pub fn push_str(&mut self, text: &str) {
        if self.normalize_newlines {
            self.push_normalized(text);
        } else {
            self.buf.push_str(text);
        }
    }

    fn push_normalized(&mut self, text: &str) {
        self.buf.reserve(text.len());
        for ch in text.chars() {
            match ch {
                '\r' => {
                    self.buf.push('\n');
                    self.pending_cr = true;
                }
                // Second half of a CRLF pair, possibly from an earlier chunk.
                '\n' if self.pending_cr => self.pending_cr = false,
                other => {
                    self.buf.push(other);
                    self.pending_cr = false;
                }
            }
        }
    }

    /// Remove and return the first complete frame, trimmed.
    ///
    /// Returns `None` when no delimiter is buffered. The returned frame
    /// may be empty (e.g. for a run of blank lines).
    pub fn next_frame(&mut self) -> Option<String> {
        let start = self.scanned;
        let Some(pos) = find_delimiter(&self.buf.as_bytes()[start..]) else {
            // The last byte may be the first half of a delimiter.
            self.scanned = self.buf.len().saturating_sub(DELIMITER.len() - 1);
            return None;
        };

        let end = start + pos + DELIMITER.len();
        let frame = trim_field(&self.buf[..end]).to_owned();
        self.buf.drain(..end);
        self.scanned = 0;
        Some(frame)
    }

    /// Iterator draining every complete frame currently buffered.
    pub fn frames(&mut self) -> Frames<'_> {
        Frames { buffer: self }
    }

    /// Remove and return the unterminated remainder, trimmed.
    pub fn take_remainder(&mut self) -> String {
        let rest = trim_field(&self.buf).to_owned();
        self.clear();
        rest
    }

    /// Drop everything buffered.
    pub fn clear(&mut self) {
        self.buf.clear();
        self.scanned = 0;
        self.pending_cr = false;
    }

    /// Buffered text length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Buffered text not yet terminated by a delimiter.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.buf
    }
}

/// Draining iterator returned by [`FrameBuffer::frames`].
pub struct Frames<'a> {
    buffer: &'a mut FrameBuffer,
}

impl Iterator for Frames<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.buffer.next_frame()
    }
}

/// Position of the first `\n\n` in `bytes`.
///
/// The delimiter is pure ASCII, so a byte search never lands inside a
/// multi-byte character.
fn find_delimiter(bytes: &[u8]) -> Option<usize> {
    bytes
        .windows(DELIMITER.len())
        .position(|w| w == DELIMITER.as_bytes())
}
