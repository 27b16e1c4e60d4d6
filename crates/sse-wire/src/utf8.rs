use crate::error::WireError;

/// Byte-order mark. Stripped once, and only at the very start of a stream.
const BOM: char = '\u{FEFF}';

/// Incremental UTF-8 decoder.
///
/// Chunks may split a multi-byte character anywhere. The decoder emits
/// every complete character it has seen and holds back the trailing
/// fragment (at most 3 bytes) until the next chunk arrives:
///
/// ```text
///   chunk 1: [ 'h' 'i' 0xE2 0x82 ]   → "hi"      pending = [0xE2 0x82]
///   chunk 2: [ 0xAC '!' ]            → "€!"      pending = []
/// ```
///
/// A sequence that can never become valid is reported as
/// [`WireError::InvalidUtf8`] instead of being replaced with U+FFFD, so
/// transport corruption is not masked. A fragment still pending when the
/// stream ends is never decoded; callers drop it with
/// [`discard_pending`](Self::discard_pending).
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    /// Undecoded tail of the previous chunk.
    pending: Vec<u8>,

    /// Absolute stream offset of the first byte not yet turned into text.
    consumed: u64,

    /// Set once the first non-empty text has been produced. The BOM check
    /// runs exactly once, at that point.
    started: bool,
}

impl Utf8Decoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `chunk` and return the newly completed text.
    ///
    /// # Errors
    ///
    /// [`WireError::InvalidUtf8`] if the pending fragment plus `chunk`
    /// contains an invalid sequence.
    pub fn decode(&mut self, chunk: &[u8]) -> Result<String, WireError> {
        let mut out = String::with_capacity(chunk.len());
        self.decode_into(chunk, &mut out)?;
        Ok(out)
    }

    /// Decode `chunk`, appending the completed text to `out`.
    ///
    /// Returns the number of bytes of text appended. On error the text
    /// that precedes the invalid byte is still appended, so the output up
    /// to the failure point does not depend on how the input was chunked.
    ///
    /// # Errors
    ///
    /// [`WireError::InvalidUtf8`] with the absolute offset of the first
    /// invalid byte. The pending fragment is dropped.
    pub fn decode_into(&mut self, chunk: &[u8], out: &mut String) -> Result<usize, WireError> {
        if self.pending.is_empty() {
            return self.decode_joined(chunk, out);
        }

        let mut joined = std::mem::take(&mut self.pending);
        joined.extend_from_slice(chunk);
        self.decode_joined(&joined, out)
    }

    /// Decode a byte run that starts at `self.consumed` in the stream.
    fn decode_joined(&mut self, bytes: &[u8], out: &mut String) -> Result<usize, WireError> {
        let (valid, rest, failure) = match std::str::from_utf8(bytes) {
            Ok(text) => (text, &[][..], None),
            Err(err) => {
                let valid_up_to = err.valid_up_to();
                let (head, tail) = bytes.split_at(valid_up_to);
                let head = std::str::from_utf8(head).map_err(|e| WireError::InvalidUtf8 {
                    offset: self.consumed + e.valid_up_to() as u64,
                })?;

                // `error_len() == None` means the input simply ended inside
                // a character; anything else is a hard failure.
                if err.error_len().is_some() {
                    let failure = WireError::InvalidUtf8 {
                        offset: self.consumed + valid_up_to as u64,
                    };
                    (head, &[][..], Some(failure))
                } else {
                    (head, tail, None)
                }
            }
        };

        self.consumed += valid.len() as u64;
        self.pending.extend_from_slice(rest);

        let mut text = valid;
        if !self.started && !text.is_empty() {
            self.started = true;
            text = text.strip_prefix(BOM).unwrap_or(text);
        }
        out.push_str(text);

        match failure {
            Some(err) => Err(err),
            None => Ok(text.len()),
        }
    }

    /// Number of bytes held back waiting for the rest of a character.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Total bytes turned into text so far (BOM included).
    #[must_use]
    pub fn bytes_consumed(&self) -> u64 {
        self.consumed
    }

    /// Drop the pending fragment, returning how many bytes were dropped.
    pub fn discard_pending(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }
}
