use std::fmt::Write as _;

use sse_types::{SseMessage, field};
use sse_wire::trim_field;

use crate::error::EncodeError;

/// Fields written ahead of the rest, in this order. `data` always goes last.
const LEADING_FIELDS: [&str; 3] = [field::EVENT, field::ID, field::RETRY];

/// SSE encoder: builds wire text from message records.
///
/// Follows the builder pattern: `add_*` methods append a message and
/// `with_*` modifiers set a field on the most recently added one.
///
/// ```text
///   SseEncoder::new()
///       .add_event("update", "line 1\nline 2")   event: update
///       .with_id("7")                    ──▶     id: 7
///       .encode()                                data: line 1
///                                                data: line 2
///                                                <blank>
/// ```
///
/// Multi-line `data` values are written as one `data:` line per line, so
/// they read back unchanged only when the decoder joins data lines with
/// a newline. Values are trimmed on decode; surrounding whitespace does
/// not survive.
///
/// # Example
///
/// ```rust
/// use sse_encoder::SseEncoder;
///
/// let wire = SseEncoder::new()
///     .add_event("greeting", "hello")
///     .with_id("1")
///     .encode()
///     .unwrap();
///
/// assert_eq!(wire, b"event: greeting\nid: 1\ndata: hello\n\n");
/// ```
#[derive(Debug, Default)]
pub struct SseEncoder {
    messages: Vec<SseMessage>,

    /// First modifier called with no message to act on, reported by `encode`.
    deferred: Option<&'static str>,
}

impl SseEncoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a complete message record.
    pub fn add_message(&mut self, message: SseMessage) -> &mut Self {
        self.messages.push(message);
        self
    }

    /// Append a message carrying only `data`.
    pub fn add_data(&mut self, data: &str) -> &mut Self {
        let mut message = SseMessage::new();
        message.insert(field::DATA, data);
        self.add_message(message)
    }

    /// Append a named event with a `data` payload.
    pub fn add_event(&mut self, event: &str, data: &str) -> &mut Self {
        let mut message = SseMessage::new();
        message.insert(field::EVENT, event);
        message.insert(field::DATA, data);
        self.add_message(message)
    }

    // ── Modifier methods ────────────────────────────────────────────────
    //
    // Modifiers act on the most recently added message. Calling one on an
    // empty encoder is recorded and surfaces from `encode`.

    /// Set `id` on the most recently added message.
    pub fn with_id(&mut self, id: &str) -> &mut Self {
        self.set_on_last("with_id", field::ID, id)
    }

    /// Set `retry` (milliseconds) on the most recently added message.
    pub fn with_retry(&mut self, retry_ms: u64) -> &mut Self {
        self.set_on_last("with_retry", field::RETRY, &retry_ms.to_string())
    }

    /// Set an arbitrary field on the most recently added message.
    pub fn with_field(&mut self, key: &str, value: &str) -> &mut Self {
        self.set_on_last("with_field", key, value)
    }

    fn set_on_last(&mut self, method: &'static str, key: &str, value: &str) -> &mut Self {
        match self.messages.last_mut() {
            Some(message) => {
                message.insert(key, value);
            }
            None => {
                self.deferred.get_or_insert(method);
            }
        }
        self
    }

    /// Number of messages added so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Serialize every message, in order, into one wire payload.
    ///
    /// # Errors
    ///
    /// - [`EncodeError::InvalidFieldTarget`] if a modifier ran before any
    ///   message existed.
    /// - [`EncodeError::EmptyPayload`] if no messages were added.
    /// - [`EncodeError::EmptyMessage`], [`EncodeError::InvalidKey`],
    ///   [`EncodeError::MultilineValue`] for records that cannot be
    ///   represented.
    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        let mut out = String::new();
        self.encode_to_string(&mut out)?;
        Ok(out.into_bytes())
    }

    /// Serialize into `w`, returning the number of bytes written.
    ///
    /// # Errors
    ///
    /// Everything [`encode`](Self::encode) returns, plus
    /// [`EncodeError::Io`] from the writer.
    pub fn write_to(&self, w: &mut impl std::io::Write) -> Result<usize, EncodeError> {
        let bytes = self.encode()?;
        w.write_all(&bytes)?;
        Ok(bytes.len())
    }

    fn encode_to_string(&self, out: &mut String) -> Result<(), EncodeError> {
        if let Some(method) = self.deferred {
            return Err(EncodeError::InvalidFieldTarget { method });
        }
        if self.messages.is_empty() {
            return Err(EncodeError::EmptyPayload);
        }

        for (index, message) in self.messages.iter().enumerate() {
            if message.is_empty() {
                return Err(EncodeError::EmptyMessage { index });
            }
            write_message(message, out)?;
        }
        Ok(())
    }
}

/// Append one message, terminated by a blank line, to `out`.
///
/// # Errors
///
/// [`EncodeError::InvalidKey`] or [`EncodeError::MultilineValue`] if a
/// field cannot be represented. `out` may hold a partial message on error.
pub fn write_message(message: &SseMessage, out: &mut String) -> Result<(), EncodeError> {
    for key in LEADING_FIELDS {
        if let Some(value) = message.get(key) {
            write_field(out, key, value)?;
        }
    }

    for (key, value) in message.iter() {
        if key == field::DATA || LEADING_FIELDS.contains(&key) {
            continue;
        }
        write_field(out, key, value)?;
    }

    if let Some(data) = message.data() {
        if data.contains('\r') {
            return Err(EncodeError::MultilineValue {
                key: field::DATA.to_owned(),
            });
        }
        for line in data.split('\n') {
            write_line(out, field::DATA, line);
        }
    }

    out.push('\n');
    Ok(())
}

fn write_field(out: &mut String, key: &str, value: &str) -> Result<(), EncodeError> {
    if key.contains([':', '\n', '\r']) || trim_field(key) != key {
        return Err(EncodeError::InvalidKey { key: key.to_owned() });
    }
    if value.contains(['\n', '\r']) {
        return Err(EncodeError::MultilineValue { key: key.to_owned() });
    }
    write_line(out, key, value);
    Ok(())
}

fn write_line(out: &mut String, key: &str, value: &str) {
    if value.is_empty() {
        let _ = writeln!(out, "{key}:");
    } else {
        let _ = writeln!(out, "{key}: {value}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sse_decoder::{SseTransform, TransformConfig};

    /// Helper: decode `wire` with newline-joined data.
    fn decode_joined(wire: &[u8]) -> Vec<SseMessage> {
        let config = TransformConfig {
            join_data_newlines: true,
            ..TransformConfig::default()
        };
        let mut transform = SseTransform::new(config);
        transform.push(wire).unwrap()
    }

    #[test]
    fn data_only_message() {
        let wire = SseEncoder::new().add_data("hello").encode().unwrap();
        assert_eq!(wire, b"data: hello\n\n");
    }

    #[test]
    fn field_order_is_event_id_retry_other_data() {
        let wire = SseEncoder::new()
            .add_event("e", "d")
            .with_field("zeta", "z")
            .with_retry(1500)
            .with_id("42")
            .encode()
            .unwrap();
        assert_eq!(
            String::from_utf8(wire).unwrap(),
            "event: e\nid: 42\nretry: 1500\nzeta: z\ndata: d\n\n"
        );
    }

    #[test]
    fn multiline_data_split_into_lines() {
        let wire = SseEncoder::new().add_data("a\n\nb").encode().unwrap();
        assert_eq!(wire, b"data: a\ndata:\ndata: b\n\n");
    }

    #[test]
    fn empty_key_written_as_comment() {
        let mut msg = SseMessage::new();
        msg.insert("", "keep-alive");
        let wire = SseEncoder::new().add_message(msg).encode().unwrap();
        assert_eq!(wire, b": keep-alive\n\n");
    }

    #[test]
    fn encoded_messages_decode_back() {
        let wire = SseEncoder::new()
            .add_event("first", "one\ntwo")
            .with_id("1")
            .add_data("{\"k\":\"v:w\"}")
            .encode()
            .unwrap();

        let messages = decode_joined(&wire);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].event(), Some("first"));
        assert_eq!(messages[0].data(), Some("one\ntwo"));
        assert_eq!(messages[0].id(), Some("1"));
        assert_eq!(messages[1].data(), Some("{\"k\":\"v:w\"}"));
    }

    #[test]
    fn empty_encoder_rejected() {
        let err = SseEncoder::new().encode().unwrap_err();
        assert!(matches!(err, EncodeError::EmptyPayload));
    }

    #[test]
    fn modifier_without_message_rejected() {
        let err = SseEncoder::new()
            .with_id("1")
            .add_data("x")
            .encode()
            .unwrap_err();
        assert!(matches!(
            err,
            EncodeError::InvalidFieldTarget { method: "with_id" }
        ));
    }

    #[test]
    fn empty_message_rejected() {
        let err = SseEncoder::new()
            .add_data("ok")
            .add_message(SseMessage::new())
            .encode()
            .unwrap_err();
        assert!(matches!(err, EncodeError::EmptyMessage { index: 1 }));
    }

    #[test]
    fn key_with_colon_rejected() {
        let err = SseEncoder::new()
            .add_data("x")
            .with_field("a:b", "v")
            .encode()
            .unwrap_err();
        assert!(matches!(err, EncodeError::InvalidKey { key } if key == "a:b"));
    }

    #[test]
    fn padded_key_rejected() {
        let err = SseEncoder::new()
            .add_data("x")
            .with_field(" id", "v")
            .encode()
            .unwrap_err();
        assert!(matches!(err, EncodeError::InvalidKey { .. }));
    }

    #[test]
    fn key_with_byte_order_mark_rejected() {
        let err = SseEncoder::new()
            .add_data("x")
            .with_field("\u{FEFF}id", "v")
            .encode()
            .unwrap_err();
        assert!(matches!(err, EncodeError::InvalidKey { .. }));
    }

    #[test]
    fn multiline_event_rejected() {
        let err = SseEncoder::new().add_event("a\nb", "x").encode().unwrap_err();
        assert!(matches!(err, EncodeError::MultilineValue { key } if key == "event"));
    }

    #[test]
    fn write_to_reports_length() {
        let mut sink = Vec::new();
        let n = SseEncoder::new().add_data("abc").write_to(&mut sink).unwrap();
        assert_eq!(n, sink.len());
        assert_eq!(sink, b"data: abc\n\n");
    }
}
