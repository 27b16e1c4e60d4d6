use sse_types::DataJoin;

/// Configuration for an [`SseTransform`](crate::SseTransform).
///
/// Every option defaults to `false`, which gives the plain wire format:
/// `\n\n` delimits frames, repeated `data` values are concatenated with
/// no separator, and an unterminated final frame is dropped at
/// end-of-input.
///
/// ```text
/// ┌────────────────────┬──────────────────────────────────────────────────┐
/// │ Field              │ Effect when true                                 │
/// ├────────────────────┼──────────────────────────────────────────────────┤
/// │ join_data_newlines │ Join repeated `data` values with `\n`            │
/// │ flush_on_close     │ Parse the trailing partial frame at end-of-input │
/// │ normalize_newlines │ Treat `\r\n` and `\r` as `\n` before framing     │
/// └────────────────────┴──────────────────────────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransformConfig {
    /// Insert a newline between the values of repeated `data` lines.
    pub join_data_newlines: bool,

    /// At end-of-input, emit whatever frame is still buffered instead of
    /// discarding it. Off by default: an SSE frame is only meaningful once
    /// its blank line has arrived.
    pub flush_on_close: bool,

    /// Fold CRLF and lone CR line endings into `\n` as text is buffered.
    pub normalize_newlines: bool,
}

impl TransformConfig {
    /// Merge mode for repeated `data` lines.
    #[must_use]
    pub fn data_join(&self) -> DataJoin {
        DataJoin::from_newline_flag(self.join_data_newlines)
    }
}
