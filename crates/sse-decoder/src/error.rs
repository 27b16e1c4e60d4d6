use sse_wire::WireError;

/// Errors surfaced by the SSE transform and its async front-ends.
///
/// Malformed SSE text is never an error (it degrades to dropped lines or
/// frames). What remains is invalid UTF-8, I/O from a reader, and the
/// lifecycle of the two-ended pipe:
///
/// ```text
///   DecodeError
///   ├── Wire(WireError)    ← irrecoverably invalid UTF-8
///   ├── Io(std::io::Error) ← from the underlying AsyncRead
///   ├── Closed             ← input after end-of-input, abort, or failure
///   ├── Aborted            ← producer aborted the stream
///   └── Disconnected       ← consumer went away while messages were pending
/// ```
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error(transparent)]
    Wire(#[from] WireError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The transform already reached its terminal state.
    #[error("transform is closed")]
    Closed,

    /// The producer aborted; buffered content was discarded.
    #[error("stream aborted by producer")]
    Aborted,

    /// The consumer end of the pipe was dropped or closed.
    #[error("message consumer disconnected")]
    Disconnected,
}
