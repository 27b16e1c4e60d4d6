/// Errors that can occur while encoding messages to SSE wire text.
///
/// The encoder refuses anything the decoder could not read back as the
/// same record:
///
/// ```text
///   EncodeError
///   ├── EmptyMessage        ← a record with no fields
///   ├── EmptyPayload        ← no messages were added before .encode()
///   ├── InvalidFieldTarget  ← with_* called before any add_*
///   ├── InvalidKey          ← key holds ':', a line break, or outer whitespace
///   ├── MultilineValue      ← line break in a non-data value, or '\r' in data
///   └── Io(std::io::Error)  ← from the underlying writer
/// ```
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("message at index {index} has no fields")]
    EmptyMessage { index: usize },

    #[error("no messages have been added to the encoder")]
    EmptyPayload,

    #[error("{method} called but no messages have been added yet")]
    InvalidFieldTarget { method: &'static str },

    #[error("field name {key:?} cannot be represented on the wire")]
    InvalidKey { key: String },

    #[error("value of field {key:?} contains a line break")]
    MultilineValue { key: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
