/// Errors raised below the field-parsing layer.
///
/// Framing itself never fails: malformed text degrades silently. The only
/// wire-level failure is a byte sequence that can never become valid
/// UTF-8, whatever bytes follow it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
    /// An irrecoverably invalid UTF-8 sequence was found.
    ///
    /// `offset` is the absolute position in the input stream (counted from
    /// the first byte ever fed to the decoder) of the first invalid byte.
    #[error("invalid UTF-8 sequence at stream offset {offset}")]
    InvalidUtf8 { offset: u64 },
}
