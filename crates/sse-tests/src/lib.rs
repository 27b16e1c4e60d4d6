//! Shared helpers for the SSE integration tests and benchmarks.

use std::path::Path;

use sse_decoder::{DecodeError, SseMessage, SseTransform, TransformConfig};

/// Read a fixture from `tests/golden/`.
///
/// # Panics
///
/// If the fixture does not exist.
#[must_use]
pub fn golden(fixture: &str) -> Vec<u8> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/golden")
        .join(fixture);
    std::fs::read(&path)
        .unwrap_or_else(|e| panic!("failed to read golden fixture {}: {e}", path.display()))
}

/// Decode `input` in `chunk`-byte pieces through a fresh transform,
/// including end-of-input handling.
///
/// # Errors
///
/// The first decode error.
pub fn decode_chunked(
    input: &[u8],
    chunk: usize,
    config: TransformConfig,
) -> Result<Vec<SseMessage>, DecodeError> {
    let mut transform = SseTransform::new(config);
    let mut messages = Vec::new();
    for piece in input.chunks(chunk.max(1)) {
        transform.push_with(piece, |message| messages.push(message))?;
    }
    messages.extend(transform.finish()?);
    Ok(messages)
}
