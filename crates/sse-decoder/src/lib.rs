#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod pipe;
pub mod streaming;
pub mod transform;

pub use config::TransformConfig;
pub use error::DecodeError;
pub use pipe::{ChunkSink, MessageSource, pipe};
pub use sse_types::SseMessage;
pub use streaming::StreamingDecoder;
pub use transform::{SseTransform, TransformState, TransformStats};
