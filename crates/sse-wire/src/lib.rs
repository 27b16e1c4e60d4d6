#![warn(clippy::pedantic)]

pub mod error;
pub mod frame_buffer;
pub mod utf8;
pub mod whitespace;

pub use error::WireError;
pub use frame_buffer::{DELIMITER, FrameBuffer, Frames};
pub use utf8::Utf8Decoder;
pub use whitespace::{is_field_whitespace, trim_field};
