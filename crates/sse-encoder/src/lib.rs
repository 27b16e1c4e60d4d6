#![warn(clippy::pedantic)]

pub mod encoder;
pub mod error;

pub use encoder::{SseEncoder, write_message};
pub use error::EncodeError;
