#![warn(clippy::pedantic)]

pub mod fields;
pub mod message;

pub use fields::{DataJoin, parse_frame, parse_line};
pub use message::{SseMessage, field};
