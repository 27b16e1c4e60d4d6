#![no_main]

use libfuzzer_sys::fuzz_target;
use sse_types::{parse_frame, DataJoin};
use sse_wire::trim_field;

// Fuzz target: field parsing of a single frame.
//
// Keys and values are always trimmed, and a frame without a colon never
// produces a field.
fuzz_target!(|frame: &str| {
    let message = parse_frame(frame, DataJoin::Newline);
    if !frame.contains(':') {
        assert!(message.is_empty());
    }
    for (key, value) in message.iter() {
        assert_eq!(key, trim_field(key));
        assert!(!key.contains(':'));
        if key != "data" {
            assert_eq!(value, trim_field(value));
        }
    }
});
