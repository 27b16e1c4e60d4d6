#![no_main]

use libfuzzer_sys::fuzz_target;
use sse_decoder::{SseTransform, TransformConfig};

// Fuzz target: arbitrary bytes through the full transform.
//
// Catches bugs in:
// - Frame extraction on odd delimiter runs
// - Invalid UTF-8 anywhere in the stream
// - Empty messages leaking past suppression
fuzz_target!(|data: &[u8]| {
    let mut transform = SseTransform::new(TransformConfig {
        flush_on_close: true,
        ..TransformConfig::default()
    });
    if let Ok(messages) = transform.push(data) {
        assert!(messages.iter().all(|m| !m.is_empty()));
        let _ = transform.finish();
    }
});
