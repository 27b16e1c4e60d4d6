#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use sse_decoder::{SseTransform, TransformConfig};
use sse_encoder::SseEncoder;
use sse_wire::trim_field;

#[derive(Debug, Arbitrary)]
struct FuzzMessage {
    event: Option<String>,
    id: Option<String>,
    retry: Option<u64>,
    data: String,
}

// Fuzz target: encode → decode with newline-joined data.
//
// Records the encoder accepts must decode to the same number of messages,
// with trimmed single-line fields intact.
fuzz_target!(|messages: Vec<FuzzMessage>| {
    let mut encoder = SseEncoder::new();
    for m in &messages {
        encoder.add_data(&m.data);
        if let Some(event) = &m.event {
            encoder.with_field("event", event);
        }
        if let Some(id) = &m.id {
            encoder.with_id(id);
        }
        if let Some(retry) = m.retry {
            encoder.with_retry(retry);
        }
    }

    let Ok(wire) = encoder.encode() else {
        return;
    };

    let mut transform = SseTransform::new(TransformConfig {
        join_data_newlines: true,
        ..TransformConfig::default()
    });
    let decoded = transform.push(&wire).expect("encoder output is valid UTF-8");
    assert_eq!(decoded.len(), messages.len());

    for (out, original) in decoded.iter().zip(&messages) {
        assert_eq!(out.event(), original.event.as_deref().map(trim_field));
        assert_eq!(out.id(), original.id.as_deref().map(trim_field));
        assert_eq!(out.retry(), original.retry.map(|r| r.to_string()).as_deref());
    }
});
