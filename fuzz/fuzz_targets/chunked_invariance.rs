#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use sse_decoder::{SseMessage, SseTransform, TransformConfig};

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    data: Vec<u8>,
    cuts: Vec<u16>,
    join_data_newlines: bool,
    flush_on_close: bool,
    normalize_newlines: bool,
}

/// Decode `data` split at `cuts`, stopping at the first error.
///
/// Returns the messages seen before the error, and the error text.
fn decode(data: &[u8], cuts: &[usize], config: TransformConfig) -> (Vec<SseMessage>, Option<String>) {
    let mut transform = SseTransform::new(config);
    let mut messages = Vec::new();
    let mut start = 0;
    let end = data.len();
    for &cut in cuts.iter().chain(std::iter::once(&end)) {
        match transform.push(&data[start..cut]) {
            Ok(batch) => messages.extend(batch),
            Err(err) => return (messages, Some(err.to_string())),
        }
        start = cut;
    }
    match transform.finish() {
        Ok(tail) => messages.extend(tail),
        Err(err) => return (messages, Some(err.to_string())),
    }
    (messages, None)
}

// Fuzz target: neither the message sequence nor the error it ends with
// may depend on chunk boundaries.
fuzz_target!(|input: FuzzInput| {
    let config = TransformConfig {
        join_data_newlines: input.join_data_newlines,
        flush_on_close: input.flush_on_close,
        normalize_newlines: input.normalize_newlines,
    };

    let mut cuts: Vec<usize> = input
        .cuts
        .iter()
        .map(|&c| usize::from(c) % (input.data.len() + 1))
        .collect();
    cuts.sort_unstable();
    cuts.dedup();

    let whole = decode(&input.data, &[], config);
    let split = decode(&input.data, &cuts, config);

    assert_eq!(whole, split);
});
