#![no_main]

use libfuzzer_sys::fuzz_target;
use sse_wire::Utf8Decoder;

// Fuzz target: incremental UTF-8 decoding split at a fuzzer-chosen byte.
//
// Whenever the whole input is valid UTF-8, the two halves must decode to
// the same text as `str::from_utf8`, minus a leading BOM.
fuzz_target!(|input: (u8, &[u8])| {
    let (cut, data) = input;
    let cut = usize::from(cut).min(data.len());

    let mut decoder = Utf8Decoder::new();
    let Ok(head) = decoder.decode(&data[..cut]) else {
        return;
    };
    let Ok(tail) = decoder.decode(&data[cut..]) else {
        return;
    };

    if let Ok(expected) = std::str::from_utf8(data) {
        let expected = expected.strip_prefix('\u{FEFF}').unwrap_or(expected);
        assert_eq!(format!("{head}{tail}"), expected);
        assert_eq!(decoder.pending_len(), 0);
    }
});
