use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use sse_decoder::TransformConfig;
use sse_encoder::SseEncoder;
use sse_tests::decode_chunked;

/// A stream of `count` token-delta events, the shape LLM APIs send.
fn delta_stream(count: usize) -> Vec<u8> {
    let mut encoder = SseEncoder::new();
    for i in 0..count {
        encoder
            .add_event("content_block_delta", &format!("{{\"index\":0,\"delta\":\"tok{i}\"}}"))
            .with_id(&i.to_string());
    }
    encoder.encode().unwrap()
}

fn decode(payload: &[u8], chunk: usize, config: TransformConfig) -> usize {
    decode_chunked(payload, chunk, config).unwrap().len()
}

fn bench_decode_small(c: &mut Criterion) {
    let payload = delta_stream(1);

    c.bench_function("decode_small", |b| {
        b.iter(|| decode(&payload, payload.len(), TransformConfig::default()));
    });
}

fn bench_decode_chunking(c: &mut Criterion) {
    let payload = delta_stream(200);
    let mut group = c.benchmark_group("decode_chunking");
    group.throughput(Throughput::Bytes(payload.len() as u64));

    for chunk in [1, 16, 256, 4096, payload.len()] {
        group.bench_with_input(BenchmarkId::new("chunk", chunk), &chunk, |b, &chunk| {
            b.iter(|| decode(&payload, chunk, TransformConfig::default()));
        });
    }

    group.finish();
}

fn bench_decode_options(c: &mut Criterion) {
    let payload = delta_stream(200);
    let crlf: Vec<u8> = String::from_utf8(payload.clone())
        .unwrap()
        .replace('\n', "\r\n")
        .into_bytes();

    let mut group = c.benchmark_group("decode_options");

    group.bench_function("default", |b| {
        b.iter(|| decode(&payload, 256, TransformConfig::default()));
    });
    group.bench_function("join_newlines", |b| {
        let config = TransformConfig {
            join_data_newlines: true,
            ..TransformConfig::default()
        };
        b.iter(|| decode(&payload, 256, config));
    });
    group.bench_function("normalize_crlf", |b| {
        let config = TransformConfig {
            normalize_newlines: true,
            ..TransformConfig::default()
        };
        b.iter(|| decode(&crlf, 256, config));
    });

    group.finish();
}

fn bench_decode_large_message(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_large_message");

    for size_kb in [1, 10, 100] {
        let payload = SseEncoder::new()
            .add_data(&"x".repeat(size_kb * 1024))
            .encode()
            .unwrap();

        group.throughput(Throughput::Bytes(payload.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("chunk_512", format!("{size_kb}kb")),
            &payload,
            |b, p| b.iter(|| decode(p, 512, TransformConfig::default())),
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_decode_small,
    bench_decode_chunking,
    bench_decode_options,
    bench_decode_large_message
);
criterion_main!(benches);
