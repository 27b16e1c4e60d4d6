use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use sse_encoder::SseEncoder;

fn bench_encode_small(c: &mut Criterion) {
    c.bench_function("encode_small", |b| {
        b.iter(|| {
            SseEncoder::new()
                .add_event("greeting", "hello")
                .with_id("1")
                .encode()
                .unwrap()
        });
    });
}

fn bench_encode_multiline(c: &mut Criterion) {
    let body = "line of text\n".repeat(50);

    c.bench_function("encode_multiline", |b| {
        b.iter(|| SseEncoder::new().add_data(&body).encode().unwrap());
    });
}

fn bench_encode_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_throughput");

    for count in [10, 100, 1000] {
        group.throughput(Throughput::Elements(count));
        group.bench_with_input(BenchmarkId::new("messages", count), &count, |b, &count| {
            b.iter(|| {
                let mut encoder = SseEncoder::new();
                for i in 0..count {
                    encoder
                        .add_event("tick", "{\"ok\":true}")
                        .with_id(&i.to_string());
                }
                encoder.encode().unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_encode_small,
    bench_encode_multiline,
    bench_encode_throughput
);
criterion_main!(benches);
