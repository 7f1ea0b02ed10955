//! Performance benchmarks for SSE demuxing
//!
//! Measures demuxer throughput for different fragment sizes, and the cost of
//! the full bridge path including UTF-8 decoding.
//! Run with: cargo bench

use bytes::Bytes;
use chatstream::adapters::MockByteSource;
use chatstream::bridge::SseBridge;
use chatstream::sse::{EventDemuxer, Utf8StreamDecoder};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use futures::StreamExt;

/// Generate a completion body with the given number of delta frames
fn generate_body(frames: usize) -> String {
    let mut body = String::new();
    for i in 0..frames {
        body.push_str(&format!(
            "data: {{\"choices\":[{{\"delta\":{{\"content\":\"token {} \u{e9}\u{1f600}\"}},\"index\":0}}]}}\n\n",
            i
        ));
    }
    body.push_str("data: [DONE]\n\n");
    body
}

fn fragments(body: &str, size: usize) -> Vec<Bytes> {
    body.as_bytes()
        .chunks(size)
        .map(Bytes::copy_from_slice)
        .collect()
}

/// Benchmark the demuxer alone, fed in fixed-size fragments
fn bench_demux_fragment_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("demux_fragment_sizes");
    let body = generate_body(500);
    group.throughput(Throughput::Bytes(body.len() as u64));

    for size in [1, 16, 256, 4096].iter() {
        let chunks = fragments(&body, *size);

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_bytes", size)),
            &chunks,
            |b, chunks| {
                b.iter(|| {
                    let mut decoder = Utf8StreamDecoder::new();
                    let mut demuxer = EventDemuxer::new();
                    let mut count = 0;
                    for chunk in chunks {
                        let text = decoder.decode(black_box(chunk));
                        count += demuxer.feed(&text).len();
                    }
                    black_box(count)
                });
            },
        );
    }

    group.finish();
}

/// Benchmark the bridge end to end over a scripted source
fn bench_bridge_stream(c: &mut Criterion) {
    let mut group = c.benchmark_group("bridge_stream");
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("failed to build runtime");

    for frames in [10, 100, 1000].iter() {
        let chunks = fragments(&generate_body(*frames), 512);
        group.throughput(Throughput::Elements(*frames as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_frames", frames)),
            &chunks,
            |b, chunks| {
                b.iter(|| {
                    runtime.block_on(async {
                        let bridge = SseBridge::new(MockByteSource::chunks(chunks.clone()));
                        let payloads: Vec<_> = bridge.collect().await;
                        black_box(payloads.len())
                    })
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_demux_fragment_sizes, bench_bridge_stream);

criterion_main!(benches);
