use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use framescan::{ChunkSource, FrameParser, FrameStream};

fn frame(payload_len: usize) -> Vec<u8> {
    let len = u16::try_from(payload_len).unwrap();
    let mut bytes = vec![0x7E];
    bytes.extend_from_slice(&len.to_be_bytes());
    bytes.extend(std::iter::repeat_n(b'x', payload_len));
    bytes.push(0x7E);
    bytes
}

fn time_record(timestamp: u64) -> Vec<u8> {
    let mut bytes = vec![0xAA, 0xAA];
    bytes.extend_from_slice(&timestamp.to_be_bytes()[2..]);
    bytes
}

/// Clean capture: frames of `payload_len` bytes, a time record after each.
fn clean_capture(payload_len: usize, records: usize) -> Vec<u8> {
    (0..records)
        .flat_map(|i| [frame(payload_len), time_record(i as u64)].concat())
        .collect()
}

/// Capture with garbage and a lying length field every fourth frame.
fn noisy_capture(records: usize) -> Vec<u8> {
    (0..records)
        .flat_map(|i| {
            let mut part = vec![0x13, 0x37, 0x42];
            let mut record = frame(32);
            if i % 4 == 0 {
                record[1] = 0xFF;
            }
            part.extend(record);
            part
        })
        .collect()
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser");

    for payload_len in [16, 256, 4096] {
        let capture = clean_capture(payload_len, 256);
        group.throughput(Throughput::Bytes(capture.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("clean", payload_len),
            &capture,
            |b, capture| {
                b.iter(|| {
                    let mut parser = FrameParser::default();
                    parser.ingest(capture);
                    while let Some(record) = parser.take_next() {
                        black_box(record);
                    }
                });
            },
        );
    }

    let capture = noisy_capture(1024);
    group.throughput(Throughput::Bytes(capture.len() as u64));
    group.bench_function("noisy", |b| {
        b.iter(|| {
            let mut parser = FrameParser::default();
            parser.ingest(&capture);
            while let Some(record) = parser.take_next() {
                black_box(record);
            }
        });
    });

    group.finish();
}

fn bench_stream(c: &mut Criterion) {
    let mut group = c.benchmark_group("stream");
    let capture = clean_capture(64, 1024);
    group.throughput(Throughput::Bytes(capture.len() as u64));

    for chunk_size in [64, 4096] {
        group.bench_with_input(
            BenchmarkId::new("chunked", chunk_size),
            &chunk_size,
            |b, &chunk_size| {
                b.iter(|| {
                    let stream = FrameStream::new(
                        ChunkSource::from_bytes(capture.clone()),
                        FrameParser::default(),
                    )
                    .with_chunk_size(chunk_size);
                    black_box(stream.count());
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_stream);
criterion_main!(benches);
