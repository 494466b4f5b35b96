use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use orc_rle::checkpoint::LongStreamCheckpoint;
use orc_rle::input::{MemoryInputStream, OrcDataSourceId};
use orc_rle::stream::LongInputStream;
use orc_rle::stream::long_v1::LongInputStreamV1;
use orc_rle::stream::long_v1_writer::LongOutputStreamV1;

const NUM_VALUES: usize = 100_000;

/// Mostly runs, with a literal group every so often.
fn encoded_values() -> (bytes::Bytes, Vec<LongStreamCheckpoint>) {
    let mut writer = LongOutputStreamV1::new(true);
    let mut checkpoints = Vec::new();
    for i in 0..NUM_VALUES as i64 {
        if i % 10_000 == 0 {
            checkpoints.push(writer.checkpoint().into());
        }
        let v = if (i / 200) % 2 == 0 { i / 7 } else { i * 31 % 1009 };
        writer.write(v);
    }
    (writer.finish(), checkpoints)
}

fn stream(bytes: &bytes::Bytes) -> LongInputStreamV1<MemoryInputStream> {
    let input = MemoryInputStream::new(OrcDataSourceId::new("bench"), bytes.clone());
    LongInputStreamV1::new(input, true)
}

fn bench_long_v1(c: &mut Criterion) {
    let (bytes, checkpoints) = encoded_values();

    c.bench_function("long_v1_next", |b| {
        b.iter(|| {
            let mut s = stream(&bytes);
            let mut sum = 0i64;
            for _ in 0..NUM_VALUES {
                sum = sum.wrapping_add(s.next().unwrap());
            }
            black_box(sum)
        })
    });

    c.bench_function("long_v1_seek", |b| {
        b.iter(|| {
            let mut s = stream(&bytes);
            for checkpoint in checkpoints.iter().rev() {
                s.seek_to_checkpoint(checkpoint).unwrap();
                black_box(s.next().unwrap());
            }
        })
    });

    let sparse: Vec<usize> = (0..NUM_VALUES).step_by(97).collect();
    c.bench_function("long_v1_scan_sparse", |b| {
        b.iter(|| {
            let mut s = stream(&bytes);
            let accepted = s
                .scan(&sparse, 0, sparse.len(), NUM_VALUES, &mut |_: usize, v: i64| {
                    v % 2 == 0
                })
                .unwrap();
            black_box(accepted)
        })
    });
}

criterion_group!(benches, bench_long_v1);
criterion_main!(benches);
