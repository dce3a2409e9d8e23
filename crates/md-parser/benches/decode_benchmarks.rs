//! Benchmarks for the metadata decoder.
//!
//! Run with: cargo bench --package md-parser

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use md_parser::{decode_batch, decode_dimensions, MetadataRow};
use test_utils::{arrays, generate_rows};

fn to_rows(n: usize) -> Vec<MetadataRow> {
    generate_rows(n)
        .into_iter()
        .map(|[name, dimensions, attributes, srs, trs, extent]| MetadataRow {
            name,
            dimensions,
            attributes,
            srs,
            trs,
            extent,
        })
        .collect()
}

// =============================================================================
// FIELD DECODING
// =============================================================================

fn bench_dimensions(c: &mut Criterion) {
    let dims = arrays::CHIRPS_DAILY[1];
    c.bench_function("decode_dimensions_3", |b| {
        b.iter(|| decode_dimensions(black_box(dims)))
    });
}

// =============================================================================
// BATCH DECODING
// =============================================================================

fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_batch");
    for n in [10usize, 100, 1000] {
        let rows = to_rows(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("rows_{}", n), |b| {
            b.iter(|| decode_batch(black_box(&rows)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_dimensions, bench_batch);
criterion_main!(benches);
