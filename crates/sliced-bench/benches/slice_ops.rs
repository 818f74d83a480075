//! Criterion micro-benchmarks for generic container growth, sub-range
//! copies and combinators.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use sliced_bench::{growth_configs, reference_len, sequential, stress_len};
use sliced_core::Slice;

/// Benchmark: append 10K elements from empty under each growth policy.
fn bench_append_growth(c: &mut Criterion) {
    let n = reference_len();
    let mut group = c.benchmark_group("append_10k");
    for (label, config) in growth_configs() {
        group.bench_with_input(BenchmarkId::from_parameter(label), &config, |b, config| {
            b.iter(|| {
                let mut s = Slice::with_config(config.clone()).unwrap();
                for v in 0..n as i64 {
                    s.append(v).unwrap();
                }
                black_box(s.len());
            });
        });
    }
    group.finish();
}

/// Benchmark: bulk append of 10K elements into a pre-sized container.
fn bench_append_array(c: &mut Criterion) {
    let items: Vec<i64> = (0..reference_len() as i64).collect();
    c.bench_function("append_array_10k", |b| {
        b.iter(|| {
            let mut s = Slice::with_capacity(items.len()).unwrap();
            s.append_array(&items).unwrap();
            black_box(s.len());
        });
    });
}

/// Benchmark: strided forward and reverse copies of a 1M-element source.
fn bench_sub_range(c: &mut Criterion) {
    let s = sequential(stress_len()).unwrap();
    let mut group = c.benchmark_group("sub_range_1m");
    for step in [1isize, 7, -1, -7] {
        group.bench_with_input(BenchmarkId::from_parameter(step), &step, |b, &step| {
            b.iter(|| {
                let r = s.sub_range(0, -1, step).unwrap();
                black_box(r.len());
            });
        });
    }
    group.finish();
}

/// Benchmark: map, filter and reduce over 10K elements.
fn bench_combinators(c: &mut Criterion) {
    let s = sequential(reference_len()).unwrap();
    c.bench_function("map_10k", |b| {
        b.iter(|| black_box(s.map(|v| v * 3).unwrap().len()));
    });
    c.bench_function("filter_10k", |b| {
        b.iter(|| black_box(s.filter(|v| v % 3 == 0).unwrap().len()));
    });
    c.bench_function("reduce_10k", |b| {
        b.iter(|| black_box(s.reduce(|acc, v| acc + v).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_append_growth,
    bench_append_array,
    bench_sub_range,
    bench_combinators
);
criterion_main!(benches);
