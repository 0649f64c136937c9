//! Matching benchmarks
//!
//! Compares resolving every instance with its own linear scan against the
//! single-pass `MatchIndex`, on synthetic counter-coverage logs:
//! - Linear scan (keys × records)
//! - Single-pass index
//! - Full table build (index + row assembly)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use mtsyft_results::family::presets;
use mtsyft_results::matcher::{self, MatchIndex, MatchSpec};
use mtsyft_results::record::{RawRecord, RecordStore};
use mtsyft_results::table::TableBuilder;

/// Synthetic log in the shape the solvers write, about half of it core 1
fn synthetic_log(num_records: usize, seed: u64) -> Vec<RawRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..num_records)
        .map(|_| {
            let k: u32 = rng.gen_range(1..=10);
            let core: u32 = rng.gen_range(1..=2);
            let n: u32 = rng.gen_range(1..=100);
            let elapsed: f64 = rng.gen_range(0.0..400.0);
            RawRecord::new(
                format!("counter_{k}/goal.json"),
                format!("bench/core_{core}/envs_{n}"),
                elapsed,
            )
        })
        .collect()
}

fn coverage_specs() -> Vec<MatchSpec> {
    let family = presets::counter_coverage();
    let domain = family.domain().unwrap();
    domain.iter().map(|key| family.match_spec(key).unwrap()).collect()
}

/// Benchmark per-key linear resolution
fn bench_linear_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("linear_scan");
    let specs = coverage_specs();
    let limit = presets::counter_coverage().limit();

    for size in [100, 1_000, 5_000].iter() {
        let records = synthetic_log(*size, 42);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let column: Vec<_> = specs
                    .iter()
                    .map(|spec| matcher::resolve(spec, &records, limit))
                    .collect();
                black_box(column);
            });
        });
    }

    group.finish();
}

/// Benchmark the single-pass index
fn bench_match_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("match_index");
    let specs = coverage_specs();

    for size in [100, 1_000, 5_000].iter() {
        let records = synthetic_log(*size, 42);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let index = MatchIndex::build(&specs, &records);
                black_box(index);
            });
        });
    }

    group.finish();
}

/// Benchmark a three-variant Table 1 build
fn bench_table_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("table_build");
    let family = presets::counter_coverage();

    for size in [1_000, 5_000].iter() {
        let stores: Vec<RecordStore> = presets::DEFAULT_LOGS
            .iter()
            .zip(0u64..)
            .map(|((variant, _), seed)| {
                RecordStore::from_records(*variant, synthetic_log(*size, seed))
            })
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let table = stores
                    .iter()
                    .fold(TableBuilder::new(&family), TableBuilder::store)
                    .build()
                    .unwrap();
                black_box(table);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_linear_scan, bench_match_index, bench_table_build);
criterion_main!(benches);
