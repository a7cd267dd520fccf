//! Benchmarks for the width allocator.
//!
//! Budget: allocating 8 mixed regions should stay under 1µs; it runs once
//! per table, column layout, split and progress row on every render.
//!
//! Run with: cargo bench -p gloss-layout --bench allocator_bench

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use gloss_layout::{Region, RegionSet, SizeConstraint, Sizing, allocate_widths};
use std::hint::black_box;

fn mixed(count: usize) -> Vec<Sizing> {
    (0..count)
        .map(|i| match i % 4 {
            0 => Sizing::fixed(8),
            1 => Sizing::ratio(i as u32 % 3 + 1),
            2 => Sizing::minimum(4).with_max(20),
            _ => Sizing::automatic(),
        })
        .collect()
}

// =============================================================================
// allocate_widths
// =============================================================================

fn bench_allocate(c: &mut Criterion) {
    let mut group = c.benchmark_group("allocate_widths");

    for count in [3, 8, 32, 128] {
        let sizings = mixed(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("mixed", count), &sizings, |b, sizings| {
            b.iter(|| allocate_widths(black_box(sizings), black_box(200)));
        });
    }

    let autos = vec![SizeConstraint::Automatic; 16];
    group.bench_function("automatic_16", |b| {
        b.iter(|| allocate_widths(black_box(&autos), black_box(197)));
    });

    group.finish();
}

// =============================================================================
// RegionSet
// =============================================================================

fn bench_region_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("region_set");
    let set: RegionSet<usize> = mixed(32)
        .into_iter()
        .enumerate()
        .map(|(i, sizing)| Region::new(i, sizing).named(format!("pane-{i}")))
        .collect();

    group.bench_function("lookup", |b| {
        b.iter(|| set.get(black_box("pane-17")).map(|r| r.content));
    });
    group.bench_function("allocate_32", |b| {
        b.iter(|| set.allocate(black_box(240)).len());
    });

    group.finish();
}

criterion_group!(benches, bench_allocate, bench_region_set);
criterion_main!(benches);
