//! Benchmarks for point, bulk and aggregate operations.

use avl_forest::{AvlForest, AvlTree, Side, Size, Sum};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeSet;

type Forest = AvlForest<u64, (Size, Sum<u64>)>;

fn shuffled_keys(n: usize) -> Vec<u64> {
    let mut keys: Vec<u64> = (0..n as u64).collect();
    keys.shuffle(&mut StdRng::seed_from_u64(42));
    keys
}

fn build(keys: &[u64]) -> (Forest, AvlTree) {
    let mut f = Forest::with_capacity(keys.len());
    let mut t = AvlTree::new();
    for &k in keys {
        f.insert(&mut t, k);
    }
    (f, t)
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");

    for size in [1_000, 10_000, 100_000] {
        let keys = shuffled_keys(size);

        group.bench_with_input(BenchmarkId::new("AvlForest", size), &keys, |b, keys| {
            b.iter(|| {
                let (mut f, mut t) = build(keys);
                black_box(f.height(&t));
                f.clear(&mut t)
            });
        });

        group.bench_with_input(BenchmarkId::new("BTreeSet", size), &keys, |b, keys| {
            b.iter(|| {
                let set: BTreeSet<u64> = keys.iter().copied().collect();
                black_box(set)
            });
        });
    }

    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");

    for size in [1_000, 10_000, 100_000] {
        let keys = shuffled_keys(size);
        let (mut f, mut t) = build(&keys);

        group.bench_with_input(BenchmarkId::new("AvlForest", size), &keys, |b, keys| {
            b.iter(|| {
                let mut hits = 0usize;
                for key in keys {
                    hits += usize::from(f.contains(&t, key));
                }
                black_box(hits)
            });
        });
        f.clear(&mut t);
    }

    group.finish();
}

fn bench_split_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("split_merge");

    for size in [1_000, 10_000, 100_000] {
        let keys = shuffled_keys(size);
        let (mut f, mut t) = build(&keys);
        let probes: Vec<u64> = keys.iter().copied().take(64).collect();

        group.bench_function(BenchmarkId::new("AvlForest", size), |b| {
            b.iter(|| {
                for key in &probes {
                    let Some(node) = f.get(&t, key) else { continue };
                    let mut right = f.split(&mut t, node, Side::Left).expect("live node");
                    f.merge(&mut t, &mut right);
                }
            });
        });
        f.clear(&mut t);
    }

    group.finish();
}

fn bench_aggregates(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregates");

    for size in [1_000, 10_000, 100_000] {
        let keys = shuffled_keys(size);
        let (mut f, mut t) = build(&keys);
        let n = size as u64;

        group.bench_function(BenchmarkId::new("range_sum", size), |b| {
            b.iter(|| black_box(f.range_sum::<u64>(&t, &(n / 4), &(3 * n / 4))));
        });

        group.bench_function(BenchmarkId::new("nth_smallest", size), |b| {
            b.iter(|| black_box(f.nth_smallest(&t, size / 3)));
        });
        f.clear(&mut t);
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_insert,
    bench_lookup,
    bench_split_merge,
    bench_aggregates
);
criterion_main!(benches);
