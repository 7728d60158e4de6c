use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use pool_bintree::{BinTree, PoolConfig};
use std::collections::BTreeSet;
use std::hint::black_box;

const N: usize = 10_000;

// Sorted input turns the tree into a list, so every insert walks all earlier values.
const ORDERED_N: usize = 1_000;

// ─── Helper functions to generate value sequences ───────────────────────────

fn random_values(n: usize) -> Vec<i64> {
    // Use a simple LCG for deterministic pseudo-random sequence
    let mut values = Vec::with_capacity(n);
    let mut x: u64 = 12345;
    for _ in 0..n {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        values.push((x >> 33) as i64);
    }
    values
}

// ─── Insert Benchmarks ──────────────────────────────────────────────────────

fn bench_insert_random(c: &mut Criterion) {
    let values = random_values(N);
    let mut group = c.benchmark_group("insert_random");

    group.bench_function(BenchmarkId::new("BinTree", N), |b| {
        b.iter(|| {
            let mut tree = BinTree::new();
            for &v in &values {
                tree.insert(v).unwrap();
            }
            tree
        });
    });

    for capacity in [16, 256, 4096] {
        group.bench_function(BenchmarkId::new("BinTree/block_capacity", capacity), |b| {
            b.iter(|| {
                let mut tree = BinTree::with_config(PoolConfig::new().block_capacity(capacity));
                for &v in &values {
                    tree.insert(v).unwrap();
                }
                tree
            });
        });
    }

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter(|| {
            let mut set = BTreeSet::new();
            for &v in &values {
                set.insert(v);
            }
            set
        });
    });

    group.finish();
}

fn bench_insert_ordered(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_ordered");

    group.bench_function(BenchmarkId::new("BinTree", ORDERED_N), |b| {
        b.iter(|| {
            let mut tree = BinTree::new();
            for v in 0..ORDERED_N as i64 {
                tree.insert(v).unwrap();
            }
            tree
        });
    });

    group.bench_function(BenchmarkId::new("BinTree/hinted", ORDERED_N), |b| {
        b.iter(|| {
            let mut tree = BinTree::new();
            tree.insert(0i64).unwrap();
            for v in 1..ORDERED_N as i64 {
                let hint = tree.max_value().map(|max| *max).ok();
                let hint = hint.and_then(|max| tree.find(&max).hint());
                match hint {
                    Some(hint) => tree.insert_with_hint(hint, v).unwrap(),
                    None => tree.insert(v).unwrap(),
                };
            }
            tree
        });
    });

    group.bench_function(BenchmarkId::new("BTreeSet", ORDERED_N), |b| {
        b.iter(|| {
            let mut set = BTreeSet::new();
            for v in 0..ORDERED_N as i64 {
                set.insert(v);
            }
            set
        });
    });

    group.finish();
}

// ─── Lookup Benchmarks ──────────────────────────────────────────────────────

fn bench_contains_random(c: &mut Criterion) {
    let values = random_values(N);
    let tree: BinTree<i64> = values.iter().copied().collect();
    let set: BTreeSet<i64> = values.iter().copied().collect();

    let mut group = c.benchmark_group("contains_random");

    group.bench_function(BenchmarkId::new("BinTree", N), |b| {
        b.iter(|| values.iter().filter(|v| tree.contains(v)).count());
    });

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter(|| values.iter().filter(|v| set.contains(v)).count());
    });

    group.finish();
}

// ─── Remove Benchmarks ──────────────────────────────────────────────────────

fn bench_remove_random(c: &mut Criterion) {
    let values = random_values(N);
    let tree: BinTree<i64> = values.iter().copied().collect();
    let set: BTreeSet<i64> = values.iter().copied().collect();

    let mut group = c.benchmark_group("remove_random");

    group.bench_function(BenchmarkId::new("BinTree", N), |b| {
        b.iter_batched(
            || tree.clone(),
            |mut tree| {
                for v in &values {
                    tree.remove(v);
                }
                tree
            },
            criterion::BatchSize::LargeInput,
        );
    });

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter_batched(
            || set.clone(),
            |mut set| {
                for v in &values {
                    set.remove(v);
                }
                set
            },
            criterion::BatchSize::LargeInput,
        );
    });

    group.finish();
}

// ─── Traversal Benchmarks ───────────────────────────────────────────────────

fn bench_traversal(c: &mut Criterion) {
    let values = random_values(N);
    let tree: BinTree<i64> = values.iter().copied().collect();
    let set: BTreeSet<i64> = values.iter().copied().collect();

    let mut group = c.benchmark_group("traversal");

    group.bench_function(BenchmarkId::new("BinTree/in_order", N), |b| {
        b.iter(|| {
            let mut sum = 0i64;
            tree.in_order(|v| sum = sum.wrapping_add(*v));
            black_box(sum)
        });
    });

    group.bench_function(BenchmarkId::new("BinTree/post_order", N), |b| {
        b.iter(|| {
            let mut sum = 0i64;
            tree.post_order(|v| sum = sum.wrapping_add(*v));
            black_box(sum)
        });
    });

    group.bench_function(BenchmarkId::new("BinTree/iter", N), |b| {
        b.iter(|| tree.iter().fold(0i64, |sum, v| sum.wrapping_add(*v)));
    });

    group.bench_function(BenchmarkId::new("BinTree/iter_rev", N), |b| {
        b.iter(|| tree.iter().rev().fold(0i64, |sum, v| sum.wrapping_add(*v)));
    });

    group.bench_function(BenchmarkId::new("BTreeSet/iter", N), |b| {
        b.iter(|| set.iter().fold(0i64, |sum, v| sum.wrapping_add(*v)));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_insert_random,
    bench_insert_ordered,
    bench_contains_random,
    bench_remove_random,
    bench_traversal,
);
criterion_main!(benches);
