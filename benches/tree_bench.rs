//! Benchmarks for the ordered tree containers
//!
//! Compares the red-black tree map and set against the standard library's
//! B-tree collections on insertion, lookup and in-order traversal.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::collections::{BTreeMap, BTreeSet};

use arbora::{TreeMap, TreeSet};

const SIZES: &[usize] = &[1_000, 10_000];

/// Pseudo-random key sequence, deterministic across runs.
fn shuffled_keys(n: usize) -> Vec<u64> {
    let mut state = 0x9e3779b97f4a7c15u64;
    (0..n)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state
        })
        .collect()
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    for &size in SIZES {
        let keys = shuffled_keys(size);

        group.bench_with_input(BenchmarkId::new("TreeMap", size), &keys, |b, keys| {
            b.iter(|| {
                let mut map = TreeMap::new();
                for &key in keys {
                    map.insert(key, key).unwrap();
                }
                black_box(map.len())
            })
        });

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &keys, |b, keys| {
            b.iter(|| {
                let mut map = BTreeMap::new();
                for &key in keys {
                    map.insert(key, key);
                }
                black_box(map.len())
            })
        });
    }
    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");
    for &size in SIZES {
        let keys = shuffled_keys(size);
        let map: TreeMap<u64, u64> = keys.iter().map(|&k| (k, k)).collect();
        let std_map: BTreeMap<u64, u64> = keys.iter().map(|&k| (k, k)).collect();

        group.bench_with_input(BenchmarkId::new("TreeMap", size), &keys, |b, keys| {
            b.iter(|| {
                let mut hits = 0usize;
                for key in keys {
                    if map.get(key).is_some() {
                        hits += 1;
                    }
                }
                black_box(hits)
            })
        });

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &keys, |b, keys| {
            b.iter(|| {
                let mut hits = 0usize;
                for key in keys {
                    if std_map.get(key).is_some() {
                        hits += 1;
                    }
                }
                black_box(hits)
            })
        });
    }
    group.finish();
}

fn bench_iterate(c: &mut Criterion) {
    let mut group = c.benchmark_group("iterate");
    for &size in SIZES {
        let keys = shuffled_keys(size);
        let set: TreeSet<u64> = keys.iter().copied().collect();
        let std_set: BTreeSet<u64> = keys.iter().copied().collect();

        group.bench_with_input(BenchmarkId::new("TreeSet", size), &set, |b, set| {
            b.iter(|| black_box(set.iter().sum::<u64>()))
        });

        group.bench_with_input(BenchmarkId::new("BTreeSet", size), &std_set, |b, set| {
            b.iter(|| black_box(set.iter().sum::<u64>()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_insert, bench_lookup, bench_iterate);
criterion_main!(benches);
