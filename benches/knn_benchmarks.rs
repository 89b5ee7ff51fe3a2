//! Benchmarks for KD-Tree construction and KNN search

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use kdsearch::{KdTree, KnnIndex, LinearScanIndex, Point, SplitPolicy, TreeConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

const DIMENSION: usize = 20;
const POLICIES: [SplitPolicy; 3] = [SplitPolicy::Random, SplitPolicy::MaxSpread, SplitPolicy::Incremental];

fn random_points(n: usize, seed: u64) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|id| Point::new(id, (0..DIMENSION).map(|_| rng.gen_range(-1.0..1.0)).collect()).unwrap())
        .collect()
}

/// Benchmark tree construction per split policy
fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("kdtree_build");
    group.measurement_time(Duration::from_secs(10));

    let points = random_points(10_000, 7);
    group.throughput(Throughput::Elements(points.len() as u64));
    for policy in POLICIES {
        let config = TreeConfig::new(policy, 7);
        group.bench_with_input(BenchmarkId::from_parameter(policy), &config, |b, config| {
            b.iter(|| black_box(KdTree::build(&points, DIMENSION, config).unwrap()));
        });
    }

    group.finish();
}

/// Benchmark KNN queries per split policy against a linear scan
fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("knn_search");

    let points = random_points(10_000, 11);
    let queries = random_points(100, 13);
    group.throughput(Throughput::Elements(queries.len() as u64));

    for policy in POLICIES {
        let tree = KdTree::build(&points, DIMENSION, &TreeConfig::new(policy, 11)).unwrap();
        group.bench_function(BenchmarkId::new("kdtree_k10", policy), |b| {
            b.iter(|| {
                for query in &queries {
                    black_box(tree.search_knn(query.coordinates(), 10).unwrap());
                }
            });
        });
    }

    let linear = LinearScanIndex::new(&points, DIMENSION).unwrap();
    group.bench_function("linear_scan_k10", |b| {
        b.iter(|| {
            for query in &queries {
                black_box(KnnIndex::search_knn(&linear, query.coordinates(), 10).unwrap());
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_build, bench_search);
criterion_main!(benches);
