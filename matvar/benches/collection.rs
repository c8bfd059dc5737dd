//! Benchmarks for collection transfer and selection
//!
//! Run with: cargo bench --package matvar

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use matvar::{DenseMatrix, MatVar, SparseMatrix};

const ROWS: usize = 64;

/// Dense sources of random width 1..=16
fn dense_sources(rng: &mut StdRng, count: usize) -> Vec<DenseMatrix<f32>> {
    (0..count)
        .map(|_| {
            let cols = rng.gen_range(1..=16);
            let values = (0..ROWS * cols).map(|_| rng.gen::<f32>()).collect();
            DenseMatrix::from_column_major(ROWS, cols, values).unwrap()
        })
        .collect()
}

/// Sparse sources with roughly 5% density
fn sparse_sources(rng: &mut StdRng, count: usize) -> Vec<SparseMatrix<f32>> {
    (0..count)
        .map(|_| {
            let cols = rng.gen_range(1..=16);
            let triplets: Vec<_> = (0..ROWS * cols / 20)
                .map(|_| (rng.gen_range(0..ROWS), rng.gen_range(0..cols), rng.gen::<f32>() + 0.5))
                .collect();
            SparseMatrix::from_triplets(ROWS, cols, &triplets).unwrap()
        })
        .collect()
}

fn bench_transfer(c: &mut Criterion) {
    let mut group = c.benchmark_group("Transfer");
    let mut rng = StdRng::seed_from_u64(7);

    for &count in &[100, 1_000, 10_000] {
        let dense = dense_sources(&mut rng, count);
        let sparse = sparse_sources(&mut rng, count);

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("dense", count), &dense, |b, sources| {
            b.iter(|| {
                let mut mv = MatVar::new();
                mv.transfer_from(black_box(sources.clone()), None).unwrap();
                mv
            });
        });
        group.bench_with_input(BenchmarkId::new("sparse", count), &sparse, |b, sources| {
            b.iter(|| {
                let mut mv = MatVar::new();
                mv.transfer_from(black_box(sources.clone()), None).unwrap();
                mv
            });
        });
    }

    group.finish();
}

fn bench_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("Select");
    let mut rng = StdRng::seed_from_u64(11);

    for &count in &[1_000, 10_000] {
        let mut mv = MatVar::new();
        mv.transfer_from(dense_sources(&mut rng, count), None).unwrap();
        let picks: Vec<usize> = (0..count / 2).map(|_| rng.gen_range(0..count)).collect();

        group.throughput(Throughput::Elements(picks.len() as u64));
        group.bench_with_input(BenchmarkId::new("dense", count), &picks, |b, picks| {
            b.iter(|| mv.select(black_box(picks)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_transfer, bench_select);
criterion_main!(benches);
