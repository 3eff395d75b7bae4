use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use contour_sieve::prelude::*;

/// Smooth bumps plus noise, so the tree has a realistic number of saddles.
fn bumpy_field(rows: usize, cols: usize, seed: u64) -> Vec<f64> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut values = Vec::with_capacity(rows * cols);
    for r in 0..rows {
        for c in 0..cols {
            let (x, y) = (r as f64 / 7.0, c as f64 / 5.0);
            values.push(x.sin() * y.cos() + 0.05 * rng.r#gen::<f64>());
        }
    }
    values
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("contour_tree");
    for &side in &[64usize, 128, 256] {
        let grid = FreudenthalGrid2D::new(side, side).unwrap();
        let field = bumpy_field(side, side, 42);

        let serial = ContourTreeMaker::with_executor(ContourTreeConfig::default(), SerialExecutor);
        group.bench_with_input(BenchmarkId::new("serial", side), &field, |b, field| {
            b.iter(|| serial.build(field, &grid).unwrap())
        });

        #[cfg(feature = "rayon")]
        {
            let rayon = ContourTreeMaker::with_executor(ContourTreeConfig::default(), RayonExecutor::new());
            group.bench_with_input(BenchmarkId::new("rayon", side), &field, |b, field| {
                b.iter(|| rayon.build(field, &grid).unwrap())
            });
        }

        let augmented = ContourTreeMaker::with_executor(
            ContourTreeConfig::default().with_augment(true),
            SerialExecutor,
        );
        group.bench_with_input(BenchmarkId::new("serial_augmented", side), &field, |b, field| {
            b.iter(|| augmented.build(field, &grid).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build);
criterion_main!(benches);
