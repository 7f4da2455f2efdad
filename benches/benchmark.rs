//! Benchmark for the lattice evaluation of a Newton's method basin fractal.
//! This exercises the polynomial model, the per-point Newton iteration and
//! the parallel lattice loop together.
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use num::complex::Complex64;

use newton_basins::core::lattice::{LatticeAxis, SampleLattice};
use newton_basins::fractals::newtons_method::{IterationTransform, NewtonsMethodFractal};
use newton_basins::fractals::newtons_method_core::ConvergenceParams;

fn benchmark(c: &mut Criterion) {
    let roots = vec![
        Complex64::new(1.0, 0.0),
        Complex64::new(-1.0, 0.0),
        Complex64::new(0.0, 1.0),
        Complex64::new(0.0, -1.0),
    ];
    let fractal = NewtonsMethodFractal::new(roots, ConvergenceParams::default()).unwrap();
    let lattice = SampleLattice::new(
        LatticeAxis::new(-2.0, 2.0, 0.025),
        LatticeAxis::new(-2.0, 2.0, 0.025),
    )
    .unwrap();

    c.bench_function("roots_of_unity_4_plot", |b| {
        b.iter(|| black_box(fractal.plot(&lattice, IterationTransform::Log).unwrap()));
    });

    c.bench_function("roots_of_unity_4_classify", |b| {
        b.iter(|| black_box(fractal.classify(black_box(Complex64::new(0.31, 0.77)))));
    });
}

criterion_group!(benches, benchmark);
criterion_main!(benches);
