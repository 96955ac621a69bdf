use charpoly::{Polynomial, SolverConfig, Strategy, UnitRoots};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

pub fn roots(c: &mut Criterion) {
    let config = SolverConfig::default();
    let mut group = c.benchmark_group("roots");

    // (x - 1)(x - 2)(x - 3)(x - 4)
    let quartic = [24.0, -50.0, 35.0, -10.0, 1.0];
    for strategy in [Strategy::Fast, Strategy::Robust] {
        group.bench_function(format!("quartic {strategy:?}"), |b| {
            b.iter(|| {
                let p = Polynomial::of(black_box(&quartic));
                p.roots_using(&config, strategy.clone())
            })
        });
    }

    // 1 - x^12, without the known roots.
    let seasonal = UnitRoots::new(12).polynomial();
    let seasonal = seasonal.coeffs().to_vec();
    group.bench_function("seasonal", |b| {
        b.iter(|| Polynomial::of(black_box(&seasonal)).roots())
    });

    // (x - 1)^3 (x + 2)
    let repeated = Polynomial::of(&[-2.0, 5.0, -3.0, -1.0, 1.0]);
    group.bench_function("repeated root session", |b| {
        let mut solver = config.robust_solver();
        b.iter(|| {
            solver.clear();
            solver.factorize(black_box(&repeated))
        })
    });
}

criterion_group!(benches, roots);
criterion_main!(benches);
