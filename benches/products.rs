use charpoly::{Polynomial, Simplifier, UnitRoots};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

pub fn products(c: &mut Criterion) {
    let ar = Polynomial::of(&[1.0, -0.6, 0.2]);
    let seasonal = UnitRoots::new(12).polynomial();

    c.bench_function("product with known roots", |b| {
        b.iter(|| black_box(&ar).times(black_box(&seasonal), false))
    });
    c.bench_function("product computing roots", |b| {
        b.iter(|| Polynomial::of(black_box(ar.coeffs())).times(black_box(&seasonal), true))
    });
    c.bench_function("division", |b| {
        let product = &ar * &seasonal;
        b.iter(|| black_box(&product).div_rem(black_box(&seasonal)))
    });

    let simplifier = Simplifier::default();
    // (x - 1)(x - 2)(x^2 + 1)
    let left = Polynomial::of(&[2.0, -3.0, 3.0, -3.0, 1.0]);
    c.bench_function("simplify", |b| {
        b.iter(|| simplifier.simplify(black_box(&left), black_box(&seasonal)))
    });
}

criterion_group!(benches, products);
criterion_main!(benches);
