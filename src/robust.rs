use num_complex::Complex64;

use crate::fast::{abs_horner, horner, polish, Session};
use crate::{Polynomial, RootSolver};

/// A root is taken to be a root of the next derivative as well when the
/// derivative's value there is this small, relative to the size of its
/// terms.
const MULTIPLICITY_TOLERANCE: f64 = 1e-4;

/// A solver that copes with multiple and nearly-multiple roots.
///
/// It runs the same iteration as [`FastSolver`](crate::FastSolver), but
/// after finding each root it checks the successive derivatives: a root of
/// multiplicity `m` is a root of the first `m - 1` derivatives, and a
/// simple root of the last of them. We refine the root on that derivative,
/// where Newton's method converges quickly, and divide it out `m` times.
#[derive(Debug, Default)]
pub struct RobustSolver {
    session: Session,
}

impl RobustSolver {
    pub fn new() -> Self {
        RobustSolver::default()
    }
}

impl RootSolver for RobustSolver {
    fn clear(&mut self) {
        self.session.clear();
    }

    fn factorize(&mut self, p: &Polynomial) -> bool {
        self.session.run(p, multiplicity)
    }

    fn remainder(&self) -> Polynomial {
        self.session.remainder()
    }

    fn roots(&self) -> &[Complex64] {
        self.session.roots()
    }
}

fn derivative(coeffs: &[f64]) -> Vec<f64> {
    coeffs
        .iter()
        .enumerate()
        .skip(1)
        .map(|(i, c)| c * i as f64)
        .collect()
}

/// Estimates the multiplicity of the root `z` of `coeffs`, returning `z`
/// refined on the highest derivative it is a root of.
fn multiplicity(coeffs: &[f64], z: Complex64) -> (Complex64, usize) {
    let mut m = 1;
    let mut last = coeffs.to_vec();
    let mut deriv = derivative(&last);
    while deriv.len() > 1 {
        let val = horner(&deriv, z).norm();
        if val > MULTIPLICITY_TOLERANCE * abs_horner(&deriv, z.norm()) {
            break;
        }
        m += 1;
        last = deriv;
        deriv = derivative(&last);
    }

    if m == 1 {
        (z, 1)
    } else {
        log::debug!("root {z} has multiplicity {m}");
        (polish(&last, z), m)
    }
}
