//! Muller's method with Newton polishing and deflation.
//!
//! We find one root at a time with Muller's method, starting near zero so
//! that roots tend to come out in increasing order of magnitude (which keeps
//! deflation stable). Each real root is divided out as a linear factor and
//! each complex root, together with its conjugate, as a real quadratic
//! factor. Once the remaining factor has degree two or less, it is solved in
//! closed form. Finally, every root is polished with a few Newton steps
//! against the original polynomial.

use num_complex::Complex64;

use crate::quadratic::quadratic_roots;
use crate::{Polynomial, RootSolver};

const MAX_ITERATIONS: usize = 500;
const POLISH_STEPS: usize = 8;

/// A root whose imaginary part is this small (relative to its magnitude)
/// is taken to be real.
const REAL_TOLERANCE: f64 = 1e-8;

/// The default fast solver: complete factorization, assuming simple roots.
#[derive(Debug, Default)]
pub struct FastSolver {
    session: Session,
}

impl FastSolver {
    pub fn new() -> Self {
        FastSolver::default()
    }
}

impl RootSolver for FastSolver {
    fn clear(&mut self) {
        self.session.clear();
    }

    fn factorize(&mut self, p: &Polynomial) -> bool {
        self.session.run(p, |_, z| (z, 1))
    }

    fn remainder(&self) -> Polynomial {
        self.session.remainder()
    }

    fn roots(&self) -> &[Complex64] {
        &self.session.roots
    }
}

/// The state shared by our solvers: idle, or holding the result of one
/// factorization.
#[derive(Debug, Default)]
pub(crate) struct Session {
    busy: bool,
    roots: Vec<Complex64>,
    remainder: Option<Polynomial>,
}

impl Session {
    pub(crate) fn clear(&mut self) {
        self.busy = false;
        self.roots.clear();
        self.remainder = None;
    }

    pub(crate) fn remainder(&self) -> Polynomial {
        self.remainder.clone().unwrap_or_else(Polynomial::zero)
    }

    pub(crate) fn roots(&self) -> &[Complex64] {
        &self.roots
    }

    /// Factors `p`. The `multiplicity` callback gets the current deflated
    /// coefficients and a root of them, and returns a (possibly refined)
    /// root together with the number of times to divide it out.
    pub(crate) fn run(
        &mut self,
        p: &Polynomial,
        multiplicity: impl Fn(&[f64], Complex64) -> (Complex64, usize),
    ) -> bool {
        debug_assert!(!self.busy, "solver session reused without clear()");
        self.busy = true;

        if p.degree() == 0 {
            self.remainder = Some(p.clone());
            return true;
        }

        let mut work = p.coeffs().to_vec();
        while work.len() > 1 && work[0] == 0.0 {
            self.roots.push(Complex64::new(0.0, 0.0));
            work.remove(0);
        }

        while work.len() > 3 {
            let Some(z) = muller(&work) else {
                log::debug!(
                    "Muller iteration did not converge with {} roots left",
                    work.len() - 1
                );
                break;
            };
            let (z, m) = multiplicity(&work, polish(&work, z));
            let degree = work.len() - 1;

            if is_real(z) {
                let r = polish(&work, Complex64::new(z.re, 0.0)).re;
                for _ in 0..m.clamp(1, degree) {
                    work = deflate_linear(&work, r);
                    self.roots.push(Complex64::new(r, 0.0));
                }
            } else {
                let z = Complex64::new(z.re, z.im.abs());
                for _ in 0..m.clamp(1, degree / 2) {
                    work = deflate_quadratic(&work, z.re, z.norm_sqr());
                    self.roots.push(z);
                    self.roots.push(z.conj());
                }
            }
        }

        match work.len() {
            3 => {
                self.roots.extend(quadratic_roots(work[0], work[1], work[2]));
                work.drain(..2);
            }
            2 => {
                self.roots.push(Complex64::new(-work[0] / work[1], 0.0));
                work.remove(0);
            }
            _ => {}
        }

        polish_all(p.coeffs(), &mut self.roots);
        if self.roots.is_empty() {
            self.remainder = Some(p.clone());
            false
        } else {
            self.remainder = Some(Polynomial::from_vec(work));
            true
        }
    }
}

fn is_real(z: Complex64) -> bool {
    z.im.abs() <= REAL_TOLERANCE * z.norm().max(1.0)
}

pub(crate) fn horner(coeffs: &[f64], z: Complex64) -> Complex64 {
    let mut acc = Complex64::new(0.0, 0.0);
    for &c in coeffs.iter().rev() {
        acc = acc * z + c;
    }
    acc
}

/// Evaluates the polynomial and its derivative at once.
fn horner_with_deriv(coeffs: &[f64], z: Complex64) -> (Complex64, Complex64) {
    let mut val = Complex64::new(0.0, 0.0);
    let mut deriv = Complex64::new(0.0, 0.0);
    for &c in coeffs.iter().rev() {
        deriv = deriv * z + val;
        val = val * z + c;
    }
    (val, deriv)
}

/// Evaluates `sum |c_i| r^i`, the size of the largest value the terms of
/// the polynomial can sum to on the circle of radius `r`.
pub(crate) fn abs_horner(coeffs: &[f64], r: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, c| acc * r + c.abs())
}

/// A bound on the rounding error of evaluating the polynomial at `z`.
fn roundoff(coeffs: &[f64], z: Complex64) -> f64 {
    4.0 * f64::EPSILON * abs_horner(coeffs, z.norm())
}

fn muller(coeffs: &[f64]) -> Option<Complex64> {
    let f = |z| horner(coeffs, z);
    let mut x0 = Complex64::new(0.5, 0.0);
    let mut x1 = Complex64::new(-0.5, 0.0);
    let mut x2 = Complex64::new(0.0, 0.0);
    let (mut f0, mut f1, mut f2) = (f(x0), f(x1), f(x2));

    for _ in 0..MAX_ITERATIONS {
        let h1 = x1 - x0;
        let h2 = x2 - x1;
        let d1 = (f1 - f0) / h1;
        let d2 = (f2 - f1) / h2;
        let a = (d2 - d1) / (h2 + h1);
        let b = a * h2 + d2;
        let disc = (b * b - a * f2 * 4.0).sqrt();
        let den = if (b + disc).norm() >= (b - disc).norm() {
            b + disc
        } else {
            b - disc
        };
        let dx = if den.norm() == 0.0 {
            // Locally flat: take a step of the size of the current point.
            Complex64::new(1.0 + x2.norm(), 0.0)
        } else {
            f2 * -2.0 / den
        };

        let x3 = x2 + dx;
        if !x3.is_finite() {
            return None;
        }
        let f3 = f(x3);
        if f3.norm() <= roundoff(coeffs, x3) || dx.norm() <= 4.0 * f64::EPSILON * x3.norm() {
            return Some(x3);
        }

        (x0, x1, x2) = (x1, x2, x3);
        (f0, f1, f2) = (f1, f2, f3);
    }
    None
}

/// Improves `z` with Newton steps, as long as they reduce the residual.
pub(crate) fn polish(coeffs: &[f64], mut z: Complex64) -> Complex64 {
    let mut best = horner(coeffs, z).norm();
    for _ in 0..POLISH_STEPS {
        if best == 0.0 {
            break;
        }
        let (val, deriv) = horner_with_deriv(coeffs, z);
        if deriv.norm() == 0.0 {
            break;
        }
        let next = z - val / deriv;
        let next_val = horner(coeffs, next).norm();
        if !(next_val < best) {
            break;
        }
        z = next;
        best = next_val;
    }
    z
}

/// Polishes roots found on deflated polynomials against the original one.
///
/// Conjugate pairs are polished together, and steps that would move a
/// root far enough to jump to one of its neighbours are refused.
fn polish_all(coeffs: &[f64], roots: &mut [Complex64]) {
    let mut i = 0;
    while i < roots.len() {
        let z = roots[i];
        let polished = if z.im == 0.0 {
            Complex64::new(polish(coeffs, z).re, 0.0)
        } else {
            polish(coeffs, z)
        };
        let close = (polished - z).norm() <= 1e-6 * z.norm().max(1.0);
        if z.im == 0.0 {
            if close {
                roots[i] = polished;
            }
            i += 1;
        } else {
            // Complex roots are pushed as (z, conj z).
            if close && polished.im > 0.0 {
                roots[i] = polished;
                if i + 1 < roots.len() {
                    roots[i + 1] = polished.conj();
                }
            }
            i += 2;
        }
    }
}

/// Divides by `x - root`, dropping the remainder.
fn deflate_linear(coeffs: &[f64], root: f64) -> Vec<f64> {
    let mut acc = 0.0;
    let mut out = vec![0.0; coeffs.len() - 1];
    for (d, c) in out.iter_mut().zip(&coeffs[1..]).rev() {
        acc = acc * root + c;
        *d = acc;
    }
    out
}

/// Divides by `x^2 - 2 re x + norm_sqr`, dropping the remainder.
fn deflate_quadratic(coeffs: &[f64], re: f64, norm_sqr: f64) -> Vec<f64> {
    let p1 = -2.0 * re;
    let p0 = norm_sqr;
    let n = coeffs.len() - 1;
    let mut out = vec![0.0; n - 1];
    let (mut b1, mut b2) = (0.0, 0.0);
    for k in (0..n - 1).rev() {
        let bk = coeffs[k + 2] - p1 * b1 - p0 * b2;
        out[k] = bk;
        b2 = b1;
        b1 = bk;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(roots: &[Complex64]) -> Vec<Complex64> {
        let mut roots = roots.to_vec();
        roots.sort_by(|a, b| a.re.total_cmp(&b.re).then(a.im.total_cmp(&b.im)));
        roots
    }

    fn assert_close(found: &[Complex64], expected: &[Complex64], tol: f64) {
        let found = sorted(found);
        let expected = sorted(expected);
        assert_eq!(found.len(), expected.len(), "{found:?} vs {expected:?}");
        for (f, e) in found.iter().zip(&expected) {
            assert!((f - e).norm() <= tol, "{found:?} vs {expected:?}");
        }
    }

    #[test]
    fn deflation() {
        // (x - 1)(x - 2)(x - 3)
        let cubic = [-6.0, 11.0, -6.0, 1.0];
        assert_eq!(deflate_linear(&cubic, 1.0), vec![6.0, -5.0, 1.0]);
        // (x^2 + 1)(x - 2)
        let cubic = [-2.0, 1.0, -2.0, 1.0];
        assert_eq!(deflate_quadratic(&cubic, 0.0, 1.0), vec![-2.0, 1.0]);
    }

    #[test]
    fn smoke() {
        let p = Polynomial::of(&[-6.0, 11.0, -6.0, 1.0]);
        let mut solver = FastSolver::new();
        assert!(solver.factorize(&p));
        let expected = [1.0, 2.0, 3.0].map(|r| Complex64::new(r, 0.0));
        assert_close(solver.roots(), &expected, 1e-10);
        assert_eq!(solver.remainder().coeffs(), &[1.0]);

        solver.clear();
        let p = Polynomial::of(&[24.0, -50.0, 35.0, -10.0, 1.0]);
        assert!(solver.factorize(&p));
        let expected = [1.0, 2.0, 3.0, 4.0].map(|r| Complex64::new(r, 0.0));
        assert_close(solver.roots(), &expected, 1e-10);
    }

    #[test]
    fn complex_pairs() {
        // (x^2 + 1)(x^2 - 4x + 13)(x + 1)
        let roots = [
            Complex64::new(0.0, 1.0),
            Complex64::new(0.0, -1.0),
            Complex64::new(2.0, 3.0),
            Complex64::new(2.0, -3.0),
            Complex64::new(-1.0, 0.0),
        ];
        let p = Polynomial::of(Polynomial::from_complex_roots(&roots, 2.0).coeffs());
        let mut solver = FastSolver::new();
        assert!(solver.factorize(&p));
        assert_close(solver.roots(), &roots, 1e-9);
        assert_eq!(solver.remainder().coeffs(), &[2.0]);

        // Exact conjugates, so they survive pairing untouched.
        assert_eq!(crate::check_roots(solver.roots()).unwrap().len(), 5);
    }

    #[test]
    fn zero_roots_come_first() {
        let p = Polynomial::of(&[0.0, 0.0, -1.0, 1.0]);
        let mut solver = FastSolver::new();
        assert!(solver.factorize(&p));
        assert_eq!(solver.roots()[0], Complex64::new(0.0, 0.0));
        assert_eq!(solver.roots()[1], Complex64::new(0.0, 0.0));
        assert_close(
            solver.roots(),
            &[0.0, 0.0, 1.0].map(|r| Complex64::new(r, 0.0)),
            1e-12,
        );
    }

    #[test]
    fn constants_are_not_iterated() {
        let mut solver = FastSolver::new();
        assert!(solver.factorize(&Polynomial::value_of(3.0, &[])));
        assert!(solver.roots().is_empty());
        assert_eq!(solver.remainder().coeffs(), &[3.0]);
    }

    #[test]
    fn non_finite_coefficients_fail() {
        let p = Polynomial::of(&[1.0, f64::NAN, 2.0, 1.0]);
        let mut solver = FastSolver::new();
        assert!(!solver.factorize(&p));
        assert!(solver.roots().is_empty());
        assert!(solver.remainder().coeffs()[1].is_nan());
    }
}
