use std::f64::consts::PI;

use num_complex::Complex64;

use crate::{smooth_root, Polynomial};

/// The `n`th roots of unity, and the polynomial `1 - x^n` that has them as
/// roots.
///
/// Seasonal differencing operators are of this form, and finding their
/// roots numerically loses the exact structure, so we build them directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnitRoots {
    n: usize,
}

impl UnitRoots {
    pub fn new(n: usize) -> UnitRoots {
        debug_assert!(n > 0, "there are no 0th roots of unity");
        UnitRoots { n }
    }

    pub fn degree(&self) -> usize {
        self.n
    }

    /// All `n` roots: `1` first, then conjugate pairs with the positive
    /// imaginary part first, then `-1` if `n` is even.
    pub fn roots(&self) -> Vec<Complex64> {
        let n = self.n;
        let mut roots = Vec::with_capacity(n);
        roots.push(Complex64::new(1.0, 0.0));
        for k in 1..=(n - 1) / 2 {
            let (sin, cos) = (2.0 * PI * k as f64 / n as f64).sin_cos();
            let z = smooth_root(Complex64::new(cos, sin));
            roots.push(z);
            roots.push(z.conj());
        }
        if n % 2 == 0 {
            roots.push(Complex64::new(-1.0, 0.0));
        }
        roots
    }

    /// `1 - x^n`, with its roots already known.
    pub fn polynomial(&self) -> Polynomial {
        let mut coeffs = vec![0.0; self.n + 1];
        coeffs[0] = 1.0;
        coeffs[self.n] = -1.0;
        Polynomial::from_vec(coeffs).with_roots(self.roots())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check_roots;

    #[test]
    fn small_orders() {
        assert_eq!(UnitRoots::new(1).roots(), vec![Complex64::new(1.0, 0.0)]);
        assert_eq!(UnitRoots::new(1).polynomial().coeffs(), &[1.0, -1.0]);
        assert_eq!(
            UnitRoots::new(4).roots(),
            vec![
                Complex64::new(1.0, 0.0),
                Complex64::new(0.0, 1.0),
                Complex64::new(0.0, -1.0),
                Complex64::new(-1.0, 0.0),
            ]
        );
    }

    #[test]
    fn monthly() {
        let u = UnitRoots::new(12);
        let p = u.polynomial();
        assert_eq!(p.degree(), 12);
        let roots = p.cached_roots().unwrap();
        assert_eq!(roots.len(), 12);
        assert_eq!(check_roots(&roots).unwrap(), roots.to_vec());
        for r in roots.iter() {
            assert!((r.norm() - 1.0).abs() <= 1e-15);
            assert!(p.eval_complex(*r).norm() <= 1e-14, "{r}");
        }
    }

    #[test]
    fn odd_orders_have_one_real_root() {
        let roots = UnitRoots::new(7).roots();
        assert_eq!(roots.len(), 7);
        assert_eq!(roots.iter().filter(|r| r.im == 0.0).count(), 1);
    }
}
