use num_complex::Complex64;

use crate::fast::horner;
use crate::{
    divide_coefficients, registry, Division, Polynomial, SolverConfig, Strategy,
    EPSILON, ROOT_TOLERANCE,
};

/// Two polynomials with a common factor taken out.
///
/// The inputs are recovered (up to rounding) as `left * common` and
/// `right * common`.
#[derive(Clone, Debug)]
pub struct Simplification {
    pub common: Polynomial,
    pub left: Polynomial,
    pub right: Polynomial,
}

impl Simplification {
    fn swap(self) -> Simplification {
        Simplification {
            common: self.common,
            left: self.right,
            right: self.left,
        }
    }
}

/// Finds common factors of two polynomials.
///
/// This is an approximate GCD by deflation, not a Euclidean algorithm: it
/// first tries exact division of the higher-degree polynomial by the other
/// one, and then divides out the roots of the lower-degree polynomial that
/// are also roots (up to [`ROOT_TOLERANCE`]) of the higher-degree one. The
/// answer is only as good as the root solver.
#[derive(Clone, Debug)]
pub struct Simplifier {
    config: SolverConfig,
}

impl Default for Simplifier {
    fn default() -> Self {
        Simplifier::new(registry::config())
    }
}

impl Simplifier {
    pub fn new(config: SolverConfig) -> Self {
        Simplifier { config }
    }

    /// Takes the common factor out of `left` and `right`.
    ///
    /// Returns `None` if there is no common factor of positive degree, or if
    /// the roots of the lower-degree polynomial can't be found.
    pub fn simplify(&self, left: &Polynomial, right: &Polynomial) -> Option<Simplification> {
        if left.degree() < right.degree() {
            return self.simplify(right, left).map(Simplification::swap);
        }
        if right.is_zero() || right.degree() == 0 {
            return None;
        }

        let division = Division::new(left, right);
        if division.is_exact_within(EPSILON * left.magnitude().max(1.0)) {
            return Some(Simplification {
                common: right.clone(),
                left: division.into_parts().0,
                right: Polynomial::one(),
            });
        }

        let roots = right.roots_using(&self.config, Strategy::Fast)?;
        self.simplify_with_roots(left, right, &roots)
    }

    /// Divides out of `left` every root in `roots` that is also a root of
    /// `left`, where `roots` are (some of) the roots of `right`.
    ///
    /// Complex roots are handled through their real quadratic factor, so of
    /// each conjugate pair only the member with positive imaginary part is
    /// looked at.
    pub fn simplify_with_roots(
        &self,
        left: &Polynomial,
        right: &Polynomial,
        roots: &[Complex64],
    ) -> Option<Simplification> {
        let mut remaining = left.coeffs().to_vec();
        let mut common_roots = Vec::new();

        for &r in roots {
            if r.im < 0.0 {
                continue;
            }
            let residual = horner(&remaining, r).norm();
            if residual.is_nan() || residual >= ROOT_TOLERANCE {
                continue;
            }

            let factor = if r.im == 0.0 {
                vec![-r.re, 1.0]
            } else {
                vec![r.norm_sqr(), -2.0 * r.re, 1.0]
            };
            if remaining.len() < factor.len() {
                continue;
            }
            log::trace!("dividing out common root {r}");
            remaining = divide_coefficients(&remaining, &factor);
            common_roots.push(r);
            if r.im != 0.0 {
                common_roots.push(r.conj());
            }
        }

        if common_roots.is_empty() {
            return None;
        }
        let common = Polynomial::from_complex_roots(&common_roots, 1.0);
        Some(Simplification {
            left: Polynomial::from_vec(remaining),
            right: right.divide(&common),
            common,
        })
    }
}
