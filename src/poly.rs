use std::fmt;
use std::sync::{Arc, OnceLock};

use num_complex::Complex64;

use crate::cache::RootCache;
use crate::division::Division;
use crate::solver::{RootSolver, SolverConfig, Strategy};
use crate::{registry, Error, Result, EPSILON};

/// An immutable real polynomial of dynamic degree.
///
/// The coefficients are always in canonical form: there are no trailing
/// coefficients with absolute value at most [`EPSILON`], except that the
/// zero polynomial keeps a single `0.0`. Every operation returns a new
/// polynomial. The only interior mutability is the root cache, which is
/// filled in on the first call to [`Polynomial::roots`] and never
/// invalidated afterwards.
#[derive(Clone, Debug)]
pub struct Polynomial {
    /// Coefficients in increasing order of degree.
    ///
    /// For example, `coeffs[0]` is the constant term.
    coeffs: Arc<[f64]>,
    roots: RootCache,
}

/// Removes trailing near-zero coefficients, keeping at least one.
pub(crate) fn canonicalize(coeffs: &mut Vec<f64>) {
    while coeffs.len() > 1 && coeffs.last().is_some_and(|c| c.abs() <= EPSILON) {
        coeffs.pop();
    }
    if coeffs.is_empty() {
        coeffs.push(0.0);
    }
}

impl Polynomial {
    /// Builds `p0 + p[0] x + p[1] x^2 + ...`.
    pub fn value_of(p0: f64, p: &[f64]) -> Polynomial {
        let mut coeffs = Vec::with_capacity(p.len() + 1);
        coeffs.push(p0);
        coeffs.extend_from_slice(p);
        Polynomial::from_vec(coeffs)
    }

    /// Constructs a polynomial from a copy of the given coefficients.
    ///
    /// The first coefficient provided will be the constant term, the second
    /// will be the linear term, and so on.
    pub fn of(coeffs: &[f64]) -> Polynomial {
        Polynomial::from_vec(coeffs.to_vec())
    }

    /// Like [`Polynomial::of`], but takes ownership of the coefficients.
    pub fn from_vec(mut coeffs: Vec<f64>) -> Polynomial {
        debug_assert!(!coeffs.is_empty(), "a polynomial needs a coefficient");
        canonicalize(&mut coeffs);
        let roots = if coeffs.len() == 1 {
            RootCache::with(Arc::from(Vec::new()))
        } else {
            RootCache::empty()
        };
        Polynomial {
            coeffs: coeffs.into(),
            roots,
        }
    }

    /// The zero polynomial, `[0]`.
    pub fn zero() -> Polynomial {
        static ZERO: OnceLock<Polynomial> = OnceLock::new();
        ZERO.get_or_init(|| Polynomial::from_vec(vec![0.0])).clone()
    }

    /// The constant polynomial `[1]`.
    pub fn one() -> Polynomial {
        static ONE: OnceLock<Polynomial> = OnceLock::new();
        ONE.get_or_init(|| Polynomial::from_vec(vec![1.0])).clone()
    }

    /// Builds `scale * (x - roots[0]) * (x - roots[1]) * ...`.
    ///
    /// The product is computed over the complex numbers and then projected
    /// onto its real parts, so the result only makes sense if every complex
    /// root comes with its conjugate. The given roots become the root cache
    /// of the result.
    pub fn from_complex_roots(roots: &[Complex64], scale: f64) -> Polynomial {
        let mut c = vec![Complex64::new(0.0, 0.0); roots.len() + 1];
        c[0] = Complex64::new(1.0, 0.0);
        for (n, &r) in roots.iter().enumerate() {
            // Multiply the degree-n polynomial in c[..=n] by (x - r).
            for i in (1..=n + 1).rev() {
                c[i] = c[i - 1] - r * c[i];
            }
            c[0] = -r * c[0];
        }

        let p = Polynomial::from_vec(c.iter().map(|z| z.re * scale).collect());
        if p.degree() == roots.len() {
            p.roots.store(Arc::from(roots));
        }
        p
    }

    /// Attaches a known root set to this polynomial.
    ///
    /// The roots are trusted as given: nothing checks that they are roots,
    /// or that there are `degree()` of them.
    pub fn with_roots(self, roots: impl Into<Arc<[Complex64]>>) -> Polynomial {
        self.roots.store(roots.into());
        self
    }

    /// The coefficients of this polynomial.
    ///
    /// In the returned slice, the coefficient of `x^i` is at index `i`.
    pub fn coeffs(&self) -> &[f64] {
        &self.coeffs
    }

    /// The coefficient of `x^i`, which is zero for `i > self.degree()`.
    pub fn get(&self, i: usize) -> f64 {
        self.coeffs.get(i).copied().unwrap_or(0.0)
    }

    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    /// The coefficient of the highest power.
    pub fn leading(&self) -> f64 {
        self.coeffs[self.coeffs.len() - 1]
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.len() == 1 && self.coeffs[0].abs() <= EPSILON
    }

    pub fn is_identity(&self) -> bool {
        self.coeffs.len() == 1 && self.coeffs[0] == 1.0
    }

    /// Returns the largest absolute value of any coefficient.
    pub fn magnitude(&self) -> f64 {
        self.coeffs.iter().fold(0.0f64, |m, c| m.max(c.abs()))
    }

    /// Are all the coefficients finite?
    pub fn is_finite(&self) -> bool {
        self.coeffs.iter().all(|c| c.is_finite())
    }

    /// Returns the polynomial that's the derivative of this polynomial.
    pub fn deriv(&self) -> Polynomial {
        if self.degree() == 0 {
            return Polynomial::zero();
        }
        Polynomial::from_vec(
            self.coeffs
                .iter()
                .enumerate()
                .skip(1)
                .map(|(i, c)| c * i as f64)
                .collect(),
        )
    }

    /// Evaluates this polynomial at a point.
    pub fn eval(&self, x: f64) -> f64 {
        let mut acc = 0.0;
        for c in self.coeffs.iter().rev() {
            acc = acc * x + c;
        }
        acc
    }

    /// Evaluates this polynomial at a complex point.
    pub fn eval_complex(&self, z: Complex64) -> Complex64 {
        let mut acc = Complex64::new(0.0, 0.0);
        for &c in self.coeffs.iter().rev() {
            acc = acc * z + c;
        }
        acc
    }

    /// Evaluates `c_0 + sum c_i e^{i k w}`, the frequency response of the
    /// coefficient filter at angular frequency `w`.
    pub fn eval_at_frequency(&self, w: f64) -> Complex64 {
        let mut re = self.coeffs[0];
        let mut im = 0.0;
        for (k, c) in self.coeffs.iter().enumerate().skip(1) {
            let (sin, cos) = (k as f64 * w).sin_cos();
            re += c * cos;
            im += c * sin;
        }
        Complex64::new(re, im)
    }

    /// Adds a constant. The roots are not carried over.
    pub fn shift(&self, d: f64) -> Polynomial {
        let mut coeffs = self.coeffs.to_vec();
        coeffs[0] += d;
        Polynomial::from_vec(coeffs)
    }

    /// Multiplies by a constant. The roots are unchanged by a nonzero scale,
    /// so a cached root set is carried over.
    pub fn scale(&self, d: f64) -> Polynomial {
        if d == 0.0 {
            return Polynomial::zero();
        }
        let p = Polynomial::from_vec(self.coeffs.iter().map(|c| c * d).collect());
        if let Some(roots) = self.roots.get() {
            if p.degree() == self.degree() {
                p.roots.store(roots);
            }
        }
        p
    }

    fn zip_with(&self, other: &Polynomial, f: impl Fn(f64, f64) -> f64) -> Polynomial {
        let n = self.coeffs.len().max(other.coeffs.len());
        Polynomial::from_vec((0..n).map(|i| f(self.get(i), other.get(i))).collect())
    }

    pub fn plus(&self, other: &Polynomial) -> Polynomial {
        self.zip_with(other, |a, b| a + b)
    }

    pub fn minus(&self, other: &Polynomial) -> Polynomial {
        self.zip_with(other, |a, b| a - b)
    }

    /// Multiplies two polynomials.
    ///
    /// If both factors already know their roots, the product's roots are the
    /// concatenation of the two root sets. Otherwise, the roots are computed
    /// with the default fast solver if `compute_roots` is set, and left
    /// unknown if not.
    pub fn times(&self, other: &Polynomial, compute_roots: bool) -> Polynomial {
        if self.is_zero() || other.is_zero() {
            return Polynomial::zero();
        }
        if self.is_identity() {
            return other.clone();
        }
        if other.is_identity() {
            return self.clone();
        }

        let mut coeffs = vec![0.0; self.coeffs.len() + other.coeffs.len() - 1];
        for (i, c) in self.coeffs.iter().enumerate() {
            for (j, d) in other.coeffs.iter().enumerate() {
                coeffs[i + j] += c * d;
            }
        }
        let p = Polynomial::from_vec(coeffs);

        if let (Some(r1), Some(r2)) = (self.roots.get(), other.roots.get()) {
            if r1.len() + r2.len() == p.degree() {
                let roots: Vec<Complex64> = r1.iter().chain(r2.iter()).copied().collect();
                p.roots.store(roots.into());
            }
        } else if compute_roots {
            p.roots();
        }
        p
    }

    fn product(&self, other: &Polynomial) -> Polynomial {
        self.times(other, false)
    }

    /// The quotient of long division by `other`, ignoring the remainder.
    pub fn divide(&self, other: &Polynomial) -> Polynomial {
        Division::new(self, other).into_parts().0
    }

    /// Long division by `other`, keeping both quotient and remainder.
    pub fn div_rem(&self, other: &Polynomial) -> Division {
        Division::new(self, other)
    }

    /// Like [`Polynomial::div_rem`], but fails instead of producing
    /// non-finite coefficients when `other` is zero.
    pub fn checked_div(&self, other: &Polynomial) -> Result<Division> {
        if other.is_zero() {
            return Err(Error::DivisionByZero);
        }
        Ok(Division::new(self, other))
    }

    /// The roots of this polynomial, computed with the default fast solver
    /// on first access.
    ///
    /// Returns `None` if the solver fails, which means that the roots are
    /// unknown. A constant polynomial has no roots, which is `Some` of an
    /// empty slice.
    pub fn roots(&self) -> Option<Arc<[Complex64]>> {
        self.roots_with(None)
    }

    /// The roots of this polynomial, computed with `solver` on first access
    /// (or the default fast solver if `solver` is `None`).
    pub fn roots_with(&self, solver: Option<&mut dyn RootSolver>) -> Option<Arc<[Complex64]>> {
        if let Some(roots) = self.roots.get() {
            return Some(roots);
        }
        match solver {
            Some(solver) => self.solve(solver),
            None => self.solve(registry::fast_solver().as_mut()),
        }
    }

    /// The roots of this polynomial, computed on first access by a fresh
    /// session of `strategy` taken from `config`.
    pub fn roots_using(
        &self,
        config: &SolverConfig,
        strategy: Strategy,
    ) -> Option<Arc<[Complex64]>> {
        if let Some(roots) = self.roots.get() {
            return Some(roots);
        }
        self.solve(config.solver(strategy).as_mut())
    }

    /// The cached roots, if they are known, without computing anything.
    pub fn cached_roots(&self) -> Option<Arc<[Complex64]>> {
        self.roots.get()
    }

    fn solve(&self, solver: &mut dyn RootSolver) -> Option<Arc<[Complex64]>> {
        solver.clear();
        if !solver.factorize(self) {
            log::debug!("root solver failed on a polynomial of degree {}", self.degree());
            return None;
        }

        let roots: Arc<[Complex64]> = Arc::from(solver.roots());
        if roots.len() == self.degree() {
            self.roots.store(Arc::clone(&roots));
        } else {
            // Partial factorizations are returned but not remembered, so a
            // better solver gets a chance next time.
            log::debug!(
                "root solver found {} of {} roots; leaving the cache empty",
                roots.len(),
                self.degree()
            );
        }
        Some(roots)
    }

    /// Rounds every coefficient that is within [`EPSILON`] of an integer.
    pub fn smooth(&self) -> Polynomial {
        Polynomial::from_vec(
            self.coeffs
                .iter()
                .map(|&c| {
                    let r = c.round();
                    // Adding zero turns -0.0 into 0.0.
                    if (c - r).abs() <= EPSILON { r + 0.0 } else { c }
                })
                .collect(),
        )
    }

    /// Coefficient-wise equality up to `epsilon`. Polynomials of different
    /// degrees are never equal.
    pub fn approx_eq(&self, other: &Polynomial, epsilon: f64) -> bool {
        self.coeffs.len() == other.coeffs.len()
            && self
                .coeffs
                .iter()
                .zip(other.coeffs.iter())
                .all(|(a, b)| (a - b).abs() <= epsilon)
    }

    /// Renders the polynomial as a signed list of terms in the variable
    /// `var`, optionally [smoothing](Polynomial::smooth) it first.
    pub fn format(&self, var: &str, smooth: bool) -> String {
        let p = if smooth { self.smooth() } else { self.clone() };
        let mut out = String::new();
        for (i, &c) in p.coeffs.iter().enumerate() {
            if c == 0.0 {
                continue;
            }
            let a = c.abs();
            if out.is_empty() {
                if c < 0.0 {
                    out.push('-');
                }
            } else {
                out.push_str(if c < 0.0 { " - " } else { " + " });
            }
            if a != 1.0 || i == 0 {
                out.push_str(&a.to_string());
                if i > 0 {
                    out.push(' ');
                }
            }
            match i {
                0 => {}
                1 => out.push_str(var),
                _ => out.push_str(&format!("{var}^{i}")),
            }
        }
        if out.is_empty() {
            out.push('0');
        }
        out
    }
}

impl PartialEq for Polynomial {
    fn eq(&self, other: &Polynomial) -> bool {
        self.coeffs == other.coeffs
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format("x", f.alternate()))
    }
}

impl From<Vec<f64>> for Polynomial {
    fn from(coeffs: Vec<f64>) -> Polynomial {
        Polynomial::from_vec(coeffs)
    }
}

macro_rules! impl_poly_binop {
    ($Trait:ident, $method:ident, $inherent:ident) => {
        impl std::ops::$Trait<&Polynomial> for &Polynomial {
            type Output = Polynomial;

            fn $method(self, rhs: &Polynomial) -> Polynomial {
                self.$inherent(rhs)
            }
        }

        impl std::ops::$Trait<Polynomial> for &Polynomial {
            type Output = Polynomial;

            fn $method(self, rhs: Polynomial) -> Polynomial {
                self.$inherent(&rhs)
            }
        }

        impl std::ops::$Trait<&Polynomial> for Polynomial {
            type Output = Polynomial;

            fn $method(self, rhs: &Polynomial) -> Polynomial {
                (&self).$inherent(rhs)
            }
        }

        impl std::ops::$Trait<Polynomial> for Polynomial {
            type Output = Polynomial;

            fn $method(self, rhs: Polynomial) -> Polynomial {
                (&self).$inherent(&rhs)
            }
        }
    };
}

impl_poly_binop!(Add, add, plus);
impl_poly_binop!(Sub, sub, minus);
impl_poly_binop!(Mul, mul, product);
impl_poly_binop!(Div, div, divide);

macro_rules! impl_scalar_op {
    ($Trait:ident, $method:ident, |$p:ident, $d:ident| $body:expr) => {
        impl std::ops::$Trait<f64> for &Polynomial {
            type Output = Polynomial;

            fn $method(self, $d: f64) -> Polynomial {
                let $p = self;
                $body
            }
        }

        impl std::ops::$Trait<f64> for Polynomial {
            type Output = Polynomial;

            fn $method(self, $d: f64) -> Polynomial {
                let $p = &self;
                $body
            }
        }
    };
}

impl_scalar_op!(Add, add, |p, d| p.shift(d));
impl_scalar_op!(Sub, sub, |p, d| p.shift(-d));
impl_scalar_op!(Mul, mul, |p, d| p.scale(d));
impl_scalar_op!(Div, div, |p, d| p.scale(1.0 / d));

impl std::ops::Neg for &Polynomial {
    type Output = Polynomial;

    fn neg(self) -> Polynomial {
        self.scale(-1.0)
    }
}

impl std::ops::Neg for Polynomial {
    type Output = Polynomial;

    fn neg(self) -> Polynomial {
        self.scale(-1.0)
    }
}
