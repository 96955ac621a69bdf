use crate::{Polynomial, EPSILON};

/// The result of long division of one polynomial by another.
#[derive(Clone, Debug)]
pub struct Division {
    quotient: Polynomial,
    remainder: Polynomial,
}

impl Division {
    /// Divides `numerator` by `denominator`, which should not be zero.
    ///
    /// If the denominator has the higher degree, the quotient is zero and
    /// the remainder is the numerator. Otherwise the quotient has degree
    /// `n - m` and the remainder has degree less than `m`.
    pub fn new(numerator: &Polynomial, denominator: &Polynomial) -> Division {
        let n = numerator.degree();
        let m = denominator.degree();
        if m > n {
            return Division {
                quotient: Polynomial::zero(),
                remainder: numerator.clone(),
            };
        }

        let den = denominator.coeffs();
        let mut r = numerator.coeffs().to_vec();
        let q = synthetic_division(&mut r, den);
        r.truncate(m);

        let remainder = if r.is_empty() {
            Polynomial::zero()
        } else {
            Polynomial::from_vec(r)
        };
        Division {
            quotient: Polynomial::from_vec(q),
            remainder: if remainder.is_zero() {
                Polynomial::zero()
            } else {
                remainder
            },
        }
    }

    pub fn quotient(&self) -> &Polynomial {
        &self.quotient
    }

    pub fn remainder(&self) -> &Polynomial {
        &self.remainder
    }

    /// Returns `(quotient, remainder)`.
    pub fn into_parts(self) -> (Polynomial, Polynomial) {
        (self.quotient, self.remainder)
    }

    /// Does the division leave no remainder?
    pub fn is_exact(&self) -> bool {
        self.remainder.is_zero()
    }

    /// Is every coefficient of the remainder at most `tolerance` in absolute
    /// value?
    pub fn is_exact_within(&self, tolerance: f64) -> bool {
        self.remainder.magnitude() <= tolerance
    }
}

/// Divides the polynomial in `r` by `den` from the highest power down,
/// returning the quotient and leaving the remainder in the low
/// `den.len() - 1` entries of `r`.
///
/// Requires `r.len() >= den.len()`.
fn synthetic_division(r: &mut [f64], den: &[f64]) -> Vec<f64> {
    let m = den.len() - 1;
    let lead = den[m];
    let mut q = vec![0.0; r.len() - m];
    for k in (0..q.len()).rev() {
        let qk = r[m + k] / lead;
        q[k] = qk;
        for (j, d) in den.iter().enumerate() {
            r[j + k] -= qk * d;
        }
    }
    q
}

/// Drops trailing coefficients that are at most [`EPSILON`] in absolute
/// value, possibly leaving nothing at all.
fn trim(coeffs: &[f64]) -> &[f64] {
    let mut len = coeffs.len();
    while len > 0 && coeffs[len - 1].abs() <= EPSILON {
        len -= 1;
    }
    &coeffs[..len]
}

/// Divides raw coefficient arrays, returning the quotient and dropping the
/// remainder.
///
/// Unlike [`Division`], this works on arrays that need not be canonical,
/// and it encodes the degenerate cases in one-element arrays instead of
/// failing:
///
/// - if the numerator is zero (after trimming), the result is `[0.0]`;
/// - if the denominator is zero, the result is `[+inf]` or `[-inf]`
///   following the sign of the numerator's leading coefficient, and `[NaN]`
///   if that sign is unknown.
///
/// Callers have to check for these with [`is_sentinel`] before doing
/// anything else with the result: `[inf]` is not a polynomial.
pub fn divide_coefficients(numerator: &[f64], denominator: &[f64]) -> Vec<f64> {
    let num = trim(numerator);
    let den = trim(denominator);
    let Some(&lead) = num.last() else {
        return vec![0.0];
    };
    if den.is_empty() {
        let sentinel = if lead > 0.0 {
            f64::INFINITY
        } else if lead < 0.0 {
            f64::NEG_INFINITY
        } else {
            f64::NAN
        };
        return vec![sentinel];
    }
    if den.len() > num.len() {
        return vec![0.0];
    }

    let mut r = num.to_vec();
    synthetic_division(&mut r, den)
}

/// Is this one of the non-finite results of dividing by a zero polynomial
/// with [`divide_coefficients`]?
pub fn is_sentinel(coeffs: &[f64]) -> bool {
    matches!(coeffs, [c] if !c.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_division() {
        let p = Polynomial::of(&[-1.0, 0.0, 1.0]);
        let d = Division::new(&p, &Polynomial::of(&[-1.0, 1.0]));
        assert_eq!(d.quotient().coeffs(), &[1.0, 1.0]);
        assert_eq!(d.remainder().coeffs(), &[0.0]);
        assert!(d.is_exact());
    }

    #[test]
    fn division_with_remainder() {
        // x^3 + 2x + 5 = (x^2 - x + 3)(x + 1) + 2
        let p = Polynomial::of(&[5.0, 2.0, 0.0, 1.0]);
        let d = Division::new(&p, &Polynomial::of(&[1.0, 1.0]));
        assert_eq!(d.quotient().coeffs(), &[3.0, -1.0, 1.0]);
        assert_eq!(d.remainder().coeffs(), &[2.0]);
        assert!(!d.is_exact());
        assert!(d.is_exact_within(2.0));
    }

    #[test]
    fn larger_denominator() {
        let p = Polynomial::of(&[1.0, 1.0]);
        let d = Division::new(&p, &Polynomial::of(&[0.0, 0.0, 1.0]));
        assert!(d.quotient().is_zero());
        assert_eq!(d.remainder(), &p);
    }

    #[test]
    fn constant_denominator() {
        let p = Polynomial::of(&[2.0, 4.0]);
        let (q, r) = Division::new(&p, &Polynomial::value_of(2.0, &[])).into_parts();
        assert_eq!(q.coeffs(), &[1.0, 2.0]);
        assert!(r.is_zero());
    }

    #[test]
    fn raw_division() {
        assert_eq!(divide_coefficients(&[-1.0, 0.0, 1.0, 0.0], &[-1.0, 1.0]), vec![1.0, 1.0]);
        assert_eq!(divide_coefficients(&[1.0, 1.0], &[0.0, 0.0, 1.0]), vec![0.0]);
    }

    #[test]
    fn sentinels() {
        assert_eq!(divide_coefficients(&[0.0, 1e-12], &[1.0, 1.0]), vec![0.0]);
        assert_eq!(divide_coefficients(&[1.0, 2.0], &[0.0, 1e-10]), vec![f64::INFINITY]);
        assert_eq!(divide_coefficients(&[1.0, -2.0], &[0.0]), vec![f64::NEG_INFINITY]);
        assert!(divide_coefficients(&[f64::NAN], &[]).first().unwrap().is_nan());

        assert!(is_sentinel(&[f64::INFINITY]));
        assert!(is_sentinel(&[f64::NAN]));
        assert!(!is_sentinel(&[0.0]));
        assert!(!is_sentinel(&[f64::INFINITY, 1.0]));
    }

    #[test]
    fn division_is_correct() {
        arbtest::arbtest(|u| {
            let p = crate::arbitrary::polynomial(u, 8)?;
            let q = crate::arbitrary::polynomial(u, 5)?;
            let d = Division::new(&p, &q);
            let back = &(d.quotient() * &q) + d.remainder();
            // Rounding errors scale with the size of the terms in the product.
            let scale = d.quotient().magnitude() * q.magnitude();
            let tolerance = EPSILON * p.magnitude().max(back.magnitude()).max(scale).max(1.0);
            let n = p.coeffs().len().max(back.coeffs().len());
            for i in 0..n {
                assert!(
                    (p.get(i) - back.get(i)).abs() <= tolerance,
                    "{p} / {q} gave {} rem {}",
                    d.quotient(),
                    d.remainder()
                );
            }
            if q.degree() <= p.degree() {
                assert_eq!(d.quotient().degree(), p.degree() - q.degree());
            }
            Ok(())
        })
        .budget_ms(2_000);
    }
}
