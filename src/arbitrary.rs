//! Generators for property testing (and fuzzing) using `arbitrary`.

use arbitrary::Unstructured;
use num_complex::Complex64;

use crate::Polynomial;

fn check_finite(f: f64) -> Result<f64, arbitrary::Error> {
    if f.is_finite() {
        Ok(f)
    } else {
        Err(arbitrary::Error::IncorrectFormat)
    }
}

pub fn finite_float(u: &mut Unstructured<'_>) -> Result<f64, arbitrary::Error> {
    check_finite(u.arbitrary()?)
}

/// Generate a float, but give it a chance to be close to another float.
fn another_finite_float(orig: f64, u: &mut Unstructured<'_>) -> Result<f64, arbitrary::Error> {
    let close: bool = u.arbitrary()?;
    if close {
        let ulps: i32 = u.int_in_range(-32..=32)?;
        let scale = 1.0f64 + ulps as f64 * f64::EPSILON;
        check_finite(orig * scale)
    } else {
        finite_float(u)
    }
}

/// A multiple of 1/4 in `[-bound, bound]`.
fn quarter_step(u: &mut Unstructured<'_>, bound: i32) -> Result<f64, arbitrary::Error> {
    Ok(u.int_in_range(-4 * bound..=4 * bound)? as f64 / 4.0)
}

/// Generate raw coefficients, with no attempt at making them canonical.
///
/// Some of them are tiny, and some are within a rounding error of an
/// integer, to exercise canonicalization and smoothing.
pub fn coefficients(
    u: &mut Unstructured<'_>,
    max_len: usize,
) -> Result<Vec<f64>, arbitrary::Error> {
    let len = u.int_in_range(1..=max_len)?;
    let mut coeffs = Vec::with_capacity(len);
    for _ in 0..len {
        let c = match u.int_in_range(0u8..=3)? {
            0 => finite_float(u)?,
            1 => {
                let k: i8 = u.arbitrary()?;
                k as f64 * 1e-11
            }
            2 => {
                let n: i16 = u.arbitrary()?;
                another_finite_float(n as f64, u)?
            }
            _ => quarter_step(u, 5)?,
        };
        coeffs.push(c);
    }
    Ok(coeffs)
}

/// Generate a polynomial of degree at most `max_degree`, with coefficients
/// that are multiples of 1/4 in `[-5, 5]`.
pub fn polynomial(
    u: &mut Unstructured<'_>,
    max_degree: usize,
) -> Result<Polynomial, arbitrary::Error> {
    let degree = u.int_in_range(0..=max_degree)?;
    let mut coeffs = Vec::with_capacity(degree + 1);
    for _ in 0..degree {
        coeffs.push(quarter_step(u, 5)?);
    }
    let mut lead = quarter_step(u, 5)?;
    if lead == 0.0 {
        lead = 1.0;
    }
    coeffs.push(lead);
    Ok(Polynomial::from_vec(coeffs))
}

/// Generate the coefficients `[c, b, a]` of an arbitrary quadratic
/// polynomial `a x^2 + b x + c`.
pub fn quadratic(u: &mut Unstructured<'_>) -> Result<[f64; 3], arbitrary::Error> {
    let use_coeffs: bool = u.arbitrary()?;
    if use_coeffs {
        let c2 = finite_float(u)?;
        let c1 = another_finite_float(c2, u)?;
        let c0 = another_finite_float(c1, u)?;

        Ok([c0, c1, c2])
    } else {
        let r1 = finite_float(u)?;
        let r2 = another_finite_float(r1, u)?;
        let scale = finite_float(u)?;

        Ok([
            check_finite(scale * r1 * r2)?,
            check_finite(-scale * (r1 + r2))?,
            scale,
        ])
    }
}

/// Generate between 1 and `max_degree` roots in the square `[-2, 2]^2`,
/// closed under conjugation, no two of them closer than 1/4.
pub fn separated_roots(
    u: &mut Unstructured<'_>,
    max_degree: usize,
) -> Result<Vec<Complex64>, arbitrary::Error> {
    let degree = u.int_in_range(1..=max_degree)?;
    let mut roots: Vec<Complex64> = Vec::with_capacity(degree);
    while roots.len() < degree {
        let complex = degree - roots.len() >= 2 && u.arbitrary::<bool>()?;
        let re = quarter_step(u, 2)?;
        let new = if complex {
            let im = u.int_in_range(1..=8)? as f64 / 4.0;
            vec![Complex64::new(re, im), Complex64::new(re, -im)]
        } else {
            vec![Complex64::new(re, 0.0)]
        };

        for z in &new {
            if roots.iter().any(|r| (r - z).norm() < 0.25) {
                return Err(arbitrary::Error::IncorrectFormat);
            }
        }
        roots.extend(new);
    }
    Ok(roots)
}
