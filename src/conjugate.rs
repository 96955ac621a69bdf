use num_complex::Complex64;

use crate::{snap, Error, Result, EPSILON};

/// Snaps the real and imaginary parts of `z` to 0, 1 or -1 when they are
/// within [`EPSILON`] of one of them.
pub fn smooth_root(z: Complex64) -> Complex64 {
    let smooth = |x: f64| snap(snap(snap(x, 0.0), 1.0), -1.0);
    Complex64::new(smooth(z.re), smooth(z.im))
}

fn is_conjugate(a: Complex64, b: Complex64) -> bool {
    (a.re - b.re).abs() <= EPSILON && (a.im + b.im).abs() <= EPSILON
}

/// Restores the conjugate-pair structure of a root set produced by a
/// numerical solver.
///
/// Every root is [smoothed](smooth_root) first. Real roots are kept as
/// they are. Each complex root is matched with the first later root (in
/// input order) that is its conjugate up to [`EPSILON`], and the two are
/// replaced by their average: `z` with positive imaginary part, followed by
/// `conj(z)`. The output has the same length as the input.
///
/// Fails if some complex root, whichever the sign of its imaginary part,
/// has no partner.
pub fn check_roots(roots: &[Complex64]) -> Result<Vec<Complex64>> {
    let smoothed: Vec<Complex64> = roots.iter().map(|&z| smooth_root(z)).collect();
    let mut used = vec![false; smoothed.len()];
    let mut out = Vec::with_capacity(smoothed.len());

    for i in 0..smoothed.len() {
        if used[i] {
            continue;
        }
        used[i] = true;
        let z = smoothed[i];
        if z.im == 0.0 {
            out.push(z);
            continue;
        }

        let partner = (i + 1..smoothed.len()).find(|&j| {
            let w = smoothed[j];
            !used[j] && (w.im > 0.0) != (z.im > 0.0) && w.im != 0.0 && is_conjugate(z, w)
        });
        let Some(j) = partner else {
            return Err(Error::UnpairedRoot { root: roots[i] });
        };
        used[j] = true;

        let (upper, lower) = if z.im > 0.0 {
            (z, smoothed[j])
        } else {
            (smoothed[j], z)
        };
        let averaged = Complex64::new(
            (upper.re + lower.re) / 2.0,
            (upper.im - lower.im) / 2.0,
        );
        out.push(averaged);
        out.push(averaged.conj());
    }
    Ok(out)
}
