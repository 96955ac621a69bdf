use arrayvec::ArrayVec;
use num_complex::Complex64;

/// The roots of `a x^2 + b x + c`, which must have `a != 0`.
///
/// Real roots come out in increasing order, with a double root repeated.
/// Complex roots come out as a conjugate pair, positive imaginary part
/// first. If the coefficients are not finite, there are no roots.
pub(crate) fn quadratic_roots(c: f64, b: f64, a: f64) -> ArrayVec<Complex64, 2> {
    let mut ret = ArrayVec::new();
    let disc = b * b - 4.0 * a * c;
    if !disc.is_finite() {
        if a.is_finite() && b.is_finite() && c.is_finite() {
            // The discriminant overflowed. The exponent of f64 maxes out at
            // 1023, so scaling by 2^{-515} keeps the squares finite without
            // sending all of the coefficients to zero.
            let scale = 2.0f64.powi(-515);
            return quadratic_roots(c * scale, b * scale, a * scale);
        }
        return ret;
    }

    if disc > 0.0 {
        // Pick the sign that avoids cancellation, then get the other root
        // from the product of the roots.
        let q = -0.5 * (b + disc.sqrt().copysign(b));
        let r0 = q / a;
        let r1 = c / q;
        ret.push(Complex64::new(r0.min(r1), 0.0));
        ret.push(Complex64::new(r0.max(r1), 0.0));
    } else if disc == 0.0 {
        let root = -0.5 * b / a;
        ret.push(Complex64::new(root, 0.0));
        ret.push(Complex64::new(root, 0.0));
    } else {
        let re = -0.5 * b / a;
        let im = (-disc).sqrt() / (2.0 * a.abs());
        ret.push(Complex64::new(re, im));
        ret.push(Complex64::new(re, -im));
    }
    ret
}
