use crate::FloatScalar;

/// Softplus, ln(1 + eˣ).
///
/// Rewritten as `max(x, 0) + ln(1 + e^{-|x|})` so that neither branch can
/// overflow: large positive inputs return ≈ x, large negative inputs
/// return a tiny positive value that underflows to 0 only below the
/// subnormal range.
///
/// ```
/// use distrix::special::softplus;
///
/// assert!((softplus(1000.0_f64) - 1000.0).abs() < 1e-12);
/// assert!(softplus(-30.0_f64) > 0.0);
/// ```
pub fn softplus<T: FloatScalar>(x: T) -> T {
    if x.is_nan() {
        return x;
    }
    x.max(T::zero()) + (-x.abs()).exp().ln_1p()
}
