//! Floating-point helpers shared by the kernel and the transport.

/// Maximum of `a` and `b` that returns NaN if either input is NaN.
///
/// [`f64::max`] drops a NaN operand, which would hide a diverged cell
/// from the convergence check.
///
/// # Examples
///
/// ```
/// use heatgrid_core::nan_max;
///
/// assert_eq!(nan_max(1.0, 2.0), 2.0);
/// assert!(nan_max(f64::NAN, 2.0).is_nan());
/// ```
pub fn nan_max(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.max(b)
    }
}
