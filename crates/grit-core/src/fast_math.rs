//! Fast mathematical approximations.
//!
//! | Function | Replaces | Use case | Max error |
//! |----------|----------|----------|-----------|
//! | [`fast_tanh`] | `libm::tanhf` | Bias-drive and pedal saturation | < 2e-4 |
//!
//! The bias-drive and pedal chains are voiced on this approximation, so it
//! is part of the sound rather than a drop-in for `tanhf`. Other shapers use
//! `libm`.

/// Input magnitude beyond which the rational form is confined to ±1.
const TANH_INPUT_LIMIT: f32 = 5.5;

/// Padé-style rational approximation of `tanh`.
///
/// ```text
///        x·(135135 + x²·(17325 + x²·(378 + x²)))
/// y = ─────────────────────────────────────────────
///      135135 + x²·(62370 + x²·(3150 + 28·x²))
/// ```
///
/// The result is clamped to `[−1, 1]`; the rational form crosses 1 just
/// below `|x| = 5`. Input is limited to ±5.5 first so very large values cannot
/// overflow the polynomial.
///
/// # Accuracy
///
/// Maximum absolute error against `tanhf`: < 2e-4, reached near `|x| ≈ 5`.
/// Below `|x| = 3` the error is under 1e-5.
///
/// # Examples
///
/// ```
/// use grit_core::fast_tanh;
///
/// assert_eq!(fast_tanh(0.0), 0.0);
/// assert!((fast_tanh(0.5) - 0.5_f32.tanh()).abs() < 1e-5);
/// assert_eq!(fast_tanh(100.0), 1.0);
/// ```
#[inline]
pub fn fast_tanh(x: f32) -> f32 {
    let x = x.clamp(-TANH_INPUT_LIMIT, TANH_INPUT_LIMIT);
    let x2 = x * x;
    let numerator = x * (135135.0 + x2 * (17325.0 + x2 * (378.0 + x2)));
    let denominator = 135135.0 + x2 * (62370.0 + x2 * (3150.0 + x2 * 28.0));
    (numerator / denominator).clamp(-1.0, 1.0)
}
