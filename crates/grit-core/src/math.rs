//! Parameter mapping functions.
//!
//! Pure, allocation-free conversions between control values and the
//! coefficients the signal path multiplies by.
//!
//! # Level Conversions
//!
//! - [`db_to_linear`] / [`linear_to_db`] - Convert between dB and linear gain
//!
//! # Range Mapping
//!
//! | Function | Curve | Use Case |
//! |----------|-------|----------|
//! | [`rescale`] | Linear | Drive → diode emission coefficient, DC bias |
//! | [`log_knob`] | `log10(x + 1)` | Perceptually even knob travel |
//! | [`threshold_knob`] | `log10` + inverted rescale | Hard-clipper threshold dial |

use libm::{floorf, log10f, powf};

/// Convert decibels to linear gain: `10^(db / 20)`.
///
/// Evaluated as `powf(10, db * 0.05)` so that gain stages and waveshapers
/// share the exact same rounding as the calibration formulas.
///
/// # Example
/// ```rust
/// use grit_core::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 1e-6);
/// assert!((db_to_linear(-6.0206) - 0.5).abs() < 1e-3);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    powf(10.0, db * 0.05)
}

/// Convert linear gain to decibels.
///
/// Inputs at or below `1e-10` are treated as `1e-10` (−200 dB) so the
/// result is always finite.
///
/// # Example
/// ```rust
/// use grit_core::linear_to_db;
///
/// assert!(linear_to_db(1.0).abs() < 1e-6);
/// assert!(linear_to_db(0.0).is_finite());
/// ```
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    20.0 * log10f(linear.max(1e-10))
}

/// Linearly map `x` from `[in_low, in_high]` to `[out_low, out_high]`.
///
/// Values outside the input range extrapolate; callers that need a bounded
/// result clamp either side. A degenerate input range (`in_high == in_low`)
/// returns `out_low` instead of dividing by zero.
///
/// # Example
/// ```rust
/// use grit_core::rescale;
///
/// assert_eq!(rescale(12.0, 0.0, 24.0, 2.0, 1.0), 1.5);
/// assert_eq!(rescale(5.0, 1.0, 1.0, 0.3, 0.9), 0.3);
/// ```
#[inline]
pub fn rescale(x: f32, in_low: f32, in_high: f32, out_low: f32, out_high: f32) -> f32 {
    let span = in_high - in_low;
    if span == 0.0 {
        return out_low;
    }
    (x - in_low) / span * (out_high - out_low) + out_low
}

/// Logarithmic knob curve: `log10(max(x, 0) + 1)`.
///
/// Negative inputs are clamped to zero, so the curve never takes the log of
/// a non-positive value. Maps `[0, 24]` onto roughly `[0, 1.398]`.
#[inline]
pub fn log_knob(x: f32) -> f32 {
    log10f(x.max(0.0) + 1.0)
}

/// Hard-clipper threshold dial.
///
/// The knob position goes through [`log_knob`], is rounded to the nearest
/// hundredth, then mapped from `[0, 1.4]` onto `[1.0, 0.02]`. Turning the
/// knob up lowers the threshold, steeply at first and gently near the top.
/// The result is clamped to `[0.02, 1.0]`.
#[inline]
pub fn threshold_knob(position: f32) -> f32 {
    const STEP: f32 = 0.01;
    let curved = log_knob(position);
    let stepped = floorf(curved / STEP + 0.5) * STEP;
    rescale(stepped, 0.0, 1.4, 1.0, 0.02).clamp(0.02, 1.0)
}

/// Flush subnormal (denormalized) floats to zero.
///
/// Used on filter and overlap state that decays toward zero after the
/// input goes silent.
#[allow(clippy::inline_always)]
#[inline(always)]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}
