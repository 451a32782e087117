//! Biquad (bi-quadratic) filter section.
//!
//! Coefficients are normalized by `a0` and split from the per-channel
//! delay state so one coefficient set can drive any number of channels.
//!
//! Coefficient calculation uses the RBJ Audio EQ Cookbook formulas.

use core::f32::consts::PI;
use libm::{cosf, powf, sinf, sqrtf};

/// Normalized biquad coefficients (`a0 = 1`).
///
/// Evaluated in Transposed Direct Form II:
/// ```text
/// y[n]  = b0·x[n] + s1
/// s1'   = b1·x[n] − a1·y[n] + s2
/// s2'   = b2·x[n] − a2·y[n]
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoefficients {
    /// Feedforward coefficient for x[n].
    pub b0: f32,
    /// Feedforward coefficient for x[n-1].
    pub b1: f32,
    /// Feedforward coefficient for x[n-2].
    pub b2: f32,
    /// Feedback coefficient for y[n-1].
    pub a1: f32,
    /// Feedback coefficient for y[n-2].
    pub a2: f32,
}

impl BiquadCoefficients {
    /// Passthrough: `y[n] = x[n]`.
    pub const fn identity() -> Self {
        Self {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
        }
    }

    /// Normalize raw `(b0, b1, b2, a0, a1, a2)` coefficients by `a0`.
    pub fn from_raw((b0, b1, b2, a0, a1, a2): (f32, f32, f32, f32, f32, f32)) -> Self {
        let a0_inv = 1.0 / a0;
        Self {
            b0: b0 * a0_inv,
            b1: b1 * a0_inv,
            b2: b2 * a0_inv,
            a1: a1 * a0_inv,
            a2: a2 * a0_inv,
        }
    }

    /// High-shelf filter. See [`high_shelf_coefficients`].
    pub fn high_shelf(frequency: f32, q: f32, gain_db: f32, sample_rate: f32) -> Self {
        Self::from_raw(high_shelf_coefficients(frequency, q, gain_db, sample_rate))
    }

    /// Filter one sample, updating `state`.
    #[inline]
    pub fn process(&self, state: &mut BiquadState, input: f32) -> f32 {
        let output = self.b0 * input + state.s1;
        state.s1 = self.b1 * input - self.a1 * output + state.s2;
        state.s2 = self.b2 * input - self.a2 * output;
        output
    }
}

impl Default for BiquadCoefficients {
    fn default() -> Self {
        Self::identity()
    }
}

/// Two-element delay state of one biquad channel.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BiquadState {
    s1: f32,
    s2: f32,
}

impl BiquadState {
    /// Zeroed state.
    pub const fn new() -> Self {
        Self { s1: 0.0, s2: 0.0 }
    }

    /// Clear the delay elements.
    pub fn reset(&mut self) {
        self.s1 = 0.0;
        self.s2 = 0.0;
    }

    /// Flush subnormal state values to zero.
    #[inline]
    pub fn flush_denormals(&mut self) {
        self.s1 = crate::math::flush_denormal(self.s1);
        self.s2 = crate::math::flush_denormal(self.s2);
    }

    /// Whether both delay elements are zero.
    pub fn is_silent(&self) -> bool {
        self.s1 == 0.0 && self.s2 == 0.0
    }
}

/// Calculates high-shelf filter coefficients using the RBJ cookbook formula.
///
/// # Arguments
///
/// * `frequency` - Shelf midpoint frequency in Hz
/// * `q` - Q factor (0.707 gives the steepest slope without overshoot)
/// * `gain_db` - Shelf gain in decibels (positive = boost, negative = cut)
/// * `sample_rate` - Sample rate in Hz
///
/// # Returns
///
/// (b0, b1, b2, a0, a1, a2) coefficients
pub fn high_shelf_coefficients(
    frequency: f32,
    q: f32,
    gain_db: f32,
    sample_rate: f32,
) -> (f32, f32, f32, f32, f32, f32) {
    let a = powf(10.0, gain_db / 40.0); // sqrt(10^(dB/20))
    let omega = 2.0 * PI * frequency / sample_rate;
    let cos_omega = cosf(omega);
    let sin_omega = sinf(omega);
    let alpha = sin_omega / (2.0 * q);
    let two_sqrt_a_alpha = 2.0 * sqrtf(a) * alpha;

    let b0 = a * ((a + 1.0) + (a - 1.0) * cos_omega + two_sqrt_a_alpha);
    let b1 = -2.0 * a * ((a - 1.0) + (a + 1.0) * cos_omega);
    let b2 = a * ((a + 1.0) + (a - 1.0) * cos_omega - two_sqrt_a_alpha);
    let a0 = (a + 1.0) - (a - 1.0) * cos_omega + two_sqrt_a_alpha;
    let a1 = 2.0 * ((a - 1.0) - (a + 1.0) * cos_omega);
    let a2 = (a + 1.0) - (a - 1.0) * cos_omega - two_sqrt_a_alpha;

    (b0, b1, b2, a0, a1, a2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settle(coeffs: &BiquadCoefficients, input: f32, samples: usize) -> f32 {
        let mut state = BiquadState::new();
        let mut output = 0.0;
        for _ in 0..samples {
            output = coeffs.process(&mut state, input);
        }
        output
    }

    #[test]
    fn test_identity_passthrough() {
        let coeffs = BiquadCoefficients::identity();
        let mut state = BiquadState::new();
        for i in 0..10 {
            let input = i as f32 * 0.1;
            assert_eq!(coeffs.process(&mut state, input), input);
        }
    }

    #[test]
    fn test_state_reset() {
        let coeffs = BiquadCoefficients::high_shelf(2000.0, 0.707, 6.0, 48000.0);
        let mut state = BiquadState::new();
        for _ in 0..10 {
            coeffs.process(&mut state, 1.0);
        }
        assert!(!state.is_silent());
        state.reset();
        assert!(state.is_silent());
    }

    #[test]
    fn test_high_shelf_coefficients_finite() {
        for gain_db in [-12.0, -6.0, 0.0, 6.0, 12.0] {
            let (b0, b1, b2, a0, a1, a2) = high_shelf_coefficients(2000.0, 0.707, gain_db, 44100.0);
            for c in [b0, b1, b2, a0, a1, a2] {
                assert!(c.is_finite());
            }
        }
    }

    #[test]
    fn test_high_shelf_unity_at_zero_gain() {
        let coeffs = BiquadCoefficients::high_shelf(2000.0, 0.707, 0.0, 48000.0);
        let mut state = BiquadState::new();
        for i in 0..256 {
            let input = libm::sinf(i as f32 * 0.37);
            let output = coeffs.process(&mut state, input);
            assert!((output - input).abs() < 1e-6, "0 dB shelf must be transparent");
        }
    }

    #[test]
    fn test_high_shelf_passes_dc() {
        // A high shelf leaves DC at unity for any shelf gain
        for gain_db in [-12.0, 12.0] {
            let coeffs = BiquadCoefficients::high_shelf(2000.0, 0.707, gain_db, 48000.0);
            let dc = settle(&coeffs, 1.0, 4000);
            assert!((dc - 1.0).abs() < 1e-3, "DC gain at {gain_db} dB: {dc}");
        }
    }

    #[test]
    fn test_high_shelf_gain_at_nyquist() {
        // Alternating input measures the response at Nyquist
        let coeffs = BiquadCoefficients::high_shelf(2000.0, 0.707, 12.0, 48000.0);
        let mut state = BiquadState::new();
        let mut peak: f32 = 0.0;
        for i in 0..4000 {
            let input = if i % 2 == 0 { 1.0 } else { -1.0 };
            let output = coeffs.process(&mut state, input);
            if i > 3000 {
                peak = peak.max(output.abs());
            }
        }
        let expected = powf(10.0, 12.0 / 20.0);
        assert!((peak - expected).abs() < 0.05, "Nyquist gain {peak}, expected {expected}");
    }

    #[test]
    fn test_high_shelf_poles_stable() {
        for gain_db in [-12.0, -3.0, 3.0, 12.0] {
            for sample_rate in [22050.0, 44100.0, 96000.0] {
                let c = BiquadCoefficients::high_shelf(2000.0, 0.707, gain_db, sample_rate);
                // Stability triangle for a second-order section
                assert!(c.a2.abs() < 1.0);
                assert!(c.a1.abs() < 1.0 + c.a2);
            }
        }
    }
}
