//! Shelving tone control.
//!
//! A single high-shelf biquad with a fixed corner and Q; the tone control
//! sets the shelf gain. Coefficients are shared across channels, delay
//! state is per channel and survives across blocks.

use crate::biquad::{BiquadCoefficients, BiquadState};
use crate::error::PrepareError;
use crate::processor::{ProcessSpec, block_len};
use alloc::vec::Vec;

/// Shelf corner frequency in Hz.
pub const TONE_CORNER_HZ: f32 = 2000.0;

/// Shelf Q.
pub const TONE_Q: f32 = 0.707;

/// Lowest accepted shelf gain in dB.
pub const TONE_MIN_DB: f32 = -12.0;

/// Highest accepted shelf gain in dB.
pub const TONE_MAX_DB: f32 = 12.0;

/// High-shelf tone filter.
///
/// # Example
///
/// ```rust
/// use grit_core::{ProcessSpec, ToneFilter};
///
/// let mut tone = ToneFilter::new();
/// tone.prepare(&ProcessSpec::new(48000.0, 64, 1)).unwrap();
/// tone.update_coefficients(-6.0);
///
/// let mut mono = [0.5_f32; 64];
/// tone.process(&mut [&mut mono[..]]);
/// ```
#[derive(Debug, Clone)]
pub struct ToneFilter {
    coefficients: BiquadCoefficients,
    states: Vec<BiquadState>,
    gain_db: f32,
    sample_rate: f32,
}

impl ToneFilter {
    /// An unprepared filter at 0 dB.
    pub fn new() -> Self {
        Self {
            coefficients: BiquadCoefficients::identity(),
            states: Vec::new(),
            gain_db: 0.0,
            sample_rate: 0.0,
        }
    }

    /// Allocate per-channel state and compute coefficients for the current
    /// gain at the new sample rate.
    pub fn prepare(&mut self, spec: &ProcessSpec) -> Result<(), PrepareError> {
        spec.validate()?;
        let mut states = Vec::new();
        states
            .try_reserve_exact(spec.num_channels)
            .map_err(|_| PrepareError::Allocation {
                requested: spec.num_channels,
            })?;
        states.resize(spec.num_channels, BiquadState::new());
        self.states = states;
        self.sample_rate = spec.sample_rate as f32;
        self.recompute();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            channels = spec.num_channels,
            sample_rate = spec.sample_rate,
            gain_db = self.gain_db,
            "tone filter prepared"
        );

        Ok(())
    }

    /// Set the shelf gain in dB, clamped to
    /// [`TONE_MIN_DB`]..=[`TONE_MAX_DB`]. Coefficients are only recomputed
    /// when the gain changes.
    pub fn update_coefficients(&mut self, gain_db: f32) {
        let gain_db = if gain_db.is_nan() {
            0.0
        } else {
            gain_db.clamp(TONE_MIN_DB, TONE_MAX_DB)
        };
        if gain_db == self.gain_db {
            return;
        }
        self.gain_db = gain_db;
        self.recompute();
    }

    /// Filter the block in place. Channels without prepared state pass
    /// through untouched.
    pub fn process(&mut self, buffer: &mut [&mut [f32]]) {
        let frames = block_len(buffer);
        for (channel, state) in buffer.iter_mut().zip(self.states.iter_mut()) {
            for sample in channel[..frames].iter_mut() {
                *sample = self.coefficients.process(state, *sample);
            }
            state.flush_denormals();
        }
    }

    /// Zero every channel's delay state.
    pub fn reset(&mut self) {
        for state in &mut self.states {
            state.reset();
        }
    }

    /// Current shelf gain in dB.
    pub fn gain_db(&self) -> f32 {
        self.gain_db
    }

    /// Active coefficients.
    pub fn coefficients(&self) -> &BiquadCoefficients {
        &self.coefficients
    }

    fn recompute(&mut self) {
        if self.sample_rate <= 0.0 {
            return;
        }
        // Keep the corner well under Nyquist at low sample rates
        let corner = TONE_CORNER_HZ.min(self.sample_rate * 0.45);
        self.coefficients =
            BiquadCoefficients::high_shelf(corner, TONE_Q, self.gain_db, self.sample_rate);
    }
}

impl Default for ToneFilter {
    fn default() -> Self {
        Self::new()
    }
}
