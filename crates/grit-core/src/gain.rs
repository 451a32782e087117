//! Ramped gain and DC-offset stages.
//!
//! [`GainStage`] multiplies a block by a linear gain that follows dB
//! targets through a [`LinearRamp`]. [`BiasStage`] adds a ramped DC offset.
//! Both advance their ramp once per frame and apply the same value to every
//! channel, so channels stay phase-coherent.
//!
//! # Usage
//!
//! ```rust
//! use grit_core::{GainStage, RampState};
//!
//! let mut output = GainStage::new();
//! output.prepare(48000.0);
//! output.set_target_decibels(-6.0);
//! assert_eq!(output.state(), RampState::Ramping);
//!
//! let mut mono = [1.0_f32; 48000];
//! let mut buffer: [&mut [f32]; 1] = [&mut mono];
//! output.process(&mut buffer);
//!
//! // A one second ramp lands exactly on the target at the last sample
//! assert_eq!(output.state(), RampState::Idle);
//! assert!((buffer[0][47999] - 0.501187).abs() < 1e-5);
//! ```

use crate::math::db_to_linear;
use crate::param::{LinearRamp, RampState};
use crate::processor::block_len;

/// Default ramp duration for gain and bias changes, in seconds.
pub const DEFAULT_RAMP_SECONDS: f32 = 1.0;

/// Linear gain with a ramped coefficient, set in decibels.
#[derive(Debug, Clone)]
pub struct GainStage {
    ramp: LinearRamp,
    target_db: f32,
}

impl GainStage {
    /// Unity gain with the default one second ramp.
    pub fn new() -> Self {
        Self::with_ramp_seconds(DEFAULT_RAMP_SECONDS)
    }

    /// Unity gain with a custom ramp duration. `0.0` makes changes
    /// instantaneous.
    pub fn with_ramp_seconds(ramp_seconds: f32) -> Self {
        Self {
            ramp: LinearRamp::new(1.0, ramp_seconds),
            target_db: 0.0,
        }
    }

    /// Configure the sample rate. The gain settles on its target.
    pub fn prepare(&mut self, sample_rate: f64) {
        self.ramp.prepare(sample_rate);
    }

    /// Change the ramp duration for subsequent targets.
    pub fn set_ramp_seconds(&mut self, ramp_seconds: f32) {
        self.ramp.set_ramp_seconds(ramp_seconds);
    }

    /// Ramp toward a new gain. Repeating the current target is a no-op.
    pub fn set_target_decibels(&mut self, db: f32) {
        if db == self.target_db {
            return;
        }
        self.target_db = db;
        self.ramp.set_target(db_to_linear(db));
    }

    /// Jump to a new gain without ramping.
    pub fn set_immediate_decibels(&mut self, db: f32) {
        self.target_db = db;
        self.ramp.set_immediate(db_to_linear(db));
    }

    /// Advance the ramp one frame and return the gain to apply.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        self.ramp.advance()
    }

    /// Multiply the block by the ramped gain.
    pub fn process(&mut self, buffer: &mut [&mut [f32]]) {
        let frames = block_len(buffer);
        if self.ramp.state() == RampState::Idle {
            let gain = self.ramp.current();
            if gain == 1.0 {
                return;
            }
            for channel in buffer.iter_mut() {
                for sample in channel[..frames].iter_mut() {
                    *sample *= gain;
                }
            }
            return;
        }

        for i in 0..frames {
            let gain = self.ramp.advance();
            for channel in buffer.iter_mut() {
                channel[i] *= gain;
            }
        }
    }

    /// Finish any ramp in progress.
    pub fn reset(&mut self) {
        self.ramp.snap_to_target();
    }

    /// Whether the gain is still ramping.
    pub fn state(&self) -> RampState {
        self.ramp.state()
    }

    /// Current linear gain.
    pub fn current(&self) -> f32 {
        self.ramp.current()
    }

    /// Target gain in decibels.
    pub fn target_decibels(&self) -> f32 {
        self.target_db
    }
}

impl Default for GainStage {
    fn default() -> Self {
        Self::new()
    }
}

/// Ramped DC offset added to every sample.
///
/// The offset is in normalized sample units ("volts"), so `0.5` shifts the
/// signal halfway to full scale.
#[derive(Debug, Clone)]
pub struct BiasStage {
    ramp: LinearRamp,
}

impl BiasStage {
    /// Zero offset with the default one second ramp.
    pub fn new() -> Self {
        Self::with_ramp_seconds(DEFAULT_RAMP_SECONDS)
    }

    /// Zero offset with a custom ramp duration.
    pub fn with_ramp_seconds(ramp_seconds: f32) -> Self {
        Self {
            ramp: LinearRamp::new(0.0, ramp_seconds),
        }
    }

    /// Configure the sample rate. The offset settles on its target.
    pub fn prepare(&mut self, sample_rate: f64) {
        self.ramp.prepare(sample_rate);
    }

    /// Change the ramp duration for subsequent targets.
    pub fn set_ramp_seconds(&mut self, ramp_seconds: f32) {
        self.ramp.set_ramp_seconds(ramp_seconds);
    }

    /// Ramp toward a new offset.
    pub fn set_target(&mut self, bias: f32) {
        self.ramp.set_target(bias);
    }

    /// Jump to a new offset without ramping.
    pub fn set_immediate(&mut self, bias: f32) {
        self.ramp.set_immediate(bias);
    }

    /// Advance the ramp one frame and return the offset to add.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        self.ramp.advance()
    }

    /// Add the ramped offset to the block.
    pub fn process(&mut self, buffer: &mut [&mut [f32]]) {
        let frames = block_len(buffer);
        if self.ramp.state() == RampState::Idle {
            let bias = self.ramp.current();
            if bias == 0.0 {
                return;
            }
            for channel in buffer.iter_mut() {
                for sample in channel[..frames].iter_mut() {
                    *sample += bias;
                }
            }
            return;
        }

        for i in 0..frames {
            let bias = self.ramp.advance();
            for channel in buffer.iter_mut() {
                channel[i] += bias;
            }
        }
    }

    /// Finish any ramp in progress.
    pub fn reset(&mut self) {
        self.ramp.snap_to_target();
    }

    /// Whether the offset is still ramping.
    pub fn state(&self) -> RampState {
        self.ramp.state()
    }

    /// Current offset.
    pub fn current(&self) -> f32 {
        self.ramp.current()
    }
}

impl Default for BiasStage {
    fn default() -> Self {
        Self::new()
    }
}
