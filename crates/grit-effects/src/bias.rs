//! DC-bias drive into a tanh saturator.

use crate::chain::split_prepared;
use grit_core::{
    BiasStage, ControlDescriptor, ControlId, ControlSnapshot, DEFAULT_RAMP_SECONDS, FastTanh,
    GainStage, PrepareError, ProcessSpec, Processor, Waveshaper, silence,
};

/// Bias slews over a fixed second regardless of the engine ramp time.
pub const BIAS_RAMP_SECONDS: f32 = 1.0;

/// Input, bias and output controls.
pub const BIAS_DRIVE_CONTROLS: &[ControlDescriptor] = &[
    ControlDescriptor::decibels(ControlId::Input, "Input", -48.0, 48.0, 0.0),
    ControlDescriptor::volts(ControlId::Bias, "Bias", -1.0, 1.0, 0.0),
    ControlDescriptor::decibels(ControlId::Trim, "Output", -48.0, 48.0, 0.0),
];

/// Input gain, then a DC offset, then `tanh`, then output gain.
///
/// Pushing the bias away from zero moves the operating point along the
/// tanh curve, so one half of the waveform compresses harder than the other
/// and even harmonics appear.
///
/// ```text
/// y = out · tanh(in · x + bias)
/// ```
#[derive(Debug, Clone)]
pub struct BiasDrive {
    input: GainStage,
    bias: BiasStage,
    output: GainStage,
    channels: usize,
    last_controls: Option<ControlSnapshot>,
}

impl BiasDrive {
    /// Create an unprepared bias drive with the default gain ramp.
    pub fn new() -> Self {
        Self::with_ramp_seconds(DEFAULT_RAMP_SECONDS)
    }

    /// Create an unprepared bias drive whose input and output gains glide
    /// over `ramp_seconds`.
    pub fn with_ramp_seconds(ramp_seconds: f32) -> Self {
        Self {
            input: GainStage::with_ramp_seconds(ramp_seconds),
            bias: BiasStage::with_ramp_seconds(BIAS_RAMP_SECONDS),
            output: GainStage::with_ramp_seconds(ramp_seconds),
            channels: 0,
            last_controls: None,
        }
    }

    /// Current bias offset.
    pub fn bias(&self) -> f32 {
        self.bias.current()
    }

    fn apply_controls(&mut self, controls: &ControlSnapshot) {
        if self.last_controls == Some(*controls) {
            return;
        }
        if self.last_controls.is_none() {
            self.input.set_immediate_decibels(controls.input_db);
            self.bias.set_immediate(controls.bias);
            self.output.set_immediate_decibels(controls.trim_db);
        } else {
            self.input.set_target_decibels(controls.input_db);
            self.bias.set_target(controls.bias);
            self.output.set_target_decibels(controls.trim_db);
        }
        self.last_controls = Some(*controls);
    }
}

impl Default for BiasDrive {
    fn default() -> Self {
        Self::new()
    }
}

impl Processor for BiasDrive {
    fn controls(&self) -> &'static [ControlDescriptor] {
        BIAS_DRIVE_CONTROLS
    }

    fn prepare(&mut self, spec: &ProcessSpec) -> Result<(), PrepareError> {
        self.channels = 0;
        spec.validate()?;
        self.input.prepare(spec.sample_rate);
        self.bias.prepare(spec.sample_rate);
        self.output.prepare(spec.sample_rate);
        self.last_controls = None;
        self.channels = spec.num_channels;
        Ok(())
    }

    fn process(&mut self, buffer: &mut [&mut [f32]], controls: &ControlSnapshot) {
        if self.channels == 0 {
            silence(buffer);
            return;
        }
        let active = split_prepared(buffer, self.channels);

        self.apply_controls(controls);
        self.input.process(active);
        self.bias.process(active);
        for channel in active.iter_mut() {
            FastTanh.shape_slice(channel);
        }
        self.output.process(active);
    }

    fn reset(&mut self) {
        self.input.reset();
        self.bias.reset();
        self.output.reset();
        self.last_controls = None;
    }
}
