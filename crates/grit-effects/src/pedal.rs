//! Impulse-response pedal voicing.

use crate::chain::split_prepared;
use crate::convolution::ConvolutionEngine;
use grit_core::{
    ControlDescriptor, ControlId, ControlSnapshot, DEFAULT_RAMP_SECONDS, FastTanh, GainStage,
    ImpulseResponse, PedalCurve, PrepareError, ProcessSpec, Processor, Waveshaper, silence,
};

/// Input and trim controls.
pub const PEDAL_CONTROLS: &[ControlDescriptor] = &[
    ControlDescriptor::decibels(ControlId::Input, "Input", -15.0, 7.0, 0.0),
    ControlDescriptor::decibels(ControlId::Trim, "Trim", -24.0, 24.0, 0.0),
];

/// Convolution, input gain, then `tanh → −18x³ + 23x² − 5x → tanh`, trim.
///
/// The impulse response colours the dry signal before any gain, so the
/// input control only changes how hard the saturators are hit.
pub struct PedalSim {
    convolution: ConvolutionEngine,
    input: GainStage,
    trim: GainStage,
    channels: usize,
    last_controls: Option<ControlSnapshot>,
}

impl PedalSim {
    /// Create an unprepared pedal for `ir` with the default gain ramp.
    pub fn new(ir: ImpulseResponse) -> Self {
        Self::with_ramp_seconds(ir, DEFAULT_RAMP_SECONDS)
    }

    /// Create an unprepared pedal whose gain stages glide over
    /// `ramp_seconds`.
    pub fn with_ramp_seconds(ir: ImpulseResponse, ramp_seconds: f32) -> Self {
        Self {
            convolution: ConvolutionEngine::new(ir),
            input: GainStage::with_ramp_seconds(ramp_seconds),
            trim: GainStage::with_ramp_seconds(ramp_seconds),
            channels: 0,
            last_controls: None,
        }
    }

    /// The pedal impulse response.
    pub fn impulse_response(&self) -> &ImpulseResponse {
        self.convolution.impulse_response()
    }

    fn apply_controls(&mut self, controls: &ControlSnapshot) {
        if self.last_controls == Some(*controls) {
            return;
        }
        if self.last_controls.is_none() {
            self.input.set_immediate_decibels(controls.input_db);
            self.trim.set_immediate_decibels(controls.trim_db);
        } else {
            self.input.set_target_decibels(controls.input_db);
            self.trim.set_target_decibels(controls.trim_db);
        }
        self.last_controls = Some(*controls);
    }
}

impl Processor for PedalSim {
    fn controls(&self) -> &'static [ControlDescriptor] {
        PEDAL_CONTROLS
    }

    fn prepare(&mut self, spec: &ProcessSpec) -> Result<(), PrepareError> {
        self.channels = 0;
        spec.validate()?;
        self.convolution.prepare(spec)?;
        self.input.prepare(spec.sample_rate);
        self.trim.prepare(spec.sample_rate);
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
        self.convolution.process(active);
        self.input.process(active);
        for channel in active.iter_mut() {
            FastTanh.shape_slice(channel);
            PedalCurve.shape_slice(channel);
            FastTanh.shape_slice(channel);
        }
        self.trim.process(active);
    }

    fn reset(&mut self) {
        self.convolution.reset();
        self.input.reset();
        self.trim.reset();
        self.last_controls = None;
    }
}
