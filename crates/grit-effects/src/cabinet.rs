//! Speaker cabinet simulation.

use crate::chain::split_prepared;
use crate::convolution::ConvolutionEngine;
use grit_core::{
    Atan, ControlDescriptor, ControlId, ControlSnapshot, DEFAULT_RAMP_SECONDS, GainStage,
    ImpulseResponse, PrepareError, ProcessSpec, Processor, TONE_MAX_DB, TONE_MIN_DB, ToneFilter,
    Waveshaper, silence,
};

/// Input, tone and trim controls.
pub const CABINET_CONTROLS: &[ControlDescriptor] = &[
    ControlDescriptor::decibels(ControlId::Input, "Input", -15.0, 7.0, 0.0),
    ControlDescriptor::decibels(ControlId::Tone, "Tone", TONE_MIN_DB, TONE_MAX_DB, 0.0),
    ControlDescriptor::decibels(ControlId::Trim, "Trim", -24.0, 24.0, 0.0),
];

/// Input gain, atan saturation, cabinet convolution, tone shelf, trim.
///
/// The impulse response is fixed at construction; with
/// [`ImpulseResponse::unit`] the convolution stage passes audio unchanged.
pub struct CabinetSim {
    input: GainStage,
    convolution: ConvolutionEngine,
    tone: ToneFilter,
    trim: GainStage,
    channels: usize,
    last_controls: Option<ControlSnapshot>,
}

impl CabinetSim {
    /// Create an unprepared cabinet for `ir` with the default gain ramp.
    pub fn new(ir: ImpulseResponse) -> Self {
        Self::with_ramp_seconds(ir, DEFAULT_RAMP_SECONDS)
    }

    /// Create an unprepared cabinet whose gain stages glide over
    /// `ramp_seconds`.
    pub fn with_ramp_seconds(ir: ImpulseResponse, ramp_seconds: f32) -> Self {
        Self {
            input: GainStage::with_ramp_seconds(ramp_seconds),
            convolution: ConvolutionEngine::new(ir),
            tone: ToneFilter::new(),
            trim: GainStage::with_ramp_seconds(ramp_seconds),
            channels: 0,
            last_controls: None,
        }
    }

    /// The cabinet impulse response.
    pub fn impulse_response(&self) -> &ImpulseResponse {
        self.convolution.impulse_response()
    }

    /// The tone shelf stage.
    pub fn tone(&self) -> &ToneFilter {
        &self.tone
    }

    fn apply_controls(&mut self, controls: &ControlSnapshot) {
        if self.last_controls == Some(*controls) {
            return;
        }
        self.tone.update_coefficients(controls.tone_db);
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

impl Processor for CabinetSim {
    fn controls(&self) -> &'static [ControlDescriptor] {
        CABINET_CONTROLS
    }

    fn prepare(&mut self, spec: &ProcessSpec) -> Result<(), PrepareError> {
        self.channels = 0;
        spec.validate()?;
        self.convolution.prepare(spec)?;
        self.tone.prepare(spec)?;
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
        self.input.process(active);
        for channel in active.iter_mut() {
            Atan.shape_slice(channel);
        }
        self.convolution.process(active);
        self.tone.process(active);
        self.trim.process(active);
    }

    fn reset(&mut self) {
        self.convolution.reset();
        self.tone.reset();
        self.input.reset();
        self.trim.reset();
        self.last_controls = None;
    }
}
