//! Input gain → waveshaper → output trim chains.
//!
//! Most effects share the same shape: a ramped input gain, a memoryless
//! waveshaper, and a ramped output trim. [`ProcessingChain`] implements that
//! once, generic over a [`ChainShaper`] that names its controls and maps a
//! control snapshot onto the shaper.

use grit_core::{
    ControlDescriptor, ControlId, ControlSnapshot, DEFAULT_RAMP_SECONDS, DcDistortion, DiodeLaw,
    FullWave, GainStage, HalfWave, LinearClip, PrepareError, ProcessSpec, Processor,
    ShaperModel, ThresholdClip, Waveshaper, block_len, silence,
};

/// Silence channels beyond `channels` and return the rest.
///
/// The returned channels are cut to the buffer's frame count, so every
/// stage sees the same number of samples.
pub(crate) fn split_prepared<'a, 'b>(
    buffer: &'a mut [&'b mut [f32]],
    channels: usize,
) -> &'a mut [&'b mut [f32]] {
    let frames = block_len(buffer);
    let active = buffer.len().min(channels);
    let (active, extra) = buffer.split_at_mut(active);
    silence(extra);
    for channel in active.iter_mut() {
        let samples = core::mem::take(channel);
        *channel = &mut samples[..frames];
    }
    active
}

/// Input, drive and trim, shared by the drive-based clippers.
pub const CLIPPER_CONTROLS: &[ControlDescriptor] = &[
    ControlDescriptor::decibels(ControlId::Input, "Input", -24.0, 24.0, 0.0),
    ControlDescriptor::decibels(ControlId::Drive, "Drive", 0.0, 24.0, 0.0),
    ControlDescriptor::decibels(ControlId::Trim, "Trim", -24.0, 24.0, 0.0),
];

/// Input and trim for the rectifiers.
pub const RECTIFIER_CONTROLS: &[ControlDescriptor] = &[
    ControlDescriptor::decibels(ControlId::Input, "Input", -24.0, 24.0, 0.0),
    ControlDescriptor::decibels(ControlId::Trim, "Trim", -24.0, 24.0, 0.0),
];

/// Drive, trim and model for the switchable saturator.
pub const SATURATOR_CONTROLS: &[ControlDescriptor] = &[
    ControlDescriptor::decibels(ControlId::Drive, "Drive", 0.0, 24.0, 0.0),
    ControlDescriptor::decibels(ControlId::Trim, "Trim", -36.0, 36.0, 0.0),
    ControlDescriptor::selector(ControlId::Model, "Model", ShaperModel::COUNT),
];

/// The shaping stage of a [`ProcessingChain`].
pub trait ChainShaper: Default {
    /// Controls exposed by the chain, in display order.
    const CONTROLS: &'static [ControlDescriptor];

    /// Apply new control values.
    fn update(&mut self, controls: &ControlSnapshot);

    /// Shape one channel in place.
    fn shape(&self, samples: &mut [f32]);

    /// Extra output gain in dB added to the trim control.
    fn trim_compensation_db(&self, _controls: &ControlSnapshot) -> f32 {
        0.0
    }
}

impl ChainShaper for ShaperModel {
    const CONTROLS: &'static [ControlDescriptor] = SATURATOR_CONTROLS;

    fn update(&mut self, controls: &ControlSnapshot) {
        let index = controls.model_index().min(Self::COUNT - 1);
        if index == self.index() {
            self.set_drive(controls.drive);
        } else {
            *self = ShaperModel::from_index(index, controls.drive);
        }
    }

    fn shape(&self, samples: &mut [f32]) {
        self.shape_slice(samples);
    }
}

impl ChainShaper for ThresholdClip {
    const CONTROLS: &'static [ControlDescriptor] = CLIPPER_CONTROLS;

    fn update(&mut self, controls: &ControlSnapshot) {
        self.set_drive(controls.drive);
    }

    fn shape(&self, samples: &mut [f32]) {
        self.shape_slice(samples);
    }
}

impl ChainShaper for LinearClip {
    const CONTROLS: &'static [ControlDescriptor] = CLIPPER_CONTROLS;

    fn update(&mut self, controls: &ControlSnapshot) {
        self.set_drive(controls.drive);
    }

    fn shape(&self, samples: &mut [f32]) {
        self.shape_slice(samples);
    }
}

impl ChainShaper for DiodeLaw {
    const CONTROLS: &'static [ControlDescriptor] = CLIPPER_CONTROLS;

    fn update(&mut self, controls: &ControlSnapshot) {
        self.set_drive(controls.drive);
    }

    fn shape(&self, samples: &mut [f32]) {
        self.shape_slice(samples);
    }

    /// The diode curve grows with input and drive; the trim undoes both.
    fn trim_compensation_db(&self, controls: &ControlSnapshot) -> f32 {
        -(controls.input_db + controls.drive)
    }
}

impl ChainShaper for DcDistortion {
    const CONTROLS: &'static [ControlDescriptor] = CLIPPER_CONTROLS;

    fn update(&mut self, controls: &ControlSnapshot) {
        self.set_drive(controls.drive);
    }

    fn shape(&self, samples: &mut [f32]) {
        self.shape_slice(samples);
    }
}

impl ChainShaper for FullWave {
    const CONTROLS: &'static [ControlDescriptor] = RECTIFIER_CONTROLS;

    fn update(&mut self, _controls: &ControlSnapshot) {}

    fn shape(&self, samples: &mut [f32]) {
        self.shape_slice(samples);
    }
}

impl ChainShaper for HalfWave {
    const CONTROLS: &'static [ControlDescriptor] = RECTIFIER_CONTROLS;

    fn update(&mut self, _controls: &ControlSnapshot) {}

    fn shape(&self, samples: &mut [f32]) {
        self.shape_slice(samples);
    }
}

/// Ramped input gain, a waveshaper, then ramped output trim.
///
/// Gain changes glide linearly over the ramp time. The first block after
/// `prepare` or `reset` starts at the snapshot's values without a glide.
///
/// # Example
///
/// ```rust
/// use grit_core::{ControlSnapshot, ProcessSpec, Processor};
/// use grit_effects::FullWaveRectifier;
///
/// let mut rectifier = FullWaveRectifier::new();
/// rectifier.prepare(&ProcessSpec::new(48000.0, 4, 1)).unwrap();
///
/// let mut mono = [-0.5_f32, 0.25, -1.0, 0.0];
/// rectifier.process(&mut [&mut mono[..]], &ControlSnapshot::default());
/// assert_eq!(mono, [0.5, 0.25, 1.0, 0.0]);
/// ```
#[derive(Debug, Clone)]
pub struct ProcessingChain<S> {
    shaper: S,
    input: GainStage,
    trim: GainStage,
    channels: usize,
    last_controls: Option<ControlSnapshot>,
}

impl<S: ChainShaper> ProcessingChain<S> {
    /// Create an unprepared chain with the default ramp time.
    pub fn new() -> Self {
        Self::with_ramp_seconds(DEFAULT_RAMP_SECONDS)
    }

    /// Create an unprepared chain whose gain stages glide over
    /// `ramp_seconds`.
    pub fn with_ramp_seconds(ramp_seconds: f32) -> Self {
        Self {
            shaper: S::default(),
            input: GainStage::with_ramp_seconds(ramp_seconds),
            trim: GainStage::with_ramp_seconds(ramp_seconds),
            channels: 0,
            last_controls: None,
        }
    }

    /// The shaping stage.
    pub fn shaper(&self) -> &S {
        &self.shaper
    }

    /// Input gain stage.
    pub fn input_stage(&self) -> &GainStage {
        &self.input
    }

    /// Output trim stage.
    pub fn trim_stage(&self) -> &GainStage {
        &self.trim
    }

    fn apply_controls(&mut self, controls: &ControlSnapshot) {
        if self.last_controls == Some(*controls) {
            return;
        }
        self.shaper.update(controls);
        let trim_db = controls.trim_db + self.shaper.trim_compensation_db(controls);
        if self.last_controls.is_none() {
            self.input.set_immediate_decibels(controls.input_db);
            self.trim.set_immediate_decibels(trim_db);
        } else {
            self.input.set_target_decibels(controls.input_db);
            self.trim.set_target_decibels(trim_db);
        }
        self.last_controls = Some(*controls);
    }
}

impl<S: ChainShaper> Default for ProcessingChain<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ChainShaper> Processor for ProcessingChain<S> {
    fn controls(&self) -> &'static [ControlDescriptor] {
        S::CONTROLS
    }

    fn prepare(&mut self, spec: &ProcessSpec) -> Result<(), PrepareError> {
        self.channels = 0;
        spec.validate()?;
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
            self.shaper.shape(channel);
        }
        self.trim.process(active);
    }

    fn reset(&mut self) {
        self.input.reset();
        self.trim.reset();
        self.last_controls = None;
    }
}

/// Switchable waveshaper with drive and trim.
pub type Saturator = ProcessingChain<ShaperModel>;
/// Log-knob threshold clipper.
pub type HardClipper = ProcessingChain<ThresholdClip>;
/// Linear-dial threshold clipper without make-up gain.
pub type LinearClipper = ProcessingChain<LinearClip>;
/// Exponential diode clipper with automatic level compensation.
pub type DiodeClipper = ProcessingChain<DiodeLaw>;
/// DC-biased polynomial distortion.
pub type DcDistortionChain = ProcessingChain<DcDistortion>;
/// Full-wave rectifier.
pub type FullWaveRectifier = ProcessingChain<FullWave>;
/// Half-wave rectifier.
pub type HalfWaveRectifier = ProcessingChain<HalfWave>;
