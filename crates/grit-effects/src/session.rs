//! A prepared effect plus its shared control store.

use crate::error::EffectError;
use crate::registry::{EffectKind, EngineConfig};
use grit_core::{ControlId, PrepareError, ProcessSpec, Processor, SharedControls, silence};
use std::sync::Arc;

/// One effect instance ready for block processing.
///
/// Controls live in an [`Arc<SharedControls>`] that any thread can write;
/// [`process`](Session::process) takes one snapshot per block. Until
/// [`prepare`](Session::prepare) succeeds the session outputs silence.
///
/// # Example
///
/// ```rust
/// use grit_effects::{EffectKind, EngineConfig, Session};
///
/// let mut session = Session::new(EffectKind::HalfWave, EngineConfig::default()).unwrap();
/// session.prepare(48000.0, 1).unwrap();
///
/// let mut mono = [0.5_f32, -0.5];
/// session.process(&mut [&mut mono[..]]);
/// assert_eq!(mono, [0.5, 0.0]);
/// ```
pub struct Session {
    kind: EffectKind,
    config: EngineConfig,
    processor: Box<dyn Processor + Send>,
    controls: Arc<SharedControls>,
    spec: Option<ProcessSpec>,
}

impl Session {
    /// Create an unprepared session for `kind`, controls at their defaults.
    pub fn new(kind: EffectKind, config: EngineConfig) -> Result<Self, EffectError> {
        let controls = Arc::new(SharedControls::new(kind.descriptors())?);
        let processor = kind.create(&config);
        Ok(Self {
            kind,
            config,
            processor,
            controls,
            spec: None,
        })
    }

    /// Prepare for `sample_rate` and `num_channels` at the configured block
    /// size.
    ///
    /// On failure the session stays unprepared and outputs silence.
    pub fn prepare(&mut self, sample_rate: f64, num_channels: usize) -> Result<(), PrepareError> {
        let spec = ProcessSpec::new(sample_rate, self.config.max_block_size, num_channels);
        self.spec = None;
        if let Err(err) = self.processor.prepare(&spec) {
            tracing::warn!(effect = self.kind.id(), error = %err, "prepare failed");
            return Err(err);
        }
        tracing::debug!(
            effect = self.kind.id(),
            sample_rate,
            max_block_size = spec.max_block_size,
            num_channels,
            "session prepared"
        );
        self.spec = Some(spec);
        Ok(())
    }

    /// Process one block in place.
    ///
    /// Every processor accepts blocks of any length, so blocks longer than
    /// the configured maximum go through unchanged. Nothing here allocates.
    pub fn process(&mut self, buffer: &mut [&mut [f32]]) {
        if self.spec.is_none() {
            silence(buffer);
            return;
        }
        let snapshot = self.controls.snapshot();
        self.processor.process(buffer, &snapshot);
    }

    /// Clear signal state. Controls keep their values.
    pub fn reset(&mut self) {
        self.processor.reset();
    }

    /// Set a control by its string id, returning the clamped value.
    pub fn set_control(&self, control: &str, value: f32) -> Result<f32, EffectError> {
        let unknown = || EffectError::UnknownControl {
            effect: self.kind.id(),
            control: control.to_owned(),
        };
        let id = ControlId::from_str_id(control).ok_or_else(unknown)?;
        self.controls.set(id, value).ok_or_else(unknown)
    }

    /// The shared control store.
    pub fn controls(&self) -> &Arc<SharedControls> {
        &self.controls
    }

    /// Which effect this session runs.
    pub fn kind(&self) -> EffectKind {
        self.kind
    }

    /// The configuration the session was created with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The active processing spec, once prepared.
    pub fn spec(&self) -> Option<&ProcessSpec> {
        self.spec.as_ref()
    }

    /// Whether `prepare` has succeeded.
    pub fn is_prepared(&self) -> bool {
        self.spec.is_some()
    }

    /// Processing latency in samples.
    pub fn latency_samples(&self) -> usize {
        self.processor.latency_samples()
    }
}
