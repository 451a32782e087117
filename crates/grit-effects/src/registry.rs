//! Effect catalogue and factory.
//!
//! Every effect has a stable string id, display metadata, and a static
//! list of control descriptors. [`EffectKind::create`] builds a boxed
//! [`Processor`] for it.
//!
//! # Example
//!
//! ```rust
//! use grit_effects::{EffectCategory, EffectKind, EngineConfig};
//!
//! for kind in EffectKind::all() {
//!     println!("{}: {}", kind.id(), kind.description());
//! }
//!
//! let kind = EffectKind::from_id("diode-clipper").unwrap();
//! assert_eq!(kind.category(), EffectCategory::Distortion);
//! let processor = kind.create(&EngineConfig::default());
//! assert_eq!(processor.controls().len(), 3);
//! ```

use crate::bias::{BIAS_DRIVE_CONTROLS, BiasDrive};
use crate::cabinet::{CABINET_CONTROLS, CabinetSim};
use crate::chain::{
    CLIPPER_CONTROLS, DcDistortionChain, DiodeClipper, FullWaveRectifier, HalfWaveRectifier,
    HardClipper, LinearClipper, RECTIFIER_CONTROLS, SATURATOR_CONTROLS, Saturator,
};
use crate::error::EffectError;
use crate::pedal::{PEDAL_CONTROLS, PedalSim};
use grit_core::{ControlDescriptor, DEFAULT_RAMP_SECONDS, ImpulseResponse, Processor};

/// Default maximum block size for sessions.
pub const DEFAULT_BLOCK_SIZE: usize = 512;

/// Category of effect for organization and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectCategory {
    /// Clippers, saturators and waveshapers
    Distortion,
    /// Full- and half-wave rectification
    Rectifier,
    /// Impulse-response cabinet and pedal simulation
    Cabinet,
}

impl EffectCategory {
    /// Every category, in catalogue order.
    pub const ALL: [EffectCategory; 3] = [
        EffectCategory::Distortion,
        EffectCategory::Rectifier,
        EffectCategory::Cabinet,
    ];

    /// Returns a human-readable name for the category.
    pub const fn name(&self) -> &'static str {
        match self {
            EffectCategory::Distortion => "Distortion",
            EffectCategory::Rectifier => "Rectifier",
            EffectCategory::Cabinet => "Cabinet",
        }
    }

    /// Returns a description of the category.
    pub const fn description(&self) -> &'static str {
        match self {
            EffectCategory::Distortion => "Clipping, saturation and waveshaping effects",
            EffectCategory::Rectifier => "Full- and half-wave rectifiers",
            EffectCategory::Cabinet => "Impulse-response cabinet and pedal simulation",
        }
    }
}

/// Settings shared by every processor a session creates.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Largest block passed to `process`.
    pub max_block_size: usize,
    /// Glide time for input and trim gain changes, in seconds.
    pub ramp_seconds: f32,
    /// Cabinet or pedal impulse response. `None` uses a unit impulse.
    pub impulse_response: Option<ImpulseResponse>,
}

impl EngineConfig {
    /// Set the maximum block size.
    pub fn with_max_block_size(mut self, max_block_size: usize) -> Self {
        self.max_block_size = max_block_size;
        self
    }

    /// Set the gain ramp time.
    pub fn with_ramp_seconds(mut self, ramp_seconds: f32) -> Self {
        self.ramp_seconds = ramp_seconds;
        self
    }

    /// Set the cabinet or pedal impulse response.
    pub fn with_impulse_response(mut self, ir: ImpulseResponse) -> Self {
        self.impulse_response = Some(ir);
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_block_size: DEFAULT_BLOCK_SIZE,
            ramp_seconds: DEFAULT_RAMP_SECONDS,
            impulse_response: None,
        }
    }
}

/// Every effect grit provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    /// Switchable waveshaper with drive and trim
    Saturator,
    /// Log-knob threshold clipper
    HardClipper,
    /// Linear-knob threshold clipper without make-up gain
    LinearClipper,
    /// Exponential diode clipper
    DiodeClipper,
    /// DC-biased polynomial distortion
    DcDistortion,
    /// Full-wave rectifier
    FullWave,
    /// Half-wave rectifier
    HalfWave,
    /// DC bias into tanh
    BiasDrive,
    /// Atan drive, cabinet IR and tone shelf
    Cabinet,
    /// Pedal IR into a tanh-polynomial-tanh voicing
    Pedal,
}

impl EffectKind {
    const ALL: [EffectKind; 10] = [
        EffectKind::Saturator,
        EffectKind::HardClipper,
        EffectKind::LinearClipper,
        EffectKind::DiodeClipper,
        EffectKind::DcDistortion,
        EffectKind::FullWave,
        EffectKind::HalfWave,
        EffectKind::BiasDrive,
        EffectKind::Cabinet,
        EffectKind::Pedal,
    ];

    /// All effects, in catalogue order.
    pub fn all() -> &'static [EffectKind] {
        &Self::ALL
    }

    /// Effects in `category`.
    pub fn in_category(category: EffectCategory) -> impl Iterator<Item = EffectKind> {
        Self::ALL
            .into_iter()
            .filter(move |kind| kind.category() == category)
    }

    /// Look up an effect by its string id.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }

    /// Stable string id (lowercase, hyphenated).
    pub const fn id(&self) -> &'static str {
        match self {
            EffectKind::Saturator => "saturator",
            EffectKind::HardClipper => "hard-clipper",
            EffectKind::LinearClipper => "linear-clipper",
            EffectKind::DiodeClipper => "diode-clipper",
            EffectKind::DcDistortion => "dc-distortion",
            EffectKind::FullWave => "full-wave",
            EffectKind::HalfWave => "half-wave",
            EffectKind::BiasDrive => "bias-drive",
            EffectKind::Cabinet => "cabinet",
            EffectKind::Pedal => "pedal",
        }
    }

    /// Human-readable name.
    pub const fn name(&self) -> &'static str {
        match self {
            EffectKind::Saturator => "Saturator",
            EffectKind::HardClipper => "Hard Clipper",
            EffectKind::LinearClipper => "Linear Clipper",
            EffectKind::DiodeClipper => "Diode Clipper",
            EffectKind::DcDistortion => "DC Distortion",
            EffectKind::FullWave => "Full Wave Rectifier",
            EffectKind::HalfWave => "Half Wave Rectifier",
            EffectKind::BiasDrive => "Bias Drive",
            EffectKind::Cabinet => "Cabinet",
            EffectKind::Pedal => "Pedal",
        }
    }

    /// Brief description.
    pub const fn description(&self) -> &'static str {
        match self {
            EffectKind::Saturator => "Soft, hard, DC, diode and rectifier shapers behind one selector",
            EffectKind::HardClipper => "Hard clipper with a logarithmic threshold knob",
            EffectKind::LinearClipper => "Hard clipper with a linear threshold knob",
            EffectKind::DiodeClipper => "Exponential diode clipper with level compensation",
            EffectKind::DcDistortion => "Asymmetric polynomial distortion around a DC bias",
            EffectKind::FullWave => "Absolute value rectifier",
            EffectKind::HalfWave => "Passes the positive half of the waveform",
            EffectKind::BiasDrive => "Ramped DC bias into a tanh saturator",
            EffectKind::Cabinet => "Atan drive into an impulse-response cabinet and tone shelf",
            EffectKind::Pedal => "Impulse-response pedal voiced by two tanh stages around a cubic",
        }
    }

    /// Category for organization.
    pub const fn category(&self) -> EffectCategory {
        match self {
            EffectKind::FullWave | EffectKind::HalfWave => EffectCategory::Rectifier,
            EffectKind::Cabinet | EffectKind::Pedal => EffectCategory::Cabinet,
            _ => EffectCategory::Distortion,
        }
    }

    /// Controls the effect exposes, in display order.
    pub const fn descriptors(&self) -> &'static [ControlDescriptor] {
        match self {
            EffectKind::Saturator => SATURATOR_CONTROLS,
            EffectKind::HardClipper
            | EffectKind::LinearClipper
            | EffectKind::DiodeClipper
            | EffectKind::DcDistortion => CLIPPER_CONTROLS,
            EffectKind::FullWave | EffectKind::HalfWave => RECTIFIER_CONTROLS,
            EffectKind::BiasDrive => BIAS_DRIVE_CONTROLS,
            EffectKind::Cabinet => CABINET_CONTROLS,
            EffectKind::Pedal => PEDAL_CONTROLS,
        }
    }

    /// Descriptor of the control with string id `control`.
    pub fn descriptor(&self, control: &str) -> Option<&'static ControlDescriptor> {
        self.descriptors()
            .iter()
            .find(|descriptor| descriptor.string_id() == control)
    }

    /// Whether the effect reads an impulse response.
    pub const fn uses_impulse_response(&self) -> bool {
        matches!(self, EffectKind::Cabinet | EffectKind::Pedal)
    }

    /// Build an unprepared processor for this effect.
    pub fn create(&self, config: &EngineConfig) -> Box<dyn Processor + Send> {
        let ramp = config.ramp_seconds;
        match self {
            EffectKind::Saturator => Box::new(Saturator::with_ramp_seconds(ramp)),
            EffectKind::HardClipper => Box::new(HardClipper::with_ramp_seconds(ramp)),
            EffectKind::LinearClipper => Box::new(LinearClipper::with_ramp_seconds(ramp)),
            EffectKind::DiodeClipper => Box::new(DiodeClipper::with_ramp_seconds(ramp)),
            EffectKind::DcDistortion => Box::new(DcDistortionChain::with_ramp_seconds(ramp)),
            EffectKind::FullWave => Box::new(FullWaveRectifier::with_ramp_seconds(ramp)),
            EffectKind::HalfWave => Box::new(HalfWaveRectifier::with_ramp_seconds(ramp)),
            EffectKind::BiasDrive => Box::new(BiasDrive::with_ramp_seconds(ramp)),
            EffectKind::Cabinet => {
                let ir = config.impulse_response.clone().unwrap_or_default();
                Box::new(CabinetSim::with_ramp_seconds(ir, ramp))
            }
            EffectKind::Pedal => {
                let ir = config.impulse_response.clone().unwrap_or_default();
                Box::new(PedalSim::with_ramp_seconds(ir, ramp))
            }
        }
    }
}

impl core::fmt::Display for EffectKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.id())
    }
}

impl core::str::FromStr for EffectKind {
    type Err = EffectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(s).ok_or_else(|| EffectError::UnknownEffect(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grit_core::{ControlSnapshot, ProcessSpec};
    use std::collections::HashSet;

    #[test]
    fn ids_are_unique_and_resolve() {
        let ids: HashSet<_> = EffectKind::all().iter().map(|kind| kind.id()).collect();
        assert_eq!(ids.len(), EffectKind::all().len());
        for kind in EffectKind::all() {
            assert_eq!(EffectKind::from_id(kind.id()), Some(*kind));
            assert_eq!(kind.id().parse::<EffectKind>(), Ok(*kind));
        }
    }

    #[test]
    fn unknown_id_is_an_error() {
        assert_eq!(EffectKind::from_id("fuzz"), None);
        assert_eq!(
            "fuzz".parse::<EffectKind>(),
            Err(EffectError::UnknownEffect("fuzz".into()))
        );
    }

    #[test]
    fn descriptors_are_valid_and_match_processors() {
        let config = EngineConfig::default();
        for kind in EffectKind::all() {
            for descriptor in kind.descriptors() {
                assert!(descriptor.validate().is_ok(), "{kind}: {}", descriptor.name);
            }
            assert_eq!(kind.create(&config).controls(), kind.descriptors());
        }
    }

    #[test]
    fn every_effect_processes_a_block() {
        let config = EngineConfig::default().with_ramp_seconds(0.0);
        let spec = ProcessSpec::new(48000.0, 64, 2);
        for kind in EffectKind::all() {
            let mut processor = kind.create(&config);
            processor.prepare(&spec).unwrap();
            let mut left: Vec<f32> = (0..64).map(|i| libm::sinf(i as f32 * 0.1) * 0.5).collect();
            let mut right = left.clone();
            processor.process(&mut [&mut left[..], &mut right[..]], &ControlSnapshot::default());
            assert!(left.iter().all(|s| s.is_finite()), "{kind} produced non-finite output");
            assert_eq!(left, right, "{kind} treats channels differently");
        }
    }

    #[test]
    fn categories_partition_catalogue() {
        let total: usize = [
            EffectCategory::Distortion,
            EffectCategory::Rectifier,
            EffectCategory::Cabinet,
        ]
        .into_iter()
        .map(|category| EffectKind::in_category(category).count())
        .sum();
        assert_eq!(total, EffectKind::all().len());
        assert_eq!(EffectKind::in_category(EffectCategory::Rectifier).count(), 2);
        assert_eq!(EffectKind::in_category(EffectCategory::Cabinet).count(), 2);
    }

    #[test]
    fn control_lookup_by_string_id() {
        let kind = EffectKind::Cabinet;
        assert_eq!(kind.descriptor("tone").map(|d| d.max), Some(12.0));
        assert!(kind.descriptor("drive").is_none());
        assert!(kind.uses_impulse_response());
        assert!(EffectKind::Pedal.uses_impulse_response());
        assert!(!EffectKind::Saturator.uses_impulse_response());
        assert!(EffectKind::LinearClipper.descriptor("drive").is_some());
    }
}
