//! Grit Effects - distortion, rectifier and cabinet effect chains
//!
//! This crate assembles the grit-core primitives into complete processors:
//!
//! - [`Saturator`] - Switchable soft/hard/DC/diode/rectifier shaper
//! - [`HardClipper`] - Threshold clipper with a logarithmic knob
//! - [`LinearClipper`] - Threshold clipper with a linear knob
//! - [`DiodeClipper`] - Exponential diode clipper with level compensation
//! - [`DcDistortionChain`] - DC-biased polynomial distortion
//! - [`FullWaveRectifier`] / [`HalfWaveRectifier`] - Rectifiers
//! - [`BiasDrive`] - Ramped DC bias into tanh
//! - [`CabinetSim`] - Atan drive, zero-latency IR convolution and tone shelf
//! - [`PedalSim`] - IR convolution into a tanh-cubic-tanh voicing
//!
//! [`EffectKind`] is the catalogue, and [`Session`] pairs a processor with a
//! thread-safe control store.
//!
//! ## Example
//!
//! ```rust
//! use grit_effects::{EffectKind, EngineConfig, Session};
//!
//! let mut session = Session::new(EffectKind::Saturator, EngineConfig::default()).unwrap();
//! session.set_control("drive", 12.0).unwrap();
//! session.prepare(48000.0, 2).unwrap();
//!
//! let mut left = vec![0.25_f32; 256];
//! let mut right = vec![0.25_f32; 256];
//! session.process(&mut [&mut left[..], &mut right[..]]);
//! assert!(left.iter().all(|s| s.abs() <= 1.5));
//! ```

pub mod bias;
pub mod cabinet;
pub mod chain;
pub mod convolution;
pub mod error;
pub mod pedal;
pub mod registry;
pub mod session;

// Re-export main types at crate root
pub use bias::{BIAS_DRIVE_CONTROLS, BIAS_RAMP_SECONDS, BiasDrive};
pub use cabinet::{CABINET_CONTROLS, CabinetSim};
pub use chain::{
    CLIPPER_CONTROLS, ChainShaper, DcDistortionChain, DiodeClipper, FullWaveRectifier,
    HalfWaveRectifier, HardClipper, LinearClipper, ProcessingChain, RECTIFIER_CONTROLS,
    SATURATOR_CONTROLS, Saturator,
};
pub use convolution::ConvolutionEngine;
pub use error::EffectError;
pub use pedal::{PEDAL_CONTROLS, PedalSim};
pub use registry::{DEFAULT_BLOCK_SIZE, EffectCategory, EffectKind, EngineConfig};
pub use session::Session;

pub use grit_core::{ControlSnapshot, ImpulseResponse, ProcessSpec, Processor};
