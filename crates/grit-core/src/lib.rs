//! Grit Core - waveshaping and gain-staging primitives
//!
//! This crate provides the per-sample building blocks behind the grit effects:
//! deterministic transfer functions, smoothed gain stages, a shelving tone
//! filter, and the control/processor contract every effect chain implements.
//! Nothing in the audio path allocates, locks, or blocks.
//!
//! # Core Abstractions
//!
//! ## Processing Contract
//!
//! - [`Processor`] - `prepare` / `process` / `reset` over multi-channel blocks
//! - [`ProcessSpec`] - Sample rate, maximum block size, channel count
//! - [`ControlSnapshot`] - Control values resolved once per block
//!
//! ## Controls
//!
//! - [`ControlDescriptor`] - Range, unit and default of a named control
//! - [`ControlParameter`] - Range-bounded value (always clamped)
//! - [`SharedControls`] - Lock-free control store written by UI/automation
//!
//! ## Waveshaping
//!
//! - Free functions: [`soft_clip`], [`hard_clip`], [`linear_clip`], [`diode`],
//!   [`diode_law`], [`dc_distortion`], [`full_wave_rectify`],
//!   [`half_wave_rectify`], [`atan_saturate`], [`pedal_curve`]
//! - Per-block configured shapers implementing [`Waveshaper`]
//! - [`fast_tanh`] - Padé approximation used by the bias-drive and pedal chains
//!
//! ## Gain & Filtering
//!
//! - [`LinearRamp`] - Linear, never-overshooting parameter ramp
//! - [`GainStage`] - Ramped dB gain over a multi-channel block
//! - [`BiasStage`] - Ramped DC offset
//! - [`ToneFilter`] - High-shelf biquad with per-channel state
//!
//! ## Utilities
//!
//! - Mapping functions: [`db_to_linear`], [`linear_to_db`], [`rescale`],
//!   [`log_knob`], [`threshold_knob`]
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible (it needs `alloc` for per-channel
//! filter state and impulse responses). Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! grit-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use grit_core::{GainStage, soft_clip};
//!
//! let mut input = GainStage::with_ramp_seconds(0.0);
//! input.prepare(48000.0);
//! input.set_target_decibels(6.0);
//!
//! let mut left = [0.25_f32; 64];
//! let mut right = [0.25_f32; 64];
//! let mut buffer: [&mut [f32]; 2] = [&mut left, &mut right];
//! input.process(&mut buffer);
//!
//! for sample in buffer.iter_mut().flat_map(|ch| ch.iter_mut()) {
//!     *sample = soft_clip(*sample, 12.0);
//! }
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: All buffers are sized in `prepare`
//! - **Bit-reproducible**: Transfer functions use `libm`, no fast-math
//!   (except [`fast_tanh`], which is documented as an approximation)
//! - **Total**: Every per-sample path returns a finite value for finite input

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod biquad;
pub mod control;
pub mod error;
pub mod fast_math;
pub mod gain;
pub mod impulse;
pub mod math;
pub mod param;
pub mod processor;
pub mod shaper;
pub mod tone;

// Re-export main types at crate root
pub use biquad::{BiquadCoefficients, BiquadState, high_shelf_coefficients};
pub use control::{
    CONTROL_COUNT, ControlDescriptor, ControlId, ControlParameter, ControlSnapshot, ControlUnit,
    SharedControls,
};
pub use error::{ControlError, ImpulseResponseError, PrepareError};
pub use fast_math::fast_tanh;
pub use gain::{BiasStage, DEFAULT_RAMP_SECONDS, GainStage};
pub use impulse::{ImpulseResponse, MAX_IMPULSE_LEN};
pub use math::{db_to_linear, flush_denormal, linear_to_db, log_knob, rescale, threshold_knob};
pub use param::{LinearRamp, RampState};
pub use processor::{ProcessSpec, Processor, block_len, silence};
pub use shaper::{
    Atan, DC_INPUT_LIMIT, DIODE_MAX_EXPONENT, DRIVE_MAX_DB, DRIVE_MIN_DB, DcDistortion, Diode,
    DiodeLaw, FastTanh, FullWave, HalfWave, HardClip, LinearClip, PedalCurve, ShaperModel,
    SoftClip, ThresholdClip, Waveshaper, atan_saturate, dc_distortion, diode, diode_law,
    full_wave_rectify, half_wave_rectify, hard_clip, hard_clip_threshold, linear_clip,
    linear_clip_threshold, pedal_curve, soft_clip,
};
pub use tone::{TONE_CORNER_HZ, TONE_MAX_DB, TONE_MIN_DB, TONE_Q, ToneFilter};
