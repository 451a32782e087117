//! Error types for configuration and preparation.
//!
//! Nothing on the per-sample path returns an error: runtime numeric edge
//! cases are clamped instead. Errors only come out of construction and
//! `prepare`, both of which run off the audio thread.

use thiserror::Error;

/// Invalid control definition. Fatal before `prepare`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ControlError {
    /// `min > max`.
    #[error("control '{name}' has an inverted range: min {min} > max {max}")]
    InvalidRange {
        /// Control id.
        name: &'static str,
        /// Declared minimum.
        min: f32,
        /// Declared maximum.
        max: f32,
    },

    /// The default value lies outside `[min, max]`.
    #[error("control '{name}' default {default} lies outside its range")]
    DefaultOutOfRange {
        /// Control id.
        name: &'static str,
        /// Declared default.
        default: f32,
    },

    /// A bound or the default is NaN or infinite.
    #[error("control '{name}' has a non-finite bound or default")]
    NonFinite {
        /// Control id.
        name: &'static str,
    },
}

/// `prepare` failure. The processor stays in its silent bypass state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PrepareError {
    /// Sample rate is zero, negative, or not finite.
    #[error("invalid sample rate: {0}")]
    InvalidSampleRate(f64),

    /// `max_block_size` is zero.
    #[error("maximum block size must be at least 1")]
    ZeroBlockSize,

    /// `num_channels` is zero.
    #[error("channel count must be at least 1")]
    ZeroChannels,

    /// A buffer could not be reserved.
    #[error("failed to allocate {requested} working samples")]
    Allocation {
        /// Number of elements that were requested.
        requested: usize,
    },
}

/// Invalid impulse response data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ImpulseResponseError {
    /// The IR has no samples.
    #[error("impulse response is empty")]
    Empty,

    /// A sample is NaN or infinite.
    #[error("impulse response sample {index} is not finite")]
    NonFinite {
        /// Index of the first offending sample.
        index: usize,
    },

    /// The IR exceeds the supported length.
    #[error("impulse response has {len} samples, maximum is {max}")]
    TooLong {
        /// Length of the rejected IR.
        len: usize,
        /// Supported maximum.
        max: usize,
    },
}
