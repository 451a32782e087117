//! The processing contract shared by every effect chain.
//!
//! A [`Processor`] is prepared once off the audio thread, then called with
//! one block at a time. Buffers are borrowed for the duration of a single
//! call as a slice of per-channel sample slices and processed in place.
//!
//! ```text
//! prepare(spec) ──► process(buffer, controls) ──► process(..) ──► reset()
//!       ▲                                                           │
//!       └──────────────── prepare again (new rate / size) ◄─────────┘
//! ```

use crate::control::{ControlDescriptor, ControlSnapshot};
use crate::error::PrepareError;

/// Session parameters fixed at `prepare` time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessSpec {
    /// Sample rate in Hz.
    pub sample_rate: f64,
    /// Largest block `process` will be called with.
    pub max_block_size: usize,
    /// Number of channels `process` will be called with.
    pub num_channels: usize,
}

impl ProcessSpec {
    /// Bundle session parameters.
    pub const fn new(sample_rate: f64, max_block_size: usize, num_channels: usize) -> Self {
        Self {
            sample_rate,
            max_block_size,
            num_channels,
        }
    }

    /// Reject a zero or non-finite sample rate, an empty block, or zero
    /// channels.
    pub fn validate(&self) -> Result<(), PrepareError> {
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(PrepareError::InvalidSampleRate(self.sample_rate));
        }
        if self.max_block_size == 0 {
            return Err(PrepareError::ZeroBlockSize);
        }
        if self.num_channels == 0 {
            return Err(PrepareError::ZeroChannels);
        }
        Ok(())
    }
}

/// A prepared, real-time safe effect chain.
///
/// # Contract
///
/// - `prepare` allocates every buffer the chain needs. It is idempotent
///   and may be called again with a different spec.
/// - `process` never allocates, locks, blocks or panics. It reads the
///   snapshot once and processes `buffer` in place. The frame count is the
///   length of the shortest channel. Channels beyond the prepared count are
///   written with silence.
/// - Before a successful `prepare`, or after a failed one, `process` writes
///   silence.
/// - `reset` clears signal state (filter memory, convolution tails) to
///   silence without touching the prepared configuration.
pub trait Processor {
    /// Controls this processor reads from the snapshot.
    fn controls(&self) -> &'static [ControlDescriptor];

    /// Allocate and initialise all state for `spec`.
    fn prepare(&mut self, spec: &ProcessSpec) -> Result<(), PrepareError>;

    /// Process one block in place.
    fn process(&mut self, buffer: &mut [&mut [f32]], controls: &ControlSnapshot);

    /// Clear signal state.
    fn reset(&mut self);

    /// Processing latency in samples.
    fn latency_samples(&self) -> usize {
        0
    }
}

/// Frame count of a buffer: the length of its shortest channel.
#[inline]
pub fn block_len(buffer: &[&mut [f32]]) -> usize {
    buffer.iter().map(|channel| channel.len()).min().unwrap_or(0)
}

/// Overwrite every channel with zeros.
#[inline]
pub fn silence(buffer: &mut [&mut [f32]]) {
    for channel in buffer.iter_mut() {
        channel.fill(0.0);
    }
}
