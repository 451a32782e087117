//! Immutable impulse responses for convolution.

use crate::error::ImpulseResponseError;
use alloc::sync::Arc;
use alloc::vec::Vec;

/// Longest accepted impulse response (about 21.8 s at 48 kHz).
pub const MAX_IMPULSE_LEN: usize = 1 << 20;

/// A validated, immutable mono impulse response.
///
/// Samples are shared behind an [`Arc`], so cloning is cheap and several
/// engines can convolve against the same IR.
#[derive(Debug, Clone, PartialEq)]
pub struct ImpulseResponse {
    samples: Arc<[f32]>,
}

impl ImpulseResponse {
    /// Validate and wrap samples.
    ///
    /// Rejects empty input, non-finite samples and IRs longer than
    /// [`MAX_IMPULSE_LEN`].
    pub fn new(samples: Vec<f32>) -> Result<Self, ImpulseResponseError> {
        if samples.is_empty() {
            return Err(ImpulseResponseError::Empty);
        }
        if samples.len() > MAX_IMPULSE_LEN {
            return Err(ImpulseResponseError::TooLong {
                len: samples.len(),
                max: MAX_IMPULSE_LEN,
            });
        }
        if let Some(index) = samples.iter().position(|s| !s.is_finite()) {
            return Err(ImpulseResponseError::NonFinite { index });
        }
        Ok(Self {
            samples: samples.into(),
        })
    }

    /// Single-sample unit impulse. Convolving with it is the identity.
    pub fn unit() -> Self {
        Self {
            samples: Arc::from([1.0_f32].as_slice()),
        }
    }

    /// Sample data.
    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.samples
    }

    /// Number of samples (always at least 1).
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always `false`; an impulse response has at least one sample.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl Default for ImpulseResponse {
    fn default() -> Self {
        Self::unit()
    }
}
