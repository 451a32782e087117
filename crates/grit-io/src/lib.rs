//! Audio file I/O for grit.
//!
//! This crate provides:
//!
//! - **WAV file I/O**: [`read_wav`] and [`write_wav`] for multi-channel
//!   audio, deinterleaved into one `Vec<f32>` per channel
//! - **Impulse responses**: [`load_impulse_response`] turns a WAV file into
//!   a mono, trimmed and normalised [`ImpulseResponse`](grit_core::ImpulseResponse)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use grit_io::{read_wav, write_wav};
//!
//! let (channels, spec) = read_wav("input.wav")?;
//! // ... process channels ...
//! write_wav("output.wav", &channels, spec)?;
//! # Ok::<(), grit_io::Error>(())
//! ```

mod impulse;
mod wav;

pub use impulse::{
    IrOptions, LoadedImpulse, NORMALISE_TARGET, TRIM_THRESHOLD_DB, load_impulse_response,
    prepare_impulse,
};
pub use wav::{
    WavFormat, WavInfo, WavSpec, deinterleave, interleave, read_wav, read_wav_info,
    read_wav_mono, write_wav,
};

use grit_core::ImpulseResponseError;

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// The requested bit depth cannot be written.
    #[error("Unsupported bit depth: {0} (expected 16, 24 or 32)")]
    UnsupportedBitDepth(u16),

    /// Channels passed to the writer have different lengths.
    #[error("Channel {channel} has {len} frames, expected {expected}")]
    ChannelLengthMismatch {
        /// Index of the offending channel.
        channel: usize,
        /// Its length.
        len: usize,
        /// Length of channel 0.
        expected: usize,
    },

    /// Nothing to write, or a file with no channels.
    #[error("No audio channels")]
    NoChannels,

    /// The impulse response has no sample above the trim floor.
    #[error("Impulse response is silent")]
    SilentImpulse,

    /// The impulse response failed validation.
    #[error("Invalid impulse response: {0}")]
    Impulse(#[from] ImpulseResponseError),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
