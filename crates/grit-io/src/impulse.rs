//! Impulse-response loading for the cabinet simulator.

use crate::wav::read_wav_mono;
use crate::{Error, Result};
use grit_core::{ImpulseResponse, db_to_linear};
use std::path::Path;

/// Samples below this level are trimmed from both ends, dBFS.
pub const TRIM_THRESHOLD_DB: f32 = -80.0;

/// L2 norm of a normalised impulse response.
pub const NORMALISE_TARGET: f32 = 0.125;

/// How a loaded impulse response is conditioned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IrOptions {
    /// Drop leading and trailing samples below [`TRIM_THRESHOLD_DB`].
    pub trim: bool,
    /// Scale to an L2 norm of [`NORMALISE_TARGET`].
    pub normalise: bool,
}

impl Default for IrOptions {
    fn default() -> Self {
        Self {
            trim: true,
            normalise: true,
        }
    }
}

/// An impulse response and the rate its file was recorded at.
#[derive(Debug, Clone)]
pub struct LoadedImpulse {
    /// Conditioned mono impulse response.
    pub ir: ImpulseResponse,
    /// Sample rate of the source file, Hz.
    pub sample_rate: u32,
}

/// Trim and normalise raw samples into an [`ImpulseResponse`].
///
/// # Example
/// ```rust
/// use grit_io::{IrOptions, prepare_impulse};
///
/// let ir = prepare_impulse(vec![0.0, 0.0, 0.5, 0.25, 0.0], IrOptions::default()).unwrap();
/// assert_eq!(ir.len(), 2);
/// ```
pub fn prepare_impulse(mut samples: Vec<f32>, options: IrOptions) -> Result<ImpulseResponse> {
    if options.trim {
        let floor = db_to_linear(TRIM_THRESHOLD_DB);
        let audible = |s: &f32| s.abs() >= floor;
        let Some(start) = samples.iter().position(audible) else {
            return Err(Error::SilentImpulse);
        };
        let end = samples.iter().rposition(audible).unwrap_or(start) + 1;
        samples.truncate(end);
        samples.drain(..start);
    }

    if options.normalise {
        let energy: f32 = samples.iter().map(|s| s * s).sum();
        if energy <= 0.0 {
            return Err(Error::SilentImpulse);
        }
        let gain = NORMALISE_TARGET / energy.sqrt();
        for sample in &mut samples {
            *sample *= gain;
        }
    }

    Ok(ImpulseResponse::new(samples)?)
}

/// Load a WAV file as a mono impulse response.
///
/// Multi-channel files are averaged to mono before conditioning.
pub fn load_impulse_response<P: AsRef<Path>>(path: P, options: IrOptions) -> Result<LoadedImpulse> {
    let path = path.as_ref();
    let (samples, spec) = read_wav_mono(path)?;
    let raw_len = samples.len();
    let ir = prepare_impulse(samples, options)?;
    tracing::info!(
        path = %path.display(),
        channels = spec.channels,
        sample_rate = spec.sample_rate,
        raw_len,
        len = ir.len(),
        "loaded impulse response"
    );
    Ok(LoadedImpulse {
        ir,
        sample_rate: spec.sample_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{WavSpec, write_wav};
    use tempfile::NamedTempFile;

    fn norm(samples: &[f32]) -> f32 {
        samples.iter().map(|s| s * s).sum::<f32>().sqrt()
    }

    #[test]
    fn trims_quiet_ends() {
        let raw = vec![0.0, 1e-6, 0.5, 0.0, -0.25, 1e-7, 0.0];
        let ir = prepare_impulse(
            raw,
            IrOptions {
                trim: true,
                normalise: false,
            },
        )
        .unwrap();
        assert_eq!(ir.as_slice(), &[0.5, 0.0, -0.25]);
    }

    #[test]
    fn normalises_energy() {
        let ir = prepare_impulse(
            vec![1.0, 1.0, 1.0, 1.0],
            IrOptions {
                trim: false,
                normalise: true,
            },
        )
        .unwrap();
        assert!((norm(ir.as_slice()) - NORMALISE_TARGET).abs() < 1e-6);
        assert!((ir.as_slice()[0] - 0.0625).abs() < 1e-7);
    }

    #[test]
    fn untouched_without_options() {
        let raw = vec![0.0, 0.3, 0.0];
        let options = IrOptions {
            trim: false,
            normalise: false,
        };
        let ir = prepare_impulse(raw.clone(), options).unwrap();
        assert_eq!(ir.as_slice(), raw.as_slice());
    }

    #[test]
    fn silent_ir_is_rejected() {
        assert!(matches!(
            prepare_impulse(vec![0.0; 64], IrOptions::default()),
            Err(Error::SilentImpulse)
        ));
        let options = IrOptions {
            trim: false,
            normalise: true,
        };
        assert!(matches!(
            prepare_impulse(vec![0.0; 64], options),
            Err(Error::SilentImpulse)
        ));
    }

    #[test]
    fn empty_ir_is_invalid() {
        let options = IrOptions {
            trim: false,
            normalise: false,
        };
        assert!(matches!(
            prepare_impulse(Vec::new(), options),
            Err(Error::Impulse(_))
        ));
    }

    #[test]
    fn loads_stereo_file_as_mono() {
        let file = NamedTempFile::new().unwrap();
        let spec = WavSpec {
            channels: 2,
            sample_rate: 44100,
            bits_per_sample: 32,
        };
        let left = vec![0.0, 0.8, 0.4, 0.0];
        let right = vec![0.0, 0.4, 0.0, 0.0];
        write_wav(file.path(), &[left, right], spec).unwrap();

        let loaded = load_impulse_response(
            file.path(),
            IrOptions {
                trim: true,
                normalise: false,
            },
        )
        .unwrap();
        assert_eq!(loaded.sample_rate, 44100);
        let samples = loaded.ir.as_slice();
        assert_eq!(samples.len(), 2);
        assert!((samples[0] - 0.6).abs() < 1e-6);
        assert!((samples[1] - 0.2).abs() < 1e-6);
    }
}
