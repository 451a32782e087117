//! Uniformly partitioned FFT convolution.
//!
//! The impulse response is split into partitions of `B` samples (`B` is the
//! maximum block size rounded up to a power of two), each transformed once
//! at prepare time with an FFT of size `N = 2B`. Input is collected into
//! segments of `B` samples; every finished segment's spectrum is pushed into
//! a frequency-domain delay line.
//!
//! For output sample `j` inside the current segment `k`:
//!
//! ```text
//! y = first_half( IFFT( X_k·H_0 + Σ_{p≥1} X_{k−p}·H_p ) )[j]
//!   + second_half( IFFT( A_{k−1} ) )[j]
//! ```
//!
//! The sum over `p ≥ 1` only changes at segment boundaries, so it is
//! accumulated once per segment. `X_k` is recomputed from the partially
//! filled segment on every call, so there is no latency: output is
//! available for each input sample as soon as it arrives, for any block
//! size.
//!
//! All buffers are allocated in [`prepare`](ConvolutionEngine::prepare);
//! `process` only runs FFTs on preallocated memory.

use crate::chain::split_prepared;
use grit_core::{ImpulseResponse, PrepareError, ProcessSpec, block_len, flush_denormal, silence};
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

const ZERO: Complex<f32> = Complex { re: 0.0, im: 0.0 };

/// Allocate a filled vector, reporting failure instead of aborting.
pub(crate) fn try_filled<T: Clone>(len: usize, value: T) -> Result<Vec<T>, PrepareError> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|_| PrepareError::Allocation { requested: len })?;
    buffer.resize(len, value);
    Ok(buffer)
}

/// Per-channel convolution state.
struct ChannelState {
    /// Current input segment, zero beyond the write position.
    segment: Vec<f32>,
    /// Second half of the previous segment's IFFT.
    overlap: Vec<f32>,
    /// Spectra of previous segments, newest first.
    history: Vec<Vec<Complex<f32>>>,
    /// Σ_{p≥1} X_{k−p}·H_p for the current segment.
    tail: Vec<Complex<f32>>,
}

impl ChannelState {
    fn new(partition: usize, partitions: usize) -> Result<Self, PrepareError> {
        let fft_size = partition * 2;
        let mut history = Vec::new();
        history
            .try_reserve_exact(partitions - 1)
            .map_err(|_| PrepareError::Allocation {
                requested: partitions - 1,
            })?;
        for _ in 1..partitions {
            history.push(try_filled(fft_size, ZERO)?);
        }
        Ok(Self {
            segment: try_filled(partition, 0.0)?,
            overlap: try_filled(partition, 0.0)?,
            history,
            tail: try_filled(fft_size, ZERO)?,
        })
    }

    fn reset(&mut self) {
        self.segment.fill(0.0);
        self.overlap.fill(0.0);
        self.tail.fill(ZERO);
        for spectrum in &mut self.history {
            spectrum.fill(ZERO);
        }
    }
}

/// FFT plans, IR spectra and shared work buffers.
struct Kernel {
    fft: Arc<dyn Fft<f32>>,
    ifft: Arc<dyn Fft<f32>>,
    partition: usize,
    ir_spectra: Vec<Vec<Complex<f32>>>,
    /// Spectrum of the current (partial) segment.
    spectrum: Vec<Complex<f32>>,
    /// Accumulated spectrum, then its inverse transform.
    work: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
}

impl Kernel {
    fn new(ir: &[f32], partition: usize) -> Result<Self, PrepareError> {
        let fft_size = partition
            .checked_mul(2)
            .ok_or(PrepareError::Allocation { requested: usize::MAX })?;

        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(fft_size);
        let ifft = planner.plan_fft_inverse(fft_size);
        let scratch_len = fft
            .get_inplace_scratch_len()
            .max(ifft.get_inplace_scratch_len());
        let mut scratch = try_filled(scratch_len, ZERO)?;

        let partitions = ir.len().div_ceil(partition);
        let mut ir_spectra = Vec::new();
        ir_spectra
            .try_reserve_exact(partitions)
            .map_err(|_| PrepareError::Allocation {
                requested: partitions,
            })?;
        for chunk in ir.chunks(partition) {
            let mut spectrum = try_filled(fft_size, ZERO)?;
            for (bin, &sample) in spectrum.iter_mut().zip(chunk) {
                bin.re = sample;
            }
            fft.process_with_scratch(&mut spectrum, &mut scratch);
            ir_spectra.push(spectrum);
        }

        Ok(Self {
            fft,
            ifft,
            partition,
            ir_spectra,
            spectrum: try_filled(fft_size, ZERO)?,
            work: try_filled(fft_size, ZERO)?,
            scratch,
        })
    }

    /// Convolve `samples`, which start at `position` in the current segment
    /// and do not cross its end.
    fn process_chunk(&mut self, state: &mut ChannelState, position: usize, samples: &mut [f32]) {
        let partition = self.partition;
        let end = position + samples.len();
        state.segment[position..end].copy_from_slice(samples);

        for (bin, &sample) in self.spectrum.iter_mut().zip(&state.segment) {
            *bin = Complex::new(sample, 0.0);
        }
        self.spectrum[partition..].fill(ZERO);
        self.fft
            .process_with_scratch(&mut self.spectrum, &mut self.scratch);

        for (((acc, &x), &h), &tail) in self
            .work
            .iter_mut()
            .zip(&self.spectrum)
            .zip(&self.ir_spectra[0])
            .zip(&state.tail)
        {
            *acc = x * h + tail;
        }
        self.ifft.process_with_scratch(&mut self.work, &mut self.scratch);

        // rustfft does not normalize
        let scale = 1.0 / (2 * partition) as f32;
        for (i, sample) in (position..end).zip(samples.iter_mut()) {
            *sample = self.work[i].re * scale + state.overlap[i];
        }

        if end == partition {
            self.finish_segment(state, scale);
        }
    }

    /// Carry the tail forward and shift the delay line once a segment is full.
    fn finish_segment(&mut self, state: &mut ChannelState, scale: f32) {
        let partition = self.partition;
        for (overlap, bin) in state.overlap.iter_mut().zip(&self.work[partition..]) {
            *overlap = flush_denormal(bin.re * scale);
        }

        if !state.history.is_empty() {
            state.history.rotate_right(1);
            state.history[0].copy_from_slice(&self.spectrum);
        }

        state.tail.fill(ZERO);
        for (past, h) in state.history.iter().zip(&self.ir_spectra[1..]) {
            for ((acc, &x), &h) in state.tail.iter_mut().zip(past).zip(h) {
                *acc += x * h;
            }
        }

        state.segment.fill(0.0);
    }
}

/// Prepared engine state.
struct Plan {
    kernel: Kernel,
    channels: Vec<ChannelState>,
    /// Write position inside the current segment, shared by all channels.
    position: usize,
}

/// Zero-latency partitioned convolution against a fixed impulse response.
///
/// One mono IR is applied to every channel independently. Output block
/// length always equals input block length, and a signal split into blocks
/// of any sizes produces the same output as processing it in one piece.
///
/// # Example
///
/// ```rust
/// use grit_core::{ImpulseResponse, ProcessSpec};
/// use grit_effects::ConvolutionEngine;
///
/// let ir = ImpulseResponse::new(vec![0.0, 1.0]).unwrap(); // one sample delay
/// let mut engine = ConvolutionEngine::new(ir);
/// engine.prepare(&ProcessSpec::new(48000.0, 4, 1)).unwrap();
///
/// let mut mono = [1.0_f32, 2.0, 3.0, 4.0];
/// engine.process(&mut [&mut mono[..]]);
/// assert!((mono[1] - 1.0).abs() < 1e-5);
/// assert!((mono[3] - 3.0).abs() < 1e-5);
/// ```
pub struct ConvolutionEngine {
    ir: ImpulseResponse,
    plan: Option<Plan>,
}

impl ConvolutionEngine {
    /// Create an unprepared engine for `ir`.
    pub fn new(ir: ImpulseResponse) -> Self {
        Self { ir, plan: None }
    }

    /// Partition the IR and allocate all buffers for `spec`.
    ///
    /// On failure the engine is left unprepared and outputs silence.
    pub fn prepare(&mut self, spec: &ProcessSpec) -> Result<(), PrepareError> {
        self.plan = None;
        spec.validate()?;

        let partition = spec
            .max_block_size
            .checked_next_power_of_two()
            .ok_or(PrepareError::Allocation {
                requested: spec.max_block_size,
            })?;
        let kernel = Kernel::new(self.ir.as_slice(), partition)?;
        let partitions = kernel.ir_spectra.len();

        let mut channels = Vec::new();
        channels
            .try_reserve_exact(spec.num_channels)
            .map_err(|_| PrepareError::Allocation {
                requested: spec.num_channels,
            })?;
        for _ in 0..spec.num_channels {
            channels.push(ChannelState::new(partition, partitions)?);
        }

        tracing::debug!(
            ir_len = self.ir.len(),
            partition,
            partitions,
            fft_size = partition * 2,
            channels = spec.num_channels,
            "convolution prepared"
        );

        self.plan = Some(Plan {
            kernel,
            channels,
            position: 0,
        });
        Ok(())
    }

    /// Convolve the block in place.
    pub fn process(&mut self, buffer: &mut [&mut [f32]]) {
        let Some(plan) = self.plan.as_mut() else {
            silence(buffer);
            return;
        };
        let Plan {
            kernel,
            channels,
            position,
        } = plan;

        let frames = block_len(buffer);
        let active = split_prepared(buffer, channels.len());

        let mut offset = 0;
        while offset < frames {
            let len = (kernel.partition - *position).min(frames - offset);
            for (channel, state) in active.iter_mut().zip(channels.iter_mut()) {
                kernel.process_chunk(state, *position, &mut channel[offset..offset + len]);
            }
            *position = (*position + len) % kernel.partition;
            offset += len;
        }
    }

    /// Clear all input history and tails.
    pub fn reset(&mut self) {
        if let Some(plan) = self.plan.as_mut() {
            for state in &mut plan.channels {
                state.reset();
            }
            plan.position = 0;
        }
    }

    /// The impulse response this engine convolves with.
    pub fn impulse_response(&self) -> &ImpulseResponse {
        &self.ir
    }

    /// Partition size in samples, once prepared.
    pub fn partition_size(&self) -> Option<usize> {
        self.plan.as_ref().map(|plan| plan.kernel.partition)
    }

    /// Whether `prepare` has succeeded.
    pub fn is_prepared(&self) -> bool {
        self.plan.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic decaying IR.
    fn test_ir(len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| libm::expf(-(i as f32) / 40.0) * libm::sinf(i as f32 * 0.7 + 0.3))
            .collect()
    }

    /// Deterministic pseudo-random signal in [-1, 1].
    fn test_signal(len: usize) -> Vec<f32> {
        let mut state = 0x1234_5678_u32;
        (0..len)
            .map(|_| {
                state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                (state >> 8) as f32 / (1u32 << 23) as f32 - 1.0
            })
            .collect()
    }

    fn direct_convolution(signal: &[f32], ir: &[f32]) -> Vec<f32> {
        (0..signal.len())
            .map(|n| {
                ir.iter()
                    .enumerate()
                    .take_while(|(k, _)| *k <= n)
                    .map(|(k, &h)| h * signal[n - k])
                    .sum()
            })
            .collect()
    }

    /// Process `signal` in blocks cycling through `sizes`.
    fn run_blocks(engine: &mut ConvolutionEngine, signal: &[f32], sizes: &[usize]) -> Vec<f32> {
        let mut output = signal.to_vec();
        let mut offset = 0;
        let mut i = 0;
        while offset < output.len() {
            let len = sizes[i % sizes.len()].min(output.len() - offset);
            engine.process(&mut [&mut output[offset..offset + len]]);
            offset += len;
            i += 1;
        }
        output
    }

    #[test]
    fn unit_impulse_is_identity_for_any_block_size() {
        let signal = test_signal(1000);
        for sizes in [&[1usize][..], &[64], &[7, 64, 13, 1, 50], &[33]] {
            let mut engine = ConvolutionEngine::new(ImpulseResponse::unit());
            engine.prepare(&ProcessSpec::new(48000.0, 64, 1)).unwrap();
            let output = run_blocks(&mut engine, &signal, sizes);
            for (i, (y, x)) in output.iter().zip(&signal).enumerate() {
                assert!((y - x).abs() < 1e-5, "sizes {sizes:?}, sample {i}: {y} != {x}");
            }
        }
    }

    #[test]
    fn matches_direct_convolution() {
        let ir = test_ir(300);
        let signal = test_signal(2000);
        let expected = direct_convolution(&signal, &ir);

        let mut engine = ConvolutionEngine::new(ImpulseResponse::new(ir).unwrap());
        engine.prepare(&ProcessSpec::new(48000.0, 128, 1)).unwrap();
        assert_eq!(engine.partition_size(), Some(128));

        let output = run_blocks(&mut engine, &signal, &[128, 5, 77, 1, 128, 40]);
        for (i, (y, e)) in output.iter().zip(&expected).enumerate() {
            assert!((y - e).abs() < 1e-3, "sample {i}: {y} != {e}");
        }
    }

    #[test]
    fn impulse_returns_the_ir_itself() {
        let ir = test_ir(300);
        let mut impulse = vec![0.0_f32; 800];
        impulse[0] = 1.0;

        for sizes in [&[1usize, 37, 128, 5, 300][..], &[64], &[128, 1]] {
            let mut engine = ConvolutionEngine::new(ImpulseResponse::new(ir.clone()).unwrap());
            engine.prepare(&ProcessSpec::new(48000.0, 128, 1)).unwrap();
            let output = run_blocks(&mut engine, &impulse, sizes);

            for (i, (y, h)) in output.iter().zip(&ir).enumerate() {
                assert!((y - h).abs() < 1e-4, "sizes {sizes:?}, sample {i}: {y} != {h}");
            }
            assert!(
                output[ir.len()..].iter().all(|s| s.abs() < 1e-5),
                "sizes {sizes:?}: tail did not decay"
            );
        }
    }

    #[test]
    fn block_split_does_not_change_output() {
        let ir = test_ir(200);
        let signal = test_signal(777);

        let mut whole = ConvolutionEngine::new(ImpulseResponse::new(ir.clone()).unwrap());
        whole.prepare(&ProcessSpec::new(44100.0, 256, 1)).unwrap();
        let a = run_blocks(&mut whole, &signal, &[256]);

        let mut split = ConvolutionEngine::new(ImpulseResponse::new(ir).unwrap());
        split.prepare(&ProcessSpec::new(44100.0, 256, 1)).unwrap();
        let b = run_blocks(&mut split, &signal, &[3, 250, 19]);

        for (x, y) in a.iter().zip(&b) {
            assert!((x - y).abs() < 1e-4);
        }
    }

    #[test]
    fn oversized_blocks_are_split_internally() {
        let ir = test_ir(50);
        let signal = test_signal(600);
        let expected = direct_convolution(&signal, &ir);

        let mut engine = ConvolutionEngine::new(ImpulseResponse::new(ir).unwrap());
        engine.prepare(&ProcessSpec::new(48000.0, 32, 1)).unwrap();
        let output = run_blocks(&mut engine, &signal, &[600]);
        for (y, e) in output.iter().zip(&expected) {
            assert!((y - e).abs() < 1e-3);
        }
    }

    #[test]
    fn tail_carries_across_blocks() {
        let ir = ImpulseResponse::new(vec![0.0, 0.0, 0.0, 0.0, 0.0, 1.0]).unwrap();
        let mut engine = ConvolutionEngine::new(ir);
        engine.prepare(&ProcessSpec::new(48000.0, 4, 1)).unwrap();

        let mut first = [1.0_f32, 0.0, 0.0, 0.0];
        engine.process(&mut [&mut first[..]]);
        assert!(first.iter().all(|s| s.abs() < 1e-5));

        let mut second = [0.0_f32; 4];
        engine.process(&mut [&mut second[..]]);
        assert!((second[1] - 1.0).abs() < 1e-5);
        assert!(second[0].abs() < 1e-5 && second[2].abs() < 1e-5);
    }

    #[test]
    fn channels_are_independent() {
        let ir = ImpulseResponse::new(test_ir(40)).unwrap();
        let mut engine = ConvolutionEngine::new(ir);
        engine.prepare(&ProcessSpec::new(48000.0, 16, 2)).unwrap();

        let mut left = test_signal(16);
        let mut right = [0.0_f32; 16];
        engine.process(&mut [&mut left[..], &mut right[..]]);
        assert!(right.iter().all(|s| s.abs() < 1e-6));
    }

    #[test]
    fn reset_clears_tail() {
        let ir = ImpulseResponse::new(test_ir(100)).unwrap();
        let mut engine = ConvolutionEngine::new(ir);
        engine.prepare(&ProcessSpec::new(48000.0, 32, 1)).unwrap();

        let mut burst = test_signal(32);
        engine.process(&mut [&mut burst[..]]);
        engine.reset();

        let mut silent = [0.0_f32; 32];
        engine.process(&mut [&mut silent[..]]);
        assert!(silent.iter().all(|s| s.abs() < 1e-6));
    }

    #[test]
    fn unprepared_outputs_silence() {
        let mut engine = ConvolutionEngine::new(ImpulseResponse::unit());
        let mut mono = [0.5_f32; 8];
        engine.process(&mut [&mut mono[..]]);
        assert_eq!(mono, [0.0; 8]);

        assert!(engine.prepare(&ProcessSpec::new(48000.0, 0, 1)).is_err());
        assert!(!engine.is_prepared());
    }

    #[test]
    fn unprepared_channels_are_silenced() {
        let mut engine = ConvolutionEngine::new(ImpulseResponse::unit());
        engine.prepare(&ProcessSpec::new(48000.0, 8, 1)).unwrap();
        let mut left = [0.5_f32; 8];
        let mut right = [0.5_f32; 8];
        engine.process(&mut [&mut left[..], &mut right[..]]);
        assert_eq!(right, [0.0; 8]);
        assert!((left[0] - 0.5).abs() < 1e-5);
    }
}
