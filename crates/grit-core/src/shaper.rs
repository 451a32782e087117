//! Memoryless waveshaping transfer functions.
//!
//! Every transfer function exists in two forms:
//!
//! - A free function (`soft_clip(x, drive)`) that evaluates the full formula
//!   for one sample.
//! - A [`Waveshaper`] struct that resolves drive-dependent coefficients once
//!   per block and then shapes samples with the same arithmetic.
//!
//! The free functions delegate to the structs, so both forms are
//! bit-identical for the same inputs.
//!
//! | Shaper | Character | Drive response |
//! |--------|-----------|----------------|
//! | [`SoftClip`] | `atan` saturation | Pre-gain up, make-up gain down |
//! | [`HardClip`] | Flat tops | Threshold narrows, make-up gain up |
//! | [`ThresholdClip`] | Flat tops, log dial | Threshold follows [`threshold_knob`] |
//! | [`LinearClip`] | Flat tops, linear dial | Threshold falls from `0.9` to `0.0001` |
//! | [`Diode`] | Exponential diode law, level-dependent | Emission coefficient and thermal voltage drop |
//! | [`DiodeLaw`] | Exponential diode law | Same as [`Diode`] |
//! | [`DcDistortion`] | Biased polynomial | Pre-gain and DC bias rise |
//! | [`FullWave`] / [`HalfWave`] | Rectification | None |
//! | [`Atan`] / [`FastTanh`] | Fixed saturation | None |
//! | [`PedalCurve`] | Cubic voicing polynomial | None |
//!
//! The calibration constants (`1.5`, `0.04`, `0.05`, `0.2`) are
//! sound-matching values and are kept exactly as tuned.

use crate::fast_math::fast_tanh;
use crate::math::{rescale, threshold_knob};
use core::f32::consts::FRAC_2_PI;
use libm::{atanf, expf, powf, sinf};

/// Lowest drive value any shaper accepts, in dB.
pub const DRIVE_MIN_DB: f32 = 0.0;

/// Highest drive value any shaper accepts, in dB.
pub const DRIVE_MAX_DB: f32 = 24.0;

/// Largest pre-gain magnitude [`DcDistortion`] feeds into its `sin` guard.
///
/// Keeps the fold-back finite for infinite or overflowing input.
pub const DC_INPUT_LIMIT: f32 = 1.0e6;

/// Upper bound on the exponent argument of [`diode`].
///
/// `exp(20) ≈ 4.85e8`, so the diode output is bounded by that value instead
/// of overflowing to infinity for large positive input.
pub const DIODE_MAX_EXPONENT: f32 = 20.0;

/// A memoryless transfer function configured once per block.
pub trait Waveshaper {
    /// Resolve drive-dependent coefficients.
    ///
    /// Drive is clamped to [`DRIVE_MIN_DB`]..=[`DRIVE_MAX_DB`]. Shapers that
    /// have no drive response ignore it.
    fn set_drive(&mut self, drive_db: f32);

    /// Shape one sample.
    fn shape(&self, x: f32) -> f32;

    /// Shape a run of samples in place.
    #[inline]
    fn shape_slice(&self, samples: &mut [f32]) {
        for sample in samples.iter_mut() {
            *sample = self.shape(*sample);
        }
    }
}

#[inline]
fn clamp_drive(drive_db: f32) -> f32 {
    drive_db.clamp(DRIVE_MIN_DB, DRIVE_MAX_DB)
}

/// Emission coefficient times thermal voltage for a drive setting.
fn diode_n_vt(drive_db: f32) -> f32 {
    let drive = clamp_drive(drive_db);
    let emission = rescale(drive, 0.0, 24.0, 2.0, 1.0);
    let thermal_voltage = rescale(drive, 0.0, 24.0, 0.04, 0.01);
    emission * thermal_voltage
}

/// `atan` soft clipper with loudness compensation.
///
/// `f(x) = (2/π)·atan(g·x)·1.5·10^(−0.04·drive)` with `g = 10^(0.05·drive)`.
/// The trailing factor restores the level lost to saturation at low drive
/// and pulls it back as drive increases.
#[derive(Debug, Clone, Copy)]
pub struct SoftClip {
    gain: f32,
    makeup: f32,
}

impl SoftClip {
    /// Create a soft clipper at the given drive.
    pub fn new(drive_db: f32) -> Self {
        let mut shaper = Self {
            gain: 1.0,
            makeup: 1.0,
        };
        shaper.set_drive(drive_db);
        shaper
    }
}

impl Default for SoftClip {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl Waveshaper for SoftClip {
    fn set_drive(&mut self, drive_db: f32) {
        let drive = clamp_drive(drive_db);
        self.gain = powf(10.0, drive * 0.05);
        self.makeup = powf(10.0, -drive * 0.04);
    }

    #[inline]
    fn shape(&self, x: f32) -> f32 {
        FRAC_2_PI * atanf(self.gain * x) * 1.5 * self.makeup
    }
}

/// Hard clipper whose window narrows as drive rises.
///
/// Threshold `t = rescale(drive, 0, 24, 0.1, 0.01)`, output
/// `clamp(x, −t, t)·1.5·10^(0.04·drive)`. Output magnitude never exceeds
/// [`HardClip::ceiling`].
#[derive(Debug, Clone, Copy)]
pub struct HardClip {
    threshold: f32,
    makeup: f32,
}

impl HardClip {
    /// Create a hard clipper at the given drive.
    pub fn new(drive_db: f32) -> Self {
        let mut shaper = Self {
            threshold: 0.1,
            makeup: 1.5,
        };
        shaper.set_drive(drive_db);
        shaper
    }

    /// Current clip threshold (before make-up gain).
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Largest output magnitude: `threshold · 1.5 · 10^(0.04·drive)`.
    pub fn ceiling(&self) -> f32 {
        self.threshold * self.makeup
    }
}

impl Default for HardClip {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl Waveshaper for HardClip {
    fn set_drive(&mut self, drive_db: f32) {
        let drive = clamp_drive(drive_db);
        self.threshold = hard_clip_threshold(drive);
        self.makeup = 1.5 * powf(10.0, drive * 0.04);
    }

    #[inline]
    fn shape(&self, x: f32) -> f32 {
        x.clamp(-self.threshold, self.threshold) * self.makeup
    }
}

/// Hard clipper driven by the logarithmic threshold dial.
///
/// No make-up gain: the dial sets the clip level directly, from `1.0` at
/// drive 0 down to `0.02` at drive 24 (see [`threshold_knob`]).
#[derive(Debug, Clone, Copy)]
pub struct ThresholdClip {
    threshold: f32,
}

impl ThresholdClip {
    /// Create a threshold clipper at the given dial position.
    pub fn new(drive_db: f32) -> Self {
        let mut shaper = Self { threshold: 1.0 };
        shaper.set_drive(drive_db);
        shaper
    }

    /// Current clip threshold.
    pub fn threshold(&self) -> f32 {
        self.threshold
    }
}

impl Default for ThresholdClip {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl Waveshaper for ThresholdClip {
    fn set_drive(&mut self, drive_db: f32) {
        self.threshold = threshold_knob(clamp_drive(drive_db));
    }

    #[inline]
    fn shape(&self, x: f32) -> f32 {
        x.clamp(-self.threshold, self.threshold)
    }
}

/// Hard clipper with a linear threshold dial and no make-up gain.
///
/// Threshold `t = rescale(drive, 0, 24, 0.9, 0.0001)`, output
/// `clamp(x, −t, t)`.
#[derive(Debug, Clone, Copy)]
pub struct LinearClip {
    threshold: f32,
}

impl LinearClip {
    /// Create a linear-dial clipper at the given drive.
    pub fn new(drive_db: f32) -> Self {
        let mut shaper = Self { threshold: 0.9 };
        shaper.set_drive(drive_db);
        shaper
    }

    /// Current clip threshold.
    pub fn threshold(&self) -> f32 {
        self.threshold
    }
}

impl Default for LinearClip {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl Waveshaper for LinearClip {
    fn set_drive(&mut self, drive_db: f32) {
        self.threshold = linear_clip_threshold(drive_db);
    }

    #[inline]
    fn shape(&self, x: f32) -> f32 {
        x.clamp(-self.threshold, self.threshold)
    }
}

/// Exponential diode-law clipper.
///
/// `f(x) = exp((10^(0.05·x)·0.1·x) / (n·Vt)) − 1` with emission coefficient
/// `n = rescale(drive, 0, 24, 2.0, 1.0)` and thermal voltage
/// `Vt = rescale(drive, 0, 24, 0.04, 0.01)`.
///
/// The exponent argument is clamped to at most [`DIODE_MAX_EXPONENT`], so
/// the output lies in `[−1, exp(20) − 1]`.
#[derive(Debug, Clone, Copy)]
pub struct Diode {
    n_vt: f32,
}

impl Diode {
    /// Create a diode clipper at the given drive.
    pub fn new(drive_db: f32) -> Self {
        let mut shaper = Self { n_vt: 0.08 };
        shaper.set_drive(drive_db);
        shaper
    }
}

impl Default for Diode {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl Waveshaper for Diode {
    fn set_drive(&mut self, drive_db: f32) {
        self.n_vt = diode_n_vt(drive_db);
    }

    #[inline]
    fn shape(&self, x: f32) -> f32 {
        let argument = (powf(10.0, x * 0.05) * 0.1 * x) / self.n_vt;
        expf(argument.min(DIODE_MAX_EXPONENT)) - 1.0
    }
}

/// Exponential diode law on the sample as given.
///
/// `f(x) = exp(0.1·x / (n·Vt)) − 1` with the same `n` and `Vt` as
/// [`Diode`]. Input gain applied before this stage scales the exponent
/// linearly. The exponent is clamped to at most [`DIODE_MAX_EXPONENT`].
#[derive(Debug, Clone, Copy)]
pub struct DiodeLaw {
    n_vt: f32,
}

impl DiodeLaw {
    /// Create a diode-law stage at the given drive.
    pub fn new(drive_db: f32) -> Self {
        let mut shaper = Self { n_vt: 0.08 };
        shaper.set_drive(drive_db);
        shaper
    }
}

impl Default for DiodeLaw {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl Waveshaper for DiodeLaw {
    fn set_drive(&mut self, drive_db: f32) {
        self.n_vt = diode_n_vt(drive_db);
    }

    #[inline]
    fn shape(&self, x: f32) -> f32 {
        let argument = 0.1 * x / self.n_vt;
        expf(argument.min(DIODE_MAX_EXPONENT)) - 1.0
    }
}

/// DC-biased polynomial distortion with a `sin` fold-back guard.
///
/// `dc = rescale(drive, 0, 24, 0.75, 1.0)`, `x' = x·10^(0.05·drive) + dc`;
/// when `|x'| > 1` it is replaced by `sin(x')`. Then `y = x' − 0.2·x'^5` and
/// the bias is removed again: `f(x) = y − dc`. The guard keeps `|x'| ≤ 1`
/// going into the polynomial, so output lies in `[−1.8, 0.05]`. The pre-gain
/// product is limited to ±[`DC_INPUT_LIMIT`].
#[derive(Debug, Clone, Copy)]
pub struct DcDistortion {
    gain: f32,
    dc: f32,
}

impl DcDistortion {
    /// Create a DC distortion stage at the given drive.
    pub fn new(drive_db: f32) -> Self {
        let mut shaper = Self { gain: 1.0, dc: 0.75 };
        shaper.set_drive(drive_db);
        shaper
    }
}

impl Default for DcDistortion {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl Waveshaper for DcDistortion {
    fn set_drive(&mut self, drive_db: f32) {
        let drive = clamp_drive(drive_db);
        self.dc = rescale(drive, 0.0, 24.0, 0.75, 1.0);
        self.gain = powf(10.0, drive * 0.05);
    }

    #[inline]
    fn shape(&self, x: f32) -> f32 {
        let mut biased = (x * self.gain).clamp(-DC_INPUT_LIMIT, DC_INPUT_LIMIT) + self.dc;
        if biased.abs() > 1.0 {
            biased = sinf(biased);
        }
        let y = biased - 0.2 * powf(biased, 5.0);
        y - self.dc
    }
}

/// Full-wave rectifier: `|x|`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FullWave;

impl Waveshaper for FullWave {
    fn set_drive(&mut self, _drive_db: f32) {}

    #[inline]
    fn shape(&self, x: f32) -> f32 {
        x.abs()
    }
}

/// Half-wave rectifier: `x` for `x ≥ 0`, else `0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HalfWave;

impl Waveshaper for HalfWave {
    fn set_drive(&mut self, _drive_db: f32) {}

    #[inline]
    fn shape(&self, x: f32) -> f32 {
        if x >= 0.0 { x } else { 0.0 }
    }
}

/// Fixed `(2/π)·atan(x)` saturator.
#[derive(Debug, Clone, Copy, Default)]
pub struct Atan;

impl Waveshaper for Atan {
    fn set_drive(&mut self, _drive_db: f32) {}

    #[inline]
    fn shape(&self, x: f32) -> f32 {
        atan_saturate(x)
    }
}

/// Fixed saturator using the [`fast_tanh`] approximation.
#[derive(Debug, Clone, Copy, Default)]
pub struct FastTanh;

impl Waveshaper for FastTanh {
    fn set_drive(&mut self, _drive_db: f32) {}

    #[inline]
    fn shape(&self, x: f32) -> f32 {
        fast_tanh(x)
    }
}

/// Pedal voicing polynomial `−18x³ + 23x² − 5x`.
///
/// Unbounded and asymmetric; meant to sit between two saturators.
#[derive(Debug, Clone, Copy, Default)]
pub struct PedalCurve;

impl Waveshaper for PedalCurve {
    fn set_drive(&mut self, _drive_db: f32) {}

    #[inline]
    fn shape(&self, x: f32) -> f32 {
        ((-18.0 * x + 23.0) * x - 5.0) * x
    }
}

/// Selectable waveshaper, dispatched once per block.
///
/// The `match` happens in [`shape_slice`](Waveshaper::shape_slice), outside
/// the per-sample loop; each arm then runs the concrete shaper's loop.
#[derive(Debug, Clone, Copy)]
pub enum ShaperModel {
    /// [`SoftClip`]
    Soft(SoftClip),
    /// [`HardClip`]
    Hard(HardClip),
    /// [`DcDistortion`]
    Dc(DcDistortion),
    /// [`Diode`]
    Diode(Diode),
    /// [`FullWave`]
    FullWave,
    /// [`HalfWave`]
    HalfWave,
}

impl ShaperModel {
    /// Number of selectable models.
    pub const COUNT: usize = 6;

    /// Display names, indexed like [`from_index`](Self::from_index).
    pub const NAMES: [&'static str; Self::COUNT] =
        ["Soft", "Hard", "DC", "Diode", "Full Wave", "Half Wave"];

    /// Build a model from its index (0 soft, 1 hard, 2 dc, 3 diode,
    /// 4 full-wave, 5 half-wave). Out-of-range indices clamp to the last
    /// model.
    pub fn from_index(index: usize, drive_db: f32) -> Self {
        match index {
            0 => Self::Soft(SoftClip::new(drive_db)),
            1 => Self::Hard(HardClip::new(drive_db)),
            2 => Self::Dc(DcDistortion::new(drive_db)),
            3 => Self::Diode(Diode::new(drive_db)),
            4 => Self::FullWave,
            _ => Self::HalfWave,
        }
    }

    /// Index of this model.
    pub fn index(&self) -> usize {
        match self {
            Self::Soft(_) => 0,
            Self::Hard(_) => 1,
            Self::Dc(_) => 2,
            Self::Diode(_) => 3,
            Self::FullWave => 4,
            Self::HalfWave => 5,
        }
    }
}

impl Default for ShaperModel {
    fn default() -> Self {
        Self::Soft(SoftClip::default())
    }
}

impl Waveshaper for ShaperModel {
    fn set_drive(&mut self, drive_db: f32) {
        match self {
            Self::Soft(s) => s.set_drive(drive_db),
            Self::Hard(s) => s.set_drive(drive_db),
            Self::Dc(s) => s.set_drive(drive_db),
            Self::Diode(s) => s.set_drive(drive_db),
            Self::FullWave | Self::HalfWave => {}
        }
    }

    #[inline]
    fn shape(&self, x: f32) -> f32 {
        match self {
            Self::Soft(s) => s.shape(x),
            Self::Hard(s) => s.shape(x),
            Self::Dc(s) => s.shape(x),
            Self::Diode(s) => s.shape(x),
            Self::FullWave => FullWave.shape(x),
            Self::HalfWave => HalfWave.shape(x),
        }
    }

    fn shape_slice(&self, samples: &mut [f32]) {
        match self {
            Self::Soft(s) => s.shape_slice(samples),
            Self::Hard(s) => s.shape_slice(samples),
            Self::Dc(s) => s.shape_slice(samples),
            Self::Diode(s) => s.shape_slice(samples),
            Self::FullWave => FullWave.shape_slice(samples),
            Self::HalfWave => HalfWave.shape_slice(samples),
        }
    }
}

/// Soft clip one sample. See [`SoftClip`].
///
/// # Example
/// ```rust
/// use grit_core::soft_clip;
///
/// let expected = core::f32::consts::FRAC_2_PI * 0.5_f32.atan() * 1.5;
/// assert!((soft_clip(0.5, 0.0) - expected).abs() < 1e-6);
/// ```
#[inline]
pub fn soft_clip(x: f32, drive_db: f32) -> f32 {
    SoftClip::new(drive_db).shape(x)
}

/// Hard clip one sample. See [`HardClip`].
#[inline]
pub fn hard_clip(x: f32, drive_db: f32) -> f32 {
    HardClip::new(drive_db).shape(x)
}

/// Clip threshold used by [`hard_clip`]: `rescale(drive, 0, 24, 0.1, 0.01)`.
#[inline]
pub fn hard_clip_threshold(drive_db: f32) -> f32 {
    rescale(clamp_drive(drive_db), 0.0, 24.0, 0.1, 0.01)
}

/// Clip threshold used by [`LinearClip`]: `rescale(drive, 0, 24, 0.9, 0.0001)`.
#[inline]
pub fn linear_clip_threshold(drive_db: f32) -> f32 {
    rescale(clamp_drive(drive_db), 0.0, 24.0, 0.9, 0.0001)
}

/// Linear-dial clip one sample. See [`LinearClip`].
#[inline]
pub fn linear_clip(x: f32, drive_db: f32) -> f32 {
    LinearClip::new(drive_db).shape(x)
}

/// Diode-law one sample. See [`DiodeLaw`].
#[inline]
pub fn diode_law(x: f32, drive_db: f32) -> f32 {
    DiodeLaw::new(drive_db).shape(x)
}

/// Pedal voicing polynomial. See [`PedalCurve`].
#[inline]
pub fn pedal_curve(x: f32) -> f32 {
    PedalCurve.shape(x)
}

/// Diode-clip one sample. See [`Diode`].
#[inline]
pub fn diode(x: f32, drive_db: f32) -> f32 {
    Diode::new(drive_db).shape(x)
}

/// DC-distort one sample. See [`DcDistortion`].
#[inline]
pub fn dc_distortion(x: f32, drive_db: f32) -> f32 {
    DcDistortion::new(drive_db).shape(x)
}

/// Full-wave rectify: `|x|`.
#[inline]
pub fn full_wave_rectify(x: f32) -> f32 {
    FullWave.shape(x)
}

/// Half-wave rectify: negative half replaced by zero.
#[inline]
pub fn half_wave_rectify(x: f32) -> f32 {
    HalfWave.shape(x)
}

/// `(2/π)·atan(x)`, bounded to `(−1, 1)`.
#[inline]
pub fn atan_saturate(x: f32) -> f32 {
    FRAC_2_PI * atanf(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DRIVES: [f32; 7] = [0.0, 3.0, 6.0, 9.5, 12.0, 18.0, 24.0];

    fn inputs() -> impl Iterator<Item = f32> {
        (-100..=100).map(|i| i as f32 / 100.0)
    }

    #[test]
    fn soft_clip_unity_drive_value() {
        let expected = FRAC_2_PI * atanf(0.5) * 1.5;
        let out = soft_clip(0.5, 0.0);
        assert_eq!(out, expected);
        assert!((out - 0.4427).abs() < 1e-3, "got {out}");
    }

    #[test]
    fn soft_clip_is_odd() {
        for &drive in &DRIVES {
            for x in inputs() {
                assert_eq!(soft_clip(x, drive), -soft_clip(-x, drive));
            }
        }
    }

    #[test]
    fn hard_clip_full_drive_value() {
        let out = hard_clip(1.0, 24.0);
        let threshold = hard_clip_threshold(24.0);
        assert!((threshold - 0.01).abs() < 1e-6);
        let expected = threshold * 1.5 * powf(10.0, 0.96);
        assert!((out - expected).abs() < 1e-6, "got {out}, expected {expected}");
        // The 1.5 make-up factor applies at every drive: 0.01·1.5·10^0.96, not 0.01·10^0.96
        assert!((out - 0.1368).abs() < 1e-3);
        assert!((out - 0.0912).abs() > 0.04);
    }

    #[test]
    fn linear_clip_dial_endpoints() {
        assert!((linear_clip_threshold(0.0) - 0.9).abs() < 1e-6);
        assert!((linear_clip_threshold(24.0) - 0.0001).abs() < 1e-6);
        assert!((linear_clip_threshold(12.0) - 0.45005).abs() < 1e-5);
        assert_eq!(linear_clip(2.0, 0.0), linear_clip_threshold(0.0));
        assert_eq!(linear_clip(-2.0, 12.0), -linear_clip_threshold(12.0));
        assert_eq!(linear_clip(0.3, 0.0), 0.3);
        assert_eq!(linear_clip_threshold(-5.0), linear_clip_threshold(0.0));
    }

    #[test]
    fn diode_law_is_linear_in_the_exponent() {
        for &drive in &DRIVES {
            let n = rescale(drive, 0.0, 24.0, 2.0, 1.0);
            let vt = rescale(drive, 0.0, 24.0, 0.04, 0.01);
            for x in inputs() {
                let expected = expf((0.1 * x / (n * vt)).min(DIODE_MAX_EXPONENT)) - 1.0;
                let out = diode_law(x, drive);
                assert!(
                    (out - expected).abs() <= 1e-5 * expected.abs().max(1.0),
                    "drive {drive}, x {x}: {out} != {expected}"
                );
            }
            assert_eq!(diode_law(0.0, drive), 0.0);
        }
        assert!(diode_law(1.0e6, 24.0).is_finite());
    }

    #[test]
    fn pedal_curve_values() {
        assert_eq!(pedal_curve(0.0), 0.0);
        assert_eq!(pedal_curve(1.0), 0.0);
        assert_eq!(pedal_curve(-1.0), 46.0);
        assert!((pedal_curve(0.5) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn hard_clip_never_exceeds_ceiling() {
        for &drive in &DRIVES {
            let ceiling = hard_clip_threshold(drive) * 1.5 * powf(10.0, 0.04 * drive);
            for x in inputs() {
                let out = hard_clip(x, drive);
                assert!(
                    out.abs() <= ceiling + 1e-6,
                    "drive {drive}: |{out}| > {ceiling}"
                );
            }
        }
    }

    #[test]
    fn hard_clip_threshold_narrows_with_drive() {
        let mut prev = hard_clip_threshold(0.0);
        for &drive in &DRIVES[1..] {
            let t = hard_clip_threshold(drive);
            assert!(t < prev);
            prev = t;
        }
    }

    #[test]
    fn threshold_clip_follows_dial() {
        let shaper = ThresholdClip::new(0.0);
        assert_eq!(shaper.shape(0.5), 0.5);
        assert_eq!(shaper.shape(1.5), 1.0);

        let tight = ThresholdClip::new(24.0);
        assert!((tight.shape(1.0) - 0.02).abs() < 1e-4);
        assert!((tight.shape(-1.0) + 0.02).abs() < 1e-4);
    }

    #[test]
    fn diode_zero_in_zero_out() {
        for &drive in &DRIVES {
            assert_eq!(diode(0.0, drive), 0.0);
        }
    }

    #[test]
    fn diode_matches_formula() {
        let drive = 6.0;
        let n = rescale(drive, 0.0, 24.0, 2.0, 1.0);
        let vt = rescale(drive, 0.0, 24.0, 0.04, 0.01);
        let x = 0.3;
        let expected = expf((powf(10.0, 0.05 * x) * 0.1 * x) / (n * vt)) - 1.0;
        assert!((diode(x, drive) - expected).abs() < 1e-5);
    }

    #[test]
    fn diode_exponent_is_bounded() {
        let ceiling = expf(DIODE_MAX_EXPONENT) - 1.0;
        for x in [1.0, 10.0, 100.0, 1.0e6, f32::MAX] {
            let out = diode(x, 24.0);
            assert!(out.is_finite(), "diode({x}) overflowed");
            assert!(out <= ceiling);
        }
        assert!(diode(-1.0e6, 24.0) >= -1.0);
    }

    #[test]
    fn dc_distortion_full_scale_dc_is_bounded() {
        let out = dc_distortion(1.0, 0.0);
        assert!(out.abs() <= 1.0, "got {out}");
        // x' = 1.75 folds through sin before the polynomial
        let folded = sinf(1.75);
        let expected = (folded - 0.2 * powf(folded, 5.0)) - 0.75;
        assert_eq!(out, expected);
    }

    #[test]
    fn dc_distortion_silence_maps_near_zero_offset() {
        // Bias is removed after shaping; with no input only the polynomial
        // residue of the bias remains.
        let out = dc_distortion(0.0, 0.0);
        let expected = (0.75 - 0.2 * powf(0.75, 5.0)) - 0.75;
        assert_eq!(out, expected);
    }

    #[test]
    fn dc_distortion_output_range() {
        for &drive in &DRIVES {
            for x in inputs() {
                let out = dc_distortion(x * 4.0, drive);
                assert!(
                    (-1.8 - 1e-5..=0.05 + 1e-5).contains(&out),
                    "drive {drive}, x {x}: {out}"
                );
            }
        }
    }

    #[test]
    fn rectifiers() {
        for x in inputs() {
            assert_eq!(full_wave_rectify(x), full_wave_rectify(-x));
            assert!(full_wave_rectify(x) >= 0.0);
            if x < 0.0 {
                assert_eq!(half_wave_rectify(x), 0.0);
            } else {
                assert_eq!(half_wave_rectify(x), x);
            }
        }
    }

    #[test]
    fn drive_is_clamped() {
        assert_eq!(soft_clip(0.3, -10.0), soft_clip(0.3, 0.0));
        assert_eq!(diode(0.3, 100.0), diode(0.3, 24.0));
        assert!(diode(0.9, 1000.0).is_finite());
    }

    #[test]
    fn struct_and_free_function_agree() {
        for &drive in &DRIVES {
            let soft = SoftClip::new(drive);
            let hard = HardClip::new(drive);
            let d = Diode::new(drive);
            let dc = DcDistortion::new(drive);
            for x in inputs() {
                assert_eq!(soft.shape(x), soft_clip(x, drive));
                assert_eq!(hard.shape(x), hard_clip(x, drive));
                assert_eq!(d.shape(x), diode(x, drive));
                assert_eq!(dc.shape(x), dc_distortion(x, drive));
            }
        }
    }

    #[test]
    fn model_dispatch_matches_concrete_shapers() {
        let drive = 12.0;
        for index in 0..ShaperModel::COUNT {
            let model = ShaperModel::from_index(index, drive);
            assert_eq!(model.index(), index);

            let mut block: [f32; 16] = core::array::from_fn(|i| (i as f32 - 8.0) / 8.0);
            let reference = block;
            model.shape_slice(&mut block);

            for (out, x) in block.iter().zip(reference.iter()) {
                let expected = match index {
                    0 => soft_clip(*x, drive),
                    1 => hard_clip(*x, drive),
                    2 => dc_distortion(*x, drive),
                    3 => diode(*x, drive),
                    4 => full_wave_rectify(*x),
                    _ => half_wave_rectify(*x),
                };
                assert_eq!(*out, expected, "model {index} at x={x}");
            }
        }
    }

    #[test]
    fn model_index_clamps() {
        assert_eq!(ShaperModel::from_index(99, 0.0).index(), 5);
    }

    #[test]
    fn atan_saturate_bounded() {
        assert_eq!(atan_saturate(0.0), 0.0);
        assert!(atan_saturate(1.0e9) <= 1.0);
        assert!(atan_saturate(-1.0e9) >= -1.0);
    }
}
