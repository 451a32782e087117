//! Linear parameter ramping for zipper-free control changes.
//!
//! Coefficients driven by user controls (gain, bias) must not jump between
//! samples. [`LinearRamp`] moves a value toward its target at a constant
//! rate over a fixed duration, lands exactly on the target at the last step,
//! and never overshoots.
//!
//! ## Usage
//!
//! ```rust
//! use grit_core::{LinearRamp, RampState};
//!
//! let mut gain = LinearRamp::new(1.0, 0.01); // 10 ms ramp
//! gain.prepare(48000.0);
//! gain.set_target(0.5);
//! assert_eq!(gain.state(), RampState::Ramping);
//!
//! for _ in 0..480 {
//!     let _smoothed = gain.advance();
//! }
//! assert_eq!(gain.current(), 0.5);
//! assert_eq!(gain.state(), RampState::Idle);
//! ```

use libm::round;

/// Whether a ramp is still moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RampState {
    /// Value equals target.
    Idle,
    /// Value is moving toward target.
    Ramping,
}

/// A value that ramps linearly to its target over a fixed duration.
///
/// The value at step `k` of an `n`-step ramp from `start` to `target` is
/// `start + (target − start)·k/n`, limited so it never passes the target,
/// and exactly `target` at `k = n`. Each step therefore moves by at most one
/// `|target − start| / n` increment, and the sequence is monotonic.
///
/// A new target set mid-ramp starts a fresh full-duration ramp from the
/// current value.
#[derive(Debug, Clone)]
pub struct LinearRamp {
    start: f32,
    current: f32,
    target: f32,
    /// Steps taken in the current ramp
    elapsed: u32,
    /// Steps in a full ramp at the prepared sample rate
    total_steps: u32,
    ramp_seconds: f32,
    sample_rate: f64,
    state: RampState,
}

impl LinearRamp {
    /// Create an idle ramp at `initial`.
    ///
    /// The ramp is instantaneous until [`prepare`](Self::prepare) supplies a
    /// sample rate. Negative or non-finite durations are treated as `0`.
    pub fn new(initial: f32, ramp_seconds: f32) -> Self {
        Self {
            start: initial,
            current: initial,
            target: initial,
            elapsed: 0,
            total_steps: 0,
            ramp_seconds: sanitize_seconds(ramp_seconds),
            sample_rate: 0.0,
            state: RampState::Idle,
        }
    }

    /// Configure the sample rate. Any ramp in progress completes
    /// immediately.
    pub fn prepare(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
        self.total_steps = steps_for(self.ramp_seconds, sample_rate);
        self.snap_to_target();
    }

    /// Change the ramp duration. Takes effect on the next
    /// [`set_target`](Self::set_target).
    pub fn set_ramp_seconds(&mut self, ramp_seconds: f32) {
        self.ramp_seconds = sanitize_seconds(ramp_seconds);
        self.total_steps = steps_for(self.ramp_seconds, self.sample_rate);
    }

    /// Configured ramp duration in seconds.
    pub fn ramp_seconds(&self) -> f32 {
        self.ramp_seconds
    }

    /// Start ramping toward `target`.
    ///
    /// Setting the current target again is a no-op. With a zero-length ramp
    /// the value jumps immediately.
    pub fn set_target(&mut self, target: f32) {
        if target == self.target {
            return;
        }
        self.target = target;
        if self.total_steps == 0 {
            self.snap_to_target();
            return;
        }
        self.start = self.current;
        self.elapsed = 0;
        self.state = RampState::Ramping;
    }

    /// Jump to `value` with no ramp.
    pub fn set_immediate(&mut self, value: f32) {
        self.target = value;
        self.snap_to_target();
    }

    /// Finish any ramp in progress.
    pub fn snap_to_target(&mut self) {
        self.start = self.target;
        self.current = self.target;
        self.elapsed = 0;
        self.state = RampState::Idle;
    }

    /// Advance one step and return the new value.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        if self.state == RampState::Ramping {
            self.elapsed += 1;
            if self.elapsed >= self.total_steps {
                self.snap_to_target();
            } else {
                let fraction = self.elapsed as f32 / self.total_steps as f32;
                let value = self.start + (self.target - self.start) * fraction;
                self.current = if self.target >= self.start {
                    value.min(self.target)
                } else {
                    value.max(self.target)
                };
            }
        }
        self.current
    }

    /// Current value without advancing.
    #[inline]
    pub fn current(&self) -> f32 {
        self.current
    }

    /// Target value.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Ramp state.
    #[inline]
    pub fn state(&self) -> RampState {
        self.state
    }

    /// Steps left before the ramp completes.
    pub fn remaining_steps(&self) -> u32 {
        match self.state {
            RampState::Idle => 0,
            RampState::Ramping => self.total_steps - self.elapsed,
        }
    }
}

impl Default for LinearRamp {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

fn sanitize_seconds(seconds: f32) -> f32 {
    if seconds.is_finite() && seconds > 0.0 {
        seconds
    } else {
        0.0
    }
}

fn steps_for(seconds: f32, sample_rate: f64) -> u32 {
    if !(sample_rate.is_finite() && sample_rate > 0.0) {
        return 0;
    }
    let steps = round(f64::from(seconds) * sample_rate);
    if steps >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        steps as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_reaches_target_exactly_on_last_step() {
        let mut ramp = LinearRamp::new(0.0, 0.001);
        ramp.prepare(48000.0);
        ramp.set_target(1.0);
        assert_eq!(ramp.remaining_steps(), 48);

        for _ in 0..47 {
            ramp.advance();
            assert_eq!(ramp.state(), RampState::Ramping);
            assert!(ramp.current() < 1.0);
        }
        assert_eq!(ramp.advance(), 1.0);
        assert_eq!(ramp.state(), RampState::Idle);
        assert_eq!(ramp.advance(), 1.0);
    }

    #[test]
    fn ramp_is_monotonic_downward() {
        let mut ramp = LinearRamp::new(2.0, 0.01);
        ramp.prepare(44100.0);
        ramp.set_target(0.25);

        let mut prev = ramp.current();
        while ramp.state() == RampState::Ramping {
            let v = ramp.advance();
            assert!(v <= prev);
            assert!(v >= 0.25);
            prev = v;
        }
        assert_eq!(ramp.current(), 0.25);
    }

    #[test]
    fn step_size_is_bounded() {
        let mut ramp = LinearRamp::new(0.0, 0.002);
        ramp.prepare(48000.0);
        ramp.set_target(3.0);
        let increment = 3.0 / 96.0;

        let mut prev = ramp.current();
        for _ in 0..96 {
            let v = ramp.advance();
            assert!((v - prev).abs() <= increment + 1e-6);
            prev = v;
        }
    }

    #[test]
    fn zero_duration_is_instant() {
        let mut ramp = LinearRamp::new(1.0, 0.0);
        ramp.prepare(48000.0);
        ramp.set_target(0.1);
        assert_eq!(ramp.state(), RampState::Idle);
        assert_eq!(ramp.current(), 0.1);
    }

    #[test]
    fn unprepared_ramp_is_instant() {
        let mut ramp = LinearRamp::new(0.0, 1.0);
        ramp.set_target(0.5);
        assert_eq!(ramp.current(), 0.5);
    }

    #[test]
    fn same_target_does_not_restart() {
        let mut ramp = LinearRamp::new(0.0, 0.001);
        ramp.prepare(48000.0);
        ramp.set_target(1.0);
        for _ in 0..10 {
            ramp.advance();
        }
        let remaining = ramp.remaining_steps();
        ramp.set_target(1.0);
        assert_eq!(ramp.remaining_steps(), remaining);
    }

    #[test]
    fn retarget_restarts_from_current_value() {
        let mut ramp = LinearRamp::new(0.0, 0.001);
        ramp.prepare(48000.0);
        ramp.set_target(1.0);
        for _ in 0..24 {
            ramp.advance();
        }
        let midway = ramp.current();
        ramp.set_target(0.0);
        assert_eq!(ramp.remaining_steps(), 48);
        let next = ramp.advance();
        assert!(next < midway);
        assert!(next > 0.0);
    }

    #[test]
    fn prepare_completes_ramp() {
        let mut ramp = LinearRamp::new(0.0, 1.0);
        ramp.prepare(48000.0);
        ramp.set_target(1.0);
        ramp.advance();
        ramp.prepare(96000.0);
        assert_eq!(ramp.state(), RampState::Idle);
        assert_eq!(ramp.current(), 1.0);
    }

    #[test]
    fn invalid_duration_is_zero() {
        assert_eq!(LinearRamp::new(0.0, -1.0).ramp_seconds(), 0.0);
        assert_eq!(LinearRamp::new(0.0, f32::NAN).ramp_seconds(), 0.0);
    }
}
