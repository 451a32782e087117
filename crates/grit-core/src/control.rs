//! Control definitions and the lock-free control store.
//!
//! Every effect exposes a fixed set of named controls drawn from
//! [`ControlId`]. A UI or automation thread writes values into
//! [`SharedControls`]; the audio thread copies them out once per block as a
//! [`ControlSnapshot`] and hands that to [`Processor::process`].
//!
//! Each control value is an `f32` stored as the bit pattern of an
//! [`AtomicU32`], so every read and write is a single atomic operation with
//! no lock.
//!
//! [`Processor::process`]: crate::Processor::process

use crate::error::ControlError;
use core::sync::atomic::{AtomicU32, Ordering};
use libm::roundf;

/// Number of distinct control ids.
pub const CONTROL_COUNT: usize = 6;

/// Identity of a control.
///
/// The string id (see [`as_str`](Self::as_str)) is the stable name used in
/// presets and on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlId {
    /// Waveshaper drive, dB.
    Drive,
    /// Input gain, dB.
    Input,
    /// Output trim, dB.
    Trim,
    /// DC bias, volts.
    Bias,
    /// Tone shelf gain, dB.
    Tone,
    /// Waveshaper model index.
    Model,
}

impl ControlId {
    /// All ids in storage order.
    pub const ALL: [Self; CONTROL_COUNT] = [
        Self::Drive,
        Self::Input,
        Self::Trim,
        Self::Bias,
        Self::Tone,
        Self::Model,
    ];

    /// Storage slot of this id.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Stable string id.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Drive => "drive",
            Self::Input => "input",
            Self::Trim => "trim",
            Self::Bias => "bias",
            Self::Tone => "tone",
            Self::Model => "model",
        }
    }

    /// Look up an id by its string id.
    pub fn from_str_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == id)
    }
}

impl core::fmt::Display for ControlId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unit of a control value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlUnit {
    /// Decibels.
    Decibels,
    /// Volts (DC offset in normalized sample units).
    Volts,
    /// Integer selection index.
    Index,
}

impl ControlUnit {
    /// Display suffix.
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Decibels => " dB",
            Self::Volts => " V",
            Self::Index => "",
        }
    }
}

/// Range, unit and default of one control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlDescriptor {
    /// Which control this describes.
    pub id: ControlId,
    /// Display name.
    pub name: &'static str,
    /// Value unit.
    pub unit: ControlUnit,
    /// Minimum value.
    pub min: f32,
    /// Maximum value.
    pub max: f32,
    /// Initial value.
    pub default: f32,
    /// Suggested increment for stepped editing.
    pub step: f32,
}

impl ControlDescriptor {
    /// A gain-style control in decibels.
    ///
    /// # Example
    /// ```rust
    /// use grit_core::{ControlDescriptor, ControlId};
    ///
    /// let trim = ControlDescriptor::decibels(ControlId::Trim, "Trim", -24.0, 24.0, 0.0);
    /// assert!(trim.validate().is_ok());
    /// assert_eq!(trim.clamp(40.0), 24.0);
    /// ```
    pub const fn decibels(id: ControlId, name: &'static str, min: f32, max: f32, default: f32) -> Self {
        Self {
            id,
            name,
            unit: ControlUnit::Decibels,
            min,
            max,
            default,
            step: 0.1,
        }
    }

    /// A DC offset control in volts.
    pub const fn volts(id: ControlId, name: &'static str, min: f32, max: f32, default: f32) -> Self {
        Self {
            id,
            name,
            unit: ControlUnit::Volts,
            min,
            max,
            default,
            step: 0.01,
        }
    }

    /// A selector over `count` choices, starting at index 0.
    pub const fn selector(id: ControlId, name: &'static str, count: usize) -> Self {
        Self {
            id,
            name,
            unit: ControlUnit::Index,
            min: 0.0,
            max: count.saturating_sub(1) as f32,
            default: 0.0,
            step: 1.0,
        }
    }

    /// Stable string id of the described control.
    pub const fn string_id(&self) -> &'static str {
        self.id.as_str()
    }

    /// Check that bounds and default are finite, ordered and consistent.
    pub fn validate(&self) -> Result<(), ControlError> {
        let name = self.id.as_str();
        if !(self.min.is_finite() && self.max.is_finite() && self.default.is_finite()) {
            return Err(ControlError::NonFinite { name });
        }
        if self.min > self.max {
            return Err(ControlError::InvalidRange {
                name,
                min: self.min,
                max: self.max,
            });
        }
        if !(self.min..=self.max).contains(&self.default) {
            return Err(ControlError::DefaultOutOfRange {
                name,
                default: self.default,
            });
        }
        Ok(())
    }

    /// Clamp a value into range. NaN maps to the default.
    ///
    /// Selector values are rounded to the nearest index.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            return self.default;
        }
        let clamped = value.clamp(self.min, self.max);
        match self.unit {
            ControlUnit::Index => roundf(clamped),
            ControlUnit::Decibels | ControlUnit::Volts => clamped,
        }
    }
}

/// A range-bounded control value. The value is always within
/// `[min, max]` of its descriptor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlParameter {
    descriptor: ControlDescriptor,
    value: f32,
}

impl ControlParameter {
    /// Create a parameter at its default value.
    pub fn new(descriptor: ControlDescriptor) -> Result<Self, ControlError> {
        descriptor.validate()?;
        Ok(Self {
            value: descriptor.default,
            descriptor,
        })
    }

    /// Set the value, clamping into range. Returns the stored value.
    pub fn set(&mut self, value: f32) -> f32 {
        self.value = self.descriptor.clamp(value);
        self.value
    }

    /// Current value.
    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Restore the default.
    pub fn reset(&mut self) {
        self.value = self.descriptor.default;
    }

    /// Descriptor this parameter was built from.
    pub fn descriptor(&self) -> &ControlDescriptor {
        &self.descriptor
    }
}

/// Control values resolved for one block.
///
/// Processors read only the fields they use. A field an effect does not
/// expose stays at its neutral value of `0.0` (unity gain for the dB
/// fields).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControlSnapshot {
    /// Waveshaper drive, dB.
    pub drive: f32,
    /// Input gain, dB.
    pub input_db: f32,
    /// Output trim, dB.
    pub trim_db: f32,
    /// DC bias, volts.
    pub bias: f32,
    /// Tone shelf gain, dB.
    pub tone_db: f32,
    /// Waveshaper model index.
    pub model: f32,
}

impl ControlSnapshot {
    /// Value of a control by id.
    pub fn get(&self, id: ControlId) -> f32 {
        match id {
            ControlId::Drive => self.drive,
            ControlId::Input => self.input_db,
            ControlId::Trim => self.trim_db,
            ControlId::Bias => self.bias,
            ControlId::Tone => self.tone_db,
            ControlId::Model => self.model,
        }
    }

    /// Overwrite a control by id.
    pub fn set(&mut self, id: ControlId, value: f32) {
        match id {
            ControlId::Drive => self.drive = value,
            ControlId::Input => self.input_db = value,
            ControlId::Trim => self.trim_db = value,
            ControlId::Bias => self.bias = value,
            ControlId::Tone => self.tone_db = value,
            ControlId::Model => self.model = value,
        }
    }

    /// Model selection as an index, rounded and floored at zero.
    #[inline]
    pub fn model_index(&self) -> usize {
        let rounded = roundf(self.model);
        if rounded.is_nan() || rounded <= 0.0 {
            0
        } else {
            rounded as usize
        }
    }
}

/// Lock-free control store shared between a writer thread and the audio
/// thread.
///
/// Holds one atomic slot per [`ControlId`]. Only the controls listed at
/// construction are writable; the others stay at `0.0`. Writes are clamped
/// to the control's range.
///
/// # Example
/// ```rust
/// use grit_core::{ControlDescriptor, ControlId, SharedControls};
///
/// let descriptors = [ControlDescriptor::decibels(ControlId::Drive, "Drive", 0.0, 24.0, 6.0)];
/// let controls = SharedControls::new(&descriptors).unwrap();
/// assert_eq!(controls.get(ControlId::Drive), 6.0);
///
/// controls.set(ControlId::Drive, 100.0);
/// assert_eq!(controls.snapshot().drive, 24.0);
/// ```
#[derive(Debug)]
pub struct SharedControls {
    values: [AtomicU32; CONTROL_COUNT],
    descriptors: [Option<ControlDescriptor>; CONTROL_COUNT],
}

impl SharedControls {
    /// Build a store from an effect's control descriptors, each at its
    /// default.
    pub fn new(descriptors: &[ControlDescriptor]) -> Result<Self, ControlError> {
        let mut slots = [None; CONTROL_COUNT];
        let mut values = [0.0_f32; CONTROL_COUNT];
        for descriptor in descriptors {
            descriptor.validate()?;
            let index = descriptor.id.index();
            slots[index] = Some(*descriptor);
            values[index] = descriptor.default;
        }
        Ok(Self {
            values: values.map(|v| AtomicU32::new(v.to_bits())),
            descriptors: slots,
        })
    }

    /// Descriptor of a control, if this store exposes it.
    pub fn descriptor(&self, id: ControlId) -> Option<&ControlDescriptor> {
        self.descriptors[id.index()].as_ref()
    }

    /// Store a value, clamped to its range.
    ///
    /// Returns the stored value, or `None` if the control is not exposed.
    pub fn set(&self, id: ControlId, value: f32) -> Option<f32> {
        let descriptor = self.descriptors[id.index()]?;
        let clamped = descriptor.clamp(value);
        self.values[id.index()].store(clamped.to_bits(), Ordering::Release);
        Some(clamped)
    }

    /// Current value of a control.
    #[inline]
    pub fn get(&self, id: ControlId) -> f32 {
        f32::from_bits(self.values[id.index()].load(Ordering::Acquire))
    }

    /// Copy every control into a snapshot.
    pub fn snapshot(&self) -> ControlSnapshot {
        let mut snapshot = ControlSnapshot::default();
        for id in ControlId::ALL {
            snapshot.set(id, self.get(id));
        }
        snapshot
    }

    /// Restore every exposed control to its default.
    pub fn reset(&self) {
        for (slot, descriptor) in self.values.iter().zip(self.descriptors.iter()) {
            if let Some(descriptor) = descriptor {
                slot.store(descriptor.default.to_bits(), Ordering::Release);
            }
        }
    }
}
