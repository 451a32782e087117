//! Preset file format and operations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use grit_core::ControlId;
use grit_effects::{EffectKind, EngineConfig, Session};

/// Preset format version this build reads and writes.
pub const PRESET_VERSION: u32 = 1;

/// Longest accepted `ramp_seconds` override.
pub const MAX_RAMP_SECONDS: f32 = 10.0;

fn default_version() -> u32 {
    PRESET_VERSION
}

/// A saved effect setup: which effect, and where its controls sit.
///
/// # TOML Format
///
/// ```toml
/// version = 1
/// name = "Crunch"
/// effect = "saturator"
/// ramp_seconds = 0.05          # optional gain ramp override
/// impulse_response = "cab.wav" # optional, cabinet or pedal
///
/// [controls]
/// drive = 12.0
/// trim = -6.0
/// model = 1
/// ```
///
/// Control keys are the string ids of the effect's controls. Controls the
/// preset leaves out keep their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Preset {
    /// Format version.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Name of the preset.
    pub name: String,

    /// Optional description of the preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Effect id from the catalogue.
    pub effect: String,

    /// Gain ramp time override, seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ramp_seconds: Option<f32>,

    /// Cabinet or pedal impulse response file. Relative paths are resolved against
    /// the preset file's directory by [`Preset::load`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impulse_response: Option<PathBuf>,

    /// Control values by string id.
    #[serde(default)]
    pub controls: BTreeMap<String, f32>,
}

impl Preset {
    /// Create a preset for `kind` with every control at its default.
    pub fn new(name: impl Into<String>, kind: EffectKind) -> Self {
        Self {
            version: PRESET_VERSION,
            name: name.into(),
            description: None,
            effect: kind.id().to_string(),
            ramp_seconds: None,
            impulse_response: None,
            controls: BTreeMap::new(),
        }
    }

    /// Capture the current control values of a session.
    pub fn from_session(name: impl Into<String>, session: &Session) -> Self {
        let kind = session.kind();
        let mut preset = Self::new(name, kind);
        for descriptor in kind.descriptors() {
            preset.controls.insert(
                descriptor.string_id().to_string(),
                session.controls().get(descriptor.id),
            );
        }
        preset
    }

    /// Create a preset with a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set a control value.
    pub fn with_control(mut self, control: impl Into<String>, value: f32) -> Self {
        self.controls.insert(control.into(), value);
        self
    }

    /// Override the gain ramp time.
    pub fn with_ramp_seconds(mut self, ramp_seconds: f32) -> Self {
        self.ramp_seconds = Some(ramp_seconds);
        self
    }

    /// Set the impulse response file.
    pub fn with_impulse_response(mut self, path: impl Into<PathBuf>) -> Self {
        self.impulse_response = Some(path.into());
        self
    }

    /// Load and validate a preset from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let mut preset = Self::from_toml(&content)?;

        if let (Some(ir), Some(dir)) = (preset.impulse_response.as_mut(), path.parent())
            && ir.is_relative()
        {
            *ir = dir.join(&*ir);
        }

        tracing::debug!(
            path = %path.display(),
            name = %preset.name,
            effect = %preset.effect,
            controls = preset.controls.len(),
            "loaded preset"
        );
        Ok(preset)
    }

    /// Parse and validate a preset from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let preset: Preset = toml::from_str(toml_str)?;
        preset.validate()?;
        Ok(preset)
    }

    /// Save the preset to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the preset to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// The catalogue entry this preset targets.
    pub fn kind(&self) -> Result<EffectKind, ConfigError> {
        EffectKind::from_id(&self.effect).ok_or_else(|| ConfigError::UnknownEffect(self.effect.clone()))
    }

    /// Value of a control, if the preset sets it.
    pub fn control(&self, control: &str) -> Option<f32> {
        self.controls.get(control).copied()
    }

    /// Check version, effect, control names and ranges, and the ramp time.
    pub fn validate(&self) -> Result<EffectKind, ConfigError> {
        if self.version != PRESET_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: self.version,
                expected: PRESET_VERSION,
            });
        }
        let kind = self.kind()?;

        for (control, &value) in &self.controls {
            let descriptor = kind
                .descriptor(control)
                .ok_or_else(|| ConfigError::UnknownControl {
                    effect: self.effect.clone(),
                    control: control.clone(),
                })?;
            if !(descriptor.min..=descriptor.max).contains(&value) {
                return Err(ConfigError::OutOfRange {
                    effect: self.effect.clone(),
                    control: control.clone(),
                    value,
                    min: descriptor.min,
                    max: descriptor.max,
                });
            }
        }

        if let Some(value) = self.ramp_seconds
            && !(0.0..=MAX_RAMP_SECONDS).contains(&value)
        {
            return Err(ConfigError::InvalidRamp {
                value,
                max: MAX_RAMP_SECONDS,
            });
        }

        if self.impulse_response.is_some() && !kind.uses_impulse_response() {
            return Err(ConfigError::UnexpectedImpulseResponse(self.effect.clone()));
        }

        Ok(kind)
    }

    /// `base` with this preset's ramp override applied.
    pub fn engine_config(&self, base: EngineConfig) -> EngineConfig {
        match self.ramp_seconds {
            Some(ramp_seconds) => base.with_ramp_seconds(ramp_seconds),
            None => base,
        }
    }

    /// Write the preset's control values into a running session.
    ///
    /// Controls the preset leaves out are untouched.
    pub fn apply(&self, session: &Session) -> Result<(), ConfigError> {
        let kind = self.validate()?;
        if kind != session.kind() {
            return Err(ConfigError::EffectMismatch {
                preset: self.effect.clone(),
                session: session.kind().id(),
            });
        }
        for (control, &value) in &self.controls {
            let id = ControlId::from_str_id(control).ok_or_else(|| ConfigError::UnknownControl {
                effect: self.effect.clone(),
                control: control.clone(),
            })?;
            session.controls().set(id, value);
        }
        Ok(())
    }
}
