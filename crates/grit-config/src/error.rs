//! Error types for configuration operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create directory
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        /// Path of the directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Preset not found
    #[error("preset not found: {0}")]
    PresetNotFound(String),

    /// The preset format version is not supported
    #[error("unsupported preset version {found} (expected {expected})")]
    UnsupportedVersion {
        /// Version in the file.
        found: u32,
        /// Version this build reads.
        expected: u32,
    },

    /// Unknown effect type
    #[error("unknown effect type: {0}")]
    UnknownEffect(String),

    /// The effect has no control with this id
    #[error("effect '{effect}' has no control '{control}'")]
    UnknownControl {
        /// Effect id.
        effect: String,
        /// Control id from the preset.
        control: String,
    },

    /// A control value lies outside its range
    #[error("control '{control}' of effect '{effect}' is {value}, expected {min}..={max}")]
    OutOfRange {
        /// Effect id.
        effect: String,
        /// Control id.
        control: String,
        /// Value from the preset.
        value: f32,
        /// Range minimum.
        min: f32,
        /// Range maximum.
        max: f32,
    },

    /// A ramp time is negative, non-finite or too long
    #[error("ramp_seconds must be between 0 and {max}, got {value}")]
    InvalidRamp {
        /// Value from the preset.
        value: f32,
        /// Longest accepted ramp.
        max: f32,
    },

    /// The preset targets a different effect than the session runs
    #[error("preset is for '{preset}' but the session runs '{session}'")]
    EffectMismatch {
        /// Effect id in the preset.
        preset: String,
        /// Effect id of the session.
        session: &'static str,
    },

    /// An impulse response was given for an effect that does not use one
    #[error("effect '{0}' does not take an impulse response")]
    UnexpectedImpulseResponse(String),
}

impl ConfigError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// Create a create directory error.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::CreateDir {
            path: path.into(),
            source,
        }
    }
}
