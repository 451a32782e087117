//! Preset files for grit effects.
//!
//! A preset names one effect from the catalogue plus values for some of its
//! controls, stored as TOML. Presets are validated against the effect's
//! control descriptors on load.
//!
//! # Example
//!
//! ```rust,no_run
//! use grit_config::{Preset, user_presets_dir};
//! use grit_effects::{EffectKind, EngineConfig, Session};
//!
//! let preset = Preset::new("Hot", EffectKind::HardClipper)
//!     .with_control("drive", 18.0)
//!     .with_control("trim", -12.0);
//! preset.save(user_presets_dir().join("hot.toml"))?;
//!
//! let loaded = Preset::load(user_presets_dir().join("hot.toml"))?;
//! let session = Session::new(loaded.kind()?, loaded.engine_config(EngineConfig::default()))?;
//! loaded.apply(&session)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod preset;

/// Platform-specific preset directories.
pub mod paths;

/// Presets bundled with the library.
pub mod factory_presets;

pub use error::ConfigError;
pub use factory_presets::{
    FACTORY_PRESET_NAMES, factory_presets, get_factory_preset, is_factory_preset,
};
pub use paths::{
    ensure_user_presets_dir, find_preset, list_all_presets, preset_name_from_path,
    system_presets_dir, user_config_dir, user_presets_dir,
};
pub use preset::{MAX_RAMP_SECONDS, PRESET_VERSION, Preset};
