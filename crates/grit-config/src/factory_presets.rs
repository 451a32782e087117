//! Presets compiled into the library.

use crate::{ConfigError, Preset};

/// Names of the built-in presets.
pub static FACTORY_PRESET_NAMES: &[&str] = &[
    "crunch",
    "warm",
    "diode-push",
    "octave-up",
    "tube-bias",
    "cab-default",
];

static FACTORY_PRESETS_TOML: &[(&str, &str)] = &[
    ("crunch", CRUNCH_PRESET),
    ("warm", WARM_PRESET),
    ("diode-push", DIODE_PUSH_PRESET),
    ("octave-up", OCTAVE_UP_PRESET),
    ("tube-bias", TUBE_BIAS_PRESET),
    ("cab-default", CAB_DEFAULT_PRESET),
];

const CRUNCH_PRESET: &str = r#"
name = "Crunch"
description = "Driven hard clip, trimmed back to unity"
effect = "saturator"

[controls]
model = 1
drive = 12.0
trim = -9.0
"#;

const WARM_PRESET: &str = r#"
name = "Warm"
description = "Gentle soft clip"
effect = "saturator"

[controls]
model = 0
drive = 6.0
trim = -3.0
"#;

const DIODE_PUSH_PRESET: &str = r#"
name = "Diode Push"
description = "Diode clipper with a hot input"
effect = "diode-clipper"

[controls]
input = 6.0
drive = 9.0
"#;

const OCTAVE_UP_PRESET: &str = r#"
name = "Octave Up"
description = "Full-wave rectified doubling"
effect = "full-wave"

[controls]
input = 0.0
trim = -3.0
"#;

const TUBE_BIAS_PRESET: &str = r#"
name = "Tube Bias"
description = "Asymmetric bias into tanh with a slow sweep"
effect = "bias-drive"
ramp_seconds = 0.05

[controls]
input = 12.0
bias = 0.3
trim = -12.0
"#;

const CAB_DEFAULT_PRESET: &str = r#"
name = "Cabinet"
description = "Cabinet with a slightly darker top end"
effect = "cabinet"

[controls]
input = 0.0
tone = -3.0
trim = 0.0
"#;

/// Every built-in preset, in [`FACTORY_PRESET_NAMES`] order.
pub fn factory_presets() -> Result<Vec<Preset>, ConfigError> {
    FACTORY_PRESETS_TOML
        .iter()
        .map(|(_, toml)| Preset::from_toml(toml))
        .collect()
}

/// Look up a built-in preset by name.
///
/// Returns `None` for names that are not built in.
pub fn get_factory_preset(name: &str) -> Option<Result<Preset, ConfigError>> {
    FACTORY_PRESETS_TOML
        .iter()
        .find(|(preset_name, _)| *preset_name == name)
        .map(|(_, toml)| Preset::from_toml(toml))
}

/// Whether `name` is a built-in preset.
pub fn is_factory_preset(name: &str) -> bool {
    FACTORY_PRESET_NAMES.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use grit_effects::EffectKind;

    #[test]
    fn all_factory_presets_validate() {
        let presets = factory_presets().unwrap();
        assert_eq!(presets.len(), FACTORY_PRESET_NAMES.len());
        for preset in &presets {
            assert!(preset.validate().is_ok(), "{} failed", preset.name);
        }
    }

    #[test]
    fn names_match_table() {
        let table: Vec<_> = FACTORY_PRESETS_TOML.iter().map(|(name, _)| *name).collect();
        assert_eq!(table, FACTORY_PRESET_NAMES);
    }

    #[test]
    fn lookup_by_name() {
        let crunch = get_factory_preset("crunch").unwrap().unwrap();
        assert_eq!(crunch.kind().unwrap(), EffectKind::Saturator);
        assert_eq!(crunch.control("model"), Some(1.0));

        assert!(get_factory_preset("nope").is_none());
        assert!(is_factory_preset("cab-default"));
        assert!(!is_factory_preset("nope"));
    }
}
