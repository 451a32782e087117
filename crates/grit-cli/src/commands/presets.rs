//! Preset listing and inspection command.

use anyhow::{Context, bail};
use clap::{Args, Subcommand};
use grit_config::paths::list_presets_in_dir;
use grit_config::{
    ConfigError, FACTORY_PRESET_NAMES, Preset, ensure_user_presets_dir, find_preset,
    get_factory_preset, preset_name_from_path, system_presets_dir, user_presets_dir,
};
use std::path::Path;

#[derive(Args)]
pub struct PresetsArgs {
    #[command(subcommand)]
    command: Option<PresetsCommand>,
}

#[derive(Subcommand)]
enum PresetsCommand {
    /// List available presets (factory and user)
    List {
        /// Show only factory presets
        #[arg(long)]
        factory: bool,

        /// Show only user presets
        #[arg(long)]
        user: bool,
    },

    /// Show a preset as TOML
    Show {
        /// Preset name or path
        name: String,
    },

    /// Copy a factory preset into the user preset directory
    Copy {
        /// Factory preset name
        source: String,

        /// New preset name (defaults to the source name)
        #[arg(short, long)]
        name: Option<String>,

        /// Overwrite an existing user preset
        #[arg(long)]
        force: bool,
    },

    /// Show preset directories
    Paths,
}

pub fn run(args: PresetsArgs) -> anyhow::Result<()> {
    match args.command.unwrap_or(PresetsCommand::List {
        factory: false,
        user: false,
    }) {
        PresetsCommand::List { factory, user } => list_presets(factory, user),
        PresetsCommand::Show { name } => show_preset(&name),
        PresetsCommand::Copy {
            source,
            name,
            force,
        } => copy_preset(&source, name.as_deref(), force),
        PresetsCommand::Paths => {
            println!("User presets:   {}", user_presets_dir().display());
            println!("System presets: {}", system_presets_dir().display());
            Ok(())
        }
    }
}

/// Resolve a preset argument: a file path, a factory name, then a user or
/// system preset name.
pub fn resolve_preset(name: &str) -> anyhow::Result<Preset> {
    if Path::new(name).is_file() {
        return Preset::load(name).with_context(|| format!("loading preset {name}"));
    }
    if let Some(preset) = get_factory_preset(name) {
        return Ok(preset?);
    }
    match find_preset(name) {
        Some(path) => {
            Preset::load(&path).with_context(|| format!("loading preset {}", path.display()))
        }
        None => Err(ConfigError::PresetNotFound(name.to_string()).into()),
    }
}

fn list_presets(factory_only: bool, user_only: bool) -> anyhow::Result<()> {
    if !user_only {
        println!("Factory Presets");
        println!("---------------");
        for name in FACTORY_PRESET_NAMES {
            if let Some(preset) = get_factory_preset(name) {
                print_entry(name, &preset?);
            }
        }
        println!();
    }

    if !factory_only {
        println!("User Presets ({})", user_presets_dir().display());
        println!("------------");
        let paths = list_presets_in_dir(&user_presets_dir());
        if paths.is_empty() {
            println!("  (none)");
        }
        for path in paths {
            let name = preset_name_from_path(&path).unwrap_or_default();
            match Preset::load(&path) {
                Ok(preset) => print_entry(&name, &preset),
                Err(e) => println!("  {name:15} [invalid: {e}]"),
            }
        }
    }

    Ok(())
}

fn print_entry(name: &str, preset: &Preset) {
    println!(
        "  {:15} {:14} {}",
        name,
        preset.effect,
        preset.description.as_deref().unwrap_or("")
    );
}

fn show_preset(name: &str) -> anyhow::Result<()> {
    let preset = resolve_preset(name)?;
    print!("{}", preset.to_toml()?);
    Ok(())
}

fn copy_preset(source: &str, new_name: Option<&str>, force: bool) -> anyhow::Result<()> {
    let Some(preset) = get_factory_preset(source) else {
        bail!("'{source}' is not a factory preset");
    };
    let mut preset = preset?;
    let name = new_name.unwrap_or(source);
    if new_name.is_some() {
        preset.name = name.to_string();
    }

    let path = ensure_user_presets_dir()?.join(format!("{name}.toml"));
    if path.exists() && !force {
        bail!("{} already exists, use --force to overwrite", path.display());
    }
    preset.save(&path)?;
    println!("Copied '{source}' to {}", path.display());
    Ok(())
}
