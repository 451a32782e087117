//! Effect listing and information command.

#![allow(clippy::print_literal)] // Table headers use literal strings intentionally

use clap::Args;
use grit_core::{ControlDescriptor, ControlUnit};
use grit_effects::{EffectCategory, EffectKind};

#[derive(Args)]
pub struct EffectsArgs {
    /// Show details for a specific effect
    #[arg(value_name = "EFFECT")]
    effect: Option<String>,
}

pub fn run(args: EffectsArgs) -> anyhow::Result<()> {
    match &args.effect {
        Some(id) => show_effect(id.parse()?),
        None => list_effects(),
    }
    Ok(())
}

fn list_effects() {
    println!("Available Effects");
    println!("=================");

    for category in EffectCategory::ALL {
        println!();
        println!("{} - {}", category.name(), category.description());
        for kind in EffectKind::in_category(category) {
            println!("  {:15} {}", kind.id(), kind.description());
        }
    }

    println!();
    println!("Use 'grit effects <id>' for control details.");
}

fn show_effect(kind: EffectKind) {
    println!("{} ({})", kind.name(), kind.id());
    println!("{}", "=".repeat(kind.name().len() + kind.id().len() + 3));
    println!();
    println!("{}", kind.description());
    if kind.uses_impulse_response() {
        println!("Takes an impulse response (--ir), unit impulse if none is given.");
    }
    println!();

    println!("Controls:");
    println!();
    println!("  {:8}  {:8}  {:10}  {}", "Id", "Name", "Default", "Range");
    println!("  {:8}  {:8}  {:10}  {}", "--", "----", "-------", "-----");
    for descriptor in kind.descriptors() {
        println!(
            "  {:8}  {:8}  {:10}  {}",
            descriptor.string_id(),
            descriptor.name,
            format_value(descriptor, descriptor.default),
            format_range(descriptor)
        );
    }

    println!();
    println!("Example usage:");
    println!();
    let params: Vec<String> = kind
        .descriptors()
        .iter()
        .take(2)
        .map(|d| format!("--param {}={}", d.string_id(), d.default))
        .collect();
    println!(
        "  grit process input.wav output.wav --effect {} {}",
        kind.id(),
        params.join(" ")
    );
}

fn format_value(descriptor: &ControlDescriptor, value: f32) -> String {
    match descriptor.unit {
        ControlUnit::Index => format!("{value:.0}"),
        unit => format!("{value:.1}{}", unit.suffix()),
    }
}

fn format_range(descriptor: &ControlDescriptor) -> String {
    format!(
        "{} to {}",
        format_value(descriptor, descriptor.min),
        format_value(descriptor, descriptor.max)
    )
}
