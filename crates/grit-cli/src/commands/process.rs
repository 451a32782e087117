//! File-based effect processing command.

use crate::commands::presets::resolve_preset;
use anyhow::{Context, bail};
use clap::Args;
use grit_config::Preset;
use grit_core::linear_to_db;
use grit_effects::{EffectKind, EngineConfig, Session};
use grit_io::{IrOptions, load_impulse_response, read_wav, write_wav};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Effect id (see `grit effects`)
    #[arg(short, long)]
    effect: Option<String>,

    /// Preset name or TOML file
    #[arg(short, long)]
    preset: Option<String>,

    /// Control values, applied after the preset (e.g. "drive=12")
    #[arg(long, value_parser = parse_key_val, number_of_values = 1)]
    param: Vec<(String, f32)>,

    /// Impulse response WAV for the cabinet or pedal
    #[arg(long)]
    ir: Option<PathBuf>,

    /// Keep the impulse response exactly as recorded
    #[arg(long)]
    raw_ir: bool,

    /// Processing block size
    #[arg(long, default_value = "512", value_parser = parse_block_size)]
    block_size: usize,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32", value_parser = parse_bit_depth)]
    bit_depth: u16,
}

fn parse_key_val(s: &str) -> Result<(String, f32), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid control '{s}' (expected key=value)"))?;
    let value = value
        .trim()
        .parse::<f32>()
        .map_err(|_| format!("invalid value for '{key}': '{value}'"))?;
    Ok((key.trim().to_string(), value))
}

fn parse_block_size(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("block size must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

fn parse_bit_depth(s: &str) -> Result<u16, String> {
    match s.parse::<u16>() {
        Ok(bits @ (16 | 24 | 32)) => Ok(bits),
        _ => Err(format!("unsupported bit depth '{s}' (expected 16, 24 or 32)")),
    }
}

/// Pick the effect from `--effect` and the preset, which must agree.
fn select_effect(effect: Option<&str>, preset: Option<&Preset>) -> anyhow::Result<EffectKind> {
    let from_flag = effect.map(str::parse::<EffectKind>).transpose()?;
    let from_preset = preset.map(Preset::kind).transpose()?;
    match (from_flag, from_preset) {
        (Some(flag), Some(preset)) if flag != preset => {
            bail!("--effect {flag} conflicts with preset effect {preset}")
        }
        (Some(kind), _) | (None, Some(kind)) => Ok(kind),
        (None, None) => bail!("no effect specified, use --effect or --preset"),
    }
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    let preset = args.preset.as_deref().map(resolve_preset).transpose()?;
    let kind = select_effect(args.effect.as_deref(), preset.as_ref())?;

    println!("Reading {}...", args.input.display());
    let (mut channels, spec) =
        read_wav(&args.input).with_context(|| format!("reading {}", args.input.display()))?;
    let frames = channels.first().map_or(0, Vec::len);
    println!(
        "  {} frames, {} channel(s), {} Hz, {:.2}s",
        frames,
        spec.channels,
        spec.sample_rate,
        frames as f64 / f64::from(spec.sample_rate)
    );

    let mut config = EngineConfig::default().with_max_block_size(args.block_size);
    if let Some(preset) = &preset {
        config = preset.engine_config(config);
    }

    let ir_path = args
        .ir
        .clone()
        .or_else(|| preset.as_ref().and_then(|p| p.impulse_response.clone()));
    if let Some(path) = ir_path {
        if !kind.uses_impulse_response() {
            bail!("effect {kind} does not take an impulse response");
        }
        let options = IrOptions {
            trim: !args.raw_ir,
            normalise: !args.raw_ir,
        };
        let loaded = load_impulse_response(&path, options)
            .with_context(|| format!("loading impulse response {}", path.display()))?;
        if loaded.sample_rate != spec.sample_rate {
            tracing::warn!(
                ir_rate = loaded.sample_rate,
                input_rate = spec.sample_rate,
                "impulse response sample rate differs from input, using it unresampled"
            );
        }
        config = config.with_impulse_response(loaded.ir);
    }

    let mut session = Session::new(kind, config)?;
    if let Some(preset) = &preset {
        preset.apply(&session)?;
        println!("Preset: {}", preset.name);
    }
    for (control, value) in &args.param {
        let stored = session.set_control(control, *value)?;
        if stored != *value {
            tracing::warn!(control = %control, requested = value, stored, "control value clamped");
        }
    }

    session
        .prepare(f64::from(spec.sample_rate), channels.len())
        .context("preparing effect")?;

    println!("Processing with {}...", kind.name());
    let input_peak = peak(&channels);
    let input_rms = rms(&channels);

    let pb = ProgressBar::new(frames as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );

    let block_size = args.block_size;
    let mut start = 0;
    while start < frames {
        let end = (start + block_size).min(frames);
        let mut views: Vec<&mut [f32]> = channels
            .iter_mut()
            .map(|channel| &mut channel[start..end])
            .collect();
        session.process(&mut views);
        pb.set_position(end as u64);
        start = end;
    }
    pb.finish_and_clear();

    println!("\nStats:");
    println!(
        "  Input:  RMS {:.1} dB, Peak {:.1} dB",
        linear_to_db(input_rms),
        linear_to_db(input_peak)
    );
    println!(
        "  Output: RMS {:.1} dB, Peak {:.1} dB",
        linear_to_db(rms(&channels)),
        linear_to_db(peak(&channels))
    );

    println!("\nWriting {}...", args.output.display());
    write_wav(
        &args.output,
        &channels,
        spec.with_bits_per_sample(args.bit_depth),
    )
    .with_context(|| format!("writing {}", args.output.display()))?;
    println!("Done!");

    Ok(())
}

fn rms(channels: &[Vec<f32>]) -> f32 {
    let count: usize = channels.iter().map(Vec::len).sum();
    if count == 0 {
        return 0.0;
    }
    let sum: f32 = channels.iter().flatten().map(|s| s * s).sum();
    (sum / count as f32).sqrt()
}

fn peak(channels: &[Vec<f32>]) -> f32 {
    channels
        .iter()
        .flatten()
        .map(|s| s.abs())
        .fold(0.0, f32::max)
}
