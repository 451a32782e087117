//! Integration tests for the `grit` binary.

use grit_io::{WavSpec, read_wav, write_wav};
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn grit_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_grit"))
}

fn write_sine(path: &Path, channels: u16, frames: usize) {
    let spec = WavSpec {
        channels,
        sample_rate: 48000,
        bits_per_sample: 32,
    };
    let data: Vec<Vec<f32>> = (0..channels)
        .map(|ch| {
            (0..frames)
                .map(|i| (i as f32 * 0.03).sin() * 0.5 / f32::from(ch + 1))
                .collect()
        })
        .collect();
    write_wav(path, &data, spec).unwrap();
}

#[test]
fn effects_lists_catalogue() {
    let output = grit_bin().arg("effects").output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for id in [
        "saturator",
        "hard-clipper",
        "linear-clipper",
        "diode-clipper",
        "dc-distortion",
        "full-wave",
        "half-wave",
        "bias-drive",
        "cabinet",
        "pedal",
    ] {
        assert!(stdout.contains(id), "listing should contain '{id}'");
    }
}

#[test]
fn effects_detail_shows_controls() {
    let output = grit_bin().args(["effects", "bias-drive"]).output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Controls"));
    assert!(stdout.contains("bias"));
    assert!(stdout.contains("-48.0 dB to 48.0 dB"));
}

#[test]
fn effects_unknown_id_fails() {
    let output = grit_bin().args(["effects", "wah"]).output().unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("wah"));
}

#[test]
fn process_preserves_channels_and_applies_effect() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.wav");
    let output = dir.path().join("out.wav");
    write_sine(&input, 2, 3000);

    let status = grit_bin()
        .arg("process")
        .arg(&input)
        .arg(&output)
        .args(["--effect", "half-wave", "--block-size", "100", "--bit-depth", "24"])
        .status()
        .unwrap();
    assert!(status.success());

    let (channels, spec) = read_wav(&output).unwrap();
    assert_eq!(spec.channels, 2);
    assert_eq!(spec.bits_per_sample, 24);
    assert_eq!(channels[0].len(), 3000);
    assert!(channels.iter().flatten().all(|&s| s >= 0.0));
    assert!(channels[0].iter().any(|&s| s > 0.4));
}

#[test]
fn process_with_factory_preset_and_param_override() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.wav");
    let output = dir.path().join("out.wav");
    write_sine(&input, 1, 4800);

    let status = grit_bin()
        .arg("process")
        .arg(&input)
        .arg(&output)
        .args(["--preset", "crunch", "--param", "trim=-24"])
        .status()
        .unwrap();
    assert!(status.success());

    let (channels, _) = read_wav(&output).unwrap();
    let peak = channels[0].iter().fold(0.0f32, |m, s| m.max(s.abs()));
    // Hard model ceiling at drive 12 is about 0.25, then -24 dB of trim
    assert!(peak < 0.05, "peak {peak}");
    assert!(peak > 0.0);
}

#[test]
fn process_cabinet_with_impulse_response() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.wav");
    let ir = dir.path().join("ir.wav");
    let output = dir.path().join("out.wav");
    write_sine(&input, 1, 2000);

    let mut ir_samples = vec![0.0f32; 64];
    ir_samples[0] = 1.0;
    ir_samples[40] = 0.5;
    let spec = WavSpec {
        channels: 1,
        sample_rate: 48000,
        bits_per_sample: 32,
    };
    write_wav(&ir, &[ir_samples], spec).unwrap();

    let status = grit_bin()
        .arg("process")
        .arg(&input)
        .arg(&output)
        .args(["--effect", "cabinet", "--ir"])
        .arg(&ir)
        .status()
        .unwrap();
    assert!(status.success());

    let (channels, _) = read_wav(&output).unwrap();
    assert_eq!(channels[0].len(), 2000);
    assert!(channels[0].iter().all(|s| s.is_finite()));
}

#[test]
fn process_pedal_with_impulse_response() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.wav");
    let ir = dir.path().join("ir.wav");
    let output = dir.path().join("out.wav");
    write_sine(&input, 2, 1500);

    let mut ir_samples = vec![0.0f32; 32];
    ir_samples[0] = 1.0;
    ir_samples[10] = -0.3;
    let spec = WavSpec {
        channels: 1,
        sample_rate: 48000,
        bits_per_sample: 32,
    };
    write_wav(&ir, &[ir_samples], spec).unwrap();

    let status = grit_bin()
        .arg("process")
        .arg(&input)
        .arg(&output)
        .args(["--effect", "pedal", "--param", "trim=-6", "--ir"])
        .arg(&ir)
        .status()
        .unwrap();
    assert!(status.success());

    let (channels, spec) = read_wav(&output).unwrap();
    assert_eq!(spec.channels, 2);
    assert_eq!(channels[1].len(), 1500);
    assert!(channels.iter().flatten().all(|s| s.is_finite() && s.abs() <= 1.0));
}

#[test]
fn process_rejects_bad_invocations() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.wav");
    let output = dir.path().join("out.wav");
    write_sine(&input, 1, 100);

    let cases: [&[&str]; 5] = [
        &[],
        &["--effect", "fuzz"],
        &["--effect", "full-wave", "--param", "drive=3"],
        &["--effect", "full-wave", "--bit-depth", "8"],
        &["--effect", "saturator", "--ir", "missing.wav"],
    ];
    for extra in cases {
        let status = grit_bin()
            .arg("process")
            .arg(&input)
            .arg(&output)
            .args(extra)
            .status()
            .unwrap();
        assert!(!status.success(), "{extra:?} should fail");
    }

    let status = grit_bin()
        .arg("process")
        .arg(dir.path().join("missing.wav"))
        .arg(&output)
        .args(["--effect", "full-wave"])
        .status()
        .unwrap();
    assert!(!status.success());
}

#[test]
fn presets_show_prints_toml() {
    let output = grit_bin().args(["presets", "show", "tube-bias"]).output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("effect = \"bias-drive\""));
    assert!(stdout.contains("[controls]"));
}

#[test]
fn help_and_version() {
    let output = grit_bin().arg("--help").output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("process"));

    let output = grit_bin().arg("--version").output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("grit"));
}
