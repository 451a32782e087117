//! Property-based tests for all catalogue effects.
//!
//! Uses proptest to verify that every effect satisfies the processing
//! contract: finite output, block-size independence, and a reset that
//! restores fresh behaviour.

use grit_core::{ControlSnapshot, ImpulseResponse, ProcessSpec, Processor};
use grit_effects::{EffectKind, EngineConfig};
use proptest::prelude::*;

const MAX_BLOCK: usize = 64;

fn config() -> EngineConfig {
    let ir = (0..150)
        .map(|i| libm::expf(-(i as f32) / 30.0) * libm::cosf(i as f32 * 0.9))
        .collect();
    let config = EngineConfig::default().with_ramp_seconds(0.002);
    match ImpulseResponse::new(ir) {
        Ok(ir) => config.with_impulse_response(ir),
        Err(_) => config,
    }
}

fn prepared(kind: EffectKind) -> Box<dyn Processor + Send> {
    let mut processor = kind.create(&config());
    processor
        .prepare(&ProcessSpec::new(48000.0, MAX_BLOCK, 1))
        .unwrap();
    processor
}

/// Map normalized [0,1] values onto an effect's control ranges.
fn snapshot_for(kind: EffectKind, values: &[f32; 6]) -> ControlSnapshot {
    let mut snapshot = ControlSnapshot::default();
    for (descriptor, &t) in kind.descriptors().iter().zip(values) {
        snapshot.set(
            descriptor.id,
            descriptor.clamp(descriptor.min + t * (descriptor.max - descriptor.min)),
        );
    }
    snapshot
}

/// Run `signal` through `processor` in blocks taken cyclically from `sizes`.
fn run(
    processor: &mut dyn Processor,
    signal: &[f32],
    sizes: &[usize],
    controls: &ControlSnapshot,
) -> Vec<f32> {
    let mut output = signal.to_vec();
    let mut offset = 0;
    for &size in sizes.iter().cycle() {
        if offset >= output.len() {
            break;
        }
        let len = size.clamp(1, MAX_BLOCK).min(output.len() - offset);
        processor.process(&mut [&mut output[offset..offset + len]], controls);
        offset += len;
    }
    output
}

fn kind_strategy() -> impl Strategy<Value = EffectKind> {
    (0..EffectKind::all().len()).prop_map(|i| EffectKind::all()[i])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// For any input in [-1, 1] and any control values, every effect
    /// produces finite output.
    #[test]
    fn all_effects_finite_output(
        kind in kind_strategy(),
        input in prop::collection::vec(-1.0f32..=1.0f32, 1..256),
        values in prop::array::uniform6(0.0f32..=1.0f32),
    ) {
        let mut processor = prepared(kind);
        let controls = snapshot_for(kind, &values);
        let out = run(processor.as_mut(), &input, &[MAX_BLOCK], &controls);
        for (i, s) in out.iter().enumerate() {
            prop_assert!(s.is_finite(), "{} produced {} at {}", kind, s, i);
        }
    }

    /// How a signal is cut into blocks does not change the output.
    #[test]
    fn block_split_is_transparent(
        kind in kind_strategy(),
        input in prop::collection::vec(-1.0f32..=1.0f32, 1..300),
        sizes in prop::collection::vec(1usize..=MAX_BLOCK, 1..8),
        values in prop::array::uniform6(0.0f32..=1.0f32),
    ) {
        let controls = snapshot_for(kind, &values);
        let whole = run(prepared(kind).as_mut(), &input, &[MAX_BLOCK], &controls);
        let split = run(prepared(kind).as_mut(), &input, &sizes, &controls);
        for (i, (a, b)) in whole.iter().zip(&split).enumerate() {
            let tolerance = 1e-4 * a.abs().max(1.0);
            prop_assert!((a - b).abs() <= tolerance, "{}: sample {} {} vs {}", kind, i, a, b);
        }
    }

    /// After `reset`, an effect behaves like a freshly prepared one.
    #[test]
    fn reset_restores_fresh_state(
        kind in kind_strategy(),
        warmup in prop::collection::vec(-1.0f32..=1.0f32, 1..200),
        input in prop::collection::vec(-1.0f32..=1.0f32, 1..200),
        values in prop::array::uniform6(0.0f32..=1.0f32),
    ) {
        let controls = snapshot_for(kind, &values);

        let mut used = prepared(kind);
        run(used.as_mut(), &warmup, &[MAX_BLOCK], &controls);
        used.reset();
        let after_reset = run(used.as_mut(), &input, &[MAX_BLOCK], &controls);

        let fresh = run(prepared(kind).as_mut(), &input, &[MAX_BLOCK], &controls);
        for (a, b) in after_reset.iter().zip(&fresh) {
            prop_assert!((a - b).abs() <= 1e-5 * a.abs().max(1.0), "{}: {} vs {}", kind, a, b);
        }
    }

    /// Rectifiers never emit negative samples, whatever the gains.
    #[test]
    fn rectifiers_are_non_negative(
        input in prop::collection::vec(-1.0f32..=1.0f32, 1..128),
        values in prop::array::uniform6(0.0f32..=1.0f32),
        half in any::<bool>(),
    ) {
        let kind = if half { EffectKind::HalfWave } else { EffectKind::FullWave };
        let controls = snapshot_for(kind, &values);
        let out = run(prepared(kind).as_mut(), &input, &[MAX_BLOCK], &controls);
        prop_assert!(out.iter().all(|&s| s >= 0.0));
    }
}
