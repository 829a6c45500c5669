//! End-to-end scenarios for the multiband pipeline.

use mbcomp_core::{AudioBlock, BUTTERWORTH_Q, Biquad, ProcessSpec, allpass_coefficients};
use mbcomp_dsp::{BandCount, MultibandPipeline, PipelineConfig};

const SR: f32 = 48000.0;
const BLOCK: usize = 512;

fn impulse(channels: usize, len: usize) -> AudioBlock {
    let mut block = AudioBlock::new(channels, len);
    for ch in 0..channels {
        block.channel_mut(ch)[0] = 1.0;
    }
    block
}

fn sine(freq: f32, amplitude: f32, len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| amplitude * libm::sinf(2.0 * core::f32::consts::PI * freq * i as f32 / SR))
        .collect()
}

fn rms(samples: &[f32]) -> f32 {
    libm::sqrtf(samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32)
}

/// 3 bands at 48 kHz, 512-sample block, crossovers 400/2000 Hz, every band
/// bypassed: a unit impulse comes back as the impulse response of the two
/// crossover all-passes, carrying all of its energy.
#[test]
fn bypassed_impulse_is_allpass_of_unit_energy() {
    let mut pipeline = MultibandPipeline::new(BandCount::Three);
    pipeline.prepare(ProcessSpec::new(SR, 2, BLOCK));

    let mut config = PipelineConfig::bypassed();
    config.crossover.low_mid_hz = 400.0;
    config.crossover.mid_high_hz = 2000.0;

    let mut block = impulse(2, BLOCK);
    pipeline.process(&mut block, &config);

    for ch in 0..2 {
        let out = block.channel(ch);

        let mut ap_low_mid = Biquad::new();
        ap_low_mid.set_coefficients(allpass_coefficients(400.0, BUTTERWORTH_Q, SR));
        let mut ap_mid_high = Biquad::new();
        ap_mid_high.set_coefficients(allpass_coefficients(2000.0, BUTTERWORTH_Q, SR));

        for (i, &y) in out.iter().enumerate() {
            let x = if i == 0 { 1.0 } else { 0.0 };
            let expected = ap_mid_high.process(ap_low_mid.process(x));
            assert!(
                (y - expected).abs() < 1e-4,
                "ch {ch} sample {i}: {y} vs {expected}"
            );
        }

        let energy: f32 = out.iter().map(|s| s * s).sum();
        assert!((energy - 1.0).abs() < 1e-3, "energy {energy}");

        // The response has died away well inside the block
        assert!(out[BLOCK - 32..].iter().all(|s| s.abs() < 1e-4));
    }
}

/// Splitting the stream into smaller blocks changes nothing.
#[test]
fn block_size_does_not_change_output() {
    let mut config = PipelineConfig::default();
    config.bands[0].threshold_db = -30.0;
    config.bands[1].threshold_db = -20.0;
    config.bands[2].ratio = 8.0;

    let signal: Vec<f32> = sine(120.0, 0.8, 2048)
        .iter()
        .zip(sine(5000.0, 0.3, 2048))
        .map(|(a, b)| a + b)
        .collect();

    let mut whole = MultibandPipeline::new(BandCount::Three);
    whole.prepare(ProcessSpec::new(SR, 1, 2048));
    let mut one_block = AudioBlock::from_channels(vec![signal.clone()]);
    whole.process(&mut one_block, &config);

    let mut chunked = MultibandPipeline::new(BandCount::Three);
    chunked.prepare(ProcessSpec::new(SR, 1, 300));
    let mut out = Vec::with_capacity(signal.len());
    for chunk in signal.chunks(300) {
        let mut block = AudioBlock::from_channels(vec![chunk.to_vec()]);
        chunked.process(&mut block, &config);
        out.extend_from_slice(block.channel(0));
    }

    for (i, (a, b)) in one_block.channel(0).iter().zip(&out).enumerate() {
        assert!((a - b).abs() < 1e-6, "sample {i}: {a} vs {b}");
    }
}

/// A loud bass note compressed in the low band leaves a quiet treble tone
/// in the high band alone.
#[test]
fn low_band_compression_spares_high_band() {
    let len = 24000;
    let bass = sine(80.0, 0.9, len);
    let treble = sine(8000.0, 0.05, len);
    let mix: Vec<f32> = bass.iter().zip(&treble).map(|(a, b)| a + b).collect();
    let mix_again = mix.clone();

    let mut config = PipelineConfig::default();
    config.bands[0].threshold_db = -30.0;
    config.bands[0].ratio = 10.0;
    config.bands[0].attack_ms = 5.0;
    config.bands[1].bypassed = true;
    config.bands[2].bypassed = true;

    let mut pipeline = MultibandPipeline::new(BandCount::Three);
    pipeline.prepare(ProcessSpec::new(SR, 1, len));
    let mut block = AudioBlock::from_channels(vec![mix]);
    pipeline.process(&mut block, &config);
    assert!(pipeline.gain_reduction_db(0) < -6.0);
    assert_eq!(pipeline.gain_reduction_db(2), 0.0);

    // Isolate the treble: solo the high band on a fresh pipeline
    let mut solo = config;
    solo.bands[2].soloed = true;
    let mut pipeline = MultibandPipeline::new(BandCount::Three);
    pipeline.prepare(ProcessSpec::new(SR, 1, len));
    let mut high_only = AudioBlock::from_channels(vec![mix_again]);
    pipeline.process(&mut high_only, &solo);

    let tail = len / 2..;
    let treble_rms = rms(&treble[tail.clone()]);
    let high_rms = rms(&high_only.channel(0)[tail.clone()]);
    assert!((high_rms / treble_rms - 1.0).abs() < 0.05, "high band rms {high_rms}");

    let total_rms = rms(&block.channel(0)[tail]);
    assert!(total_rms < rms(&bass[len / 2..]) * 0.5);
}

/// Two bands sum back flat; the mid-high control is inert.
#[test]
fn two_band_mode_ignores_mid_high() {
    let mut config = PipelineConfig::bypassed();
    config.crossover.low_mid_hz = 300.0;

    let run = |mid_high: f32| {
        let mut cfg = config;
        cfg.crossover.mid_high_hz = mid_high;
        let mut pipeline = MultibandPipeline::new(BandCount::Two);
        pipeline.prepare(ProcessSpec::new(SR, 1, BLOCK));
        let mut block = impulse(1, BLOCK);
        pipeline.process(&mut block, &cfg);
        block
    };

    let a = run(1500.0);
    let b = run(15000.0);
    assert_eq!(a, b);

    let energy: f32 = a.channel(0).iter().map(|s| s * s).sum();
    assert!((energy - 1.0).abs() < 1e-3, "energy {energy}");
}

/// Reset returns the pipeline to its freshly prepared behaviour.
#[test]
fn reset_restores_initial_response() {
    let config = PipelineConfig::default();
    let mut pipeline = MultibandPipeline::new(BandCount::Three);
    pipeline.prepare(ProcessSpec::new(SR, 1, BLOCK));

    let mut first = impulse(1, BLOCK);
    pipeline.process(&mut first, &config);

    let mut noise = AudioBlock::from_channels(vec![sine(3000.0, 1.0, BLOCK)]);
    pipeline.process(&mut noise, &config);

    pipeline.reset();
    let mut again = impulse(1, BLOCK);
    pipeline.process(&mut again, &config);

    assert_eq!(first, again);
}
