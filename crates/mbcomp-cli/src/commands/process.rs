//! Offline rendering of a WAV file through the compressor.

use super::common::{apply_overrides, load_preset, parse_key_val};
use crate::wav::{WavSpec, read_wav, write_wav};
use anyhow::Context;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use mbcomp_core::{AudioBlock, ProcessSpec, linear_to_db};
use mbcomp_dsp::{BandCount, MAX_BANDS, MultibandPipeline};
use mbcomp_params::ParamStore;
use std::path::PathBuf;

#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Preset name or TOML file, applied before any --set
    #[arg(short, long)]
    preset: Option<String>,

    /// State blob (JSON) to restore, applied after the preset
    #[arg(long, value_name = "FILE")]
    state: Option<PathBuf>,

    /// Parameter override (e.g. "low_threshold=-24 dB"); repeatable
    #[arg(short, long = "set", value_parser = parse_key_val)]
    set: Vec<(String, String)>,

    /// Number of bands (1, 2 or 3); overrides the preset
    #[arg(short, long)]
    bands: Option<usize>,

    /// Processing block size
    #[arg(long, default_value = "512")]
    block_size: usize,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    anyhow::ensure!(args.block_size > 0, "block size must be at least 1");

    println!("Reading {}...", args.input.display());
    let (input, spec) = read_wav(&args.input)?;
    let frames = input.num_samples();
    println!(
        "  {} frames, {} channel(s), {} Hz, {:.2}s",
        frames,
        spec.channels,
        spec.sample_rate,
        frames as f32 / spec.sample_rate as f32
    );

    let store = ParamStore::new();
    let mut band_count = BandCount::default();

    if let Some(name) = &args.preset {
        let preset = load_preset(name)?;
        println!("Loading preset: {}", preset.name);
        preset.apply_to(&store)?;
        band_count = preset.band_count()?;
    }
    if let Some(path) = &args.state {
        let blob =
            std::fs::read(path).with_context(|| format!("reading state {}", path.display()))?;
        let restored = store.load_state(&blob)?;
        println!("Restored {} parameter(s) from {}", restored, path.display());
    }
    apply_overrides(&store, &args.set)?;
    if let Some(n) = args.bands {
        band_count = BandCount::from_count(n)
            .with_context(|| format!("invalid band count {} (expected 1, 2 or 3)", n))?;
    }

    let (output, max_reduction) = render(&input, spec, &store, band_count, args.block_size);

    println!("\nStats:");
    print_levels("Input: ", &input);
    print_levels("Output:", &output);
    for (band, reduction) in max_reduction.iter().take(band_count.count()).enumerate() {
        println!("  Band {}: max gain reduction {:.1} dB", band + 1, reduction);
    }

    let out_spec = WavSpec {
        bits_per_sample: args.bit_depth,
        ..spec
    };
    println!("\nWriting {}...", args.output.display());
    write_wav(&args.output, &output, out_spec)?;
    println!("Done!");

    Ok(())
}

/// Runs the whole file through a fresh pipeline in `block_size` chunks,
/// taking a parameter snapshot per block. Returns the output and the largest
/// gain reduction seen per band.
fn render(
    input: &AudioBlock,
    spec: WavSpec,
    store: &ParamStore,
    band_count: BandCount,
    block_size: usize,
) -> (AudioBlock, [f32; MAX_BANDS]) {
    let channels = input.num_channels();
    let frames = input.num_samples();

    let mut pipeline = MultibandPipeline::new(band_count);
    pipeline.prepare(ProcessSpec::new(spec.sample_rate as f32, channels, block_size));
    tracing::info!(bands = band_count.count(), block_size, channels, "rendering");

    let pb = ProgressBar::new(frames as u64);
    let style = ProgressStyle::default_bar()
        .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})");
    if let Ok(style) = style {
        pb.set_style(style.progress_chars("##-"));
    }

    let mut output = AudioBlock::new(channels, frames);
    let mut block = AudioBlock::new(channels, block_size);
    let mut max_reduction = [0.0f32; MAX_BANDS];

    for start in (0..frames).step_by(block_size) {
        let len = block_size.min(frames - start);
        block.set_num_samples(len);
        for ch in 0..channels {
            block
                .channel_mut(ch)
                .copy_from_slice(&input.channel(ch)[start..start + len]);
        }

        pipeline.process(&mut block, &store.snapshot());

        for ch in 0..channels {
            output.channel_mut(ch)[start..start + len].copy_from_slice(block.channel(ch));
        }
        for (band, max) in max_reduction.iter_mut().enumerate() {
            *max = max.min(pipeline.take_peak_reduction_db(band));
        }
        pb.set_position((start + len) as u64);
    }

    pb.finish_with_message("done");
    (output, max_reduction)
}

fn print_levels(label: &str, block: &AudioBlock) {
    println!(
        "  {} RMS {:.1} dB, Peak {:.1} dB",
        label,
        linear_to_db(rms(block)),
        linear_to_db(block.peak())
    );
}

fn rms(block: &AudioBlock) -> f32 {
    let count = block.num_samples() * block.num_channels();
    if count == 0 {
        return 0.0;
    }
    let sum: f32 = block.channels().flatten().map(|s| s * s).sum();
    (sum / count as f32).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mbcomp_params::{Band, BandParam, ParamKey};

    fn spec() -> WavSpec {
        WavSpec {
            channels: 2,
            sample_rate: 48000,
            bits_per_sample: 32,
        }
    }

    fn tone(frames: usize, freq: f32, amp: f32) -> AudioBlock {
        let channel: Vec<f32> = (0..frames)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / 48000.0).sin() * amp)
            .collect();
        AudioBlock::from_channels(vec![channel; 2])
    }

    #[test]
    fn rms_of_silence_is_zero() {
        assert_eq!(rms(&AudioBlock::new(2, 0)), 0.0);
        assert_eq!(rms(&AudioBlock::new(2, 16)), 0.0);
    }

    #[test]
    fn render_handles_a_partial_last_block() {
        let input = tone(1000, 440.0, 0.5);
        let (output, _) = render(&input, spec(), &ParamStore::new(), BandCount::Three, 256);
        assert_eq!(output.num_samples(), 1000);
        assert_eq!(output.num_channels(), 2);
        assert!(output.peak() > 0.1);
    }

    #[test]
    fn render_is_block_size_invariant() {
        let input = tone(2048, 100.0, 0.9);
        let store = ParamStore::new();
        store.set(ParamKey::Band(Band::Low, BandParam::Threshold), -20.0);
        let (a, _) = render(&input, spec(), &store, BandCount::Three, 64);
        let (b, _) = render(&input, spec(), &store, BandCount::Three, 1000);
        for (x, y) in a.to_interleaved().iter().zip(&b.to_interleaved()) {
            assert!((x - y).abs() < 1e-5, "{x} vs {y}");
        }
    }

    #[test]
    fn reports_reduction_on_the_compressed_band() {
        let input = tone(48000, 80.0, 0.9);
        let store = ParamStore::new();
        store.set(ParamKey::Band(Band::Low, BandParam::Threshold), -30.0);
        store.set(ParamKey::Band(Band::Low, BandParam::Ratio), 9.0);
        store.set(ParamKey::Band(Band::Low, BandParam::Attack), 5.0);

        let (_, reduction) = render(&input, spec(), &store, BandCount::Three, 512);
        assert!(reduction[0] < -10.0, "low band reduction {}", reduction[0]);
        assert!(reduction[2] > -1.0, "high band reduction {}", reduction[2]);
    }

    #[test]
    fn reports_a_burst_that_releases_before_the_block_ends() {
        // 10 ms of bass, then silence for the rest of one 4096-sample block
        let mut input = tone(4096, 80.0, 0.9);
        for ch in 0..2 {
            input.channel_mut(ch)[480..].fill(0.0);
        }
        let store = ParamStore::new();
        store.set(ParamKey::Band(Band::Low, BandParam::Threshold), -30.0);
        store.set(ParamKey::Band(Band::Low, BandParam::Ratio), 9.0);
        store.set(ParamKey::Band(Band::Low, BandParam::Attack), 5.0);
        store.set(ParamKey::Band(Band::Low, BandParam::Release), 5.0);

        let (_, reduction) = render(&input, spec(), &store, BandCount::Three, 4096);
        assert!(reduction[0] < -10.0, "low band reduction {}", reduction[0]);
    }
}
