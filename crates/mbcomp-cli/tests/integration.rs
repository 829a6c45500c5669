//! Integration tests for mbcomp-cli.
//!
//! These run the `mbcomp` binary end to end on small generated WAV files.

use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn mbcomp_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_mbcomp"))
}

/// Writes a stereo float WAV: a loud 80 Hz tone left, a quiet 5 kHz tone right.
fn write_test_wav(path: &Path, frames: usize) {
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate: 48000,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for i in 0..frames {
        let t = i as f32 / 48000.0;
        writer
            .write_sample((2.0 * std::f32::consts::PI * 80.0 * t).sin() * 0.9)
            .unwrap();
        writer
            .write_sample((2.0 * std::f32::consts::PI * 5000.0 * t).sin() * 0.1)
            .unwrap();
    }
    writer.finalize().unwrap();
}

fn read_wav(path: &Path) -> (hound::WavSpec, Vec<f32>) {
    let mut reader = hound::WavReader::open(path).unwrap();
    let samples = reader.samples::<f32>().map(Result::unwrap).collect();
    (reader.spec(), samples)
}

fn peak(samples: impl Iterator<Item = f32>) -> f32 {
    samples.fold(0.0, |acc, s| acc.max(s.abs()))
}

#[test]
fn cli_params_lists_every_band() {
    let output = mbcomp_bin().arg("params").output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for id in ["input_gain", "low_mid_crossover", "low_ratio", "mid_solo", "high_bypass"] {
        assert!(stdout.contains(id), "params listing should contain '{id}'");
    }
}

#[test]
fn cli_params_rejects_unknown_id() {
    let output = mbcomp_bin().args(["params", "low_knee"]).output().unwrap();
    assert!(!output.status.success());
}

#[test]
fn cli_presets_list_shows_factory_presets() {
    let output = mbcomp_bin().args(["presets", "list"]).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Vocal"));
    assert!(stdout.contains("Bass Control"));
}

#[test]
fn cli_process_defaults_preserve_channel_layout() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.wav");
    let output = dir.path().join("out.wav");
    write_test_wav(&input, 9600);

    let status = mbcomp_bin()
        .arg("process")
        .arg(&input)
        .arg(&output)
        .status()
        .unwrap();
    assert!(status.success());

    let (spec, samples) = read_wav(&output);
    assert_eq!(spec.channels, 2);
    assert_eq!(spec.sample_rate, 48000);
    assert_eq!(samples.len(), 9600 * 2);
    assert!(samples.iter().all(|s| s.is_finite()));
}

#[test]
fn cli_process_compresses_only_the_loud_low_band() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.wav");
    let output = dir.path().join("out.wav");
    write_test_wav(&input, 48000);

    let status = mbcomp_bin()
        .arg("process")
        .arg(&input)
        .arg(&output)
        .args(["--set", "low_threshold=-30 dB"])
        .args(["--set", "low_ratio=10:1"])
        .args(["--set", "low_attack=5ms"])
        .args(["--set", "high_threshold=-30 dB"])
        .status()
        .unwrap();
    assert!(status.success());

    let (_, samples) = read_wav(&output);
    let tail = &samples[samples.len() / 2..];
    let left = peak(tail.iter().step_by(2).copied());
    let right = peak(tail.iter().skip(1).step_by(2).copied());

    // 0.9 peak pushed well below threshold + (level - threshold) / ratio
    assert!(left < 0.2, "left peak {left}");
    // -20 dBFS sits above -30 dB too, but only by 10 dB
    assert!(right > 0.02 && right < 0.1, "right peak {right}");
}

#[test]
fn cli_process_rejects_bad_override() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.wav");
    write_test_wav(&input, 480);

    let output = mbcomp_bin()
        .arg("process")
        .arg(&input)
        .arg(dir.path().join("out.wav"))
        .args(["--set", "low_ratio=9:1"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("low_ratio"));
}

#[test]
fn cli_preset_save_then_process() {
    let dir = TempDir::new().unwrap();
    let preset = dir.path().join("presets").join("gentle.toml");

    let status = mbcomp_bin()
        .args(["presets", "save"])
        .arg(&preset)
        .args(["--from", "master_glue", "--set", "output_gain=-6 dB"])
        .status()
        .unwrap();
    assert!(status.success());
    assert!(preset.exists());

    let input = dir.path().join("in.wav");
    let output = dir.path().join("out.wav");
    write_test_wav(&input, 4800);
    let status = mbcomp_bin()
        .arg("process")
        .arg(&input)
        .arg(&output)
        .arg("--preset")
        .arg(&preset)
        .args(["--bit-depth", "24"])
        .status()
        .unwrap();
    assert!(status.success());

    let reader = hound::WavReader::open(&output).unwrap();
    assert_eq!(reader.spec().bits_per_sample, 24);
    assert_eq!(reader.spec().channels, 2);
}
