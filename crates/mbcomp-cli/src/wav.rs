//! WAV file reading and writing as whole-file [`AudioBlock`]s.

use anyhow::Context;
use hound::{SampleFormat, WavReader, WavWriter};
use mbcomp_core::AudioBlock;
use std::path::Path;

/// WAV file specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    /// Number of audio channels.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample (16, 24 or 32; 32 is written as float).
    pub bits_per_sample: u16,
}

impl From<hound::WavSpec> for WavSpec {
    fn from(spec: hound::WavSpec) -> Self {
        Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
        }
    }
}

impl From<WavSpec> for hound::WavSpec {
    fn from(spec: WavSpec) -> Self {
        hound::WavSpec {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            sample_format: if spec.bits_per_sample == 32 {
                SampleFormat::Float
            } else {
                SampleFormat::Int
            },
        }
    }
}

/// Reads a WAV file into a planar block holding every frame.
///
/// Integer samples are scaled to `[-1.0, 1.0)`.
pub fn read_wav(path: &Path) -> anyhow::Result<(AudioBlock, WavSpec)> {
    let reader =
        WavReader::open(path).with_context(|| format!("opening {}", path.display()))?;
    let spec = WavSpec::from(reader.spec());

    let interleaved: Vec<f32> = match reader.spec().sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    let block = AudioBlock::from_interleaved(&interleaved, usize::from(spec.channels));
    Ok((block, spec))
}

/// Writes `block` as a WAV file. The channel count comes from the block.
pub fn write_wav(path: &Path, block: &AudioBlock, spec: WavSpec) -> anyhow::Result<()> {
    anyhow::ensure!(
        matches!(spec.bits_per_sample, 16 | 24 | 32),
        "unsupported bit depth {} (expected 16, 24 or 32)",
        spec.bits_per_sample
    );
    let spec = WavSpec {
        channels: u16::try_from(block.num_channels()).context("too many channels")?,
        ..spec
    };

    let mut writer = WavWriter::create(path, hound::WavSpec::from(spec))
        .with_context(|| format!("creating {}", path.display()))?;

    if spec.bits_per_sample == 32 {
        for sample in block.to_interleaved() {
            writer.write_sample(sample)?;
        }
    } else {
        let max_val = (1i32 << (spec.bits_per_sample - 1)) as f32;
        for sample in block.to_interleaved() {
            let int_sample = (sample * max_val).clamp(-max_val, max_val - 1.0) as i32;
            writer.write_sample(int_sample)?;
        }
    }

    writer.finalize()?;
    Ok(())
}
