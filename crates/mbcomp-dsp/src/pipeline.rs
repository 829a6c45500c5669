//! N-band compressor pipeline.
//!
//! Ties the stages together once per block:
//!
//! ```text
//! input ─→ GainStage ─→ CrossoverNetwork ─┬─→ CompressorBand (low)  ─┐
//!                                         ├─→ CompressorBand (mid)  ─┼─→ mute/solo mix ─→ GainStage ─→ output
//!                                         └─→ CompressorBand (high) ─┘
//! ```
//!
//! The pipeline owns every filter, envelope and intermediate buffer. All
//! allocation happens in [`MultibandPipeline::prepare`]; `process` only
//! reads the [`PipelineConfig`] it is handed and works on preallocated
//! memory.
//!
//! ## Lifecycle
//!
//! A new pipeline is *unprepared*: calling `process` panics. `prepare`
//! moves it to *prepared* and may be called again whenever the sample rate,
//! channel count or maximum block size change (never concurrently with
//! `process`).

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use mbcomp_core::{AudioBlock, ProcessSpec, Processor};

use crate::{BandCount, CompressorBand, CrossoverNetwork, GainStage, MAX_BANDS, PipelineConfig};

/// Multiband compressor: crossover, per-band dynamics, mute/solo mix and
/// input/output gain.
///
/// ## Example
///
/// ```rust
/// use mbcomp_core::{AudioBlock, ProcessSpec};
/// use mbcomp_dsp::{BandCount, MultibandPipeline, PipelineConfig};
///
/// let mut pipeline = MultibandPipeline::new(BandCount::Three);
/// pipeline.prepare(ProcessSpec::new(48000.0, 2, 512));
///
/// let mut config = PipelineConfig::default();
/// config.bands[0].threshold_db = -24.0;
/// config.bands[2].muted = true;
///
/// let mut block = AudioBlock::new(2, 512);
/// pipeline.process(&mut block, &config);
/// ```
#[derive(Debug, Clone)]
pub struct MultibandPipeline {
    band_count: BandCount,
    input_gain: GainStage,
    output_gain: GainStage,
    crossover: CrossoverNetwork,
    bands: [CompressorBand; MAX_BANDS],
    band_buffers: Vec<AudioBlock>,
    spec: Option<ProcessSpec>,
}

impl MultibandPipeline {
    /// Creates an unprepared pipeline with default settings.
    pub fn new(band_count: BandCount) -> Self {
        Self {
            band_count,
            input_gain: GainStage::new(),
            output_gain: GainStage::new(),
            crossover: CrossoverNetwork::new(band_count),
            bands: [
                CompressorBand::new(),
                CompressorBand::new(),
                CompressorBand::new(),
            ],
            band_buffers: Vec::new(),
            spec: None,
        }
    }

    /// Allocates all state for `spec` and clears it.
    pub fn prepare(&mut self, spec: ProcessSpec) {
        self.input_gain.prepare(spec);
        self.output_gain.prepare(spec);
        self.crossover.prepare(spec);
        for band in &mut self.bands {
            band.prepare(spec);
        }

        self.band_buffers.clear();
        self.band_buffers.resize(
            MAX_BANDS,
            AudioBlock::new(spec.num_channels, spec.max_block_size),
        );
        self.spec = Some(spec);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            sample_rate = spec.sample_rate,
            channels = spec.num_channels,
            max_block_size = spec.max_block_size,
            bands = self.band_count.count(),
            "pipeline prepared"
        );
    }

    /// Whether [`prepare`](Self::prepare) has been called.
    pub fn is_prepared(&self) -> bool {
        self.spec.is_some()
    }

    /// The spec the pipeline was last prepared with.
    pub fn spec(&self) -> Option<ProcessSpec> {
        self.spec
    }

    /// Number of active bands.
    pub fn band_count(&self) -> BandCount {
        self.band_count
    }

    /// Changes the number of bands.
    ///
    /// Clears filter and envelope state. Not for the audio thread.
    pub fn set_band_count(&mut self, band_count: BandCount) {
        if band_count == self.band_count {
            return;
        }
        self.band_count = band_count;
        self.crossover.set_band_count(band_count);
        for band in &mut self.bands {
            band.reset();
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(bands = band_count.count(), "band count changed");
    }

    /// Clears filter memories and envelopes and snaps gain ramps to target.
    pub fn reset(&mut self) {
        self.input_gain.reset();
        self.output_gain.reset();
        self.crossover.reset();
        for band in &mut self.bands {
            band.reset();
        }

        #[cfg(feature = "tracing")]
        tracing::debug!("pipeline reset");
    }

    /// Current gain reduction of `band` in dB (zero or negative).
    ///
    /// Bands beyond the active count report `0.0`.
    pub fn gain_reduction_db(&self, band: usize) -> f32 {
        if band < self.band_count.count() {
            self.bands[band].gain_reduction_db()
        } else {
            0.0
        }
    }

    /// Deepest per-sample gain reduction of `band` since the previous call,
    /// in dB (zero or negative). Clears the band's hold.
    ///
    /// Bands beyond the active count report `0.0`.
    pub fn take_peak_reduction_db(&mut self, band: usize) -> f32 {
        if band < self.band_count.count() {
            self.bands[band].take_peak_reduction_db()
        } else {
            0.0
        }
    }

    /// Effective crossover cutoffs after clamping.
    pub fn crossover_cutoffs(&self) -> (f32, f32) {
        self.crossover.cutoffs()
    }

    /// Processes one block in place with the settings in `config`.
    ///
    /// # Panics
    ///
    /// Panics if the pipeline is unprepared, or if `block` has a different
    /// channel count or more samples than the prepared spec.
    pub fn process(&mut self, block: &mut AudioBlock, config: &PipelineConfig) {
        let Some(spec) = self.spec else {
            panic!("MultibandPipeline::process called before prepare");
        };
        spec.assert_accepts(block);

        let count = self.band_count.count();
        self.apply_config(config, count);

        self.input_gain.process(block);

        self.crossover.split(block, &mut self.band_buffers[..count]);
        for (band, buffer) in self.bands.iter_mut().zip(&mut self.band_buffers[..count]) {
            band.process(buffer);
        }

        let active = &self.bands[..count];
        let any_solo = active.iter().any(CompressorBand::is_soloed);
        block.clear();
        for (band, buffer) in active.iter().zip(&self.band_buffers[..count]) {
            let audible = if any_solo {
                band.is_soloed()
            } else {
                !band.is_muted()
            };
            if audible {
                block.accumulate_from(buffer);
            }
        }

        self.output_gain.process(block);
    }

    fn apply_config(&mut self, config: &PipelineConfig, count: usize) {
        self.input_gain.set_target_gain_db(config.input_gain_db);
        self.output_gain.set_target_gain_db(config.output_gain_db);
        self.crossover
            .set_cutoffs(config.crossover.low_mid_hz, config.crossover.mid_high_hz);
        for (band, settings) in self.bands.iter_mut().zip(&config.bands).take(count) {
            band.apply_config(settings);
        }
    }
}
