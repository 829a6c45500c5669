//! Per-band peak compressor.
//!
//! A feed-forward, hard-knee compressor. Each channel is detected on its
//! own (unlinked) so a loud left channel never ducks a quiet right one.
//!
//! # Signal Flow
//!
//! ```text
//! |x| → dB → Gain Computer → Envelope (attack/release) → dB⁻¹ → × x
//! ```
//!
//! The envelope smooths the *reduction* rather than the level: it attacks
//! while the reduction grows and releases while it shrinks.
//!
//! # Parameters
//!
//! | Parameter | Range | Description |
//! |-----------|-------|-------------|
//! | Threshold | -60 to 12 dB | Level where compression begins |
//! | Ratio | 1:1 to 100:1 | Compression strength |
//! | Attack | 5-500 ms | How fast gain reduction engages |
//! | Release | 5-500 ms | How fast gain reduction recovers |
//!
//! Mute and solo are carried here so a band owns all of its switches, but
//! they do not affect [`CompressorBand::process`]; the pipeline applies them
//! when it recombines the bands.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use mbcomp_core::{
    AudioBlock, EnvelopeFollower, ProcessSpec, Processor, db_to_linear, linear_to_db,
};

use crate::BandConfig;

/// Static curve: how many dB to take off a given input level.
#[derive(Debug, Clone, Copy)]
struct GainComputer {
    threshold_db: f32,
    ratio: f32,
}

impl GainComputer {
    /// Gain reduction in dB (non-negative) for `level_db`.
    #[inline]
    fn reduction_db(&self, level_db: f32) -> f32 {
        let overshoot = level_db - self.threshold_db;
        if overshoot <= 0.0 {
            0.0
        } else {
            overshoot * (1.0 - 1.0 / self.ratio)
        }
    }
}

/// One band's dynamics processor.
///
/// ## Example
///
/// ```rust
/// use mbcomp_core::{AudioBlock, ProcessSpec, Processor};
/// use mbcomp_dsp::CompressorBand;
///
/// let mut band = CompressorBand::new();
/// band.prepare(ProcessSpec::new(48000.0, 1, 4800));
/// band.update_settings(-20.0, 4.0, 5.0, 100.0);
///
/// let mut block = AudioBlock::from_channels(vec![vec![0.5; 4800]]);
/// band.process(&mut block);
/// assert!(block.channel(0)[4799] < 0.5);
/// assert!(band.gain_reduction_db() < 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct CompressorBand {
    computer: GainComputer,
    attack_ms: f32,
    release_ms: f32,
    bypassed: bool,
    muted: bool,
    soloed: bool,
    /// Smoothed gain reduction per channel, in positive dB.
    envelopes: Vec<EnvelopeFollower>,
    /// Deepest per-sample reduction since the last take, in positive dB.
    peak_reduction: f32,
    spec: Option<ProcessSpec>,
}

impl Default for CompressorBand {
    fn default() -> Self {
        Self::new()
    }
}

impl CompressorBand {
    /// A band with default settings (0 dB threshold, 3:1, 50/250 ms).
    pub fn new() -> Self {
        let defaults = BandConfig::default();
        let mut band = Self {
            computer: GainComputer {
                threshold_db: defaults.threshold_db,
                ratio: defaults.ratio,
            },
            attack_ms: defaults.attack_ms,
            release_ms: defaults.release_ms,
            bypassed: false,
            muted: false,
            soloed: false,
            envelopes: Vec::new(),
            peak_reduction: 0.0,
            spec: None,
        };
        band.apply_config(&defaults);
        band
    }

    /// Updates the dynamics settings.
    ///
    /// Ratios below 1 (or NaN) become 1. Times shorter than one sample are
    /// clamped inside the envelope. Coefficients are only recomputed when a
    /// time actually changes, so this is cheap to call every block.
    pub fn update_settings(
        &mut self,
        threshold_db: f32,
        ratio: f32,
        attack_ms: f32,
        release_ms: f32,
    ) {
        if threshold_db.is_finite() {
            self.computer.threshold_db = threshold_db;
        }
        // NaN fails the comparison and lands on 1.0 as well.
        self.computer.ratio = if ratio >= 1.0 { ratio } else { 1.0 };
        self.attack_ms = attack_ms;
        self.release_ms = release_ms;

        for env in &mut self.envelopes {
            env.set_attack_ms(attack_ms);
            env.set_release_ms(release_ms);
        }
    }

    /// Applies a full [`BandConfig`]: dynamics and switches.
    pub fn apply_config(&mut self, config: &BandConfig) {
        self.update_settings(
            config.threshold_db,
            config.ratio,
            config.attack_ms,
            config.release_ms,
        );
        self.bypassed = config.bypassed;
        self.muted = config.muted;
        self.soloed = config.soloed;
    }

    /// Threshold in dB.
    pub fn threshold_db(&self) -> f32 {
        self.computer.threshold_db
    }

    /// Effective ratio (always >= 1).
    pub fn ratio(&self) -> f32 {
        self.computer.ratio
    }

    /// Attack time in milliseconds.
    pub fn attack_ms(&self) -> f32 {
        self.attack_ms
    }

    /// Release time in milliseconds.
    pub fn release_ms(&self) -> f32 {
        self.release_ms
    }

    /// Sets whether audio passes through untouched.
    pub fn set_bypassed(&mut self, bypassed: bool) {
        self.bypassed = bypassed;
    }

    /// Whether the band is bypassed.
    pub fn is_bypassed(&self) -> bool {
        self.bypassed
    }

    /// Sets the mute switch.
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Whether the band is muted.
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Sets the solo switch.
    pub fn set_soloed(&mut self, soloed: bool) {
        self.soloed = soloed;
    }

    /// Whether the band is soloed.
    pub fn is_soloed(&self) -> bool {
        self.soloed
    }

    /// Current gain reduction in dB (zero or negative), the deepest across
    /// channels. For metering.
    pub fn gain_reduction_db(&self) -> f32 {
        let deepest = self
            .envelopes
            .iter()
            .fold(0.0f32, |acc, env| acc.max(env.level()));
        -deepest
    }

    /// Deepest gain reduction of any sample since the previous call, in dB
    /// (zero or negative). Clears the hold.
    pub fn take_peak_reduction_db(&mut self) -> f32 {
        let peak = self.peak_reduction;
        self.peak_reduction = 0.0;
        -peak
    }
}

impl Processor for CompressorBand {
    fn prepare(&mut self, spec: ProcessSpec) {
        self.envelopes.clear();
        self.envelopes.resize(
            spec.num_channels,
            EnvelopeFollower::with_times(spec.sample_rate, self.attack_ms, self.release_ms),
        );
        self.spec = Some(spec);
    }

    fn process(&mut self, block: &mut AudioBlock) {
        let Some(spec) = self.spec else {
            panic!("CompressorBand::process called before prepare");
        };
        spec.assert_accepts(block);

        if self.bypassed {
            return;
        }

        let computer = self.computer;
        let mut peak = self.peak_reduction;
        for (channel, env) in block.channels_mut().zip(self.envelopes.iter_mut()) {
            for sample in channel.iter_mut() {
                let target = computer.reduction_db(linear_to_db(sample.abs()));
                let reduction = env.process(target);
                peak = peak.max(reduction);
                *sample *= db_to_linear(-reduction);
            }
        }
        self.peak_reduction = peak;
    }

    fn reset(&mut self) {
        for env in &mut self.envelopes {
            env.reset();
        }
        self.peak_reduction = 0.0;
    }
}
