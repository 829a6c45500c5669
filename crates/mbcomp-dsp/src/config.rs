//! Typed per-block configuration for the multiband pipeline.
//!
//! The parameter boundary assembles one [`PipelineConfig`] per block and
//! hands it to [`MultibandPipeline::process`](crate::MultibandPipeline::process)
//! by reference. Everything here is `Copy` plain data: no atomics, no
//! lookups by name, nothing for the audio thread to interpret.

/// Selectable compression ratios (n:1), indexed by the ratio choice parameter.
pub const RATIO_CHOICES: [f32; 14] = [
    1.0, 1.5, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 10.0, 15.0, 20.0, 50.0, 100.0,
];

/// Index into [`RATIO_CHOICES`] used when nothing else is configured (3:1).
pub const DEFAULT_RATIO_INDEX: usize = 3;

/// Maximum number of bands the pipeline can split into.
pub const MAX_BANDS: usize = 3;

/// Valid low-mid crossover range in Hz.
pub const LOW_MID_RANGE: (f32, f32) = (20.0, 999.0);

/// Valid mid-high crossover range in Hz.
pub const MID_HIGH_RANGE: (f32, f32) = (1000.0, 20000.0);

/// Cutoffs never reach closer to Nyquist than this fraction of the sample rate.
const MAX_CUTOFF_RATIO: f32 = 0.49;

/// Resolves a ratio choice index, clamping out-of-range indices to the list.
///
/// ```rust
/// use mbcomp_dsp::ratio_from_index;
///
/// assert_eq!(ratio_from_index(3), 3.0);
/// assert_eq!(ratio_from_index(99), 100.0);
/// ```
pub fn ratio_from_index(index: usize) -> f32 {
    RATIO_CHOICES[index.min(RATIO_CHOICES.len() - 1)]
}

/// How many bands the pipeline splits into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BandCount {
    /// No crossover; a single full-range compressor.
    One,
    /// Low-mid split only.
    Two,
    /// Low-mid and mid-high splits with all-pass compensation on the low band.
    #[default]
    Three,
}

impl BandCount {
    /// Number of bands as a count.
    pub const fn count(self) -> usize {
        match self {
            BandCount::One => 1,
            BandCount::Two => 2,
            BandCount::Three => 3,
        }
    }

    /// Parses a count, returning `None` outside `1..=3`.
    pub const fn from_count(count: usize) -> Option<Self> {
        match count {
            1 => Some(BandCount::One),
            2 => Some(BandCount::Two),
            3 => Some(BandCount::Three),
            _ => None,
        }
    }
}

/// Settings for one compressor band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandConfig {
    /// Attack time in milliseconds.
    pub attack_ms: f32,
    /// Release time in milliseconds.
    pub release_ms: f32,
    /// Threshold in dBFS.
    pub threshold_db: f32,
    /// Compression ratio (n:1).
    pub ratio: f32,
    /// Pass the band through uncompressed.
    pub bypassed: bool,
    /// Drop the band from the mix (ignored while any band is soloed).
    pub muted: bool,
    /// Keep only soloed bands in the mix.
    pub soloed: bool,
}

impl Default for BandConfig {
    fn default() -> Self {
        Self {
            attack_ms: 50.0,
            release_ms: 250.0,
            threshold_db: 0.0,
            ratio: RATIO_CHOICES[DEFAULT_RATIO_INDEX],
            bypassed: false,
            muted: false,
            soloed: false,
        }
    }
}

/// Crossover frequencies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossoverConfig {
    /// Boundary between the low and mid bands, in Hz.
    pub low_mid_hz: f32,
    /// Boundary between the mid and high bands, in Hz.
    pub mid_high_hz: f32,
}

impl Default for CrossoverConfig {
    fn default() -> Self {
        Self {
            low_mid_hz: 400.0,
            mid_high_hz: 2000.0,
        }
    }
}

impl CrossoverConfig {
    /// Returns `(low_mid, mid_high)` clamped to their ranges and below
    /// `0.49 * sample_rate`, with `low_mid < mid_high` guaranteed.
    ///
    /// Non-finite values fall back to the defaults.
    pub fn clamped(&self, sample_rate: f32) -> (f32, f32) {
        let defaults = Self::default();
        let nyquist_limit = MAX_CUTOFF_RATIO * sample_rate;

        let mid_high = clamp_finite(self.mid_high_hz, defaults.mid_high_hz, MID_HIGH_RANGE)
            .min(nyquist_limit);
        let mut low_mid = clamp_finite(self.low_mid_hz, defaults.low_mid_hz, LOW_MID_RANGE)
            .min(nyquist_limit);
        // Only reachable at very low sample rates.
        if low_mid >= mid_high {
            low_mid = mid_high * 0.5;
        }

        (low_mid, mid_high)
    }
}

fn clamp_finite(value: f32, fallback: f32, (min, max): (f32, f32)) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback
    }
}

/// Everything the pipeline reads at the top of a block.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PipelineConfig {
    /// Gain applied before the crossover, in dB.
    pub input_gain_db: f32,
    /// Gain applied after recombination, in dB.
    pub output_gain_db: f32,
    /// Crossover frequencies.
    pub crossover: CrossoverConfig,
    /// Per-band settings, low to high. Band `i` of an N-band pipeline uses
    /// `bands[i]`; trailing entries are ignored.
    pub bands: [BandConfig; MAX_BANDS],
}

impl PipelineConfig {
    /// A configuration with every band bypassed and unity gains.
    pub fn bypassed() -> Self {
        let mut config = Self::default();
        for band in &mut config.bands {
            band.bypassed = true;
        }
        config
    }
}
