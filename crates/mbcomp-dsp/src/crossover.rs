//! Linkwitz-Riley crossover network.
//!
//! Splits a block into up to three bands with 4th-order (24 dB/oct)
//! Linkwitz-Riley pairs, each side built from two cascaded Butterworth
//! biquads.
//!
//! # Topology
//!
//! ```text
//!              ┌─ LP1 ── LP1 ── AP2 ─────────────────→ low
//! input ──────┤
//!              └─ HP1 ── HP1 ─┬─ LP2 ── LP2 ─────────→ mid
//!                             └─ HP2 ── HP2 ─────────→ high
//! ```
//!
//! The mid and high bands both pass through the mid-high pair, whose sum is
//! a second-order all-pass. The low band never sees that pair, so it goes
//! through the matching all-pass `AP2` instead. Summed back, the three bands
//! equal `AP2 · AP1 · input`: flat magnitude, phase of the two crossover
//! all-passes.
//!
//! With two bands only the first pair runs; with one band the input is
//! copied through.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use mbcomp_core::{
    AudioBlock, BUTTERWORTH_Q, Biquad, ProcessSpec, allpass_coefficients, highpass_coefficients,
    lowpass_coefficients,
};

use crate::{BandCount, CrossoverConfig};

/// One LR4 low-pass/high-pass pair for a single channel.
#[derive(Debug, Clone, Default)]
struct LinkwitzRiley {
    lowpass: [Biquad; 2],
    highpass: [Biquad; 2],
}

impl LinkwitzRiley {
    fn set_frequency(&mut self, frequency: f32, sample_rate: f32) {
        let lp = lowpass_coefficients(frequency, BUTTERWORTH_Q, sample_rate);
        let hp = highpass_coefficients(frequency, BUTTERWORTH_Q, sample_rate);
        for section in &mut self.lowpass {
            section.set_coefficients(lp);
        }
        for section in &mut self.highpass {
            section.set_coefficients(hp);
        }
    }

    #[inline]
    fn lowpass(&mut self, samples: &mut [f32]) {
        for section in &mut self.lowpass {
            section.process_slice(samples);
        }
    }

    #[inline]
    fn highpass(&mut self, samples: &mut [f32]) {
        for section in &mut self.highpass {
            section.process_slice(samples);
        }
    }

    fn clear(&mut self) {
        for section in self.lowpass.iter_mut().chain(self.highpass.iter_mut()) {
            section.clear();
        }
    }
}

/// Filter state for one channel.
#[derive(Debug, Clone, Default)]
struct ChannelFilters {
    low_mid: LinkwitzRiley,
    mid_high: LinkwitzRiley,
    /// Phase compensation for the low band.
    low_allpass: Biquad,
}

impl ChannelFilters {
    fn clear(&mut self) {
        self.low_mid.clear();
        self.mid_high.clear();
        self.low_allpass.clear();
    }
}

/// Band-splitting filter bank.
///
/// ## Example
///
/// ```rust
/// use mbcomp_core::{AudioBlock, ProcessSpec};
/// use mbcomp_dsp::{BandCount, CrossoverNetwork};
///
/// let mut crossover = CrossoverNetwork::new(BandCount::Three);
/// crossover.prepare(ProcessSpec::new(48000.0, 1, 256));
/// crossover.set_cutoffs(400.0, 2000.0);
///
/// let mut input = AudioBlock::new(1, 256);
/// input.channel_mut(0)[0] = 1.0;
/// let mut bands = [AudioBlock::new(1, 256), AudioBlock::new(1, 256), AudioBlock::new(1, 256)];
/// crossover.split(&input, &mut bands);
/// assert!(bands.iter().all(|b| b.peak() > 0.0));
/// ```
#[derive(Debug, Clone)]
pub struct CrossoverNetwork {
    band_count: BandCount,
    channels: Vec<ChannelFilters>,
    /// Cutoffs as last requested, before clamping.
    requested: CrossoverConfig,
    /// Cutoffs the coefficients were computed for.
    low_mid_hz: f32,
    mid_high_hz: f32,
    spec: Option<ProcessSpec>,
}

impl CrossoverNetwork {
    /// Creates an unprepared network with default cutoffs (400 / 2000 Hz).
    pub fn new(band_count: BandCount) -> Self {
        let requested = CrossoverConfig::default();
        Self {
            band_count,
            channels: Vec::new(),
            requested,
            low_mid_hz: requested.low_mid_hz,
            mid_high_hz: requested.mid_high_hz,
            spec: None,
        }
    }

    /// Allocates per-channel filters, computes coefficients and clears state.
    pub fn prepare(&mut self, spec: ProcessSpec) {
        self.channels.clear();
        self.channels
            .resize(spec.num_channels, ChannelFilters::default());
        self.spec = Some(spec);

        let (low_mid, mid_high) = self.requested.clamped(spec.sample_rate);
        self.low_mid_hz = low_mid;
        self.mid_high_hz = mid_high;
        self.update_low_mid();
        self.update_mid_high();
    }

    /// Sets the crossover frequencies.
    ///
    /// Values are clamped to their ranges (and below Nyquist). Coefficients
    /// are recomputed only for a cutoff that actually changed, so calling
    /// this every block is cheap.
    pub fn set_cutoffs(&mut self, low_mid_hz: f32, mid_high_hz: f32) {
        self.requested = CrossoverConfig {
            low_mid_hz,
            mid_high_hz,
        };
        let Some(spec) = self.spec else {
            return;
        };

        let (low_mid, mid_high) = self.requested.clamped(spec.sample_rate);
        if low_mid != self.low_mid_hz {
            self.low_mid_hz = low_mid;
            self.update_low_mid();
        }
        if mid_high != self.mid_high_hz {
            self.mid_high_hz = mid_high;
            self.update_mid_high();
        }
    }

    /// Effective `(low_mid, mid_high)` cutoffs after clamping.
    pub fn cutoffs(&self) -> (f32, f32) {
        (self.low_mid_hz, self.mid_high_hz)
    }

    /// Number of bands produced by [`split`](Self::split).
    pub fn band_count(&self) -> BandCount {
        self.band_count
    }

    /// Changes the band count and clears filter state.
    pub fn set_band_count(&mut self, band_count: BandCount) {
        self.band_count = band_count;
        self.reset();
    }

    /// Clears every filter's delay line.
    pub fn reset(&mut self) {
        for channel in &mut self.channels {
            channel.clear();
        }
    }

    /// Splits `input` into the first `band_count` entries of `bands`, low to
    /// high. Each output adopts the input's length.
    ///
    /// # Panics
    ///
    /// Panics if called before [`prepare`](Self::prepare), if `input` does
    /// not fit the prepared spec, or if `bands` holds fewer buffers than
    /// there are bands.
    pub fn split(&mut self, input: &AudioBlock, bands: &mut [AudioBlock]) {
        let Some(spec) = self.spec else {
            panic!("CrossoverNetwork::split called before prepare");
        };
        spec.assert_accepts(input);
        assert!(
            bands.len() >= self.band_count.count(),
            "{} band buffers for {} bands",
            bands.len(),
            self.band_count.count()
        );

        for band in bands.iter_mut().take(self.band_count.count()) {
            band.copy_from(input);
        }

        if self.band_count == BandCount::One {
            return;
        }

        for (ch, filters) in self.channels.iter_mut().enumerate() {
            filters.low_mid.lowpass(bands[0].channel_mut(ch));
            filters.low_mid.highpass(bands[1].channel_mut(ch));
        }

        if self.band_count == BandCount::Two {
            return;
        }

        let (lower, upper) = bands.split_at_mut(2);
        upper[0].copy_from(&lower[1]);

        for (ch, filters) in self.channels.iter_mut().enumerate() {
            filters.low_allpass.process_slice(lower[0].channel_mut(ch));
            filters.mid_high.lowpass(lower[1].channel_mut(ch));
            filters.mid_high.highpass(upper[0].channel_mut(ch));
        }
    }

    fn sample_rate(&self) -> f32 {
        self.spec.map_or(48000.0, |spec| spec.sample_rate)
    }

    fn update_low_mid(&mut self) {
        let (frequency, sample_rate) = (self.low_mid_hz, self.sample_rate());
        for channel in &mut self.channels {
            channel.low_mid.set_frequency(frequency, sample_rate);
        }
    }

    fn update_mid_high(&mut self) {
        let (frequency, sample_rate) = (self.mid_high_hz, self.sample_rate());
        let allpass = allpass_coefficients(frequency, BUTTERWORTH_Q, sample_rate);
        for channel in &mut self.channels {
            channel.mid_high.set_frequency(frequency, sample_rate);
            channel.low_allpass.set_coefficients(allpass);
        }
    }
}
