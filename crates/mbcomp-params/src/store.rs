//! Lock-free parameter store.
//!
//! `ParamStore` is shared between the control side (CLI, host automation,
//! UI) and the audio thread. Values live in `AtomicU32`s holding `f32`
//! bits, so writers never block the reader and every read sees a whole
//! value. Each parameter is independent: a snapshot may mix values from
//! before and after a concurrent write, which is fine for controls that do
//! not depend on each other.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use mbcomp_core::ParamDescriptor;
use mbcomp_dsp::{BandConfig, CrossoverConfig, MAX_BANDS, PipelineConfig, ratio_from_index};

use crate::{Band, BandParam, ParamError, ParamKey, parse_value};

#[derive(Debug)]
struct ParamStoreData {
    /// Parameter descriptors, in [`ParamKey::ALL`] order.
    descriptors: Vec<ParamDescriptor>,
    /// Current values as f32 bit-cast to u32 for atomic access.
    values: Vec<AtomicU32>,
}

/// Shared parameter values for the whole compressor.
///
/// Cloning is cheap and every clone sees the same values.
///
/// ```rust
/// use mbcomp_params::{Band, BandParam, ParamKey, ParamStore};
///
/// let store = ParamStore::new();
/// let audio_side = store.clone();
///
/// store.set(ParamKey::Band(Band::Low, BandParam::Threshold), -18.0);
/// let config = audio_side.snapshot();
/// assert_eq!(config.bands[0].threshold_db, -18.0);
/// ```
#[derive(Debug, Clone)]
pub struct ParamStore {
    inner: Arc<ParamStoreData>,
}

impl Default for ParamStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ParamStore {
    /// Creates a store with every parameter at its default.
    pub fn new() -> Self {
        let descriptors: Vec<ParamDescriptor> =
            ParamKey::ALL.iter().map(|key| key.descriptor()).collect();
        let values = descriptors
            .iter()
            .map(|desc| AtomicU32::new(desc.default.to_bits()))
            .collect();

        Self {
            inner: Arc::new(ParamStoreData {
                descriptors,
                values,
            }),
        }
    }

    /// Number of parameters.
    pub fn param_count(&self) -> usize {
        self.inner.descriptors.len()
    }

    /// Get parameter descriptor by index.
    pub fn descriptor(&self, index: usize) -> Option<&ParamDescriptor> {
        self.inner.descriptors.get(index)
    }

    /// All parameter descriptors.
    pub fn descriptors(&self) -> &[ParamDescriptor] {
        &self.inner.descriptors
    }

    /// Find parameter index by stable `ParamId`.
    pub fn index_by_id(&self, id: u32) -> Option<usize> {
        self.inner.descriptors.iter().position(|d| d.id.0 == id)
    }

    /// Find parameter index by string id.
    pub fn index_by_string_id(&self, string_id: &str) -> Option<usize> {
        self.inner
            .descriptors
            .iter()
            .position(|d| d.string_id == string_id)
    }

    /// Read the current value of a parameter (lock-free).
    pub fn get_value(&self, index: usize) -> Option<f32> {
        self.inner
            .values
            .get(index)
            .map(|v| f32::from_bits(v.load(Ordering::Acquire)))
    }

    /// Write a parameter value (lock-free).
    ///
    /// The value is clamped to the descriptor's range and snapped to its
    /// step; NaN becomes the default. Out-of-range indices are ignored.
    pub fn set_value(&self, index: usize, value: f32) {
        if let Some((atomic, desc)) = self
            .inner
            .values
            .get(index)
            .zip(self.inner.descriptors.get(index))
        {
            atomic.store(desc.quantize(value).to_bits(), Ordering::Release);
        }
    }

    /// Current value of `key`.
    pub fn get(&self, key: ParamKey) -> f32 {
        f32::from_bits(self.inner.values[key.index()].load(Ordering::Acquire))
    }

    /// Writes `key`, clamped and quantized.
    pub fn set(&self, key: ParamKey, value: f32) {
        self.set_value(key.index(), value);
    }

    /// Parses `text` (e.g. `"-12 dB"`, `"4:1"`, `"on"`) and writes it to the
    /// parameter named `string_id`.
    pub fn set_from_str(&self, string_id: &str, text: &str) -> Result<f32, ParamError> {
        let key = ParamKey::from_string_id(string_id)
            .ok_or_else(|| ParamError::UnknownParam(string_id.to_string()))?;
        let value = parse_value(&key.descriptor(), text)?;
        self.set(key, value);
        Ok(value)
    }

    /// Puts every parameter back to its default.
    pub fn reset_to_defaults(&self) {
        for (atomic, desc) in self.inner.values.iter().zip(&self.inner.descriptors) {
            atomic.store(desc.default.to_bits(), Ordering::Release);
        }
    }

    /// Reads every parameter once and assembles the pipeline configuration
    /// for one block. Lock-free and allocation-free.
    pub fn snapshot(&self) -> PipelineConfig {
        let mut bands = [BandConfig::default(); MAX_BANDS];
        for (config, band) in bands.iter_mut().zip(Band::ALL) {
            *config = self.band_config(band);
        }

        PipelineConfig {
            input_gain_db: self.get(ParamKey::InputGain),
            output_gain_db: self.get(ParamKey::OutputGain),
            crossover: CrossoverConfig {
                low_mid_hz: self.get(ParamKey::LowMidCrossover),
                mid_high_hz: self.get(ParamKey::MidHighCrossover),
            },
            bands,
        }
    }

    fn band_config(&self, band: Band) -> BandConfig {
        let get = |param| self.get(ParamKey::Band(band, param));
        BandConfig {
            attack_ms: get(BandParam::Attack),
            release_ms: get(BandParam::Release),
            threshold_db: get(BandParam::Threshold),
            ratio: ratio_from_index(get(BandParam::Ratio) as usize),
            bypassed: get(BandParam::Bypass) >= 0.5,
            muted: get(BandParam::Mute) >= 0.5,
            soloed: get(BandParam::Solo) >= 0.5,
        }
    }
}
