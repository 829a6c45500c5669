//! Preset file format and operations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use mbcomp_dsp::{BandCount, MAX_BANDS};

use crate::{ParamError, ParamKey, ParamStore, format_value, parse_value};

/// A named set of parameter values, stored as TOML.
///
/// Values are kept as text in each parameter's own unit so preset files are
/// easy to read and edit by hand. Parameters left out of a preset keep
/// whatever value the store already holds.
///
/// # TOML Format
///
/// ```toml
/// name = "Bass Control"
/// description = "Tames the low end, leaves the top alone"
/// band_count = 3
///
/// [params]
/// low_mid_crossover = "180 Hz"
/// low_threshold = "-24.0 dB"
/// low_ratio = "4:1"
/// high_bypass = "on"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Preset {
    /// Name of the preset.
    pub name: String,

    /// Optional description of the preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Number of active bands (1, 2 or 3).
    #[serde(default = "default_band_count")]
    pub band_count: usize,

    /// Parameter values keyed by string id.
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

fn default_band_count() -> usize {
    MAX_BANDS
}

impl Preset {
    /// Create a new empty preset.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            band_count: MAX_BANDS,
            params: BTreeMap::new(),
        }
    }

    /// Create a preset with a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the band count.
    pub fn with_band_count(mut self, count: BandCount) -> Self {
        self.band_count = count.count();
        self
    }

    /// Add a parameter value.
    pub fn with_param(mut self, string_id: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(string_id.into(), value.into());
        self
    }

    /// Captures every value currently in `store`.
    pub fn from_store(name: impl Into<String>, store: &ParamStore, count: BandCount) -> Self {
        let params = store
            .descriptors()
            .iter()
            .enumerate()
            .map(|(i, desc)| {
                let value = store.get_value(i).unwrap_or(desc.default);
                (desc.string_id.to_string(), format_value(desc, value))
            })
            .collect();

        Self {
            params,
            ..Self::new(name).with_band_count(count)
        }
    }

    /// Load a preset from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ParamError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ParamError::read_file(path, e))?;
        let preset = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), name = %preset.name, "loaded preset");
        Ok(preset)
    }

    /// Load a preset from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ParamError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the preset to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ParamError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ParamError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ParamError::write_file(path, e))?;
        tracing::debug!(path = %path.display(), name = %self.name, "saved preset");
        Ok(())
    }

    /// Convert the preset to a TOML string.
    pub fn to_toml(&self) -> Result<String, ParamError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// The preset's band count.
    pub fn band_count(&self) -> Result<BandCount, ParamError> {
        BandCount::from_count(self.band_count)
            .ok_or(ParamError::InvalidBandCount(self.band_count))
    }

    /// Writes the preset's values into `store`.
    ///
    /// Unlike state blobs, presets are hand-edited, so an unknown key or an
    /// unreadable value is an error. Every entry is checked first; on error
    /// the store is left as it was. Returns the number of values written.
    pub fn apply_to(&self, store: &ParamStore) -> Result<usize, ParamError> {
        self.band_count()?;

        let updates = self
            .params
            .iter()
            .map(|(id, text)| {
                let key = ParamKey::from_string_id(id)
                    .ok_or_else(|| ParamError::UnknownParam(id.clone()))?;
                Ok((key, parse_value(&key.descriptor(), text)?))
            })
            .collect::<Result<Vec<_>, ParamError>>()?;

        for &(key, value) in &updates {
            store.set(key, value);
        }
        Ok(updates.len())
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self::new("Untitled")
    }
}
