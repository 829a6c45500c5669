//! Parameters, state and presets for the mbcomp multiband compressor.
//!
//! This crate is the boundary between whoever turns the knobs and the audio
//! thread. Controls are written into a [`ParamStore`] from any thread; the
//! audio callback calls [`ParamStore::snapshot`] once per block and hands the
//! resulting [`PipelineConfig`](mbcomp_dsp::PipelineConfig) to the pipeline.
//!
//! # Features
//!
//! - **Registry**: every control is a [`ParamKey`] with a descriptor (range,
//!   default, unit, stable id)
//! - **Lock-free store**: atomic per-parameter values, clamped and quantized
//!   on write
//! - **State**: opaque JSON blobs for hosts, tolerant of unknown keys
//! - **Presets**: hand-editable TOML files plus a few factory presets
//!
//! # Example
//!
//! ```rust
//! use mbcomp_core::{AudioBlock, ProcessSpec};
//! use mbcomp_dsp::MultibandPipeline;
//! use mbcomp_params::{ParamStore, get_factory_preset};
//!
//! let store = ParamStore::new();
//! let preset = get_factory_preset("vocal").unwrap();
//! preset.apply_to(&store).unwrap();
//!
//! let mut pipeline = MultibandPipeline::new(preset.band_count().unwrap());
//! pipeline.prepare(ProcessSpec::new(48000.0, 2, 256));
//!
//! let mut block = AudioBlock::new(2, 256);
//! pipeline.process(&mut block, &store.snapshot());
//! ```

mod error;
mod factory_presets;
mod preset;
mod registry;
mod state;
mod store;
mod value;

pub use error::ParamError;
pub use factory_presets::{FACTORY_PRESET_NAMES, factory_presets, get_factory_preset};
pub use preset::Preset;
pub use registry::{Band, BandParam, PARAM_COUNT, ParamKey, RATIO_LABELS};
pub use store::ParamStore;
pub use value::{format_value, parse_value};
