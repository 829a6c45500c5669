//! mbcomp DSP - the multiband compressor signal chain
//!
//! Built on the primitives in `mbcomp-core`, this crate provides the four
//! stages of a 1-, 2- or 3-band compressor and the pipeline that runs them.
//!
//! # Stages
//!
//! - [`GainStage`] - Ramped input/output trim
//! - [`CrossoverNetwork`] - Linkwitz-Riley band split with low-band all-pass
//!   compensation
//! - [`CompressorBand`] - Per-band peak compressor (threshold, ratio,
//!   attack, release, bypass, mute, solo)
//! - [`MultibandPipeline`] - Orchestrates the above once per block
//!
//! # Configuration
//!
//! The pipeline never reaches into shared parameter state. Each block it is
//! handed a [`PipelineConfig`] by reference:
//!
//! ```rust
//! use mbcomp_core::{AudioBlock, ProcessSpec};
//! use mbcomp_dsp::{BandCount, MultibandPipeline, PipelineConfig};
//!
//! let mut pipeline = MultibandPipeline::new(BandCount::Three);
//! pipeline.prepare(ProcessSpec::new(48000.0, 2, 256));
//!
//! let mut config = PipelineConfig::default();
//! config.crossover.low_mid_hz = 250.0;
//! config.bands[1].soloed = true;
//!
//! let mut block = AudioBlock::new(2, 256);
//! pipeline.process(&mut block, &config);
//! ```
//!
//! # Features
//!
//! - `std` (default) - links the standard library; disable for `no_std`
//!   targets with an allocator
//! - `tracing` - emits `tracing` debug events from `prepare`, `reset` and
//!   band-count changes (never from `process`)

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod compressor;
pub mod config;
pub mod crossover;
pub mod gain_stage;
pub mod pipeline;

pub use compressor::CompressorBand;
pub use config::{
    BandConfig, BandCount, CrossoverConfig, DEFAULT_RATIO_INDEX, LOW_MID_RANGE, MAX_BANDS,
    MID_HIGH_RANGE, PipelineConfig, RATIO_CHOICES, ratio_from_index,
};
pub use crossover::CrossoverNetwork;
pub use gain_stage::{DEFAULT_RAMP_MS, GainStage};
pub use pipeline::MultibandPipeline;
