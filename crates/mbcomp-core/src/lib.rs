//! mbcomp Core - DSP primitives for the multiband compressor
//!
//! This crate provides the building blocks the multiband pipeline is assembled
//! from, designed for real-time audio processing with zero allocation in the
//! audio path.
//!
//! # Core Abstractions
//!
//! ## Processing
//!
//! - [`Processor`] - Block processor lifecycle (`prepare` / `process` / `reset`)
//! - [`ProcessSpec`] - Sample rate, channel count and maximum block size
//! - [`AudioBlock`] - Fixed-size multi-channel sample buffer
//!
//! ## Filters
//!
//! - [`Biquad`] - Second-order IIR section (`f64` TDF-II) with RBJ cookbook coefficients
//! - [`lowpass_coefficients`], [`highpass_coefficients`], [`allpass_coefficients`]
//!
//! ## Smoothing & Dynamics
//!
//! - [`LinearRamp`] - Constant-rate ramp for click-free gain changes
//! - [`EnvelopeFollower`] - One-pole attack/release ballistics
//!
//! ## Parameters
//!
//! - [`ParamDescriptor`] - Metadata for one control (range, step, unit, kind)
//! - [`ParamKind`] - Continuous, choice, or boolean
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! mbcomp-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: No allocations in audio processing paths
//! - **No dependencies on std**: Pure `no_std` with `libm` for math
//! - **Preconditions are fatal**: mismatched buffers panic rather than
//!   silently corrupting audio

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod biquad;
pub mod buffer;
pub mod envelope;
pub mod math;
pub mod param_info;
pub mod processor;
pub mod ramp;

// Re-export main types at crate root
pub use biquad::{
    BUTTERWORTH_Q, Biquad, Coefficients, allpass_coefficients, highpass_coefficients,
    lowpass_coefficients,
};
pub use buffer::AudioBlock;
pub use envelope::EnvelopeFollower;
pub use math::{db_to_linear, flush_denormal, linear_to_db, ms_to_samples};
pub use param_info::{ParamDescriptor, ParamDisplay, ParamId, ParamKind, ParamUnit};
pub use processor::{ProcessSpec, Processor};
pub use ramp::LinearRamp;
