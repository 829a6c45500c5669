//! Mathematical utility functions for DSP.
//!
//! All functions are allocation-free and suitable for `no_std`.
//!
//! # Level Conversions
//!
//! - [`db_to_linear`] / [`linear_to_db`] - Convert between dB and linear gain
//!
//! # Utilities
//!
//! - [`ms_to_samples`] - Time conversion
//! - [`flush_denormal`] - Keep recursive filters out of the subnormal range

use libm::{expf, logf};

/// Floor used by [`linear_to_db`] so silence maps to a finite level.
pub const SILENCE_DB: f32 = -200.0;

/// Convert decibels to linear gain.
///
/// # Example
/// ```rust
/// use mbcomp_core::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 0.001);
/// assert!((db_to_linear(-6.02) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    // 10^(dB/20) = e^(dB * ln(10)/20)
    const FACTOR: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * FACTOR)
}

/// Convert linear gain to decibels.
///
/// Zero and negative inputs return [`SILENCE_DB`] instead of `-inf`.
///
/// # Example
/// ```rust
/// use mbcomp_core::linear_to_db;
///
/// assert!((linear_to_db(1.0) - 0.0).abs() < 0.001);
/// assert!((linear_to_db(0.5) - (-6.02)).abs() < 0.01);
/// assert!(linear_to_db(0.0).is_finite());
/// ```
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    // 20 * log10(linear) = 20 * ln(linear) / ln(10)
    const FACTOR: f32 = 20.0 / core::f32::consts::LN_10;
    if linear <= 1e-10 {
        SILENCE_DB
    } else {
        logf(linear) * FACTOR
    }
}

/// Convert milliseconds to samples.
#[inline]
pub fn ms_to_samples(ms: f32, sample_rate: f32) -> f32 {
    ms * sample_rate / 1000.0
}

/// Flush denormal (subnormal) floats to zero.
///
/// IIR feedback paths decaying toward zero can produce subnormals, which
/// are very slow on many CPUs.
#[inline]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}
