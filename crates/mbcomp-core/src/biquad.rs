//! Biquad (bi-quadratic) filter structure.
//!
//! Provides a generic second-order IIR section plus the coefficient sets the
//! crossover network is built from (low-pass, high-pass, all-pass).
//!
//! Coefficient calculation uses the RBJ Audio EQ Cookbook formulas. All three
//! share the same bilinear prewarp at the cutoff, so a Linkwitz-Riley pair
//! (two cascaded Butterworth low-passes plus two cascaded Butterworth
//! high-passes) sums to exactly the all-pass returned by
//! [`allpass_coefficients`] with `q = BUTTERWORTH_Q`.
//!
//! Coefficients and filter state are `f64`. Near 20 Hz the poles sit within
//! a few parts per million of the unit circle, closer than `f32` can place
//! them, and the summed bands would drift away from the all-pass.

use core::f64::consts::PI;
use libm::{cos, sin};

/// Q of a second-order Butterworth section (1/√2).
pub const BUTTERWORTH_Q: f32 = core::f32::consts::FRAC_1_SQRT_2;

/// Unnormalized `(b0, b1, b2, a0, a1, a2)` coefficients.
pub type Coefficients = (f64, f64, f64, f64, f64, f64);

/// Generic biquad filter coefficients and state.
///
/// Implements the Transposed Direct Form II structure:
/// ```text
/// y[n]  = b0*x[n] + z1
/// z1'   = b1*x[n] - a1*y[n] + z2
/// z2'   = b2*x[n] - a2*y[n]
/// ```
#[derive(Debug, Clone)]
pub struct Biquad {
    /// Feedforward coefficients
    b0: f64,
    b1: f64,
    b2: f64,

    /// Feedback coefficients (normalized by a0)
    a1: f64,
    a2: f64,

    /// State registers
    z1: f64,
    z2: f64,
}

impl Biquad {
    /// Creates a new biquad with passthrough coefficients.
    ///
    /// Initial state: `y[n] = x[n]` (no filtering)
    pub fn new() -> Self {
        Self {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            z1: 0.0,
            z2: 0.0,
        }
    }

    /// Sets the biquad coefficients.
    ///
    /// Takes the `(b0, b1, b2, a0, a1, a2)` tuple produced by the coefficient
    /// functions in this module and normalizes by `a0`. State is preserved so
    /// coefficients can change between blocks without a click.
    pub fn set_coefficients(&mut self, coeffs: Coefficients) {
        let (b0, b1, b2, a0, a1, a2) = coeffs;
        let a0_inv = 1.0 / a0;
        self.b0 = b0 * a0_inv;
        self.b1 = b1 * a0_inv;
        self.b2 = b2 * a0_inv;
        self.a1 = a1 * a0_inv;
        self.a2 = a2 * a0_inv;
    }

    /// Processes a single sample through the biquad filter.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let input = f64::from(input);
        let output = self.b0 * input + self.z1;
        self.z1 = flush_denormal(self.b1 * input - self.a1 * output + self.z2);
        self.z2 = flush_denormal(self.b2 * input - self.a2 * output);
        output as f32
    }

    /// Processes a slice in place.
    #[inline]
    pub fn process_slice(&mut self, samples: &mut [f32]) {
        for sample in samples.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    /// Clears the filter state.
    ///
    /// Coefficients are kept.
    pub fn clear(&mut self) {
        self.z1 = 0.0;
        self.z2 = 0.0;
    }
}

impl Default for Biquad {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn flush_denormal(x: f64) -> f64 {
    if x.abs() < 1e-30 { 0.0 } else { x }
}

/// Shared RBJ intermediates: `(cos ω, alpha)`.
#[inline]
fn omega_terms(frequency: f32, q: f32, sample_rate: f32) -> (f64, f64) {
    let omega = 2.0 * PI * f64::from(frequency) / f64::from(sample_rate);
    let cos_omega = cos(omega);
    let alpha = sin(omega) / (2.0 * f64::from(q));
    (cos_omega, alpha)
}

/// Calculates low-pass filter coefficients using the RBJ cookbook formula.
///
/// # Arguments
///
/// * `frequency` - Cutoff frequency in Hz
/// * `q` - Q factor ([`BUTTERWORTH_Q`] for a Butterworth response)
/// * `sample_rate` - Sample rate in Hz
///
/// # Returns
///
/// (b0, b1, b2, a0, a1, a2) coefficients
pub fn lowpass_coefficients(
    frequency: f32,
    q: f32,
    sample_rate: f32,
) -> Coefficients {
    let (cos_omega, alpha) = omega_terms(frequency, q, sample_rate);

    let b0 = (1.0 - cos_omega) / 2.0;
    let b1 = 1.0 - cos_omega;
    let b2 = (1.0 - cos_omega) / 2.0;
    let a0 = 1.0 + alpha;
    let a1 = -2.0 * cos_omega;
    let a2 = 1.0 - alpha;

    (b0, b1, b2, a0, a1, a2)
}

/// Calculates high-pass filter coefficients using the RBJ cookbook formula.
///
/// # Returns
///
/// (b0, b1, b2, a0, a1, a2) coefficients
pub fn highpass_coefficients(
    frequency: f32,
    q: f32,
    sample_rate: f32,
) -> Coefficients {
    let (cos_omega, alpha) = omega_terms(frequency, q, sample_rate);

    let b0 = (1.0 + cos_omega) / 2.0;
    let b1 = -(1.0 + cos_omega);
    let b2 = (1.0 + cos_omega) / 2.0;
    let a0 = 1.0 + alpha;
    let a1 = -2.0 * cos_omega;
    let a2 = 1.0 - alpha;

    (b0, b1, b2, a0, a1, a2)
}

/// Calculates all-pass filter coefficients using the RBJ cookbook formula.
///
/// Unity magnitude at every frequency; phase rotates through -360° around
/// `frequency`. With `q = BUTTERWORTH_Q` this equals the summed response of
/// a Linkwitz-Riley 4th-order pair at the same frequency.
///
/// # Returns
///
/// (b0, b1, b2, a0, a1, a2) coefficients
pub fn allpass_coefficients(
    frequency: f32,
    q: f32,
    sample_rate: f32,
) -> Coefficients {
    let (cos_omega, alpha) = omega_terms(frequency, q, sample_rate);

    let b0 = 1.0 - alpha;
    let b1 = -2.0 * cos_omega;
    let b2 = 1.0 + alpha;
    let a0 = 1.0 + alpha;
    let a1 = -2.0 * cos_omega;
    let a2 = 1.0 - alpha;

    (b0, b1, b2, a0, a1, a2)
}
