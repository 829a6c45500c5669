//! Attack/release envelope follower.
//!
//! A one-pole smoother with separate coefficients for rising and falling
//! input. The compressor runs its gain reduction (in dB) through one of
//! these per channel, so "rising" means more reduction (attack) and
//! "falling" means recovery (release).

use libm::expf;

/// One-pole envelope follower with separate attack and release times.
///
/// The input is followed as given (no rectification), so the caller decides
/// what it is tracking: a rectified sample, a level in dB, a gain reduction.
///
/// Coefficients follow the standard exponential form
/// `coeff = exp(-1 / (time_s * sample_rate))`, with each time clamped to at
/// least one sample so the coefficient stays finite and below one.
///
/// # Example
///
/// ```rust
/// use mbcomp_core::EnvelopeFollower;
///
/// let mut env = EnvelopeFollower::new(48000.0);
/// env.set_attack_ms(10.0);
/// env.set_release_ms(100.0);
///
/// let level = env.process(6.0);
/// assert!(level > 0.0 && level < 6.0);
/// ```
#[derive(Debug, Clone)]
pub struct EnvelopeFollower {
    /// Current envelope value
    envelope: f32,
    /// Attack coefficient
    attack_coeff: f32,
    /// Release coefficient
    release_coeff: f32,
    /// Sample rate
    sample_rate: f32,
    /// Attack time in ms (for recalculation)
    attack_ms: f32,
    /// Release time in ms (for recalculation)
    release_ms: f32,
}

impl EnvelopeFollower {
    /// Create a new envelope follower with default attack/release times.
    ///
    /// Defaults:
    /// - Attack: 50ms
    /// - Release: 250ms
    pub fn new(sample_rate: f32) -> Self {
        Self::with_times(sample_rate, 50.0, 250.0)
    }

    /// Create with specified attack and release times.
    pub fn with_times(sample_rate: f32, attack_ms: f32, release_ms: f32) -> Self {
        let mut follower = Self {
            envelope: 0.0,
            attack_coeff: 0.0,
            release_coeff: 0.0,
            sample_rate,
            attack_ms,
            release_ms,
        };
        follower.recalculate_coefficients();
        follower
    }

    /// Set the attack time in milliseconds.
    pub fn set_attack_ms(&mut self, attack_ms: f32) {
        if attack_ms != self.attack_ms {
            self.attack_ms = attack_ms;
            self.recalculate_coefficients();
        }
    }

    /// Get current attack time in milliseconds.
    pub fn attack_ms(&self) -> f32 {
        self.attack_ms
    }

    /// Set the release time in milliseconds.
    pub fn set_release_ms(&mut self, release_ms: f32) {
        if release_ms != self.release_ms {
            self.release_ms = release_ms;
            self.recalculate_coefficients();
        }
    }

    /// Get current release time in milliseconds.
    pub fn release_ms(&self) -> f32 {
        self.release_ms
    }

    /// Update sample rate and recalculate coefficients.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.recalculate_coefficients();
    }

    /// Attack coefficient currently in use.
    pub fn attack_coeff(&self) -> f32 {
        self.attack_coeff
    }

    /// Release coefficient currently in use.
    pub fn release_coeff(&self) -> f32 {
        self.release_coeff
    }

    /// Follow one input value and return the new envelope.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let coeff = if input > self.envelope {
            self.attack_coeff
        } else {
            self.release_coeff
        };

        // y[n] = coeff * y[n-1] + (1 - coeff) * x[n]
        self.envelope = crate::flush_denormal(coeff * self.envelope + (1.0 - coeff) * input);
        self.envelope
    }

    /// Get current envelope level without processing new input.
    pub fn level(&self) -> f32 {
        self.envelope
    }

    /// Reset the envelope to zero.
    pub fn reset(&mut self) {
        self.envelope = 0.0;
    }

    fn recalculate_coefficients(&mut self) {
        self.attack_coeff = Self::coefficient(self.attack_ms, self.sample_rate);
        self.release_coeff = Self::coefficient(self.release_ms, self.sample_rate);
    }

    fn coefficient(time_ms: f32, sample_rate: f32) -> f32 {
        let samples = crate::ms_to_samples(time_ms, sample_rate);
        // NaN compares false, so it also lands on the one-sample floor.
        let samples = if samples >= 1.0 { samples } else { 1.0 };
        expf(-1.0 / samples)
    }
}

impl Default for EnvelopeFollower {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_attack() {
        let mut env = EnvelopeFollower::with_times(48000.0, 1.0, 100.0);

        let mut envelope = 0.0;
        for _ in 0..500 {
            envelope = env.process(1.0);
        }

        assert!(envelope > 0.9, "Envelope should rise, got {}", envelope);
    }

    #[test]
    fn test_envelope_release() {
        let mut env = EnvelopeFollower::with_times(48000.0, 1.0, 10.0);

        for _ in 0..500 {
            env.process(1.0);
        }

        let mut envelope = 0.0;
        for _ in 0..1000 {
            envelope = env.process(0.0);
        }

        // ~2 time constants: e^-2 ≈ 0.135
        assert!(envelope < 0.15, "Envelope should fall, got {}", envelope);
    }

    #[test]
    fn test_envelope_one_time_constant() {
        let mut env = EnvelopeFollower::with_times(48000.0, 10.0, 10.0);
        let mut envelope = 0.0;
        for _ in 0..480 {
            envelope = env.process(1.0);
        }
        let expected = 1.0 - expf(-1.0);
        assert!((envelope - expected).abs() < 0.01, "got {envelope}");
    }

    #[test]
    fn test_zero_time_clamped_to_one_sample() {
        let env = EnvelopeFollower::with_times(48000.0, 0.0, -5.0);
        assert!((env.attack_coeff() - expf(-1.0)).abs() < 1e-6);
        assert!((env.release_coeff() - expf(-1.0)).abs() < 1e-6);

        let nan = EnvelopeFollower::with_times(f32::NAN, 10.0, 10.0);
        assert!(nan.attack_coeff().is_finite());
    }

    #[test]
    fn test_envelope_never_jumps() {
        let mut env = EnvelopeFollower::with_times(48000.0, 5.0, 50.0);
        let mut prev = env.level();
        for i in 0..2000 {
            let target = if (i / 500) % 2 == 0 { 20.0 } else { 0.0 };
            let next = env.process(target);
            assert!((next - prev).abs() < 20.0 * (1.0 - env.attack_coeff()) + 1e-4);
            prev = next;
        }
    }

    #[test]
    fn test_envelope_reset() {
        let mut env = EnvelopeFollower::new(48000.0);

        for _ in 0..100 {
            env.process(1.0);
        }

        env.reset();
        assert_eq!(env.level(), 0.0);
    }
}
