//! Linear value ramp for click-free gain changes.
//!
//! Unlike exponential smoothing, a linear ramp moves at a constant rate and
//! arrives exactly on target after the configured duration. That bounds the
//! largest sample-to-sample change a target jump can produce, which is what
//! gain staging needs.
//!
//! ```rust
//! use mbcomp_core::LinearRamp;
//!
//! let mut gain = LinearRamp::new(1.0);
//! gain.set_sample_rate(48000.0);
//! gain.set_ramp_time_ms(10.0);
//!
//! gain.set_target(0.5);
//! for _ in 0..480 {
//!     gain.advance();
//! }
//! assert_eq!(gain.get(), 0.5);
//! ```

/// A value that ramps linearly toward its target.
///
/// Each sample is computed from the ramp's start point rather than summed
/// from the previous one, so rounding never accumulates and the final step
/// onto the target is no larger than any other.
#[derive(Debug, Clone)]
pub struct LinearRamp {
    /// Current value
    current: f32,
    /// Target value
    target: f32,
    /// Value the ramp in flight started from
    start: f32,
    /// Increment per sample (signed)
    increment: f64,
    /// Samples elapsed since the ramp started
    elapsed: u32,
    /// Length of the ramp in flight in samples
    length: u32,
    /// Sample rate in Hz
    sample_rate: f32,
    /// Ramp duration in milliseconds
    ramp_time_ms: f32,
}

impl LinearRamp {
    /// Create a settled ramp at `initial` (44.1 kHz, 50 ms).
    pub fn new(initial: f32) -> Self {
        Self {
            current: initial,
            target: initial,
            start: initial,
            increment: 0.0,
            elapsed: 0,
            length: 0,
            sample_rate: 44100.0,
            ramp_time_ms: 50.0,
        }
    }

    /// Create with full configuration.
    pub fn with_config(initial: f32, sample_rate: f32, ramp_time_ms: f32) -> Self {
        Self {
            sample_rate,
            ramp_time_ms,
            ..Self::new(initial)
        }
    }

    /// Start a new ramp from the current value toward `target`.
    ///
    /// Setting the same target again is a no-op, so callers may push the
    /// target every block without restarting an in-flight ramp.
    pub fn set_target(&mut self, target: f32) {
        if target == self.target {
            return;
        }
        self.target = target;

        let samples = self.ramp_samples();
        if samples == 0 {
            self.snap_to_target();
        } else {
            self.start = self.current;
            self.increment = (f64::from(target) - f64::from(self.current)) / f64::from(samples);
            self.elapsed = 0;
            self.length = samples;
        }
    }

    /// Update sample rate. An in-flight ramp keeps its current increment.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
    }

    /// Set ramp duration in milliseconds.
    pub fn set_ramp_time_ms(&mut self, time_ms: f32) {
        self.ramp_time_ms = time_ms.max(0.0);
    }

    /// Get next value (advances by one sample).
    #[inline]
    pub fn advance(&mut self) -> f32 {
        if self.elapsed < self.length {
            self.elapsed += 1;
            self.current = if self.elapsed == self.length {
                self.target
            } else {
                (f64::from(self.start) + self.increment * f64::from(self.elapsed)) as f32
            };
        }
        self.current
    }

    /// Get current value without advancing.
    #[inline]
    pub fn get(&self) -> f32 {
        self.current
    }

    /// Magnitude of the per-sample step of the ramp in flight (0 when settled).
    #[inline]
    pub fn step(&self) -> f32 {
        if self.is_settled() {
            0.0
        } else {
            self.increment.abs() as f32
        }
    }

    /// Check if the ramp is complete.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.elapsed >= self.length
    }

    /// Snap to target immediately.
    pub fn snap_to_target(&mut self) {
        self.current = self.target;
        self.start = self.target;
        self.increment = 0.0;
        self.elapsed = 0;
        self.length = 0;
    }

    fn ramp_samples(&self) -> u32 {
        let samples = crate::ms_to_samples(self.ramp_time_ms, self.sample_rate);
        if samples.is_finite() && samples > 0.0 {
            libm::roundf(samples) as u32
        } else {
            0
        }
    }
}

impl Default for LinearRamp {
    fn default() -> Self {
        Self::new(0.0)
    }
}
