//! Ramped gain stage for input and output trim.
//!
//! The target is set in decibels, converted once to linear, and approached
//! with a [`LinearRamp`] shared by every channel so the stereo image never
//! shifts during a ramp.

use mbcomp_core::{AudioBlock, LinearRamp, ProcessSpec, Processor, db_to_linear};

/// Default ramp duration for gain changes.
pub const DEFAULT_RAMP_MS: f32 = 50.0;

/// Click-free gain applied in place to a block.
///
/// ```rust
/// use mbcomp_core::{AudioBlock, ProcessSpec, Processor};
/// use mbcomp_dsp::GainStage;
///
/// let mut gain = GainStage::new();
/// gain.prepare(ProcessSpec::new(48000.0, 1, 64));
/// gain.set_target_gain_db(-6.0);
/// gain.reset();
///
/// let mut block = AudioBlock::from_channels(vec![vec![1.0; 64]]);
/// gain.process(&mut block);
/// assert!((block.channel(0)[63] - 0.501).abs() < 1e-3);
/// ```
#[derive(Debug, Clone)]
pub struct GainStage {
    gain: LinearRamp,
    gain_db: f32,
    spec: Option<ProcessSpec>,
}

impl Default for GainStage {
    fn default() -> Self {
        Self::new()
    }
}

impl GainStage {
    /// Unity gain with the default 50 ms ramp.
    pub fn new() -> Self {
        Self::with_ramp_time_ms(DEFAULT_RAMP_MS)
    }

    /// Unity gain with a custom ramp duration.
    pub fn with_ramp_time_ms(ramp_time_ms: f32) -> Self {
        let mut gain = LinearRamp::new(1.0);
        gain.set_ramp_time_ms(ramp_time_ms);
        Self {
            gain,
            gain_db: 0.0,
            spec: None,
        }
    }

    /// Sets the gain to ramp toward.
    ///
    /// Re-setting the current target does not restart the ramp. Non-finite
    /// values are ignored.
    pub fn set_target_gain_db(&mut self, gain_db: f32) {
        if !gain_db.is_finite() || gain_db == self.gain_db {
            return;
        }
        self.gain_db = gain_db;
        self.gain.set_target(db_to_linear(gain_db));
    }

    /// Target gain in dB.
    pub fn target_gain_db(&self) -> f32 {
        self.gain_db
    }

    /// Linear gain the next sample would start from.
    pub fn current_gain(&self) -> f32 {
        self.gain.get()
    }

    /// Largest per-sample gain change of the ramp in flight.
    pub fn max_step(&self) -> f32 {
        self.gain.step()
    }
}

impl Processor for GainStage {
    fn prepare(&mut self, spec: ProcessSpec) {
        self.gain.set_sample_rate(spec.sample_rate);
        self.gain.snap_to_target();
        self.spec = Some(spec);
    }

    fn process(&mut self, block: &mut AudioBlock) {
        let Some(spec) = self.spec else {
            panic!("GainStage::process called before prepare");
        };
        spec.assert_accepts(block);

        if self.gain.is_settled() {
            let gain = self.gain.get();
            if gain != 1.0 {
                for channel in block.channels_mut() {
                    for sample in channel.iter_mut() {
                        *sample *= gain;
                    }
                }
            }
            return;
        }

        for i in 0..block.num_samples() {
            let gain = self.gain.advance();
            for ch in 0..block.num_channels() {
                block.channel_mut(ch)[i] *= gain;
            }
        }
    }

    fn reset(&mut self) {
        self.gain.snap_to_target();
    }
}
