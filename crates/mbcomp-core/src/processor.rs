//! Block processor lifecycle.
//!
//! Every stage of the multiband chain follows the same three-call contract:
//!
//! - [`Processor::prepare`] - called off the audio thread whenever sample
//!   rate, channel count or maximum block size change. The only place
//!   state may be allocated.
//! - [`Processor::process`] - called on the audio thread once per block.
//!   Must not allocate, lock or block.
//! - [`Processor::reset`] - clears running state (filter memories,
//!   envelopes) without touching settings.
//!
//! ## Design Decisions
//!
//! - **Planar, in-place**: stages mutate an [`AudioBlock`] in place; the
//!   caller owns the buffer.
//! - **Object-safe**: `dyn Processor` works, though the pipeline uses
//!   concrete types.

use crate::AudioBlock;

/// Stream configuration handed to [`Processor::prepare`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessSpec {
    /// Sample rate in Hz.
    pub sample_rate: f32,
    /// Number of channels every processed block will carry.
    pub num_channels: usize,
    /// Largest block (samples per channel) `process` will ever see.
    pub max_block_size: usize,
}

impl ProcessSpec {
    /// Builds a spec.
    pub const fn new(sample_rate: f32, num_channels: usize, max_block_size: usize) -> Self {
        Self {
            sample_rate,
            num_channels,
            max_block_size,
        }
    }

    /// Fatal precondition check shared by every processor: the block must
    /// match the prepared channel count and fit the prepared block size.
    ///
    /// # Panics
    ///
    /// Panics on either mismatch. There is no recovery path inside a
    /// real-time callback.
    #[inline]
    pub fn assert_accepts(&self, block: &AudioBlock) {
        assert_eq!(
            block.num_channels(),
            self.num_channels,
            "block has {} channels, prepared for {}",
            block.num_channels(),
            self.num_channels
        );
        assert!(
            block.num_samples() <= self.max_block_size,
            "block of {} samples exceeds prepared maximum {}",
            block.num_samples(),
            self.max_block_size
        );
    }
}

/// Core trait for in-place block processors.
///
/// # Example
///
/// ```rust
/// use mbcomp_core::{AudioBlock, ProcessSpec, Processor};
///
/// struct Invert;
///
/// impl Processor for Invert {
///     fn prepare(&mut self, _spec: ProcessSpec) {}
///
///     fn process(&mut self, block: &mut AudioBlock) {
///         for channel in block.channels_mut() {
///             for s in channel.iter_mut() {
///                 *s = -*s;
///             }
///         }
///     }
///
///     fn reset(&mut self) {}
/// }
///
/// let mut block = AudioBlock::from_channels(vec![vec![1.0, -0.5]]);
/// Invert.process(&mut block);
/// assert_eq!(block.channel(0), &[-1.0, 0.5]);
/// ```
pub trait Processor {
    /// Allocate and reset state for a new stream configuration.
    fn prepare(&mut self, spec: ProcessSpec);

    /// Process one block in place.
    fn process(&mut self, block: &mut AudioBlock);

    /// Clear running state without changing settings.
    fn reset(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_matching_and_shorter_blocks() {
        let spec = ProcessSpec::new(48000.0, 2, 256);
        spec.assert_accepts(&AudioBlock::new(2, 256));
        spec.assert_accepts(&AudioBlock::new(2, 17));
    }

    #[test]
    #[should_panic(expected = "channels")]
    fn rejects_channel_mismatch() {
        ProcessSpec::new(48000.0, 2, 256).assert_accepts(&AudioBlock::new(1, 256));
    }

    #[test]
    #[should_panic(expected = "exceeds prepared maximum")]
    fn rejects_oversized_block() {
        ProcessSpec::new(48000.0, 2, 256).assert_accepts(&AudioBlock::new(2, 512));
    }
}
