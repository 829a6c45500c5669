//! Fixed-capacity multi-channel audio buffer.
//!
//! An [`AudioBlock`] is allocated once (at prepare time) with a channel count
//! and a maximum block size. The real-time path only changes how many of
//! those samples are in use via [`AudioBlock::set_num_samples`]; it never
//! reallocates.

#[cfg(not(feature = "std"))]
use alloc::vec;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// A planar (one `Vec` per channel) audio buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBlock {
    channels: Vec<Vec<f32>>,
    num_samples: usize,
}

impl AudioBlock {
    /// Creates a zeroed block with `num_channels` channels of `capacity`
    /// samples each. All samples are in use initially.
    pub fn new(num_channels: usize, capacity: usize) -> Self {
        Self {
            channels: vec![vec![0.0; capacity]; num_channels],
            num_samples: capacity,
        }
    }

    /// Builds a block from per-channel sample vectors.
    ///
    /// # Panics
    ///
    /// Panics if the channels differ in length.
    pub fn from_channels(channels: Vec<Vec<f32>>) -> Self {
        let num_samples = channels.first().map_or(0, Vec::len);
        assert!(
            channels.iter().all(|c| c.len() == num_samples),
            "all channels must have the same length"
        );
        Self {
            channels,
            num_samples,
        }
    }

    /// Deinterleaves `frames` of `num_channels` samples into a new block.
    ///
    /// A trailing partial frame is dropped.
    pub fn from_interleaved(samples: &[f32], num_channels: usize) -> Self {
        assert!(num_channels > 0, "need at least one channel");
        let frames = samples.len() / num_channels;
        let mut block = Self::new(num_channels, frames);
        for (frame, chunk) in samples.chunks_exact(num_channels).enumerate() {
            for (ch, &s) in chunk.iter().enumerate() {
                block.channels[ch][frame] = s;
            }
        }
        block
    }

    /// Interleaves the samples in use.
    pub fn to_interleaved(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.num_samples * self.channels.len());
        for i in 0..self.num_samples {
            for channel in &self.channels {
                out.push(channel[i]);
            }
        }
        out
    }

    /// Number of channels.
    #[inline]
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Number of samples per channel currently in use.
    #[inline]
    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    /// Allocated samples per channel.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    /// Changes how many samples are in use without reallocating.
    ///
    /// # Panics
    ///
    /// Panics if `num_samples` exceeds [`capacity`](Self::capacity).
    #[inline]
    pub fn set_num_samples(&mut self, num_samples: usize) {
        assert!(
            num_samples <= self.capacity(),
            "block of {num_samples} samples exceeds capacity {}",
            self.capacity()
        );
        self.num_samples = num_samples;
    }

    /// Samples in use for one channel.
    #[inline]
    pub fn channel(&self, index: usize) -> &[f32] {
        &self.channels[index][..self.num_samples]
    }

    /// Mutable samples in use for one channel.
    #[inline]
    pub fn channel_mut(&mut self, index: usize) -> &mut [f32] {
        let n = self.num_samples;
        &mut self.channels[index][..n]
    }

    /// Iterates over the in-use slice of every channel.
    pub fn channels(&self) -> impl Iterator<Item = &[f32]> {
        let n = self.num_samples;
        self.channels.iter().map(move |c| &c[..n])
    }

    /// Iterates mutably over the in-use slice of every channel.
    pub fn channels_mut(&mut self) -> impl Iterator<Item = &mut [f32]> {
        let n = self.num_samples;
        self.channels.iter_mut().map(move |c| &mut c[..n])
    }

    /// Zeroes the samples in use.
    pub fn clear(&mut self) {
        for channel in self.channels_mut() {
            channel.fill(0.0);
        }
    }

    /// Copies `other` into this block and adopts its length.
    ///
    /// # Panics
    ///
    /// Panics on a channel-count mismatch or if `other` is longer than this
    /// block's capacity.
    pub fn copy_from(&mut self, other: &AudioBlock) {
        assert_eq!(
            self.num_channels(),
            other.num_channels(),
            "channel count mismatch"
        );
        self.set_num_samples(other.num_samples);
        for (dst, src) in self.channels_mut().zip(other.channels()) {
            dst.copy_from_slice(src);
        }
    }

    /// Adds `other` sample-by-sample into this block (mix/accumulate).
    ///
    /// # Panics
    ///
    /// Panics if the shapes differ.
    pub fn accumulate_from(&mut self, other: &AudioBlock) {
        assert_eq!(
            self.num_channels(),
            other.num_channels(),
            "channel count mismatch"
        );
        assert_eq!(self.num_samples, other.num_samples, "block length mismatch");
        for (dst, src) in self.channels_mut().zip(other.channels()) {
            for (d, s) in dst.iter_mut().zip(src) {
                *d += *s;
            }
        }
    }

    /// Largest absolute sample value in use.
    pub fn peak(&self) -> f32 {
        self.channels()
            .flat_map(|c| c.iter())
            .fold(0.0f32, |acc, s| acc.max(s.abs()))
    }
}
