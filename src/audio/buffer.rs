// Decoded audio buffers, shared between the sound bank and the output stream

use std::sync::Arc;

/// Interleaved f32 PCM ready to be triggered
///
/// Cloning is cheap: the sample data is reference counted.
#[derive(Debug, Clone)]
pub struct PlayableBuffer {
    samples: Arc<[f32]>,
    sample_rate: u32,
    channels: u16,
}

impl PlayableBuffer {
    pub fn new(samples: Vec<f32>, sample_rate: u32, channels: u16) -> Self {
        Self {
            samples: samples.into(),
            sample_rate: sample_rate.max(1),
            channels: channels.max(1),
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Number of frames (one sample per channel)
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    /// Length of the sound in seconds
    pub fn duration_secs(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }

    /// Sample of `channel` at `frame`, silence past the end
    ///
    /// Channels beyond the buffer's own count wrap around, so a mono buffer
    /// feeds every output channel.
    #[inline]
    pub fn sample(&self, frame: usize, channel: usize) -> f32 {
        let channels = self.channels as usize;
        self.samples
            .get(frame * channels + channel % channels)
            .copied()
            .unwrap_or(0.0)
    }
}
