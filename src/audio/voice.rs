// Buffer voice - plays one triggered buffer to the end, no envelope, no loop

use crate::audio::buffer::PlayableBuffer;

pub struct BufferVoice {
    buffer: PlayableBuffer,
    position: f64,
    // Source frames per output frame, corrects buffer/device rate mismatch
    rate_step: f64,
    is_active: bool,
}

impl BufferVoice {
    pub fn new(buffer: PlayableBuffer, output_sample_rate: u32) -> Self {
        let rate_step = buffer.sample_rate() as f64 / output_sample_rate.max(1) as f64;
        let is_active = buffer.frames() > 0;
        Self {
            buffer,
            position: 0.0,
            rate_step,
            is_active,
        }
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Linear-interpolated sample for `channel` at the current position
    #[inline]
    pub fn sample(&self, channel: usize) -> f32 {
        if !self.is_active {
            return 0.0;
        }

        let pos_integer = self.position as usize;
        let pos_fractional = self.position.fract() as f32;

        let sample1 = self.buffer.sample(pos_integer, channel);
        let sample2 = self.buffer.sample(pos_integer + 1, channel);

        sample1 + (sample2 - sample1) * pos_fractional
    }

    /// Move to the next output frame
    #[inline]
    pub fn advance(&mut self) {
        if !self.is_active {
            return;
        }
        self.position += self.rate_step;
        if self.position >= self.buffer.frames() as f64 {
            self.is_active = false;
        }
    }
}
