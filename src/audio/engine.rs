// Audio engine - cpal output stream mixing triggered buffers
//
// The engine is the process-wide audio context: create it once at startup
// with `CpalBackend::init`, hand it to the piano, and drop it at teardown
// once a `stop_all` has had one callback to take effect. The stream
// callback owns the consumer side of a ring buffer; `trigger` only pushes
// a command and never blocks.
//
// Note: on macOS (CoreAudio) the Stream is not Send, so the backend must stay
// on the thread that created it.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, FromSample, Sample, SampleFormat, SizedSample, Stream, StreamConfig};

use crate::audio::backend::{AudioBackend, AudioError};
use crate::audio::buffer::PlayableBuffer;
use crate::audio::decoder::decode_audio;
use crate::audio::voice::BufferVoice;
use crate::messaging::channels::{
    AudioCommandConsumer, AudioCommandProducer, create_audio_channel,
};
use crate::messaging::command::AudioCommand;

/// Maximum simultaneous voices; the oldest is stolen beyond this
pub const MAX_VOICES: usize = 64;

pub struct CpalBackend {
    _device: Device,
    _stream: Stream,
    sample_rate: u32,
    command_tx: AudioCommandProducer,
}

impl CpalBackend {
    /// Open the default output device and start the stream
    pub fn init(volume: f32, command_capacity: usize) -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(AudioError::NoDevice)?;

        log::info!(
            "Audio device: {}",
            device.name().unwrap_or_else(|_| "Unknown".to_string())
        );

        let supported_config = device.default_output_config()?;
        let sample_format = supported_config.sample_format();
        log::debug!("Audio config: {:?}", supported_config);

        let sample_rate = supported_config.sample_rate().0;
        let channels = supported_config.channels() as usize;
        let config: StreamConfig = supported_config.into();

        let (command_tx, command_rx) = create_audio_channel(command_capacity);
        let volume = volume.clamp(0.0, 1.0);

        let stream = match sample_format {
            SampleFormat::F32 => {
                Self::build_stream::<f32>(&device, &config, channels, sample_rate, volume, command_rx)
            }
            SampleFormat::I16 => {
                Self::build_stream::<i16>(&device, &config, channels, sample_rate, volume, command_rx)
            }
            SampleFormat::U16 => {
                Self::build_stream::<u16>(&device, &config, channels, sample_rate, volume, command_rx)
            }
            other => return Err(AudioError::UnsupportedFormat(other)),
        }?;

        stream.play()?;

        log::info!("Audio engine started: {} Hz, {} channels", sample_rate, channels);

        Ok(Self {
            _device: device,
            _stream: stream,
            sample_rate,
            command_tx,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn build_stream<T>(
        device: &Device,
        config: &StreamConfig,
        channels: usize,
        sample_rate: u32,
        volume: f32,
        mut command_rx: AudioCommandConsumer,
    ) -> Result<Stream, AudioError>
    where
        T: SizedSample + FromSample<f32> + Send + 'static,
    {
        // Pre-allocated so the callback never grows it
        let mut voices: Vec<BufferVoice> = Vec::with_capacity(MAX_VOICES);

        let stream = device.build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                // No allocations, no I/O, no blocking locks

                while let Some(cmd) = ringbuf::traits::Consumer::try_pop(&mut command_rx) {
                    match cmd {
                        AudioCommand::Play(buffer) => {
                            if voices.len() == MAX_VOICES {
                                voices.remove(0);
                            }
                            voices.push(BufferVoice::new(buffer, sample_rate));
                        }
                        AudioCommand::StopAll => voices.clear(),
                    }
                }

                for frame in data.chunks_mut(channels) {
                    for (channel, out) in frame.iter_mut().enumerate() {
                        let mixed: f32 = voices.iter().map(|v| v.sample(channel)).sum();
                        *out = T::from_sample(soft_clip(mixed * volume));
                    }
                    for voice in voices.iter_mut() {
                        voice.advance();
                    }
                }

                voices.retain(BufferVoice::is_active);
            },
            move |err| {
                // Runs outside the audio callback, I/O is fine here
                log::error!("Audio stream error: {}", err);
            },
            None,
        )?;

        Ok(stream)
    }
}

impl AudioBackend for CpalBackend {
    fn decode(&mut self, bytes: Vec<u8>) -> Result<PlayableBuffer, AudioError> {
        decode_audio(bytes)
    }

    fn trigger(&mut self, buffer: &PlayableBuffer) {
        let cmd = AudioCommand::Play(buffer.clone());
        if ringbuf::traits::Producer::try_push(&mut self.command_tx, cmd).is_err() {
            log::warn!("Audio command buffer full, note dropped");
        }
    }

    fn stop_all(&mut self) {
        let cmd = AudioCommand::StopAll;
        if ringbuf::traits::Producer::try_push(&mut self.command_tx, cmd).is_err() {
            log::warn!("Audio command buffer full, stop dropped");
        }
    }
}

/// Soft saturation, keeps summed voices inside [-1, 1]
#[inline]
fn soft_clip(x: f32) -> f32 {
    x.tanh()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_soft_clip_bounds() {
        assert_eq!(soft_clip(0.0), 0.0);
        assert!(soft_clip(10.0) <= 1.0);
        assert!(soft_clip(-10.0) >= -1.0);
        assert!(soft_clip(0.1) > 0.09);
    }
}
