// Audio backend capability - decode bytes, trigger buffers

use crate::audio::buffer::PlayableBuffer;
use crate::audio::decoder::decode_audio;

/// Audio error types
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("Decode error: {0}")]
    Decode(#[from] symphonia::core::errors::Error),

    #[error("No decodable audio track")]
    NoTrack,

    #[error("Audio stream contains no samples")]
    Empty,

    #[error("No audio device found")]
    NoDevice,

    #[error("Device configuration error: {0}")]
    DeviceConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("Error in stream creation: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("Error in stream start: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("Unsupported sample format: {0:?}. Supported formats: F32, I16, U16")]
    UnsupportedFormat(cpal::SampleFormat),
}

/// Decoding and fire-and-forget playback
///
/// There is no completion callback: callers that need to wait for a sound
/// to finish estimate it from [`PlayableBuffer::duration_secs`].
pub trait AudioBackend {
    fn decode(&mut self, bytes: Vec<u8>) -> Result<PlayableBuffer, AudioError>;

    /// Start playing `buffer` immediately. Never blocks
    fn trigger(&mut self, buffer: &PlayableBuffer);

    /// Cut every playing sound
    fn stop_all(&mut self) {}
}

/// Backend that decodes real assets but produces no sound
///
/// Used when no output device is available or audio is disabled.
#[derive(Debug, Default)]
pub struct SilentBackend {
    triggered: u64,
}

impl SilentBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of buffers triggered so far
    pub fn triggered(&self) -> u64 {
        self.triggered
    }
}

impl AudioBackend for SilentBackend {
    fn decode(&mut self, bytes: Vec<u8>) -> Result<PlayableBuffer, AudioError> {
        decode_audio(bytes)
    }

    fn trigger(&mut self, buffer: &PlayableBuffer) {
        self.triggered += 1;
        log::trace!("Silent trigger ({:.2}s)", buffer.duration_secs());
    }
}
