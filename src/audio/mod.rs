// Audio module - decoding, the backend capability and the cpal output engine

pub mod backend;
pub mod buffer;
pub mod decoder;
pub mod engine;
pub mod voice;

pub use backend::{AudioBackend, AudioError, SilentBackend};
pub use buffer::PlayableBuffer;
pub use decoder::decode_audio;
pub use engine::CpalBackend;
