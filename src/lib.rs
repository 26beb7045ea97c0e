// Piano Keys - Library exports for the binary, tests and benchmarks

pub mod audio;
pub mod config;
pub mod keyboard;
pub mod messaging;
pub mod piano;
pub mod project;
pub mod sampler;
pub mod sequencer;
pub mod ui;

// Re-export commonly used types for convenience
pub use audio::{AudioBackend, AudioError, CpalBackend, PlayableBuffer, SilentBackend};
pub use config::{ConfigError, PianoConfig};
pub use keyboard::{InputDispatcher, InputEvent, KeyMap, NoteAction, NoteId, OctaveController, generate};
pub use messaging::{Command, create_command_channel};
pub use piano::Piano;
pub use project::{PersistenceError, load_recording, save_recording};
pub use sampler::{DirectorySoundStore, LoadReport, SoundBank, SoundStore};
pub use sequencer::{
    Clock, NoteEvent, PlaybackReport, PlaybackScheduler, Recording, RecordingSession,
    RecordingState, SystemClock, VirtualClock,
};
pub use ui::{ControlState, ControlSurface};
