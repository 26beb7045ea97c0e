// Sequencer module - take capture and timed replay

pub mod clock;
pub mod note;
pub mod player;
pub mod recorder;

pub use clock::{Clock, SystemClock, VirtualClock};
pub use note::{NoteEvent, Recording};
pub use player::{PlaybackReport, PlaybackScheduler, PlaybackTarget};
pub use recorder::{RecordingSession, RecordingState};
