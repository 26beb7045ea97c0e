// Keyboard module - key map generation, octave selection and input routing

pub mod dispatcher;
pub mod keymap;
pub mod octave;

pub use dispatcher::{InputDispatcher, InputEvent, NoteAction};
pub use keymap::{KEYMAP_SIZE, KeyMap, NoteId, PitchClass, generate};
pub use octave::{DEFAULT_OCTAVE, MAX_OCTAVE, MIN_OCTAVE, OctaveController};
