// Control surface - what the piano core needs from a display

use crate::keyboard::keymap::NoteId;

/// Enabled state of the transport buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlState {
    pub record: bool,
    pub stop: bool,
    pub play: bool,
}

impl ControlState {
    /// Nothing running: record and play available
    pub const IDLE: ControlState = ControlState {
        record: true,
        stop: false,
        play: true,
    };

    /// A take is being captured: only stop is available
    pub const RECORDING: ControlState = ControlState {
        record: false,
        stop: true,
        play: false,
    };

    /// A recording is being replayed: everything is locked
    pub const PLAYING: ControlState = ControlState {
        record: false,
        stop: false,
        play: false,
    };
}

impl Default for ControlState {
    fn default() -> Self {
        Self::IDLE
    }
}

/// Display and button collaborator
///
/// Implementations must not block; they are called from the trigger path.
pub trait ControlSurface {
    /// The octave selector moved to `octave`
    fn octave_changed(&mut self, octave: u8);

    fn set_controls(&mut self, controls: ControlState);

    /// A note was triggered: mark its key active (with a short "pressed" flash)
    fn note_pressed(&mut self, note: &NoteId);

    /// Clear the active mark of a key
    fn note_released(&mut self, note: &NoteId);

    /// Called regularly by the front-end loop to expire timed feedback
    fn tick(&mut self) {}
}

/// Surface that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSurface;

impl ControlSurface for NullSurface {
    fn octave_changed(&mut self, _octave: u8) {}
    fn set_controls(&mut self, _controls: ControlState) {}
    fn note_pressed(&mut self, _note: &NoteId) {}
    fn note_released(&mut self, _note: &NoteId) {}
}

/// Surface that reports through the log, used by headless commands
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSurface;

impl ControlSurface for LogSurface {
    fn octave_changed(&mut self, octave: u8) {
        log::info!("Octave: {}", octave);
    }

    fn set_controls(&mut self, controls: ControlState) {
        log::debug!(
            "Controls: record={} stop={} play={}",
            controls.record,
            controls.stop,
            controls.play
        );
    }

    fn note_pressed(&mut self, note: &NoteId) {
        log::info!("Note {}", note);
    }

    fn note_released(&mut self, _note: &NoteId) {}
}
