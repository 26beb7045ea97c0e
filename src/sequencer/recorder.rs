// Recording session - captures triggered notes with their onset offsets

use crate::keyboard::keymap::NoteId;
use crate::sequencer::clock::Clock;
use crate::sequencer::note::{NoteEvent, Recording};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordingState {
    #[default]
    Idle,
    Recording,
}

/// Idle -> Recording -> Idle state machine around one take buffer
///
/// The buffer of the last take stays available after `stop_recording` and is
/// only replaced by the next `start_recording` or by `replace`.
pub struct RecordingSession {
    state: RecordingState,
    buffer: Recording,
    start: Duration,
    clock: Arc<dyn Clock>,
}

impl RecordingSession {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: RecordingState::Idle,
            buffer: Recording::new(),
            start: Duration::ZERO,
            clock,
        }
    }

    pub fn state(&self) -> RecordingState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state == RecordingState::Recording
    }

    /// Begin a new take
    ///
    /// Valid from any state. Calling it while already recording throws the
    /// current take away and restarts timing from zero.
    pub fn start_recording(&mut self) {
        if self.is_recording() {
            log::debug!(
                "Recording restarted, {} captured notes discarded",
                self.buffer.len()
            );
        }
        self.buffer = Recording::new();
        self.start = self.clock.now();
        self.state = RecordingState::Recording;
    }

    /// Capture a trigger; ignored unless recording. Returns true if captured
    pub fn on_note_triggered(&mut self, note: &NoteId, duration: f64) -> bool {
        if !self.is_recording() {
            return false;
        }

        let onset = self.clock.now().saturating_sub(self.start);
        self.buffer
            .push(NoteEvent::new(note.clone(), onset.as_millis() as u64, duration));
        true
    }

    pub fn stop_recording(&mut self) {
        self.state = RecordingState::Idle;
    }

    /// The take in progress, or the last completed one
    pub fn recording(&self) -> &Recording {
        &self.buffer
    }

    /// Install a take from elsewhere (e.g. a loaded file); ends any capture
    pub fn replace(&mut self, recording: Recording) {
        self.buffer = recording;
        self.state = RecordingState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencer::clock::VirtualClock;

    fn note(name: &str) -> NoteId {
        NoteId::parse(name).unwrap()
    }

    fn session() -> (RecordingSession, VirtualClock) {
        let clock = VirtualClock::new();
        (RecordingSession::new(Arc::new(clock.clone())), clock)
    }

    #[test]
    fn test_basic_recording() {
        let (mut session, clock) = session();
        clock.advance(Duration::from_millis(1000));

        session.start_recording();
        clock.advance(Duration::from_millis(120));
        assert!(session.on_note_triggered(&note("C4"), 1.5));
        clock.advance(Duration::from_millis(80));
        assert!(session.on_note_triggered(&note("E4"), 1.2));
        session.stop_recording();

        let events = session.recording().events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], NoteEvent::new(note("C4"), 120, 1.5));
        assert_eq!(events[1], NoteEvent::new(note("E4"), 200, 1.2));
    }

    #[test]
    fn test_idle_ignores_notes() {
        let (mut session, _clock) = session();
        assert!(!session.on_note_triggered(&note("C4"), 1.0));
        assert!(session.recording().is_empty());
        assert_eq!(session.state(), RecordingState::Idle);
    }

    #[test]
    fn test_stop_keeps_last_take() {
        let (mut session, clock) = session();
        session.start_recording();
        session.on_note_triggered(&note("A4"), 1.0);
        session.stop_recording();

        clock.advance(Duration::from_millis(500));
        assert!(!session.on_note_triggered(&note("B4"), 1.0));

        assert_eq!(session.recording().len(), 1);
        assert!(!session.is_recording());
    }

    #[test]
    fn test_restart_discards_take() {
        let (mut session, clock) = session();
        session.start_recording();
        clock.advance(Duration::from_millis(300));
        session.on_note_triggered(&note("C4"), 1.0);

        session.start_recording();
        clock.advance(Duration::from_millis(50));
        session.on_note_triggered(&note("D4"), 1.0);

        let events = session.recording().events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].note, note("D4"));
        assert_eq!(events[0].onset_offset_ms, 50);
    }

    #[test]
    fn test_replace_ends_capture() {
        let (mut session, _clock) = session();
        session.start_recording();

        let loaded = Recording::from_events(vec![NoteEvent::new(note("G2"), 10, 0.5)]);
        session.replace(loaded.clone());

        assert_eq!(session.recording(), &loaded);
        assert_eq!(session.state(), RecordingState::Idle);
    }
}
