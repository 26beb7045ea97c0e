// Piano - composition root wiring the keyboard, the sequencer and the audio path

use crate::audio::backend::AudioBackend;
use crate::keyboard::dispatcher::{InputDispatcher, InputEvent, NoteAction};
use crate::keyboard::keymap::{KeyMap, NoteId};
use crate::keyboard::octave::OctaveController;
use crate::messaging::channels::CommandConsumer;
use crate::messaging::command::Command;
use crate::project::{self, PersistenceError};
use crate::sampler::bank::SoundBank;
use crate::sequencer::clock::Clock;
use crate::sequencer::note::Recording;
use crate::sequencer::player::{PlaybackReport, PlaybackScheduler, PlaybackTarget};
use crate::sequencer::recorder::{RecordingSession, RecordingState};
use crate::ui::surface::{ControlState, ControlSurface};
use ringbuf::traits::{Consumer, Observer};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The playable instrument
///
/// Every note, whether it comes from the keyboard, a pointer or a replayed
/// take, goes through [`Piano::play_note`]. A note without a loaded sound is
/// skipped entirely: no feedback, no audio and nothing recorded.
pub struct Piano {
    octaves: OctaveController,
    dispatcher: InputDispatcher,
    session: RecordingSession,
    bank: SoundBank,
    backend: Box<dyn AudioBackend>,
    surface: Box<dyn ControlSurface>,
    clock: Arc<dyn Clock>,
    controls: ControlState,
    recording_path: PathBuf,
}

impl Piano {
    /// Build a piano at the default octave and push the initial state to
    /// the surface
    pub fn new(
        bank: SoundBank,
        backend: Box<dyn AudioBackend>,
        surface: Box<dyn ControlSurface>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let mut piano = Self {
            octaves: OctaveController::new(),
            dispatcher: InputDispatcher::new(),
            session: RecordingSession::new(Arc::clone(&clock)),
            bank,
            backend,
            surface,
            clock,
            controls: ControlState::IDLE,
            recording_path: PathBuf::from("recording.json"),
        };
        piano.surface.octave_changed(piano.octaves.octave());
        piano.surface.set_controls(piano.controls);
        piano
    }

    /// Start at `octave` instead of the default (clamped to 0..=7)
    pub fn with_octave(mut self, octave: u8) -> Self {
        self.octaves = OctaveController::with_octave(octave);
        self.surface.octave_changed(self.octaves.octave());
        self
    }

    /// File used by the save and load commands
    pub fn with_recording_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.recording_path = path.as_ref().to_path_buf();
        self
    }

    pub fn octave(&self) -> u8 {
        self.octaves.octave()
    }

    pub fn keymap(&self) -> Arc<KeyMap> {
        self.octaves.keymap()
    }

    pub fn controls(&self) -> ControlState {
        self.controls
    }

    pub fn recording_state(&self) -> RecordingState {
        self.session.state()
    }

    pub fn recording(&self) -> &Recording {
        self.session.recording()
    }

    pub fn bank(&self) -> &SoundBank {
        &self.bank
    }

    pub fn recording_path(&self) -> &Path {
        &self.recording_path
    }

    /// Route a raw input event. Returns true if a note was triggered
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        let keymap = self.octaves.keymap();
        match self.dispatcher.dispatch(&keymap, event) {
            Some(NoteAction::Press(note)) => self.play_note(&note),
            Some(NoteAction::Release(note)) => {
                self.release_note(&note);
                false
            }
            None => false,
        }
    }

    /// Trigger `note`: visual feedback, audio, then capture if recording
    pub fn play_note(&mut self, note: &NoteId) -> bool {
        let Some(buffer) = self.bank.get(note) else {
            log::debug!("No sound for {}, trigger skipped", note);
            return false;
        };

        self.surface.note_pressed(note);
        self.backend.trigger(buffer);
        self.session.on_note_triggered(note, buffer.duration_secs());
        true
    }

    pub fn release_note(&mut self, note: &NoteId) {
        self.surface.note_released(note);
    }

    pub fn change_octave(&mut self, delta: i32) -> bool {
        self.octaves.change_octave(delta, self.surface.as_mut())
    }

    pub fn start_recording(&mut self) {
        self.session.start_recording();
        self.set_controls(ControlState::RECORDING);
        log::info!("Recording started");
    }

    pub fn stop_recording(&mut self) {
        self.session.stop_recording();
        self.set_controls(ControlState::IDLE);
        log::info!("Recording stopped: {} notes", self.session.recording().len());
    }

    /// Replay the current take; blocks until the last note has rung out
    pub fn play_recording(&mut self) -> PlaybackReport {
        let recording = self.session.recording().clone();
        let scheduler = PlaybackScheduler::new(Arc::clone(&self.clock));
        scheduler.play(&recording, self)
    }

    pub fn save_recording(&self) -> Result<(), PersistenceError> {
        project::save_recording(self.session.recording(), &self.recording_path)
    }

    /// Replace the current take with the saved one. Returns its length
    pub fn load_recording(&mut self) -> Result<usize, PersistenceError> {
        let recording = project::load_recording(&self.recording_path)?;
        let len = recording.len();
        self.session.replace(recording);
        self.set_controls(ControlState::IDLE);
        Ok(len)
    }

    /// Apply one front-end command. Returns false once the piano should quit
    ///
    /// Transport commands follow the enabled state of their button: a
    /// disabled button does nothing.
    pub fn handle_command(&mut self, command: Command) -> bool {
        match command {
            Command::Input(event) => {
                self.handle_input(&event);
            }
            Command::ChangeOctave(delta) => {
                self.change_octave(delta);
            }
            Command::StartRecording if self.controls.record => self.start_recording(),
            Command::StopRecording if self.controls.stop => self.stop_recording(),
            Command::PlayRecording if self.controls.play => {
                self.play_recording();
            }
            Command::StartRecording | Command::StopRecording | Command::PlayRecording => {
                log::debug!("{:?} ignored, button disabled", command);
            }
            Command::SaveRecording => {
                if let Err(e) = self.save_recording() {
                    log::error!("Failed to save recording: {}", e);
                }
            }
            Command::LoadRecording => {
                if let Err(e) = self.load_recording() {
                    log::error!("Failed to load recording: {}", e);
                }
            }
            Command::Quit => return false,
        }
        true
    }

    /// Drain every pending command. Returns false once a quit was requested
    /// or the producer side is gone
    ///
    /// Commands queued while a replay was running are dropped afterwards,
    /// the controls were locked at that time. A queued quit still counts.
    pub fn process_commands(&mut self, rx: &mut CommandConsumer) -> bool {
        // Sampled first so commands pushed right before the close still run
        let closed = !rx.write_is_held();
        while let Some(command) = rx.try_pop() {
            let is_playback = command == Command::PlayRecording;
            if !self.handle_command(command) {
                return false;
            }

            if is_playback {
                let mut dropped = 0;
                let mut quit = false;
                while let Some(pending) = rx.try_pop() {
                    quit |= pending == Command::Quit;
                    dropped += 1;
                }
                if dropped > 0 {
                    log::debug!("{} commands dropped after playback", dropped);
                }
                if quit {
                    return false;
                }
            }
        }

        if closed {
            log::info!("Command producer closed, stopping");
            return false;
        }
        true
    }

    /// Periodic housekeeping for time-based display state
    pub fn tick(&mut self) {
        self.surface.tick();
    }

    /// Silence every sound still ringing
    pub fn stop_all(&mut self) {
        self.backend.stop_all();
    }

    fn set_controls(&mut self, controls: ControlState) {
        self.controls = controls;
        self.surface.set_controls(controls);
    }
}

impl PlaybackTarget for Piano {
    fn set_controls(&mut self, controls: ControlState) {
        Piano::set_controls(self, controls);
    }

    fn trigger(&mut self, note: &NoteId) -> bool {
        self.play_note(note)
    }
}
