// Recording and replay timing, driven by a virtual clock

use piano_keys::keyboard::NoteId;
use piano_keys::sequencer::{
    Clock, NoteEvent, PlaybackScheduler, PlaybackTarget, Recording, RecordingSession,
    VirtualClock,
};
use piano_keys::ui::ControlState;
use std::sync::Arc;
use std::time::Duration;

fn note(name: &str) -> NoteId {
    NoteId::parse(name).unwrap()
}

/// Timeline of everything the scheduler did, in virtual milliseconds
struct Timeline {
    clock: VirtualClock,
    entries: Vec<(u64, String)>,
}

impl Timeline {
    fn new(clock: &VirtualClock) -> Self {
        Self {
            clock: clock.clone(),
            entries: Vec::new(),
        }
    }
}

impl PlaybackTarget for Timeline {
    fn set_controls(&mut self, controls: ControlState) {
        let label = if controls == ControlState::PLAYING {
            "locked"
        } else {
            "unlocked"
        };
        self.entries.push((self.clock.now_ms(), label.to_string()));
    }

    fn trigger(&mut self, note: &NoteId) -> bool {
        self.entries.push((self.clock.now_ms(), note.to_string()));
        true
    }
}

#[test]
fn test_replay_waits_absolute_onsets() {
    let clock = VirtualClock::new();
    let scheduler = PlaybackScheduler::new(Arc::new(clock.clone()));
    let mut timeline = Timeline::new(&clock);

    let recording = Recording::from_events(vec![
        NoteEvent::new(note("C4"), 200, 1.0),
        NoteEvent::new(note("D4"), 500, 0.8),
    ]);
    scheduler.play(&recording, &mut timeline);

    assert_eq!(
        timeline.entries,
        vec![
            (0, "locked".to_string()),
            (200, "C4".to_string()),
            (700, "D4".to_string()),
            (1500, "unlocked".to_string()),
        ]
    );
}

#[test]
fn test_replay_is_slower_than_take() {
    let clock = VirtualClock::new();
    let mut session = RecordingSession::new(Arc::new(clock.clone()));

    session.start_recording();
    for (name, gap) in [("E4", 100), ("F4", 100), ("G4", 100), ("A4", 100)] {
        clock.advance(Duration::from_millis(gap));
        session.on_note_triggered(&note(name), 0.5);
    }
    session.stop_recording();

    let recording = session.recording().clone();
    assert_eq!(recording.take_duration(), Duration::from_millis(900));
    // 100 + 200 + 300 + 400, then the 0.5 s tail
    assert_eq!(recording.replay_duration(), Duration::from_millis(1500));

    let scheduler = PlaybackScheduler::new(Arc::new(clock.clone()));
    let mut timeline = Timeline::new(&clock);
    let start = clock.now();
    let report = scheduler.play(&recording, &mut timeline);

    assert_eq!(report.triggered, 4);
    assert_eq!(clock.now() - start, recording.replay_duration());
    assert_eq!(report.elapsed, recording.replay_duration());
}

#[test]
fn test_zero_duration_tail() {
    let clock = VirtualClock::new();
    let scheduler = PlaybackScheduler::new(Arc::new(clock.clone()));
    let mut timeline = Timeline::new(&clock);

    let recording = Recording::from_events(vec![NoteEvent::new(note("A0"), 0, 0.0)]);
    let report = scheduler.play(&recording, &mut timeline);

    assert_eq!(report.elapsed, Duration::ZERO);
    assert_eq!(
        timeline.entries,
        vec![
            (0, "locked".to_string()),
            (0, "A0".to_string()),
            (0, "unlocked".to_string()),
        ]
    );
}
