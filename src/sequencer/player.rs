// Playback scheduler - replays a recorded take through the live trigger path

use crate::keyboard::keymap::NoteId;
use crate::sequencer::clock::Clock;
use crate::sequencer::note::Recording;
use crate::ui::surface::ControlState;
use std::sync::Arc;
use std::time::Duration;

/// Whatever replayed notes are sent to
pub trait PlaybackTarget {
    fn set_controls(&mut self, controls: ControlState);

    /// Trigger `note` exactly like a live key press. Returns false if the
    /// note could not be played
    fn trigger(&mut self, note: &NoteId) -> bool;
}

/// Outcome of one replay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaybackReport {
    /// Events that produced sound
    pub triggered: usize,
    /// Events whose note could not be played
    pub skipped: usize,
    /// Time the controls stayed locked
    pub elapsed: Duration,
}

/// Sequential replay driven by an injected clock
///
/// Before each event the scheduler waits that event's full onset offset,
/// measured from the previous trigger rather than from the start. A replay
/// therefore lasts the sum of all onsets plus the last sound, which is
/// slower than the take as played.
///
/// One playback at a time, no cancellation: `play` returns when done.
pub struct PlaybackScheduler {
    clock: Arc<dyn Clock>,
}

impl PlaybackScheduler {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    pub fn play(&self, recording: &Recording, target: &mut dyn PlaybackTarget) -> PlaybackReport {
        let Some(last) = recording.last() else {
            log::debug!("Nothing to play");
            return PlaybackReport::default();
        };

        let started = self.clock.now();
        let mut report = PlaybackReport::default();

        target.set_controls(ControlState::PLAYING);
        log::info!("Playing {} notes", recording.len());

        for event in recording {
            self.clock.sleep(event.onset());
            if target.trigger(&event.note) {
                report.triggered += 1;
            } else {
                report.skipped += 1;
            }
        }

        // Let the last note ring out; there is no completion signal to wait on
        self.clock.sleep(last.sound_duration());
        target.set_controls(ControlState::IDLE);

        report.elapsed = self.clock.now().saturating_sub(started);
        log::info!(
            "Playback finished: {} played, {} skipped, {:?}",
            report.triggered,
            report.skipped,
            report.elapsed
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencer::clock::VirtualClock;
    use crate::sequencer::note::NoteEvent;

    #[derive(Default)]
    struct Probe {
        clock: VirtualClock,
        triggers: Vec<(String, u64)>,
        controls: Vec<(ControlState, u64)>,
        missing: Vec<String>,
    }

    impl PlaybackTarget for Probe {
        fn set_controls(&mut self, controls: ControlState) {
            self.controls.push((controls, self.clock.now_ms()));
        }

        fn trigger(&mut self, note: &NoteId) -> bool {
            if self.missing.iter().any(|m| m == note.as_str()) {
                return false;
            }
            self.triggers
                .push((note.to_string(), self.clock.now_ms()));
            true
        }
    }

    fn event(name: &str, onset: u64, duration: f64) -> NoteEvent {
        NoteEvent::new(NoteId::parse(name).unwrap(), onset, duration)
    }

    #[test]
    fn test_sequencer_player_waits_cumulatively() {
        let clock = VirtualClock::new();
        let scheduler = PlaybackScheduler::new(Arc::new(clock.clone()));
        let mut probe = Probe {
            clock: clock.clone(),
            ..Default::default()
        };

        let recording = Recording::from_events(vec![
            event("C4", 200, 1.0),
            event("D4", 500, 0.8),
        ]);

        let report = scheduler.play(&recording, &mut probe);

        assert_eq!(
            probe.triggers,
            vec![("C4".to_string(), 200), ("D4".to_string(), 700)]
        );
        assert_eq!(
            probe.controls,
            vec![(ControlState::PLAYING, 0), (ControlState::IDLE, 1500)]
        );
        assert_eq!(report.triggered, 2);
        assert_eq!(report.elapsed, Duration::from_millis(1500));
        assert_eq!(report.elapsed, recording.replay_duration());
    }

    #[test]
    fn test_empty_recording_is_noop() {
        let clock = VirtualClock::new();
        let scheduler = PlaybackScheduler::new(Arc::new(clock.clone()));
        let mut probe = Probe::default();

        let report = scheduler.play(&Recording::new(), &mut probe);

        assert_eq!(report, PlaybackReport::default());
        assert!(probe.triggers.is_empty());
        assert!(probe.controls.is_empty());
        assert_eq!(clock.now(), Duration::ZERO);
    }

    #[test]
    fn test_unplayable_notes_still_wait() {
        let clock = VirtualClock::new();
        let scheduler = PlaybackScheduler::new(Arc::new(clock.clone()));
        let mut probe = Probe {
            clock: clock.clone(),
            missing: vec!["C9".to_string()],
            ..Default::default()
        };

        let recording = Recording::from_events(vec![
            event("C9", 100, 0.5),
            event("E4", 100, 0.5),
        ]);

        let report = scheduler.play(&recording, &mut probe);

        assert_eq!(report.triggered, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(probe.triggers, vec![("E4".to_string(), 200)]);
        assert_eq!(report.elapsed, Duration::from_millis(700));
    }

    #[test]
    fn test_capture_order_is_kept() {
        // Loaded takes are not re-sorted
        let clock = VirtualClock::new();
        let scheduler = PlaybackScheduler::new(Arc::new(clock.clone()));
        let mut probe = Probe {
            clock: clock.clone(),
            ..Default::default()
        };

        let recording = Recording::from_events(vec![
            event("G4", 300, 0.1),
            event("A4", 0, 0.1),
            event("B4", 10, 0.1),
        ]);
        scheduler.play(&recording, &mut probe);

        let order: Vec<&str> = probe.triggers.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(order, vec!["G4", "A4", "B4"]);
    }
}
