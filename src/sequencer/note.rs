// Recorded notes - a take is an ordered list of note triggers with onsets

use crate::keyboard::keymap::NoteId;
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;

/// One captured note trigger
///
/// Serialized as `{ "note", "time", "duration" }`, the layout of saved takes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    pub note: NoteId,

    /// Milliseconds from the start of the recording to the trigger
    #[serde(rename = "time")]
    pub onset_offset_ms: u64,

    /// Length of the triggered sound, in seconds
    #[serde(deserialize_with = "finite_seconds")]
    pub duration: f64,
}

/// Rejects NaN and infinities, which JSON cannot represent
fn finite_seconds<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let secs = f64::deserialize(deserializer)?;
    if secs.is_finite() {
        Ok(secs)
    } else {
        Err(serde::de::Error::custom(format!(
            "duration must be a finite number of seconds, got {}",
            secs
        )))
    }
}

impl NoteEvent {
    pub fn new(note: NoteId, onset_offset_ms: u64, duration: f64) -> Self {
        Self {
            note,
            onset_offset_ms,
            duration,
        }
    }

    pub fn onset(&self) -> Duration {
        Duration::from_millis(self.onset_offset_ms)
    }

    /// Sound length as a `Duration`; negative or non-finite values give zero
    pub fn sound_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.duration).unwrap_or(Duration::ZERO)
    }
}

/// Ordered capture of note triggers
///
/// Events are kept in capture order, so onsets are non-decreasing for takes
/// produced by a recording session. Loaded takes are kept as they are.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Recording {
    events: Vec<NoteEvent>,
}

impl Recording {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_events(events: Vec<NoteEvent>) -> Self {
        Self { events }
    }

    pub(crate) fn push(&mut self, event: NoteEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[NoteEvent] {
        &self.events
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NoteEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn last(&self) -> Option<&NoteEvent> {
        self.events.last()
    }

    /// Length of the take as played: last onset plus its sound
    pub fn take_duration(&self) -> Duration {
        self.last()
            .map(|e| e.onset().saturating_add(e.sound_duration()))
            .unwrap_or(Duration::ZERO)
    }

    /// Time a replay keeps the controls locked
    ///
    /// Each event waits its full onset after the previous trigger, so this
    /// is the sum of every onset plus the last sound, longer than
    /// [`take_duration`](Self::take_duration) for any take of two notes or more.
    /// Saturates at `Duration::MAX`.
    pub fn replay_duration(&self) -> Duration {
        match self.last() {
            Some(last) => self
                .iter()
                .fold(Duration::ZERO, |total, e| total.saturating_add(e.onset()))
                .saturating_add(last.sound_duration()),
            None => Duration::ZERO,
        }
    }
}

impl<'a> IntoIterator for &'a Recording {
    type Item = &'a NoteEvent;
    type IntoIter = std::slice::Iter<'a, NoteEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
