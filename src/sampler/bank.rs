use crate::audio::backend::AudioBackend;
use crate::audio::buffer::PlayableBuffer;
use crate::keyboard::keymap::{NoteId, PitchClass};
use crate::sampler::loader::{SampleError, SoundStore};
use std::collections::HashMap;

/// Result of a bank load
#[derive(Debug, Default)]
pub struct LoadReport {
    pub loaded: usize,
    pub failed: Vec<(NoteId, SampleError)>,
}

impl LoadReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Decoded sounds by note
///
/// A note whose asset failed to load is simply absent: it stays
/// untriggerable for the lifetime of the bank, there is no retry.
#[derive(Debug, Default, Clone)]
pub struct SoundBank {
    buffers: HashMap<NoteId, PlayableBuffer>,
}

impl SoundBank {
    /// Create a new empty sound bank
    pub fn new() -> Self {
        Self::default()
    }

    /// Notes of the piano sample set: A0 to C8, plus Db8
    pub fn catalog() -> Vec<NoteId> {
        let mut notes = vec![
            NoteId::from_parts(PitchClass::A, 0),
            NoteId::from_parts(PitchClass::B, 0),
            NoteId::from_parts(PitchClass::Bb, 0),
        ];

        for octave in 1..=7 {
            for pitch in PitchClass::NATURALS {
                notes.push(NoteId::from_parts(pitch, octave));
            }
            for pitch in PitchClass::FLATS {
                notes.push(NoteId::from_parts(pitch, octave));
            }
        }

        notes.push(NoteId::from_parts(PitchClass::C, 8));
        notes.push(NoteId::from_parts(PitchClass::Db, 8));
        notes
    }

    /// Fetch and decode every note of `notes`
    ///
    /// Failures are logged and reported, never fatal.
    pub fn load(
        store: &dyn SoundStore,
        backend: &mut dyn AudioBackend,
        notes: &[NoteId],
    ) -> (Self, LoadReport) {
        let mut bank = Self::new();
        let mut report = LoadReport::default();

        for note in notes {
            let result = store.fetch(note).and_then(|bytes| {
                backend.decode(bytes).map_err(|source| SampleError::Decode {
                    note: note.clone(),
                    source,
                })
            });

            match result {
                Ok(buffer) => {
                    bank.insert(note.clone(), buffer);
                    report.loaded += 1;
                }
                Err(e) => {
                    log::warn!("Error loading sound {}: {}", note, e);
                    report.failed.push((note.clone(), e));
                }
            }
        }

        log::info!(
            "Sound bank loaded: {} notes, {} failed",
            report.loaded,
            report.failed.len()
        );
        (bank, report)
    }

    /// Load the full piano catalogue
    pub fn load_catalog(store: &dyn SoundStore, backend: &mut dyn AudioBackend) -> (Self, LoadReport) {
        Self::load(store, backend, &Self::catalog())
    }

    pub fn insert(&mut self, note: NoteId, buffer: PlayableBuffer) {
        self.buffers.insert(note, buffer);
    }

    pub fn get(&self, note: &NoteId) -> Option<&PlayableBuffer> {
        self.buffers.get(note)
    }

    pub fn contains(&self, note: &NoteId) -> bool {
        self.buffers.contains_key(note)
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    /// Loaded notes, sorted by name
    pub fn notes(&self) -> Vec<&NoteId> {
        let mut notes: Vec<&NoteId> = self.buffers.keys().collect();
        notes.sort();
        notes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::backend::AudioError;
    use crate::sampler::loader::MemorySoundStore;

    /// Accepts any non-empty payload as one second of silence per byte
    struct FakeBackend;

    impl AudioBackend for FakeBackend {
        fn decode(&mut self, bytes: Vec<u8>) -> Result<PlayableBuffer, AudioError> {
            if bytes.is_empty() {
                return Err(AudioError::Empty);
            }
            Ok(PlayableBuffer::new(vec![0.0; bytes.len() * 10], 10, 1))
        }

        fn trigger(&mut self, _buffer: &PlayableBuffer) {}
    }

    fn note(name: &str) -> NoteId {
        NoteId::parse(name).unwrap()
    }

    #[test]
    fn test_catalog_range() {
        let catalog = SoundBank::catalog();

        assert_eq!(catalog.len(), 89);
        assert_eq!(catalog.first(), Some(&note("A0")));
        assert_eq!(catalog.last(), Some(&note("Db8")));
        assert!(catalog.contains(&note("Bb4")));
        assert!(!catalog.contains(&note("C0")));
        assert!(!catalog.contains(&note("D8")));
    }

    #[test]
    fn test_load_reports_failures() {
        let mut store = MemorySoundStore::new();
        store.insert(note("C4"), vec![1, 2]);
        store.insert(note("D4"), Vec::new());

        let notes = vec![note("C4"), note("D4"), note("E4")];
        let (bank, report) = SoundBank::load(&store, &mut FakeBackend, &notes);

        assert_eq!(report.loaded, 1);
        assert_eq!(report.failed.len(), 2);
        assert!(!report.is_complete());
        assert!(bank.contains(&note("C4")));
        assert!(!bank.contains(&note("D4")));
        assert!(!bank.contains(&note("E4")));
        assert_eq!(bank.get(&note("C4")).unwrap().duration_secs(), 2.0);
    }

    #[test]
    fn test_failure_kinds() {
        let mut store = MemorySoundStore::new();
        store.insert(note("D4"), Vec::new());

        let notes = vec![note("D4"), note("E4")];
        let (_, report) = SoundBank::load(&store, &mut FakeBackend, &notes);

        assert!(matches!(report.failed[0].1, SampleError::Decode { .. }));
        assert!(matches!(report.failed[1].1, SampleError::NotFound(_)));
    }

    #[test]
    fn test_notes_sorted() {
        let mut bank = SoundBank::new();
        bank.insert(note("G4"), PlayableBuffer::new(vec![0.0], 1, 1));
        bank.insert(note("A4"), PlayableBuffer::new(vec![0.0], 1, 1));

        assert_eq!(bank.notes(), vec![&note("A4"), &note("G4")]);
        assert_eq!(bank.len(), 2);
    }
}
