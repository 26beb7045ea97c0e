// Sound asset stores - raw bytes looked up by note identifier

use crate::audio::backend::AudioError;
use crate::keyboard::keymap::NoteId;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Sample error types
#[derive(Debug, thiserror::Error)]
pub enum SampleError {
    #[error("No sound asset for {0}")]
    NotFound(NoteId),

    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode {note}: {source}")]
    Decode {
        note: NoteId,
        #[source]
        source: AudioError,
    },
}

/// Key-value lookup of encoded sound files
pub trait SoundStore {
    fn fetch(&self, note: &NoteId) -> Result<Vec<u8>, SampleError>;
}

/// One file per note: `<dir>/<note>.<extension>`, e.g. `piano-mp3/Bb3.mp3`
#[derive(Debug, Clone)]
pub struct DirectorySoundStore {
    dir: PathBuf,
    extension: String,
}

impl DirectorySoundStore {
    pub fn new<P: AsRef<Path>>(dir: P, extension: &str) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn path_for(&self, note: &NoteId) -> PathBuf {
        self.dir.join(format!("{}.{}", note, self.extension))
    }
}

impl SoundStore for DirectorySoundStore {
    fn fetch(&self, note: &NoteId) -> Result<Vec<u8>, SampleError> {
        let path = self.path_for(note);
        std::fs::read(&path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => SampleError::NotFound(note.clone()),
            _ => SampleError::Io { path, source },
        })
    }
}

/// Store holding its assets in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySoundStore {
    assets: HashMap<NoteId, Vec<u8>>,
}

impl MemorySoundStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, note: NoteId, bytes: Vec<u8>) {
        self.assets.insert(note, bytes);
    }
}

impl SoundStore for MemorySoundStore {
    fn fetch(&self, note: &NoteId) -> Result<Vec<u8>, SampleError> {
        self.assets
            .get(note)
            .cloned()
            .ok_or_else(|| SampleError::NotFound(note.clone()))
    }
}
