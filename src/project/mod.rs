// Recording persistence - save and load whole takes
// JSON by default, RON when the file name ends in .ron

pub mod serialization;

use crate::sequencer::note::Recording;
use std::path::Path;

pub use serialization::{
    deserialize_from_json, deserialize_from_ron, serialize_to_json, serialize_to_ron,
};

/// Persistence error types
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("RON error: {0}")]
    Ron(#[from] ron::Error),

    #[error("RON parse error: {0}")]
    RonParse(#[from] ron::error::SpannedError),
}

/// On-disk encoding of a take
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingFormat {
    Json,
    Ron,
}

impl RecordingFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|s| s.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("ron") => RecordingFormat::Ron,
            _ => RecordingFormat::Json,
        }
    }
}

pub fn save_recording<P: AsRef<Path>>(recording: &Recording, path: P) -> Result<(), PersistenceError> {
    let path = path.as_ref();
    let data = match RecordingFormat::from_path(path) {
        RecordingFormat::Json => serialize_to_json(recording)?,
        RecordingFormat::Ron => serialize_to_ron(recording)?,
    };
    std::fs::write(path, data)?;
    log::info!("Saved {} notes to {:?}", recording.len(), path);
    Ok(())
}

pub fn load_recording<P: AsRef<Path>>(path: P) -> Result<Recording, PersistenceError> {
    let path = path.as_ref();
    let data = std::fs::read_to_string(path)?;
    let recording = match RecordingFormat::from_path(path) {
        RecordingFormat::Json => deserialize_from_json(&data)?,
        RecordingFormat::Ron => deserialize_from_ron(&data)?,
    };
    log::info!("Loaded {} notes from {:?}", recording.len(), path);
    Ok(recording)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            RecordingFormat::from_path(&PathBuf::from("take.ron")),
            RecordingFormat::Ron
        );
        assert_eq!(
            RecordingFormat::from_path(&PathBuf::from("take.RON")),
            RecordingFormat::Ron
        );
        assert_eq!(
            RecordingFormat::from_path(&PathBuf::from("take.json")),
            RecordingFormat::Json
        );
        assert_eq!(
            RecordingFormat::from_path(&PathBuf::from("take")),
            RecordingFormat::Json
        );
    }
}
