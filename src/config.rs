// Configuration - RON file with serde defaults for every field

use crate::keyboard::octave::{DEFAULT_OCTAVE, MAX_OCTAVE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] ron::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PianoConfig {
    /// Directory holding one sound file per note
    pub sound_dir: PathBuf,
    /// Extension of the sound files, without the dot
    pub sound_extension: String,
    /// Octave selected at startup, clamped to the playable range
    pub initial_octave: u8,
    /// Where takes are saved and loaded from
    pub recording_path: PathBuf,
    /// Output gain, 0.0 to 1.0
    pub volume: f32,
    /// Capacity of the command and audio ring buffers
    pub command_capacity: usize,
    /// Log destination for the interactive mode (stderr if unset)
    pub log_file: Option<PathBuf>,
}

impl Default for PianoConfig {
    fn default() -> Self {
        Self {
            sound_dir: PathBuf::from("piano-mp3"),
            sound_extension: "mp3".to_string(),
            initial_octave: DEFAULT_OCTAVE,
            recording_path: PathBuf::from("recording.json"),
            volume: 0.8,
            command_capacity: 256,
            log_file: None,
        }
    }
}

impl PianoConfig {
    /// Default location: `<config dir>/piano_keys/config.ron`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("piano_keys").join("config.ron"))
    }

    /// Load from `path`; a missing file gives the defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let data = std::fs::read_to_string(path)?;
        let mut config: PianoConfig = ron::from_str(&data)?;
        config.validate()?;
        if config.initial_octave > MAX_OCTAVE {
            log::warn!(
                "initial_octave {} clamped to {}",
                config.initial_octave,
                MAX_OCTAVE
            );
            config.initial_octave = MAX_OCTAVE;
        }
        log::debug!("Config loaded from {:?}", path);
        Ok(config)
    }

    /// Load from the default location, or defaults if there is none
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        std::fs::write(path, data)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.volume) {
            return Err(ConfigError::Invalid(
                "volume must be between 0.0 and 1.0".to_string(),
            ));
        }

        if self.command_capacity == 0 {
            return Err(ConfigError::Invalid(
                "command_capacity must be greater than 0".to_string(),
            ));
        }

        if self.sound_extension.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "sound_extension cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
