// Serialization utilities for recording persistence

use crate::project::PersistenceError;
use crate::sequencer::note::Recording;
use ron::{from_str as ron_from_str, to_string as ron_to_string};

/// Serialize a take to pretty JSON
pub fn serialize_to_json(recording: &Recording) -> Result<String, PersistenceError> {
    Ok(serde_json::to_string_pretty(recording)?)
}

/// Deserialize a take from JSON
///
/// Only field presence is checked; events are kept in file order.
pub fn deserialize_from_json(json_data: &str) -> Result<Recording, PersistenceError> {
    Ok(serde_json::from_str(json_data)?)
}

/// Serialize a take to RON
pub fn serialize_to_ron(recording: &Recording) -> Result<String, PersistenceError> {
    Ok(ron_to_string(recording)?)
}

/// Deserialize a take from RON
pub fn deserialize_from_ron(ron_data: &str) -> Result<Recording, PersistenceError> {
    Ok(ron_from_str(ron_data)?)
}
