// Saved takes: JSON and RON files, field-exact round trips

use piano_keys::keyboard::NoteId;
use piano_keys::project::{PersistenceError, load_recording, save_recording};
use piano_keys::sequencer::{NoteEvent, Recording};
use tempfile::tempdir;

fn take() -> Recording {
    let events = [
        ("C4", 0, 1.2345),
        ("Bb3", 180, 0.75),
        ("C-1", 180, 0.0),
        ("Db8", 2417, 12.5),
    ]
    .into_iter()
    .map(|(name, time, duration)| NoteEvent::new(NoteId::parse(name).unwrap(), time, duration))
    .collect();
    Recording::from_events(events)
}

#[test]
fn test_json_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("take.json");

    save_recording(&take(), &path).unwrap();
    assert_eq!(load_recording(&path).unwrap(), take());
}

#[test]
fn test_ron_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("take.ron");

    save_recording(&take(), &path).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("note:") && text.contains("\"Bb3\""));
    assert_eq!(load_recording(&path).unwrap(), take());
}

#[test]
fn test_json_layout() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("take.json");
    save_recording(&take(), &path).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let first = &value.as_array().unwrap()[1];

    assert_eq!(first["note"], "Bb3");
    assert_eq!(first["time"], 180);
    assert_eq!(first["duration"], 0.75);
}

#[test]
fn test_hand_written_file_loads() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("handmade.json");
    std::fs::write(
        &path,
        r#"[
            {"note": "E4", "time": 0, "duration": 1.0},
            {"note": "G4", "time": 320, "duration": 1.0, "velocity": 90}
        ]"#,
    )
    .unwrap();

    let recording = load_recording(&path).unwrap();
    assert_eq!(recording.len(), 2);
    assert_eq!(recording.events()[1].onset_offset_ms, 320);
}

#[test]
fn test_empty_take_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.json");

    save_recording(&Recording::new(), &path).unwrap();
    assert!(load_recording(&path).unwrap().is_empty());
}

#[test]
fn test_load_errors() {
    let dir = tempdir().unwrap();

    assert!(matches!(
        load_recording(dir.path().join("absent.json")),
        Err(PersistenceError::Io(_))
    ));

    let broken = dir.path().join("broken.json");
    std::fs::write(&broken, r#"[{"note": "C4", "time": 10}]"#).unwrap();
    assert!(matches!(
        load_recording(&broken),
        Err(PersistenceError::Json(_))
    ));

    let broken_ron = dir.path().join("broken.ron");
    std::fs::write(&broken_ron, "[(note: \"C4\"").unwrap();
    assert!(matches!(
        load_recording(&broken_ron),
        Err(PersistenceError::RonParse(_))
    ));
}
