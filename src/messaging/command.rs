// Command types - front end → piano, piano → audio stream

use crate::audio::buffer::PlayableBuffer;
use crate::keyboard::dispatcher::InputEvent;

/// Requests produced by an input front end
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Input(InputEvent),
    ChangeOctave(i32),
    StartRecording,
    StopRecording,
    PlayRecording,
    SaveRecording,
    LoadRecording,
    Quit,
}

/// Messages consumed by the audio callback
#[derive(Debug, Clone)]
pub enum AudioCommand {
    Play(PlayableBuffer),
    StopAll,
}
