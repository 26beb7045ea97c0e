// Input dispatcher - routes key and pointer events to note actions

use crate::keyboard::keymap::{KeyMap, NoteId};

/// Raw input, independent of the technology that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A key went down. `repeat` is set for auto-repeat of a held key
    KeyDown { symbol: char, repeat: bool },
    KeyUp { symbol: char },
    /// A labelled key was pressed with a pointer; carries its own note
    PointerDown { note: NoteId },
    PointerUp { note: NoteId },
}

/// What the piano should do in response to an input event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteAction {
    /// Trigger the note (feedback, audio, recording)
    Press(NoteId),
    /// Clear the visual feedback of the note. No audio effect
    Release(NoteId),
}

/// Stateless router from input events to note actions
///
/// Keyboard symbols are lower-cased before the lookup, so the upper-case
/// (shifted) bindings of the key map are never reached from the keyboard.
/// Pointer input bypasses the key map entirely.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputDispatcher;

impl InputDispatcher {
    pub fn new() -> Self {
        Self
    }

    pub fn dispatch(&self, keymap: &KeyMap, event: &InputEvent) -> Option<NoteAction> {
        match event {
            InputEvent::KeyDown { symbol, repeat } => self.on_key_down(keymap, *symbol, *repeat),
            InputEvent::KeyUp { symbol } => self.on_key_up(keymap, *symbol),
            InputEvent::PointerDown { note } => Some(NoteAction::Press(note.clone())),
            InputEvent::PointerUp { note } => Some(NoteAction::Release(note.clone())),
        }
    }

    pub fn on_key_down(&self, keymap: &KeyMap, symbol: char, is_repeat: bool) -> Option<NoteAction> {
        if is_repeat {
            return None;
        }
        self.resolve(keymap, symbol).map(NoteAction::Press)
    }

    pub fn on_key_up(&self, keymap: &KeyMap, symbol: char) -> Option<NoteAction> {
        self.resolve(keymap, symbol).map(NoteAction::Release)
    }

    fn resolve(&self, keymap: &KeyMap, symbol: char) -> Option<NoteId> {
        let normalized = symbol.to_lowercase().next().unwrap_or(symbol);
        let note = keymap.get(normalized).cloned();
        if note.is_none() {
            log::trace!("Unmapped key '{}' ignored", symbol);
        }
        note
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::keymap::generate;

    fn note(name: &str) -> NoteId {
        NoteId::parse(name).unwrap()
    }

    #[test]
    fn test_key_down_resolves() {
        let dispatcher = InputDispatcher::new();
        let map = generate(4);

        assert_eq!(
            dispatcher.on_key_down(&map, 'a', false),
            Some(NoteAction::Press(note("C5")))
        );
    }

    #[test]
    fn test_repeat_is_ignored() {
        let dispatcher = InputDispatcher::new();
        let map = generate(4);

        assert_eq!(dispatcher.on_key_down(&map, 'a', true), None);
    }

    #[test]
    fn test_unmapped_key_is_ignored() {
        let dispatcher = InputDispatcher::new();
        let map = generate(4);

        assert_eq!(dispatcher.on_key_down(&map, 'e', false), None);
        assert_eq!(dispatcher.on_key_up(&map, '1'), None);
    }

    #[test]
    fn test_shifted_symbols_fold_to_lower_case() {
        // 'A' is bound to C6 in the map but the lookup uses 'a'
        let dispatcher = InputDispatcher::new();
        let map = generate(4);

        assert_eq!(map.get('A'), Some(&note("C6")));
        assert_eq!(
            dispatcher.on_key_down(&map, 'A', false),
            Some(NoteAction::Press(note("C5")))
        );
        assert_eq!(
            dispatcher.on_key_up(&map, 'Z'),
            Some(NoteAction::Release(note("C4")))
        );
    }

    #[test]
    fn test_pointer_bypasses_keymap() {
        let dispatcher = InputDispatcher::new();
        let map = generate(4);

        let down = InputEvent::PointerDown { note: note("A0") };
        assert_eq!(
            dispatcher.dispatch(&map, &down),
            Some(NoteAction::Press(note("A0")))
        );

        let up = InputEvent::PointerUp { note: note("A0") };
        assert_eq!(
            dispatcher.dispatch(&map, &up),
            Some(NoteAction::Release(note("A0")))
        );
    }

    #[test]
    fn test_dispatch_key_events() {
        let dispatcher = InputDispatcher::new();
        let map = generate(2);

        let repeat = InputEvent::KeyDown {
            symbol: '[',
            repeat: true,
        };
        assert_eq!(dispatcher.dispatch(&map, &repeat), None);

        let down = InputEvent::KeyDown {
            symbol: '[',
            repeat: false,
        };
        assert_eq!(
            dispatcher.dispatch(&map, &down),
            Some(NoteAction::Press(note("Bb3")))
        );
    }
}
