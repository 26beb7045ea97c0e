// Octave controller - current octave band and the key map derived from it

use crate::keyboard::keymap::{KeyMap, generate};
use crate::ui::surface::ControlSurface;
use std::sync::Arc;

pub const MIN_OCTAVE: u8 = 0;
pub const MAX_OCTAVE: u8 = 7;
pub const DEFAULT_OCTAVE: u8 = 4;

/// Owns the octave state and the active key map
///
/// The key map is replaced as a whole on every change. Readers holding the
/// previous `Arc` keep a consistent (old) map.
#[derive(Debug, Clone)]
pub struct OctaveController {
    octave: u8,
    keymap: Arc<KeyMap>,
}

impl OctaveController {
    pub fn new() -> Self {
        Self::with_octave(DEFAULT_OCTAVE)
    }

    /// Start at `octave`, clamped to the supported range
    pub fn with_octave(octave: u8) -> Self {
        let octave = octave.clamp(MIN_OCTAVE, MAX_OCTAVE);
        Self {
            octave,
            keymap: Arc::new(generate(octave as i32)),
        }
    }

    pub fn octave(&self) -> u8 {
        self.octave
    }

    pub fn keymap(&self) -> Arc<KeyMap> {
        Arc::clone(&self.keymap)
    }

    /// Shift the octave by `delta`
    ///
    /// Out-of-range targets leave everything untouched and report nothing.
    /// Returns true if the octave changed.
    pub fn change_octave(&mut self, delta: i32, surface: &mut dyn ControlSurface) -> bool {
        let target = self.octave as i32 + delta;
        if target < MIN_OCTAVE as i32 || target > MAX_OCTAVE as i32 {
            log::debug!("Octave {} out of range, ignored", target);
            return false;
        }

        self.octave = target as u8;
        self.keymap = Arc::new(generate(target));
        surface.octave_changed(self.octave);
        true
    }
}

impl Default for OctaveController {
    fn default() -> Self {
        Self::new()
    }
}
