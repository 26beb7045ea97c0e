// Key map - note identifiers and the octave-relative keyboard layout
// The layout is fixed; only the octave numbers change with the selected octave

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The twelve pitch classes, spelled with flats like the sound asset names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PitchClass {
    C,
    Db,
    D,
    Eb,
    E,
    F,
    Gb,
    G,
    Ab,
    A,
    Bb,
    B,
}

impl PitchClass {
    /// White keys, C to B
    pub const NATURALS: [PitchClass; 7] = [
        PitchClass::C,
        PitchClass::D,
        PitchClass::E,
        PitchClass::F,
        PitchClass::G,
        PitchClass::A,
        PitchClass::B,
    ];

    /// Black keys, Db to Bb
    pub const FLATS: [PitchClass; 5] = [
        PitchClass::Db,
        PitchClass::Eb,
        PitchClass::Gb,
        PitchClass::Ab,
        PitchClass::Bb,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::Db => "Db",
            PitchClass::D => "D",
            PitchClass::Eb => "Eb",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::Gb => "Gb",
            PitchClass::G => "G",
            PitchClass::Ab => "Ab",
            PitchClass::A => "A",
            PitchClass::Bb => "Bb",
            PitchClass::B => "B",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let pitch = match name {
            "C" => PitchClass::C,
            "Db" => PitchClass::Db,
            "D" => PitchClass::D,
            "Eb" => PitchClass::Eb,
            "E" => PitchClass::E,
            "F" => PitchClass::F,
            "Gb" => PitchClass::Gb,
            "G" => PitchClass::G,
            "Ab" => PitchClass::Ab,
            "A" => PitchClass::A,
            "Bb" => PitchClass::Bb,
            "B" => PitchClass::B,
            _ => return None,
        };
        Some(pitch)
    }

    pub fn is_flat(self) -> bool {
        Self::FLATS.contains(&self)
    }
}

/// Canonical name of a playable note: letter, optional "b", octave number
///
/// Identifiers built by the key map generator are not range checked, so
/// `C-1` or `C9` can exist. They simply have no sound asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    pub fn from_parts(pitch: PitchClass, octave: i32) -> Self {
        Self(format!("{}{}", pitch.name(), octave))
    }

    /// Parse a note name such as "C4", "Bb3" or "C-1"
    pub fn parse(name: &str) -> Option<Self> {
        let (pitch, octave) = split_note_name(name)?;
        Some(Self::from_parts(pitch, octave))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn pitch_class(&self) -> Option<PitchClass> {
        split_note_name(&self.0).map(|(pitch, _)| pitch)
    }

    pub fn octave(&self) -> Option<i32> {
        split_note_name(&self.0).map(|(_, octave)| octave)
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn split_note_name(name: &str) -> Option<(PitchClass, i32)> {
    let letter = name.chars().next()?;
    if !('A'..='G').contains(&letter) {
        return None;
    }
    let pitch_len = if name[1..].starts_with('b') { 2 } else { 1 };
    let pitch = PitchClass::from_name(&name[..pitch_len])?;
    let digits = &name[pitch_len..];
    let octave = digits.parse::<i32>().ok()?;
    // Canonical spelling only: "C4", never "C04" or "C+4"
    if octave.to_string() != digits {
        return None;
    }
    Some((pitch, octave))
}

/// One band of the keyboard layout: a row of symbols sharing an octave offset
struct Band {
    symbols: &'static [char],
    pitches: &'static [PitchClass],
    octave_offset: i32,
}

use PitchClass::{A, Ab, B, Bb, C, D, Db, E, Eb, F, G, Gb};

const WHITE: &[PitchClass] = &[C, D, E, F, G, A, B];
const BLACK: &[PitchClass] = &[Db, Eb, Gb, Ab, Bb];

const LAYOUT: [Band; 7] = [
    // White keys - bottom row
    Band {
        symbols: &['z', 'x', 'c', 'v', 'b', 'n', 'm'],
        pitches: WHITE,
        octave_offset: 0,
    },
    // White keys - home row
    Band {
        symbols: &['a', 's', 'd', 'f', 'g', 'h', 'j'],
        pitches: WHITE,
        octave_offset: 1,
    },
    Band {
        symbols: &['k'],
        pitches: &[C],
        octave_offset: 2,
    },
    // Black keys - bottom row
    Band {
        symbols: &['q', 'w', 'r', 't', 'y'],
        pitches: BLACK,
        octave_offset: 0,
    },
    // Black keys - top row
    Band {
        symbols: &['u', 'i', 'o', 'p', '['],
        pitches: BLACK,
        octave_offset: 1,
    },
    // Shifted bottom row, one octave down
    Band {
        symbols: &['Z', 'X', 'C', 'V', 'B', 'N', 'M'],
        pitches: WHITE,
        octave_offset: -1,
    },
    // Shifted home row, two octaves up
    Band {
        symbols: &['A', 'S', 'D', 'F', 'G', 'H', 'J'],
        pitches: WHITE,
        octave_offset: 2,
    },
];

/// Number of bindings produced by [`generate`]
pub const KEYMAP_SIZE: usize = 39;

/// Immutable mapping from an input symbol to a note
///
/// Symbols are case-sensitive. A new map is generated on every octave change
/// and swapped in as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMap {
    octave: i32,
    bindings: BTreeMap<char, NoteId>,
}

impl KeyMap {
    pub fn get(&self, symbol: char) -> Option<&NoteId> {
        self.bindings.get(&symbol)
    }

    /// Octave this map was generated for
    pub fn octave(&self) -> i32 {
        self.octave
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, &NoteId)> {
        self.bindings.iter().map(|(symbol, note)| (*symbol, note))
    }

    /// All symbols bound to `note`, in symbol order
    pub fn symbols_for(&self, note: &NoteId) -> Vec<char> {
        self.iter()
            .filter(|(_, bound)| *bound == note)
            .map(|(symbol, _)| symbol)
            .collect()
    }
}

/// Build the key map for `octave`
///
/// Pure and deterministic. No bounds check is applied to the resulting
/// octave numbers.
pub fn generate(octave: i32) -> KeyMap {
    let mut bindings = BTreeMap::new();

    for band in &LAYOUT {
        for (symbol, pitch) in band.symbols.iter().zip(band.pitches) {
            bindings.insert(*symbol, NoteId::from_parts(*pitch, octave + band.octave_offset));
        }
    }

    KeyMap { octave, bindings }
}
