// Pitch classes and their names.
//
// A pitch class is one of the 12 semitones of the octave, counted up from C.
// Each has a single canonical display name (sharp spelling) but can be
// parsed from any of its enharmonic spellings, so "Db" and "C#" both give
// pitch class 1.
//
// Used by scale.rs for scale naming and by melody.rs for rendering.

use crate::error::{MelodyError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of pitch classes in an octave.
pub const PITCH_CLASS_COUNT: u8 = 12;

/// Canonical display names, indexed by pitch class.
const CANONICAL_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Every accepted spelling and the pitch class it denotes.
const SPELLINGS: [(&str, u8); 17] = [
    ("C", 0),
    ("C#", 1),
    ("Db", 1),
    ("D", 2),
    ("D#", 3),
    ("Eb", 3),
    ("E", 4),
    ("F", 5),
    ("F#", 6),
    ("Gb", 6),
    ("G", 7),
    ("G#", 8),
    ("Ab", 8),
    ("A", 9),
    ("A#", 10),
    ("Bb", 10),
    ("B", 11),
];

/// A semitone within the octave, 0 = C through 11 = B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PitchClass(u8);

impl PitchClass {
    pub const C: PitchClass = PitchClass(0);

    /// Create a pitch class, rejecting values outside 0..=11.
    pub fn new(value: u8) -> Result<Self> {
        if value < PITCH_CLASS_COUNT {
            Ok(PitchClass(value))
        } else {
            Err(MelodyError::InvalidArgument(format!(
                "pitch class {value} is outside 0..=11"
            )))
        }
    }

    /// Reduce any semitone count into the octave.
    pub fn wrapping(semitones: u32) -> Self {
        PitchClass((semitones % PITCH_CLASS_COUNT as u32) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn name(self) -> &'static str {
        CANONICAL_NAMES[self.0 as usize]
    }

    /// Parse an exact spelling such as "F#" or "Bb". Case-sensitive: the
    /// letter is upper-case and a flat is a lower-case 'b'.
    pub fn from_name(name: &str) -> Option<Self> {
        SPELLINGS
            .iter()
            .find(|(spelling, _)| *spelling == name)
            .map(|&(_, pc)| PitchClass(pc))
    }

    /// All 12 pitch classes in ascending order.
    pub fn all() -> impl Iterator<Item = PitchClass> {
        (0..PITCH_CLASS_COUNT).map(PitchClass)
    }
}

impl TryFrom<u8> for PitchClass {
    type Error = MelodyError;

    fn try_from(value: u8) -> Result<Self> {
        PitchClass::new(value)
    }
}

impl From<PitchClass> for u8 {
    fn from(pc: PitchClass) -> u8 {
        pc.0
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
