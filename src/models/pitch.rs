//! Pitch representation and conversion logic
//!
//! A pitch is a pitch class (0 = C .. 11 = B) with an optional octave.
//! Pitch-class-only pitches (e.g. "Eb") are a weaker entity than octaved
//! pitches (e.g. "Eb4") and never compare equal to them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::{NotationError, Result};

/// Canonical spelling of each relative pitch, used by `Pitch::name`
const RELATIVE_PITCH_NAMES: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
];

/// Octave assumed for pitch-class-only pitches when ordering events
pub const SORTING_OCTAVE: u8 = 4;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pitch {
    relative_pitch: u8,
    octave: Option<u8>,
}

impl Pitch {
    /// Create a pitch from a relative pitch in [0, 12) and an optional octave
    pub fn new(relative_pitch: i32, octave: Option<u8>) -> Result<Self> {
        if !(0..12).contains(&relative_pitch) {
            return Err(NotationError::PitchOutOfRange(relative_pitch));
        }
        Ok(Pitch {
            relative_pitch: relative_pitch as u8,
            octave,
        })
    }

    /// Parse a pitch string, then attach `octave` to it.
    ///
    /// Fails with `AmbiguousOctave` when the string already carries an octave.
    pub fn parse_with_octave(s: &str, octave: u8) -> Result<Self> {
        s.parse::<Pitch>()?.with_octave(octave)
    }

    /// Same pitch class in the given octave.
    ///
    /// Only valid for pitch-class-only pitches; giving a second octave is ambiguous.
    pub fn with_octave(&self, octave: u8) -> Result<Self> {
        match self.octave {
            Some(existing) => Err(NotationError::AmbiguousOctave {
                pitch: self.name(),
                existing,
                given: octave,
            }),
            None => Ok(Pitch {
                relative_pitch: self.relative_pitch,
                octave: Some(octave),
            }),
        }
    }

    pub fn relative_pitch(&self) -> u8 {
        self.relative_pitch
    }

    pub fn octave(&self) -> Option<u8> {
        self.octave
    }

    /// Same pitch class, without octave information
    pub fn strip_octave(&self) -> Self {
        Pitch {
            relative_pitch: self.relative_pitch,
            octave: None,
        }
    }

    /// Integer MIDI pitch.
    ///
    /// Pitches without an octave use `assumed_octave`; if that is also missing
    /// the conversion fails. The assumption never changes the stored pitch.
    pub fn midi_pitch(&self, assumed_octave: Option<u8>) -> Result<i32> {
        let octave = self
            .octave
            .or(assumed_octave)
            .ok_or_else(|| NotationError::MissingOctave(self.name()))?;
        Ok(to_midi(self.relative_pitch, octave as i32))
    }

    /// Canonical name, e.g. "C", "Db4", "Bb2"
    pub fn name(&self) -> String {
        let class = RELATIVE_PITCH_NAMES[self.relative_pitch as usize];
        match self.octave {
            Some(octave) => format!("{}{}", class, octave),
            None => class.to_string(),
        }
    }
}

/// Convert a pitch-octave pair to a MIDI pitch.
///
/// C-1 -> 0, A0 -> 21, C4 -> 60 (scientific pitch notation)
pub fn to_midi(relative_pitch: u8, octave: i32) -> i32 {
    relative_pitch as i32 + (octave + 1) * 12
}

/// Parse a pitch string into a (relative pitch, octave) pair.
///
/// Everything before the first digit is the pitch name, everything from the
/// first digit on is the octave. Both `b` and `-` spell flats.
pub fn parse(s: &str) -> Result<(u8, Option<u8>)> {
    let invalid = || NotationError::InvalidPitchName(s.to_string());

    let split = s.find(|c: char| c.is_ascii_digit()).unwrap_or(s.len());
    let (name, octave_part) = s.split_at(split);

    let octave = if octave_part.is_empty() {
        None
    } else {
        Some(octave_part.parse::<u8>().map_err(|_| invalid())?)
    };

    let relative_pitch = match lookup_relative_pitch(name) {
        Some(pitch) => pitch,
        None => {
            // Uncommon spellings such as "E#", "Cb" or "B##"
            let (base, shift) = if let Some(base) = name.strip_suffix('#') {
                (base, 1)
            } else if let Some(base) = name.strip_suffix(['b', '-']) {
                (base, -1)
            } else {
                return Err(invalid());
            };
            let base = lookup_relative_pitch(base).ok_or_else(invalid)?;
            (base as i32 + shift).rem_euclid(12) as u8
        }
    };

    Ok((relative_pitch, octave))
}

fn lookup_relative_pitch(name: &str) -> Option<u8> {
    let pitch = match name {
        "C" => 0,
        "C#" | "Db" | "D-" => 1,
        "D" => 2,
        "D#" | "Eb" | "E-" => 3,
        "E" => 4,
        "F" => 5,
        "F#" | "Gb" | "G-" => 6,
        "G" => 7,
        "G#" | "Ab" | "A-" => 8,
        "A" => 9,
        "A#" | "Bb" | "B-" => 10,
        "B" => 11,
        _ => return None,
    };
    Some(pitch)
}

impl FromStr for Pitch {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self> {
        let (relative_pitch, octave) = parse(s)?;
        Ok(Pitch {
            relative_pitch,
            octave,
        })
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
