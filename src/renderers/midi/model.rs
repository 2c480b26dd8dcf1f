//! Track-level representation of a MIDI export.
//!
//! Everything is already in ticks; `write_smf` only has to order the
//! messages and encode them.

#[derive(Debug, Clone, PartialEq)]
pub struct Score {
    pub tpq: u16,               // Ticks per quarter note (= per beat)
    pub tempos: Vec<Tempo>,     // Sorted by tick
    pub parts: Vec<Part>,       // One per exported piece
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tempo {
    pub tick: u64,
    pub bpm: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    pub name: String,
    pub channel: u8,          // MIDI channel 0-15
    pub program: Option<u8>,  // GM program 0-127
    pub notes: Vec<Note>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub start_tick: u64,
    pub dur_tick: u64,
    pub pitch: u8,  // MIDI note number 0-127
    pub vel: u8,
}

/// Convert beats to ticks, rounding to the nearest tick
pub fn beats_to_ticks(beats: f64, tpq: u16) -> f64 {
    (beats * tpq as f64).round()
}
