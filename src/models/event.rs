//! Timed events: a notation payload placed at an onset within its span

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use super::notation::Notation;
use super::pitch::{Pitch, SORTING_OCTAVE};
use super::time::Time;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Event {
    notation: Notation,
    /// Onset, relative to the containing span's offset
    time: Time,
}

impl Event {
    pub fn new(notation: Notation, time: Time) -> Self {
        Event { notation, time }
    }

    pub fn unwrap(&self) -> &Notation {
        &self.notation
    }

    pub fn unwrap_mut(&mut self) -> &mut Notation {
        &mut self.notation
    }

    pub fn into_notation(self) -> Notation {
        self.notation
    }

    pub fn time(&self) -> &Time {
        &self.time
    }

    pub fn time_mut(&mut self) -> &mut Time {
        &mut self.time
    }

    pub fn is_note(&self) -> bool {
        self.notation.is_note()
    }

    pub fn is_rest(&self) -> bool {
        self.notation.is_rest()
    }

    pub fn pitch(&self) -> Option<&Pitch> {
        self.notation.pitch()
    }

    pub fn duration(&self) -> &Time {
        self.notation.duration()
    }

    /// Onset plus duration, in beats
    pub fn end_in_beats(&self) -> f64 {
        self.time.in_beats() + self.duration().in_beats()
    }

    /// Same payload, moved later by `shift`.
    ///
    /// A quantized onset stays on its own grid. An unquantized onset stays
    /// unquantized and takes the raw sum.
    pub fn shifted(&self, shift: &Time) -> Self {
        let mut event = self.clone();
        event.shift_by(shift);
        event
    }

    pub(crate) fn shift_by(&mut self, shift: &Time) {
        let sum = self.time + *shift;
        self.time = match self.time.resolution() {
            Some(resolution) => sum.as_quantized(resolution),
            None => sum,
        };
    }

    /// Pitch used for ordering: rests are 0, pitch classes sit in octave 4
    fn sorting_pitch(&self) -> i32 {
        self.pitch()
            .and_then(|pitch| pitch.midi_pitch(Some(SORTING_OCTAVE)).ok())
            .unwrap_or(0)
    }

    /// Ordering within a span: onset first, then pitch
    pub fn cmp_order(&self, other: &Self) -> Ordering {
        self.time
            .cmp_position(&other.time)
            .then_with(|| self.sorting_pitch().cmp(&other.sorting_pitch()))
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{Event {}}} {}", self.time.in_beats(), self.notation)
    }
}
