//! Piece-to-MIDI conversion
//!
//! Flattens a piece into one absolute timeline and converts onsets and
//! durations to ticks. Rests only advance time, so they produce nothing.

use super::defaults::{assign_channel, DEFAULT_OCTAVE};
use super::model::{beats_to_ticks, Note, Part, Score, Tempo};
use super::{RenderError, Result};
use crate::config::MidiSettings;
use crate::models::{FlatEvent, Piece};

/// Convert a piece to a single-part MIDI score
pub fn piece_to_score(piece: &Piece, settings: &MidiSettings) -> Result<Score> {
    pieces_to_score(std::slice::from_ref(piece), settings)
}

/// Convert several pieces to one score, one part (and channel) per piece
pub fn pieces_to_score(pieces: &[Piece], settings: &MidiSettings) -> Result<Score> {
    if settings.tpq == 0 {
        return Err(RenderError::InvalidTpq);
    }
    if !(settings.tempo_bpm > 0.0) {
        return Err(RenderError::InvalidTempo(settings.tempo_bpm));
    }

    let parts = pieces
        .iter()
        .enumerate()
        .map(|(index, piece)| convert_piece_to_part(piece, index, settings))
        .collect::<Result<Vec<_>>>()?;

    Ok(Score {
        tpq: settings.tpq,
        tempos: vec![Tempo {
            tick: 0,
            bpm: settings.tempo_bpm,
        }],
        parts,
    })
}

fn convert_piece_to_part(piece: &Piece, part_index: usize, settings: &MidiSettings) -> Result<Part> {
    let mut notes = Vec::new();
    for event in piece.flatten() {
        if let Some(note) = convert_event(&event, settings)? {
            notes.push(note);
        }
    }
    log::debug!(
        "Converted piece '{}' to {} MIDI notes on channel {}",
        piece.name(),
        notes.len(),
        assign_channel(part_index)
    );

    Ok(Part {
        name: piece.name().to_string(),
        channel: assign_channel(part_index),
        program: Some(settings.program),
        notes,
    })
}

fn convert_event(event: &FlatEvent, settings: &MidiSettings) -> Result<Option<Note>> {
    let pitch = match &event.pitch {
        Some(pitch) => pitch,
        None => return Ok(None),
    };

    let start = beats_to_ticks(event.onset, settings.tpq);
    if start < 0.0 {
        return Err(RenderError::NegativeOnset(event.onset));
    }
    let end = beats_to_ticks(event.onset + event.duration, settings.tpq);
    if end <= start {
        log::debug!("Skipping note {} at {} beats: shorter than one tick", pitch, event.onset);
        return Ok(None);
    }

    let midi = pitch.midi_pitch(Some(DEFAULT_OCTAVE))?;
    let key = u8::try_from(midi)
        .ok()
        .filter(|key| *key <= 127)
        .ok_or(RenderError::PitchOutOfRange(midi))?;

    Ok(Some(Note {
        start_tick: start as u64,
        dur_tick: (end - start) as u64,
        pitch: key,
        vel: settings.velocity,
    }))
}
