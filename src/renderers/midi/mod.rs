//! MIDI export
//!
//! Converts a piece to a track-level `Score` (ticks, MIDI note numbers)
//! and writes it as a Standard MIDI File with `midly`.
//!
//! # Usage
//! ```rust,ignore
//! use mud::renderers::midi::piece_to_midi;
//!
//! let bytes = piece_to_midi(&piece, &settings.midi)?;
//! std::fs::write("piece.mid", bytes)?;
//! ```

pub mod converter;
pub mod defaults;
pub mod model;
mod write;

use thiserror::Error;

use crate::config::MidiSettings;
use crate::models::{NotationError, Piece};

pub use converter::{piece_to_score, pieces_to_score};
pub use defaults::{DEFAULT_PROGRAM, DEFAULT_TEMPO_BPM, DEFAULT_TPQ, DEFAULT_VELOCITY};
pub use model::{Note, Part, Score, Tempo};
pub use write::write_smf;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("ticks per quarter must be positive")]
    InvalidTpq,
    #[error("tempo must be positive, got {0} bpm")]
    InvalidTempo(f64),
    #[error("onset {0} is before the start of the piece")]
    NegativeOnset(f64),
    #[error("MIDI pitch {0} is outside 0-127")]
    PitchOutOfRange(i32),
    #[error(transparent)]
    Notation(#[from] NotationError),
    #[error("midi write error: {0}")]
    Midi(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;

/// Convert a piece to SMF (Standard MIDI File) bytes
pub fn piece_to_midi(piece: &Piece, settings: &MidiSettings) -> Result<Vec<u8>> {
    let score = piece_to_score(piece, settings)?;
    let mut out = Vec::new();
    write_smf(&score, &mut out)?;
    Ok(out)
}

/// Convert several pieces to one multi-track SMF, one track per piece
pub fn pieces_to_midi(pieces: &[Piece], settings: &MidiSettings) -> Result<Vec<u8>> {
    let score = pieces_to_score(pieces, settings)?;
    let mut out = Vec::new();
    write_smf(&score, &mut out)?;
    Ok(out)
}
