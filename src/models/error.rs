//! Error types for the notation model
//!
//! Structural problems (bad pitch strings, impossible span lengths, missing
//! octave information) are always reported to the caller. Zero-length events
//! are not errors: spans drop them as part of normal data cleaning.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NotationError {
    /// Pitch string could not be parsed (e.g. "H4", "X#")
    #[error("invalid pitch string '{0}'")]
    InvalidPitchName(String),

    /// Relative pitch outside of [0, 12)
    #[error("relative pitch {0} is out of range, expected 0..=11 (use the octave to give octave info)")]
    PitchOutOfRange(i32),

    /// MIDI conversion without a stored or assumed octave
    #[error("pitch '{0}' has no octave, so it has no absolute MIDI pitch")]
    MissingOctave(String),

    /// Step count requested on a time with no resolution
    #[error("can't give the number of resolution steps of an unquantized time ({0} beats)")]
    Unquantized(f64),

    /// Octave supplied both in the pitch and as a separate argument
    #[error("ambiguous octave for pitch '{pitch}': it already has octave {existing}, but octave {given} was also provided")]
    AmbiguousOctave { pitch: String, existing: u8, given: u8 },

    /// Requested span length is smaller than the span's content
    #[error("malformed span length: content is {actual} beats long, requested length is {requested} beats")]
    MalformedSpanLength { actual: f64, requested: f64 },

    /// Overlay/concat called without any span to combine
    #[error("expected at least one span to {0}")]
    NotASpan(&'static str),

    /// Quantization grid must be a positive number of beats
    #[error("resolution must be positive, got {0}")]
    InvalidResolution(f64),

    /// Slice width must be a positive number of beats
    #[error("slice resolution must be positive, got {0}")]
    InvalidSliceResolution(f64),

    /// Key-dependent logic for a mode other than major or minor
    #[error("mode '{0}' is not supported, only major and minor keys are")]
    UnsupportedMode(String),
}

pub type Result<T> = std::result::Result<T, NotationError>;
