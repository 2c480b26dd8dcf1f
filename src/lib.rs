//! Music data library
//!
//! Symbolic music as quantized note/rest timelines. Pieces are built from
//! bars (`Span`s), walked in fixed-width windows (`TimeSlice`s) for feature
//! extraction, rendered to MIDI and stored as a `Corpus`.

pub mod config;
pub mod corpus;
pub mod import;
pub mod models;
pub mod renderers;

// Re-export commonly used types
pub use config::Settings;
pub use corpus::Corpus;
pub use models::{Event, KeyMode, Notation, NotationError, Piece, Pitch, Span, SpanOptions, Time, TimeSlice};
