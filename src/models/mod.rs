//! Models module for the music data library
//!
//! This module contains the temporal event model: pitches, quantized
//! times, canonical durations, events, spans, time slices and pieces.

pub mod duration;
pub mod error;
pub mod event;
pub mod notation;
pub mod piece;
pub mod pitch;
pub mod span;
pub mod time;
pub mod timeslice;

// Re-export commonly used types
pub use error::{NotationError, Result};
pub use event::Event;
pub use notation::Notation;
pub use piece::{FlatEvent, KeyMode, Piece};
pub use pitch::Pitch;
pub use span::{Span, SpanOptions};
pub use time::Time;
pub use timeslice::{Slices, TimeSlice};
