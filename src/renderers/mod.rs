//! Renderers module for the music data library
//!
//! This module contains export logic for converting pieces into
//! external formats.

pub mod midi;

// Re-export commonly used types
pub use midi::{piece_to_midi, pieces_to_midi, RenderError};
