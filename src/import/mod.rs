//! Bar-record import
//!
//! An external notation parser (MusicXML, MIDI, ...) reduces each measure to
//! a `BarRecord`: the bar's offset plus (pitch-or-rest, onset, duration)
//! records. This module turns those records into sorted `Span`s and a `Piece`.
//!
//! ```text
//! notation file → external parser → PieceRecord → import_piece → Piece
//! ```

pub mod converter;
pub mod types;

pub use converter::{import_piece, import_piece_json, ImportOptions};
pub use types::{BarRecord, EventRecord, PieceRecord};

use crate::models::NotationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("invalid piece record: {0}")]
    Json(#[from] serde_json::Error),
    #[error("bar {bar}: {source}")]
    Bar {
        bar: usize,
        #[source]
        source: NotationError,
    },
    #[error(transparent)]
    Notation(#[from] NotationError),
}

pub type Result<T> = std::result::Result<T, ImportError>;
