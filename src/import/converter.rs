//! Record-to-model conversion
//!
//! Converts parsed bar records into the internal `Span`/`Piece` representation.

use crate::config::Settings;
use crate::import::types::{BarRecord, EventRecord, PieceRecord};
use crate::import::{ImportError, Result};
use crate::models::{self, KeyMode, Notation, Piece, Pitch, Span, Time};

/// Options applied while importing a piece
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportOptions {
    /// Remove every rest after import
    pub discard_rests: bool,
}

impl Span {
    /// Build one span from a bar record.
    ///
    /// Onsets, durations and the offset are quantized with `settings`;
    /// zero-length records are dropped and the result is sorted.
    pub fn from_bar(bar: &BarRecord, settings: &Settings) -> models::Result<Span> {
        let pairs = bar
            .events
            .iter()
            .map(|record| convert_event(record, settings))
            .collect::<models::Result<Vec<(Notation, Time)>>>()?;
        Span::from_pairs(pairs, settings.time(bar.offset), &settings.span_options(bar.length))
    }
}

fn convert_event(record: &EventRecord, settings: &Settings) -> models::Result<(Notation, Time)> {
    let notation = match &record.pitch {
        Some(pitch) => Notation::parse_note(pitch, record.duration, settings.resolution)?,
        None => Notation::rest(record.duration, settings.resolution),
    };
    Ok((notation, settings.time(record.onset)))
}

/// Convert a parsed piece into a `Piece`, one span per bar
pub fn import_piece(record: &PieceRecord, settings: &Settings, options: ImportOptions) -> Result<Piece> {
    let spans = record
        .bars
        .iter()
        .enumerate()
        .map(|(bar, bar_record)| {
            Span::from_bar(bar_record, settings).map_err(|source| ImportError::Bar { bar, source })
        })
        .collect::<Result<Vec<Span>>>()?;

    let mut piece = Piece::from_spans(spans);

    match (&record.tonic, &record.mode) {
        (Some(tonic), Some(mode)) => {
            let tonic: Pitch = tonic.parse()?;
            let mode = KeyMode::from(mode.as_str());
            piece = piece.with_key(tonic, mode);
        }
        (None, None) => {}
        _ => log::warn!(
            "Ignoring incomplete key for piece '{}': a tonic and a mode are both required",
            record.name.as_deref().unwrap_or_default()
        ),
    }

    if let Some(name) = &record.name {
        piece = piece.with_name(name.clone());
    }

    if options.discard_rests {
        piece.discard_rests();
    }

    log::debug!(
        "Imported piece '{}': {} bars, {} events",
        piece.name(),
        piece.num_spans(),
        piece.count_events()
    );
    Ok(piece)
}

/// Parse a JSON-encoded `PieceRecord` and import it
pub fn import_piece_json(json: &str, settings: &Settings, options: ImportOptions) -> Result<Piece> {
    let record: PieceRecord = serde_json::from_str(json)?;
    import_piece(&record, settings, options)
}
