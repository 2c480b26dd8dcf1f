//! Collections of pieces and their persistence
//!
//! A `Corpus` is an ordered list of pieces plus a count of pieces that were
//! rejected on the way in. The whole graph serializes to an opaque byte
//! blob (JSON) so a prepared corpus can be stored and reloaded.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::models::Piece;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to access corpus file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid corpus data: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CorpusError>;

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Corpus {
    pieces: Vec<Piece>,
    num_rejected: usize,
}

impl Corpus {
    pub fn new() -> Self {
        Corpus::default()
    }

    pub fn from_pieces(pieces: impl IntoIterator<Item = Piece>) -> Self {
        Corpus {
            pieces: pieces.into_iter().collect(),
            num_rejected: 0,
        }
    }

    pub fn push(&mut self, piece: Piece) {
        self.pieces.push(piece);
    }

    /// Add `piece` if it passes every filter, otherwise count it as rejected.
    ///
    /// Returns whether the piece was kept.
    pub fn push_filtered(&mut self, piece: Piece, filters: &[&dyn Fn(&Piece) -> bool]) -> bool {
        if filters.iter().all(|passes| passes(&piece)) {
            self.pieces.push(piece);
            true
        } else {
            log::debug!("Rejected piece '{}'", piece.name());
            self.num_rejected += 1;
            false
        }
    }

    /// Drop pieces that fail `keep`, counting them as rejected
    pub fn filter(&mut self, keep: impl Fn(&Piece) -> bool) {
        let before = self.pieces.len();
        self.pieces.retain(|piece| keep(piece));
        self.num_rejected += before - self.pieces.len();
    }

    /// Count a piece that failed to load
    pub fn reject(&mut self) {
        self.num_rejected += 1;
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Piece> {
        self.pieces.iter()
    }

    pub fn size(&self) -> usize {
        self.pieces.len()
    }

    pub fn num_rejected(&self) -> usize {
        self.num_rejected
    }

    pub fn discard_rests(&mut self) {
        for piece in &mut self.pieces {
            piece.discard_rests();
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes).map_err(|source| CorpusError::Io {
            path: path.display().to_string(),
            source,
        })?;
        log::info!("Saved corpus of {} pieces to {}", self.size(), path.display());
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| CorpusError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let corpus = Corpus::from_bytes(&bytes)?;
        log::info!("Loaded corpus of {} pieces from {}", corpus.size(), path.display());
        Ok(corpus)
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a Piece;
    type IntoIter = std::slice::Iter<'a, Piece>;

    fn into_iter(self) -> Self::IntoIter {
        self.pieces.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Event, KeyMode, Notation, Pitch, Span, Time};

    const RES: Option<f64> = Some(1.0 / 48.0);

    fn piece(name: &str, with_rest: bool) -> Piece {
        let mut events = vec![Event::new(
            Notation::parse_note("C4", 1.0, RES).unwrap(),
            Time::new(0.0, RES),
        )];
        if with_rest {
            events.push(Event::new(Notation::rest(1.0, RES), Time::new(1.0, RES)));
        }
        Piece::from_spans(vec![Span::new(events, Time::new(0.0, RES))])
            .with_name(name)
            .with_key("C".parse::<Pitch>().unwrap(), KeyMode::Major)
    }

    #[test]
    fn test_filters_count_rejections() {
        let mut corpus = Corpus::new();
        let monophonic = |p: &Piece| p.is_monophonic();
        let short = |p: &Piece| p.length_in_beats() < 1.5;

        assert!(corpus.push_filtered(piece("a", false), &[&monophonic, &short]));
        assert!(!corpus.push_filtered(piece("b", true), &[&monophonic, &short]));
        corpus.reject();

        assert_eq!(corpus.size(), 1);
        assert_eq!(corpus.num_rejected(), 2);

        corpus.push(piece("c", true));
        corpus.filter(|p| p.name() != "c");
        assert_eq!(corpus.size(), 1);
        assert_eq!(corpus.num_rejected(), 3);
    }

    #[test]
    fn test_discard_rests() {
        let mut corpus = Corpus::from_pieces(vec![piece("a", true), piece("b", true)]);
        corpus.discard_rests();
        assert!(corpus.iter().all(|p| p.count_events() == 1));
    }

    #[test]
    fn test_bytes_round_trip() {
        let mut corpus = Corpus::from_pieces(vec![piece("a", true)]);
        corpus.reject();

        let restored = Corpus::from_bytes(&corpus.to_bytes().unwrap()).unwrap();
        assert_eq!(restored, corpus);
        assert_eq!(restored.pieces()[0].key().as_deref(), Some("C"));
        assert_eq!(restored.num_rejected(), 1);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.json");
        let corpus = Corpus::from_pieces(vec![piece("a", false), piece("b", true)]);

        corpus.save(&path).unwrap();
        assert_eq!(Corpus::load(&path).unwrap(), corpus);

        assert!(matches!(
            Corpus::load(dir.path().join("missing.json")),
            Err(CorpusError::Io { .. })
        ));
        std::fs::write(&path, b"not json").unwrap();
        assert!(matches!(Corpus::load(&path), Err(CorpusError::Json(_))));
    }
}
