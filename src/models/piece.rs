//! A whole piece of music: an ordered list of spans ("bars") plus key metadata
//!
//! Pieces are what the feature-extraction layer walks (`bars()` →
//! `Span::generate_slices` → `TimeSlice::sliced_events`) and what export
//! flattens into one absolute timeline (`as_span`, `flatten`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::{NotationError, Result};
use super::event::Event;
use super::pitch::Pitch;
use super::span::Span;

/// Mode of a piece's key
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub enum KeyMode {
    Major,
    Minor,
    /// Any other mode name (dorian, lydian, ...), carried through unchanged
    Other(String),
}

impl KeyMode {
    pub fn as_str(&self) -> &str {
        match self {
            KeyMode::Major => "major",
            KeyMode::Minor => "minor",
            KeyMode::Other(mode) => mode,
        }
    }
}

impl From<&str> for KeyMode {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "major" => KeyMode::Major,
            "minor" => KeyMode::Minor,
            other => KeyMode::Other(other.to_string()),
        }
    }
}

impl FromStr for KeyMode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(KeyMode::from(s))
    }
}

impl fmt::Display for KeyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One event of a flattened piece, in absolute beats
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FlatEvent {
    /// `None` for rests
    pub pitch: Option<Pitch>,
    pub duration: f64,
    pub onset: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Piece {
    spans: Vec<Span>,
    tonic: Option<Pitch>,
    mode: Option<KeyMode>,
    name: Option<String>,
}

impl Piece {
    pub fn new() -> Self {
        Piece::default()
    }

    /// Piece made of the given bars, in order
    pub fn from_spans(spans: impl IntoIterator<Item = Span>) -> Self {
        Piece {
            spans: spans.into_iter().collect(),
            ..Piece::default()
        }
    }

    pub fn with_key(mut self, tonic: Pitch, mode: KeyMode) -> Self {
        self.tonic = Some(tonic);
        self.mode = Some(mode);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Piece name, empty when unnamed
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub fn bars(&self) -> &[Span] {
        &self.spans
    }

    pub fn bars_mut(&mut self) -> &mut [Span] {
        &mut self.spans
    }

    pub fn tonic(&self) -> Option<&Pitch> {
        self.tonic.as_ref()
    }

    pub fn mode(&self) -> Option<&KeyMode> {
        self.mode.as_ref()
    }

    /// Key name: "C" for major, "Am" for minor, "D dorian" otherwise
    pub fn key(&self) -> Option<String> {
        let tonic = self.tonic?.name();
        let key = match self.mode.as_ref()? {
            KeyMode::Major => tonic,
            KeyMode::Minor => format!("{}m", tonic),
            KeyMode::Other(mode) => format!("{} {}", tonic, mode),
        };
        Some(key)
    }

    /// Major tonic that key-relative logic is measured from.
    ///
    /// Major keys use their tonic, minor keys their relative major. Other
    /// modes are not supported. Returns `None` for pieces without a key.
    pub fn transposition_reference(&self) -> Result<Option<Pitch>> {
        let (tonic, mode) = match (self.tonic, self.mode.as_ref()) {
            (Some(tonic), Some(mode)) => (tonic, mode),
            _ => return Ok(None),
        };
        match mode {
            KeyMode::Major => Ok(Some(tonic.strip_octave())),
            KeyMode::Minor => {
                let relative_major = (tonic.relative_pitch() as i32 + 3) % 12;
                Pitch::new(relative_major, None).map(Some)
            }
            KeyMode::Other(mode) => Err(NotationError::UnsupportedMode(mode.clone())),
        }
    }

    /// All bars overlaid into one absolute, sorted timeline
    pub fn as_span(&self) -> Span {
        Span::overlay(&self.spans).unwrap_or_default()
    }

    /// Every event of the piece at its absolute onset, sorted
    pub fn events(&self) -> std::vec::IntoIter<Event> {
        self.as_span().into_events().into_iter()
    }

    /// Flat (pitch, duration, onset) stream for external renderers
    pub fn flatten(&self) -> Vec<FlatEvent> {
        self.as_span()
            .iter()
            .map(|event| FlatEvent {
                pitch: event.pitch().copied(),
                duration: event.duration().in_beats(),
                onset: event.time().in_beats(),
            })
            .collect()
    }

    pub fn count_events(&self) -> usize {
        self.spans.iter().map(Span::num_events).sum()
    }

    pub fn num_spans(&self) -> usize {
        self.spans.len()
    }

    /// Sum of the bar lengths
    pub fn length_in_beats(&self) -> f64 {
        self.spans.iter().map(Span::calculate_span_length).sum()
    }

    pub fn is_monophonic(&self) -> bool {
        self.as_span().is_monophonic()
    }

    pub fn discard_rests(&mut self) {
        for span in &mut self.spans {
            span.discard_rests();
        }
    }

    /// Re-quantize every onset and duration, bar by bar, without re-sorting.
    ///
    /// Returns the summed snapping error in beats. A non-positive resolution
    /// fails before any bar is touched.
    pub fn quantize_events(&mut self, resolution: f64) -> Result<f64> {
        let mut error = 0.0;
        for span in &mut self.spans {
            error += span.quantize_events(resolution)?;
        }
        Ok(error)
    }

    /// Snap every duration onto the canonical duration table.
    ///
    /// Returns the summed snapping error in beats.
    pub fn snap_durations(&mut self) -> f64 {
        self.spans.iter_mut().map(Span::snap_durations).sum()
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Piece: {}", self.name())?;
        if let Some(tonic) = &self.tonic {
            writeln!(f, "    tonic: {}", tonic)?;
        }
        if let Some(mode) = &self.mode {
            writeln!(f, "    mode: {}", mode)?;
        }
        for (i, bar) in self.spans.iter().enumerate() {
            let start = bar.offset().in_beats();
            writeln!(f, "    {{Span {}}} ({} to {}):", i, start, start + bar.calculate_span_length())?;
            for event in bar {
                writeln!(f, "        {}", event)?;
            }
        }
        Ok(())
    }
}
