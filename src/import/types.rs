//! Records produced by an external notation parser
//!
//! All times are in quarter-note beats.

use serde::{Deserialize, Serialize};

/// One note or rest of a bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Pitch string such as "C#4" or "Bb"; `None` for a rest
    pub pitch: Option<String>,

    /// Onset relative to the start of the bar
    pub onset: f64,

    pub duration: f64,
}

impl EventRecord {
    pub fn note(pitch: &str, onset: f64, duration: f64) -> Self {
        EventRecord {
            pitch: Some(pitch.to_string()),
            onset,
            duration,
        }
    }

    pub fn rest(onset: f64, duration: f64) -> Self {
        EventRecord {
            pitch: None,
            onset,
            duration,
        }
    }
}

/// One bar (measure) of a piece
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarRecord {
    /// Start of the bar within the piece
    pub offset: f64,

    /// Nominal bar length (e.g. from the time signature). Short bars are
    /// padded with a trailing rest up to it.
    #[serde(default)]
    pub length: Option<f64>,

    pub events: Vec<EventRecord>,
}

/// A whole parsed piece
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PieceRecord {
    #[serde(default)]
    pub name: Option<String>,

    /// Tonic pitch string, e.g. "G" or "Eb"
    #[serde(default)]
    pub tonic: Option<String>,

    /// "major", "minor" or another mode name
    #[serde(default)]
    pub mode: Option<String>,

    pub bars: Vec<BarRecord>,
}
