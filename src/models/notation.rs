//! Musical payloads carried by events: notes and rests
//!
//! Both carry a duration (a `Time` in beats); notes also carry a pitch.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::duration;
use super::error::Result;
use super::pitch::Pitch;
use super::time::Time;

/// Table values within this distance of a grid point count as on the grid
const ON_GRID_EPSILON: f64 = 0.000000001;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum Notation {
    Note { pitch: Pitch, duration: Time },
    Rest { duration: Time },
}

impl Notation {
    /// A note lasting `beats`, quantized to `resolution`
    pub fn note(pitch: Pitch, beats: f64, resolution: Option<f64>) -> Self {
        Notation::Note {
            pitch,
            duration: Time::new(beats, resolution),
        }
    }

    /// A note from a pitch string such as "C4" or "Bb"
    pub fn parse_note(pitch: &str, beats: f64, resolution: Option<f64>) -> Result<Self> {
        Ok(Notation::note(pitch.parse()?, beats, resolution))
    }

    /// A rest lasting `beats`, quantized to `resolution`
    pub fn rest(beats: f64, resolution: Option<f64>) -> Self {
        Notation::Rest {
            duration: Time::new(beats, resolution),
        }
    }

    pub fn is_note(&self) -> bool {
        matches!(self, Notation::Note { .. })
    }

    pub fn is_rest(&self) -> bool {
        matches!(self, Notation::Rest { .. })
    }

    /// Pitch of a note; rests have none
    pub fn pitch(&self) -> Option<&Pitch> {
        match self {
            Notation::Note { pitch, .. } => Some(pitch),
            Notation::Rest { .. } => None,
        }
    }

    pub fn duration(&self) -> &Time {
        match self {
            Notation::Note { duration, .. } | Notation::Rest { duration } => duration,
        }
    }

    pub fn duration_mut(&mut self) -> &mut Time {
        match self {
            Notation::Note { duration, .. } | Notation::Rest { duration } => duration,
        }
    }

    /// Snap the duration onto the canonical duration table.
    ///
    /// The duration keeps its grid only when the table value lies on it;
    /// otherwise it is stored unquantized. Returns the snapping error in beats.
    pub fn snap_duration(&mut self) -> f64 {
        let current = self.duration_mut();
        let raw = current.in_beats();
        let (snapped, _) = duration::quantize(raw);
        *current = match current.resolution() {
            Some(resolution) => {
                let on_grid = Time::new(snapped, Some(resolution));
                if (on_grid.in_beats() - snapped).abs() < ON_GRID_EPSILON {
                    on_grid
                } else {
                    log::debug!("Duration {} is off the {} beat grid, storing it unquantized", snapped, resolution);
                    Time::unquantized(snapped)
                }
            }
            None => Time::unquantized(snapped),
        };
        (raw - current.in_beats()).abs()
    }
}

impl fmt::Display for Notation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notation::Note { pitch, duration } => {
                write!(f, "Note [ '{}', {} ]", pitch.name(), duration.in_beats())
            }
            Notation::Rest { duration } => write!(f, "Rest [ {} ]", duration.in_beats()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RES: Option<f64> = Some(1.0 / 48.0);

    #[test]
    fn test_note_surface() {
        let note = Notation::parse_note("C4", 1.0, RES).unwrap();
        assert!(note.is_note());
        assert!(!note.is_rest());
        assert_eq!(note.pitch().map(Pitch::name), Some("C4".to_string()));
        assert_eq!(note.duration().in_beats(), 1.0);
    }

    #[test]
    fn test_rest_surface() {
        let rest = Notation::rest(2.0, RES);
        assert!(rest.is_rest());
        assert!(rest.pitch().is_none());
        assert_eq!(rest.duration().in_beats(), 2.0);
    }

    #[test]
    fn test_parse_note_invalid_pitch() {
        assert!(Notation::parse_note("Q4", 1.0, RES).is_err());
    }

    #[test]
    fn test_duration_is_quantized() {
        let note = Notation::parse_note("A4", 0.26, Some(0.25)).unwrap();
        assert_eq!(note.duration().in_beats(), 0.25);
        assert!(Notation::rest(0.001, RES).duration().is_zero());
    }

    #[test]
    fn test_snap_duration() {
        let mut rest = Notation::rest(1.4, None);
        let error = rest.snap_duration();
        assert_eq!(rest.duration().in_beats(), 1.5);
        assert!((error - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_snap_duration_off_grid_table_value() {
        // 0.17 is stored as 0.2 on the 0.1 grid, whose closest table entry is 1/6
        let mut rest = Notation::rest(0.17, Some(0.1));
        let error = rest.snap_duration();
        assert_eq!(rest.duration().in_beats(), 1.0 / 6.0);
        assert!(!rest.duration().is_quantized());
        assert!((error - (0.2 - 1.0 / 6.0)).abs() < 1e-9);
    }

    #[test]
    fn test_snap_duration_keeps_fine_grid() {
        let mut note = Notation::parse_note("C4", 0.7, RES).unwrap();
        note.snap_duration();
        assert_eq!(note.duration().resolution(), RES);
        assert!((note.duration().in_beats() - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_display() {
        let note = Notation::parse_note("Eb5", 0.5, RES).unwrap();
        assert_eq!(note.to_string(), "Note [ 'Eb5', 0.5 ]");
        assert_eq!(Notation::rest(3.0, RES).to_string(), "Rest [ 3 ]");
    }
}
