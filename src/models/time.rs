//! Beat-based time representation.
//!
//! A `Time` is a position (or length) in quarter-note beats, optionally
//! quantized onto a grid of `resolution` beats. Quantized times compare by
//! grid step count rather than by raw float, so values that went through
//! different arithmetic still compare equal when they land on the same step.
//!
//! Rounding onto the grid is round-half-away-from-zero (`f64::round`).

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::Add;

use super::error::{NotationError, Result};

/// Times closer to zero than this are treated as zero
const ZERO_EPSILON: f64 = 0.000001;

#[derive(Serialize, Deserialize, Clone, Copy, Debug)]
pub struct Time {
    beats: f64,
    resolution: Option<f64>,
}

impl Time {
    /// Create a time, snapping it onto the `resolution` grid when one is given.
    ///
    /// The snapping error is discarded; use `quantize_to` to observe it.
    pub fn new(beats: f64, resolution: Option<f64>) -> Self {
        let mut time = Time {
            beats,
            resolution: None,
        };
        if let Some(resolution) = resolution {
            time.quantize_to(resolution);
        }
        time
    }

    /// A raw, unquantized time
    pub fn unquantized(beats: f64) -> Self {
        Time {
            beats,
            resolution: None,
        }
    }

    pub fn zero() -> Self {
        Time::unquantized(0.0)
    }

    /// Snap onto a new grid, returning the absolute snapping error in beats.
    pub fn quantize_to(&mut self, resolution: f64) -> f64 {
        debug_assert!(resolution > 0.0, "resolution must be positive, got {}", resolution);
        let old = self.beats;
        self.resolution = Some(resolution);
        self.beats = resolution * (old / resolution).round();
        (old - self.beats).abs()
    }

    /// Copy of this time snapped onto the given grid
    pub fn as_quantized(&self, resolution: f64) -> Self {
        let mut time = *self;
        time.quantize_to(resolution);
        time
    }

    pub fn resolution(&self) -> Option<f64> {
        self.resolution
    }

    pub fn is_quantized(&self) -> bool {
        self.resolution.is_some()
    }

    pub fn in_beats(&self) -> f64 {
        self.beats
    }

    /// Number of grid steps from zero.
    ///
    /// Quantized values always sit on the grid, so rounding the quotient
    /// recovers the exact step count without float truncation drift.
    pub fn in_resolution_steps(&self) -> Result<i64> {
        let resolution = self
            .resolution
            .ok_or(NotationError::Unquantized(self.beats))?;
        Ok(steps(self.beats, resolution))
    }

    pub fn is_zero(&self) -> bool {
        self.beats.abs() < ZERO_EPSILON
    }

    /// Total ordering of time positions, used to sort events.
    ///
    /// Positions are compared in beats, rounded to `POSITION_EPSILON` so that
    /// the same point reached on different grids sorts as equal. The grid
    /// itself plays no part, which keeps the order transitive across mixed
    /// and unquantized times.
    pub fn cmp_position(&self, other: &Self) -> Ordering {
        position_key(self.beats).cmp(&position_key(other.beats))
    }
}

/// Times closer together than this share a sorting position
const POSITION_EPSILON: f64 = 0.000000001;

fn position_key(beats: f64) -> i64 {
    (beats / POSITION_EPSILON).round() as i64
}

fn steps(beats: f64, resolution: f64) -> i64 {
    (beats / resolution).round() as i64
}

impl Default for Time {
    fn default() -> Self {
        Time::zero()
    }
}

impl PartialEq for Time {
    fn eq(&self, other: &Self) -> bool {
        // Differing grids: re-quantize both onto the smaller resolution present
        let resolution = match (self.resolution, other.resolution) {
            (None, None) => return self.beats == other.beats,
            (Some(a), Some(b)) => a.min(b),
            (Some(r), None) | (None, Some(r)) => r,
        };
        steps(self.beats, resolution) == steps(other.beats, resolution)
    }
}

/// Adding two times gives a fresh, unquantized time; re-quantize as needed.
impl Add for Time {
    type Output = Time;

    fn add(self, other: Time) -> Time {
        Time::unquantized(self.beats + other.beats)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.resolution {
            Some(resolution) => write!(
                f,
                "Time[{}, resolution={}, steps={}]",
                self.beats,
                resolution,
                steps(self.beats, resolution)
            ),
            None => write!(f, "Time[{}]", self.beats),
        }
    }
}
