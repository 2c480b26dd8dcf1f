//! Spans: offsetted, ordered collections of timed events
//!
//! A span usually holds one bar. Event onsets are relative to the span's
//! offset. Spans can be padded to a length, sorted, merged with other spans
//! (overlay for simultaneous material, concat for sequential material) and
//! cut into fixed-width windows for feature extraction.
//!
//! # Invariants
//!
//! - no event with a zero-length duration is ever stored
//! - after `sort`, events are ordered by onset, then by MIDI pitch
//!   (rests first, pitch classes placed in octave 4)
//! - `length()` is the latest event end, or zero for an empty span

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;

use super::error::{NotationError, Result};
use super::event::Event;
use super::notation::Notation;
use super::time::Time;
use super::timeslice::{Slices, TimeSlice};
use crate::config::DEFAULT_LENGTH_TOLERANCE;

/// Slack used when deciding whether two notes overlap
const OVERLAP_EPSILON: f64 = 0.000001;

/// How a span is built from its events
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpanOptions {
    /// Pad the span with a trailing rest up to this many beats
    pub length: Option<f64>,
    /// Sort events after construction
    pub sort: bool,
    /// Allowed slack between content length and `length`
    pub tolerance: f64,
}

impl Default for SpanOptions {
    fn default() -> Self {
        SpanOptions {
            length: None,
            sort: true,
            tolerance: DEFAULT_LENGTH_TOLERANCE,
        }
    }
}

impl SpanOptions {
    pub fn with_length(length: f64) -> Self {
        SpanOptions {
            length: Some(length),
            ..SpanOptions::default()
        }
    }

    pub fn unsorted() -> Self {
        SpanOptions {
            sort: false,
            ..SpanOptions::default()
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Span {
    events: Vec<Event>,
    offset: Time,
}

impl Span {
    /// Sorted span of `events` starting at `offset`; zero-length events are dropped
    pub fn new(events: impl IntoIterator<Item = Event>, offset: Time) -> Self {
        let mut span = Span {
            events: Vec::new(),
            offset,
        };
        for event in events {
            span.append_event(event);
        }
        span.sort();
        span
    }

    /// Build a span, optionally padding it to a length and skipping the sort.
    ///
    /// Fails with `MalformedSpanLength` when the events are longer than the
    /// requested length, or when padding cannot reach it.
    pub fn with_options(
        events: impl IntoIterator<Item = Event>,
        offset: Time,
        options: &SpanOptions,
    ) -> Result<Self> {
        let mut span = Span {
            events: Vec::new(),
            offset,
        };
        for event in events {
            span.append_event(event);
        }

        if let Some(length) = options.length {
            let actual = span.calculate_span_length();
            if actual > length + options.tolerance {
                return Err(NotationError::MalformedSpanLength { actual, requested: length });
            }
            span.pad_to_length(length);
            let padded = span.calculate_span_length();
            if padded < length - options.tolerance {
                return Err(NotationError::MalformedSpanLength { actual: padded, requested: length });
            }
        }

        if options.sort {
            span.sort();
        }
        Ok(span)
    }

    /// Build a span from (payload, onset) pairs
    pub fn from_pairs(
        pairs: impl IntoIterator<Item = (Notation, Time)>,
        offset: Time,
        options: &SpanOptions,
    ) -> Result<Self> {
        let events = pairs
            .into_iter()
            .map(|(notation, time)| Event::new(notation, time));
        Span::with_options(events, offset, options)
    }

    /// Add an event at the end, unless its duration is zero.
    ///
    /// Returns whether the event was kept. Does not re-sort.
    pub fn append_event(&mut self, event: Event) -> bool {
        if event.duration().is_zero() {
            log::debug!("Dropping zero-length event {}", event);
            return false;
        }
        self.events.push(event);
        true
    }

    /// Latest event end in beats, zero when empty
    pub fn calculate_span_length(&self) -> f64 {
        self.events
            .iter()
            .map(Event::end_in_beats)
            .fold(0.0, f64::max)
    }

    pub fn length(&self) -> Time {
        Time::unquantized(self.calculate_span_length())
    }

    pub fn offset(&self) -> &Time {
        &self.offset
    }

    pub fn num_events(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }

    /// Grid used for events created by the span itself (padding rests)
    fn grid(&self) -> Option<f64> {
        self.events
            .iter()
            .find_map(|event| event.time().resolution())
            .or(self.offset.resolution())
    }

    /// Append a rest covering the gap up to `length`; no-op if already that long
    pub fn pad_to_length(&mut self, length: f64) {
        let actual = self.calculate_span_length();
        if length <= actual {
            return;
        }
        let grid = self.grid();
        let rest = Notation::rest(length - actual, grid);
        self.append_event(Event::new(rest, Time::new(actual, grid)));
    }

    /// Stable sort by onset, then by pitch (rests first)
    pub fn sort(&mut self) {
        self.events.sort_by(Event::cmp_order);
    }

    /// Fold the offset into every event onset and reset the offset to zero
    pub fn move_offset_to_events(&mut self) {
        if self.offset.is_zero() {
            return;
        }
        let offset = self.offset;
        for event in &mut self.events {
            event.shift_by(&offset);
        }
        self.offset = Time::new(0.0, offset.resolution());
    }

    pub fn discard_rests(&mut self) {
        self.events.retain(|event| !event.is_rest());
    }

    /// Re-quantize every onset and duration onto `resolution`.
    ///
    /// Events whose duration collapses to zero are dropped. Does not re-sort.
    /// Returns the summed snapping error in beats, or `InvalidResolution`
    /// when `resolution` is not a positive number.
    pub fn quantize_events(&mut self, resolution: f64) -> Result<f64> {
        if !(resolution > 0.0) {
            return Err(NotationError::InvalidResolution(resolution));
        }
        let mut error = 0.0;
        for event in &mut self.events {
            error += event.unwrap_mut().duration_mut().quantize_to(resolution);
            error += event.time_mut().quantize_to(resolution);
        }
        self.drop_zero_length_events();
        Ok(error)
    }

    /// Snap every duration onto the canonical duration table.
    ///
    /// Events snapped to zero are dropped. Returns the summed snapping error.
    pub fn snap_durations(&mut self) -> f64 {
        let error: f64 = self
            .events
            .iter_mut()
            .map(|event| event.unwrap_mut().snap_duration())
            .sum();
        self.drop_zero_length_events();
        error
    }

    fn drop_zero_length_events(&mut self) {
        let before = self.events.len();
        self.events.retain(|event| !event.duration().is_zero());
        let dropped = before - self.events.len();
        if dropped > 0 {
            log::debug!("Dropped {} events quantized to zero length", dropped);
        }
    }

    /// Whether no two notes sound at the same time (rests are ignored)
    pub fn is_monophonic(&self) -> bool {
        let mut notes: Vec<&Event> = self.events.iter().filter(|e| e.is_note()).collect();
        notes.sort_by(|a, b| a.cmp_order(b));
        let mut sounding_until = f64::NEG_INFINITY;
        for note in notes {
            if note.time().in_beats() + OVERLAP_EPSILON < sounding_until {
                return false;
            }
            sounding_until = sounding_until.max(note.end_in_beats());
        }
        true
    }

    /// View of the events with onset in `[start, end)` beats
    pub fn get_slice(&self, start: f64, end: f64) -> TimeSlice<'_> {
        TimeSlice::new(self, start, end)
    }

    /// Consecutive windows `slice_resolution` beats wide, starting at zero,
    /// for as long as the window start is before the end of the span.
    ///
    /// The last window may extend past the span's end.
    pub fn generate_slices(&self, slice_resolution: f64) -> Result<Slices<'_>> {
        if !(slice_resolution > 0.0) {
            return Err(NotationError::InvalidSliceResolution(slice_resolution));
        }
        Ok(Slices::new(self, slice_resolution))
    }

    /// Merge spans into one timeline of simultaneous material.
    ///
    /// Every event of every span is kept, with offsets folded into onsets.
    /// The result has a zero offset and is sorted. Inputs are not modified.
    pub fn overlay<'a>(spans: impl IntoIterator<Item = &'a Span>) -> Result<Span> {
        let mut spans = spans.into_iter();
        let first = spans.next().ok_or(NotationError::NotASpan("overlay"))?;

        let mut result = first.clone();
        result.move_offset_to_events();
        for span in spans {
            result
                .events
                .extend(span.events.iter().map(|event| event.shifted(&span.offset)));
        }
        debug_assert!(result.offset.is_zero());
        result.sort();
        Ok(result)
    }

    /// Place spans one after another.
    ///
    /// Each span's events are shifted by the summed length of the spans
    /// before it; offsets are ignored. The result has a zero offset and is sorted.
    pub fn concat<'a>(spans: impl IntoIterator<Item = &'a Span>) -> Result<Span> {
        let mut spans = spans.into_iter().peekable();
        let first = spans.peek().ok_or(NotationError::NotASpan("concat"))?;

        let mut result = Span {
            events: Vec::new(),
            offset: Time::new(0.0, first.offset.resolution()),
        };
        let mut cursor = 0.0;
        for span in spans {
            let shift = Time::unquantized(cursor);
            result
                .events
                .extend(span.events.iter().map(|event| event.shifted(&shift)));
            cursor += span.calculate_span_length();
        }
        result.sort();
        Ok(result)
    }
}

impl Index<usize> for Span {
    type Output = Event;

    fn index(&self, index: usize) -> &Event {
        &self.events[index]
    }
}

impl<'a> IntoIterator for &'a Span {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Span[length={}, offset={}, (",
            self.calculate_span_length(),
            self.offset
        )?;
        for (i, event) in self.events.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", event)?;
        }
        write!(f, ")]")
    }
}
