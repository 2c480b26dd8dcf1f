//! Windowed views over a span's events, used to scope feature extraction

use super::event::Event;
use super::span::Span;

/// Onsets this close below a window boundary count as on the boundary
const BOUNDARY_EPSILON: f64 = 0.000000001;

/// The events of a span whose onset lies in `[start, end)` beats.
///
/// Borrows the events; nothing is copied or transformed.
#[derive(Clone, Debug)]
pub struct TimeSlice<'a> {
    start: f64,
    end: f64,
    events: Vec<&'a Event>,
}

impl<'a> TimeSlice<'a> {
    pub fn new(span: &'a Span, start: f64, end: f64) -> Self {
        let events = span
            .iter()
            .filter(|event| {
                let onset = event.time().in_beats() + BOUNDARY_EPSILON;
                onset >= start && onset < end
            })
            .collect();
        TimeSlice { start, end, events }
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn sliced_events(&self) -> &[&'a Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Lazily produced windows over a span, see `Span::generate_slices`.
///
/// The span's length is read once, when the iterator is created. Call
/// `generate_slices` again to start over.
#[derive(Clone, Debug)]
pub struct Slices<'a> {
    span: &'a Span,
    width: f64,
    span_length: f64,
    index: usize,
}

impl<'a> Slices<'a> {
    pub(crate) fn new(span: &'a Span, width: f64) -> Self {
        Slices {
            span,
            width,
            span_length: span.calculate_span_length(),
            index: 0,
        }
    }
}

impl<'a> Iterator for Slices<'a> {
    type Item = TimeSlice<'a>;

    fn next(&mut self) -> Option<TimeSlice<'a>> {
        let start = self.index as f64 * self.width;
        if start >= self.span_length {
            return None;
        }
        self.index += 1;
        Some(self.span.get_slice(start, start + self.width))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Notation, Time};

    fn span_of(onsets: &[f64]) -> Span {
        let events = onsets.iter().map(|&at| {
            Event::new(Notation::rest(0.5, Some(0.25)), Time::new(at, Some(0.25)))
        });
        Span::new(events, Time::zero())
    }

    #[test]
    fn test_half_open_window() {
        let span = span_of(&[0.0, 0.5, 1.0, 1.5]);
        let slice = span.get_slice(0.5, 1.0);
        assert_eq!(slice.len(), 1);
        assert_eq!(slice.sliced_events()[0].time().in_beats(), 0.5);
        assert_eq!(slice.start(), 0.5);
        assert_eq!(slice.end(), 1.0);
    }

    #[test]
    fn test_slice_borrows_span_events() {
        let span = span_of(&[0.0]);
        let slice = span.get_slice(0.0, 1.0);
        assert!(std::ptr::eq(slice.sliced_events()[0], &span[0]));
    }

    #[test]
    fn test_onset_just_below_boundary_belongs_to_next_window() {
        let span = Span::new(
            // Sums to 0.9999999999999999
            vec![Event::new(Notation::rest(1.0, None), Time::unquantized(0.7 + 0.1 + 0.1 + 0.1))],
            Time::zero(),
        );
        assert!(span.get_slice(0.0, 1.0).is_empty());
        assert_eq!(span.get_slice(1.0, 2.0).len(), 1);
    }

    #[test]
    fn test_slices_are_restartable() {
        let span = span_of(&[0.0, 1.0, 2.0]);
        let first: Vec<usize> = span.generate_slices(0.5).unwrap().map(|s| s.len()).collect();
        let second: Vec<usize> = span.generate_slices(0.5).unwrap().map(|s| s.len()).collect();
        assert_eq!(first, vec![1, 0, 1, 0, 1]);
        assert_eq!(first, second);
    }
}
