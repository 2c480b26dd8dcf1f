//! Canonical-duration quantizer
//!
//! Snaps a raw duration (in quarter notes) onto the closest entry of a fixed
//! table of note values. Table entries are kept as exact fractions so that
//! triplet values (1/6, 1/3, 2/3) do not depend on float spelling.
//!
//! A quantized duration of zero means "drop this event". The quantizer only
//! reports it; spans are the ones that refuse to store such events.

use num_rational::Ratio;

/// Allowed durations in quarter-note lengths, ascending
pub const QUANTIZED_DURATIONS: [Ratio<u32>; 15] = [
    Ratio::new_raw(0, 1),
    Ratio::new_raw(1, 16),
    Ratio::new_raw(1, 8),
    Ratio::new_raw(1, 6),
    Ratio::new_raw(1, 4),
    Ratio::new_raw(1, 3),
    Ratio::new_raw(1, 2),
    Ratio::new_raw(2, 3),
    Ratio::new_raw(1, 1),
    Ratio::new_raw(3, 2),
    Ratio::new_raw(2, 1),
    Ratio::new_raw(3, 1),
    Ratio::new_raw(4, 1),
    Ratio::new_raw(6, 1),
    Ratio::new_raw(8, 1),
];

fn ratio_to_f64(ratio: Ratio<u32>) -> f64 {
    *ratio.numer() as f64 / *ratio.denom() as f64
}

/// Exact table value for a duration label
pub fn label_ratio(label: usize) -> Option<Ratio<u32>> {
    QUANTIZED_DURATIONS.get(label).copied()
}

/// Table value for a duration label, in beats
pub fn label_beats(label: usize) -> Option<f64> {
    label_ratio(label).map(ratio_to_f64)
}

/// Closest table entry to `raw`, as (label, absolute error).
///
/// Ties go to the first (smaller) entry.
pub fn quantize_label(raw: f64) -> (usize, f64) {
    let mut best = (0, f64::INFINITY);
    for (label, &duration) in QUANTIZED_DURATIONS.iter().enumerate() {
        let error = (raw - ratio_to_f64(duration)).abs();
        if error < best.1 {
            best = (label, error);
        }
    }
    best
}

/// Closest table entry to `raw`, as (quantized beats, absolute error)
pub fn quantize(raw: f64) -> (f64, f64) {
    let (label, error) = quantize_label(raw);
    (ratio_to_f64(QUANTIZED_DURATIONS[label]), error)
}

/// Smallest non-zero duration in the table
pub fn resolution() -> f64 {
    QUANTIZED_DURATIONS
        .iter()
        .copied()
        .filter(|d| *d.numer() != 0)
        .map(ratio_to_f64)
        .fold(f64::INFINITY, f64::min)
}
