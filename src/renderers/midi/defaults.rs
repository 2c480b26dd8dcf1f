//! Default values for MIDI export
//!
//! Provides sensible defaults for tempo, velocity, channel assignment, etc.

/// Default tempo in beats per minute
pub const DEFAULT_TEMPO_BPM: f64 = 120.0;

/// Default MIDI velocity (1-127, where 64 is "normal")
pub const DEFAULT_VELOCITY: u8 = 64;

/// Default MIDI program (0 = Acoustic Grand Piano in General MIDI)
pub const DEFAULT_PROGRAM: u8 = 0;

/// Default ticks per quarter note. One beat is one quarter note.
pub const DEFAULT_TPQ: u16 = 480;

/// Octave assumed for pitch classes that carry none
pub const DEFAULT_OCTAVE: u8 = 4;

/// Assign a MIDI channel to the n-th piece of a multi-track export.
///
/// Channel 9 (drums in General MIDI) is skipped.
pub fn assign_channel(part_index: usize) -> u8 {
    let channel = part_index % 15;
    if channel >= 9 {
        (channel + 1) as u8
    } else {
        channel as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_channel() {
        assert_eq!(assign_channel(0), 0);
        assert_eq!(assign_channel(8), 8);
        assert_eq!(assign_channel(9), 10);  // Skip channel 9
        assert_eq!(assign_channel(14), 15);
        assert_eq!(assign_channel(15), 0);  // Wrap around
    }
}
