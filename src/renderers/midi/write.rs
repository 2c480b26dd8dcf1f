use super::model::{Part, Score};
use super::{RenderError, Result};
use midly::{Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind};

/// Write a score to a Standard MIDI File (SMF) Format 1
pub fn write_smf(score: &Score, out: &mut Vec<u8>) -> Result<()> {
    let mut tracks = Vec::new();

    // Track 0: tempo map
    tracks.push(build_conductor_track(score));

    // Tracks 1+: one per part
    for part in &score.parts {
        tracks.push(build_part_track(part));
    }

    let smf = Smf {
        header: Header {
            format: Format::Parallel,
            timing: Timing::Metrical(score.tpq.into()),
        },
        tracks,
    };

    smf.write(out)
        .map_err(|e| RenderError::Midi(format!("Failed to write MIDI: {}", e)))?;

    Ok(())
}

/// An event at an absolute tick, plus a rank that orders simultaneous events
type TimedEvent<'a> = (u64, u8, TrackEventKind<'a>);

fn build_conductor_track<'a>(score: &Score) -> Track<'a> {
    let events: Vec<TimedEvent<'a>> = score
        .tempos
        .iter()
        .map(|tempo| {
            let microseconds_per_quarter = (60_000_000.0 / tempo.bpm) as u32;
            (
                tempo.tick,
                0,
                TrackEventKind::Meta(MetaMessage::Tempo(microseconds_per_quarter.into())),
            )
        })
        .collect();

    finish_track(events)
}

fn build_part_track(part: &Part) -> Track<'_> {
    let channel = part.channel.into();
    let mut events: Vec<TimedEvent> = vec![(0, 0, TrackEventKind::Meta(MetaMessage::TrackName(part.name.as_bytes())))];

    if let Some(program) = part.program {
        events.push((
            0,
            0,
            TrackEventKind::Midi {
                channel,
                message: MidiMessage::ProgramChange { program: program.into() },
            },
        ));
    }

    for note in &part.notes {
        events.push((
            note.start_tick,
            2,
            TrackEventKind::Midi {
                channel,
                message: MidiMessage::NoteOn {
                    key: note.pitch.into(),
                    vel: note.vel.into(),
                },
            },
        ));
        // Note offs sort before note ons on the same tick so repeated
        // pitches are not cut short
        events.push((
            note.start_tick + note.dur_tick,
            1,
            TrackEventKind::Midi {
                channel,
                message: MidiMessage::NoteOff {
                    key: note.pitch.into(),
                    vel: 0.into(),
                },
            },
        ));
    }

    finish_track(events)
}

/// Order events by tick, convert to delta times and close the track
fn finish_track(mut events: Vec<TimedEvent<'_>>) -> Track<'_> {
    events.sort_by_key(|(tick, rank, _)| (*tick, *rank));

    let mut track = convert_to_delta_times(events);
    track.push(TrackEvent {
        delta: 0.into(),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });
    track
}

/// Convert absolute tick times to delta times (time since previous event)
fn convert_to_delta_times(events: Vec<TimedEvent<'_>>) -> Track<'_> {
    let mut prev_tick = 0u64;
    events
        .into_iter()
        .map(|(tick, _, kind)| {
            let delta = tick.saturating_sub(prev_tick) as u32;
            prev_tick = tick;
            TrackEvent {
                delta: delta.into(),
                kind,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderers::midi::model::{Note, Tempo};

    fn score_with(notes: Vec<Note>) -> Score {
        Score {
            tpq: 480,
            tempos: vec![Tempo { tick: 0, bpm: 120.0 }],
            parts: vec![Part {
                name: "Melody".to_string(),
                channel: 0,
                program: Some(0),
                notes,
            }],
        }
    }

    fn note(start_tick: u64, dur_tick: u64, pitch: u8) -> Note {
        Note {
            start_tick,
            dur_tick,
            pitch,
            vel: 64,
        }
    }

    #[test]
    fn test_write_minimal_smf() {
        let mut out = Vec::new();
        write_smf(&score_with(vec![note(0, 480, 60)]), &mut out).expect("Failed to write SMF");

        assert_eq!(&out[0..4], b"MThd");
        // Format 1, conductor track + one part
        assert_eq!(&out[8..12], &[0x00, 0x01, 0x00, 0x02]);
        // 480 ticks per quarter
        assert_eq!(&out[12..14], &[0x01, 0xE0]);
    }

    #[test]
    fn test_delta_time_conversion() {
        let on = |key: u8| TrackEventKind::Midi {
            channel: 0.into(),
            message: MidiMessage::NoteOn {
                key: key.into(),
                vel: 64.into(),
            },
        };
        let track = convert_to_delta_times(vec![(0, 0, on(60)), (100, 0, on(62)), (200, 0, on(64))]);

        let deltas: Vec<u32> = track.iter().map(|e| e.delta.as_int()).collect();
        assert_eq!(deltas, vec![0, 100, 100]);
    }

    #[test]
    fn test_repeated_pitch_note_off_first() {
        let mut out = Vec::new();
        write_smf(&score_with(vec![note(0, 480, 60), note(480, 480, 60)]), &mut out).unwrap();

        let smf = Smf::parse(&out).unwrap();
        let kinds: Vec<(u32, bool)> = smf.tracks[1]
            .iter()
            .filter_map(|event| match event.kind {
                TrackEventKind::Midi {
                    message: MidiMessage::NoteOn { .. },
                    ..
                } => Some((event.delta.as_int(), true)),
                TrackEventKind::Midi {
                    message: MidiMessage::NoteOff { .. },
                    ..
                } => Some((event.delta.as_int(), false)),
                _ => None,
            })
            .collect();
        assert_eq!(kinds, vec![(0, true), (480, false), (0, true), (480, false)]);
    }

    #[test]
    fn test_chord_and_tempo() {
        let mut score = score_with(vec![note(0, 480, 60), note(0, 480, 64), note(0, 480, 67)]);
        score.tempos.push(Tempo { tick: 1920, bpm: 90.0 });

        let mut out = Vec::new();
        write_smf(&score, &mut out).unwrap();

        let smf = Smf::parse(&out).unwrap();
        let tempos: Vec<(u32, u32)> = smf.tracks[0]
            .iter()
            .filter_map(|event| match event.kind {
                TrackEventKind::Meta(MetaMessage::Tempo(t)) => Some((event.delta.as_int(), t.as_int())),
                _ => None,
            })
            .collect();
        assert_eq!(tempos, vec![(0, 500_000), (1920, 666_666)]);
        // Name, program, 3 ons, 3 offs, end of track
        assert_eq!(smf.tracks[1].len(), 9);
    }
}
