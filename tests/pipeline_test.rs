//! End-to-end pipeline: parsed records -> piece -> windows -> MIDI -> corpus

use midly::{MetaMessage, MidiMessage, Smf, TrackEventKind};
use mud::import::{import_piece_json, ImportOptions};
use mud::renderers::midi::piece_to_midi;
use mud::{Corpus, KeyMode, Piece, Settings};

const TWO_BARS: &str = r#"{
    "name": "Minuet",
    "tonic": "A",
    "mode": "minor",
    "bars": [
        {
            "offset": 0.0,
            "length": 3.0,
            "events": [
                { "pitch": "A4", "onset": 0.0, "duration": 1.0 },
                { "pitch": "C5", "onset": 1.0, "duration": 0.5 },
                { "pitch": "E5", "onset": 1.5, "duration": 0.5 }
            ]
        },
        {
            "offset": 3.0,
            "events": [
                { "pitch": null, "onset": 0.0, "duration": 1.0 },
                { "pitch": "A", "onset": 1.0, "duration": 2.0 }
            ]
        }
    ]
}"#;

fn import(options: ImportOptions) -> Piece {
    import_piece_json(TWO_BARS, &Settings::default(), options).unwrap()
}

#[test]
fn test_import_builds_padded_bars() {
    let piece = import(ImportOptions::default());

    assert_eq!(piece.name(), "Minuet");
    assert_eq!(piece.mode(), Some(&KeyMode::Minor));
    assert_eq!(piece.key().as_deref(), Some("Am"));
    assert_eq!(piece.transposition_reference().unwrap().map(|p| p.name()).as_deref(), Some("C"));

    assert_eq!(piece.num_spans(), 2);
    // First bar padded from 2.0 to 3.0 beats with a rest
    assert_eq!(piece.bars()[0].num_events(), 4);
    assert!(piece.bars()[0][3].is_rest());
    assert_eq!(piece.length_in_beats(), 6.0);
    assert!(piece.is_monophonic());
}

#[test]
fn test_feature_windows_per_bar() {
    let piece = import(ImportOptions::default());
    let settings = Settings::default();

    let counts: Vec<Vec<usize>> = piece
        .bars()
        .iter()
        .map(|bar| settings.slices(bar).unwrap().map(|slice| slice.len()).collect())
        .collect();
    assert_eq!(counts, vec![vec![1, 2, 1], vec![1, 1, 0]]);
}

#[test]
fn test_flatten_uses_absolute_onsets() {
    let piece = import(ImportOptions { discard_rests: true });

    let onsets: Vec<f64> = piece.flatten().iter().map(|event| event.onset).collect();
    assert_eq!(onsets, vec![0.0, 1.0, 1.5, 4.0]);
    assert!(piece.flatten().iter().all(|event| event.pitch.is_some()));
}

#[test]
fn test_midi_export() {
    let piece = import(ImportOptions::default());
    let bytes = piece_to_midi(&piece, &Settings::default().midi).unwrap();

    let smf = Smf::parse(&bytes).unwrap();
    assert_eq!(smf.tracks.len(), 2);

    let mut tick = 0;
    let mut note_ons = Vec::new();
    for event in &smf.tracks[1] {
        tick += event.delta.as_int();
        match event.kind {
            TrackEventKind::Midi {
                message: MidiMessage::NoteOn { key, .. },
                ..
            } => note_ons.push((tick, key.as_int())),
            TrackEventKind::Meta(MetaMessage::TrackName(name)) => assert_eq!(name, b"Minuet"),
            _ => {}
        }
    }
    // A4, C5, E5, then A (octave 4 assumed) after the rest
    assert_eq!(note_ons, vec![(0, 69), (480, 72), (720, 76), (1920, 69)]);
}

#[test]
fn test_corpus_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("corpus.json");

    let mut corpus = Corpus::new();
    corpus.push(import(ImportOptions::default()));
    corpus.reject();
    corpus.save(&path).unwrap();

    let mut loaded = Corpus::load(&path).unwrap();
    assert_eq!(loaded, corpus);
    assert_eq!(loaded.num_rejected(), 1);

    loaded.discard_rests();
    assert_eq!(loaded.pieces()[0].count_events(), 4);
}
