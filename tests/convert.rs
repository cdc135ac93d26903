mod common;

use common::{TrackBytes, file};
use pretty_assertions::assert_eq;
use smf_song::{prelude::*, song::Track};

fn only_track(song: &Song) -> &Track {
    let tracks = song.segment(0).unwrap().subsegments()[0].tracks();
    assert_eq!(tracks.len(), 1);
    &tracks[0]
}

fn kinds(track: &Track) -> Vec<(f64, CommandKind)> {
    track
        .commands()
        .map(|(time, command)| (time, command.kind().clone()))
        .collect()
}

#[test]
fn single_note_with_tempo() {
    let track = TrackBytes::new()
        .tempo(0, 500_000)
        .note_on(0, 60, 100)
        .note_off(96, 60)
        .end(0);
    let song = load_song(&file(&[track]), &mut IgnoreWarnings).unwrap();

    let instrument = InstrumentRef::from(song.instruments()[0].id());
    let expected = vec![
        Command::load_instrument(0., instrument),
        Command::set_tempo(0., 120),
        Command::note(0., 60, 100, 1.),
    ];
    let track = only_track(&song);
    let commands: Vec<Command> = track.commands().map(|(_, c)| c.clone()).collect();
    assert_eq!(commands, expected);
    assert_eq!(track.duration(), 1.);

    let segment = song.segment(0).unwrap();
    assert_eq!(segment.tempo_changes(), &[TempoChange::new(0., 120.)]);
}

#[test]
fn commands_are_sorted_with_notes_last() {
    // the first note ends after the second starts, so it is inserted later
    let track = TrackBytes::new()
        .note_on(0, 60, 100)
        .note_on(48, 64, 100)
        .note_off(48, 60)
        .tempo(0, 600_000)
        .note_off(48, 64)
        .end(0);
    let song = load_song(&file(&[track]), &mut IgnoreWarnings).unwrap();

    let summary: Vec<(f64, bool)> = only_track(&song)
        .commands()
        .map(|(time, command)| (time, command.is_note()))
        .collect();
    assert_eq!(
        summary,
        vec![(0., false), (0., true), (0.5, true), (1., false)]
    );

    let times: Vec<f64> = summary.iter().map(|(time, _)| *time).collect();
    assert!(times.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn unterminated_notes_close_at_the_last_event() {
    let track = TrackBytes::new()
        .note_on(0, 60, 100)
        .note_on(0, 67, 80)
        .note_off(192, 67)
        .end(96);
    let song = load_song(&file(&[track]), &mut IgnoreWarnings).unwrap();

    let notes: Vec<(f64, CommandKind)> = kinds(only_track(&song))
        .into_iter()
        .filter(|(_, kind)| matches!(kind, CommandKind::Note(_)))
        .collect();
    let durations: Vec<(u8, f64)> = notes
        .iter()
        .map(|(_, kind)| match kind {
            CommandKind::Note(note) => (note.pitch(), note.duration()),
            _ => unreachable!(),
        })
        .collect();
    // both start at zero, so they keep the order they were closed in
    assert_eq!(durations, vec![(67, 2.), (60, 3.)]);
}

#[test]
fn zero_velocity_note_on_ends_a_note() {
    let track = TrackBytes::new()
        .note_on(0, 60, 100)
        .note_on(24, 60, 0)
        .end(0);
    let song = load_song(&file(&[track]), &mut IgnoreWarnings).unwrap();
    let track = only_track(&song);
    assert_eq!(track.duration(), 0.25);
    assert_eq!(track.commands().filter(|(_, c)| c.is_note()).count(), 1);
}

#[test]
fn setup_at_time_zero_configures_the_instrument() {
    let track = TrackBytes::new()
        .name(0, "Strings")
        .event(0, &[0xB0, 0x07, 90]) // volume
        .event(0, &[0x0A, 20]) // pan, running status
        .event(0, &[0xB0, 0x00, 1]) // bank msb
        .event(0, &[0xB0, 0x20, 2]) // bank lsb
        .event(0, &[0xB0, 0x5B, 40]) // reverb
        .event(0, &[0xB0, 0x40, 127]) // sustain is not an instrument setting
        .event(0, &[0xC0, 48])
        .end(0);
    let song = load_song(&file(&[track]), &mut IgnoreWarnings).unwrap();

    assert_eq!(song.name.as_deref(), Some("Strings"));
    let instrument = &song.instruments()[0];
    assert_eq!(instrument.name.as_deref(), Some("Strings"));
    assert_eq!(instrument.volume, 90);
    assert_eq!(instrument.pan, 20);
    assert_eq!(instrument.bank, (1 << 8) | 2);
    assert_eq!(instrument.reverb, 40);
    assert_eq!(instrument.patch, 48);
}

#[test]
fn timed_program_change_is_rejected_by_default() {
    let track = TrackBytes::new()
        .note_on(0, 60, 100)
        .event(96, &[0xC0, 5])
        .end(0);
    let bytes = file(&[track]);

    let err = load_song(&bytes, &mut IgnoreWarnings).unwrap_err();
    assert!(err.is_unsupported());
    assert_eq!(
        err,
        LoadError::Convert(ConvertError::unsupported(
            Some(0),
            UnsupportedFeature::TimedProgramChange {
                program: 5,
                ticks: 96
            },
        ))
    );
}

#[test]
fn timed_control_change_can_be_ignored() {
    let quiet = TrackBytes::new().end(0);
    let track = TrackBytes::new()
        .event(0, &[0xB0, 0x07, 100])
        .event(48, &[0xB0, 0x07, 30])
        .end(0);
    let midi = MidiFile::parse(&file(&[quiet, track]), &mut IgnoreWarnings).unwrap();

    let err = convert(&midi, &mut IgnoreWarnings).unwrap_err();
    assert_eq!(
        err,
        ConvertError::unsupported(
            Some(1),
            UnsupportedFeature::TimedControlChange {
                controller: 0x07,
                ticks: 48
            },
        )
    );

    let options =
        ConvertOptions::default().timed_instrument_changes(InstrumentChangePolicy::Warn);
    let mut warnings = Vec::new();
    let song = convert_with(&midi, options, &mut warnings).unwrap();
    assert_eq!(
        warnings,
        vec![Warning::TimedControlChange {
            track: 1,
            controller: 0x07,
            time: 0.5
        }]
    );
    assert_eq!(song.instruments()[1].volume, 100);
}

#[test]
fn format_two_is_rejected() {
    let mut bytes = common::header(2, 1, 96);
    bytes.extend(TrackBytes::new().end(0).chunk());

    let err = load_song(&bytes, &mut IgnoreWarnings).unwrap_err();
    assert_eq!(
        err,
        LoadError::Convert(ConvertError::unsupported(
            None,
            UnsupportedFeature::MultiSequence
        ))
    );
}

#[test]
fn tempo_changes_build_the_tempo_map() {
    let conductor = TrackBytes::new()
        .tempo(0, 500_000)
        .tempo(384, 750_000)
        .tempo(0, 0)
        .end(0);
    let melody = TrackBytes::new().note_on(0, 72, 64).note_off(480, 72).end(0);

    let mut warnings = Vec::new();
    let song = load_song(&file(&[conductor, melody]), &mut warnings).unwrap();
    assert_eq!(warnings, vec![Warning::ZeroTempo { track: 0 }]);

    let segment = song.segment(0).unwrap();
    assert_eq!(
        segment.tempo_changes(),
        &[TempoChange::new(0., 120.), TempoChange::new(4., 80.)]
    );
    assert_eq!(segment.tempo_at(2.), 120.);
    assert_eq!(segment.tempo_at(6.), 80.);
    assert_eq!(segment.subsegments()[0].tracks().len(), 2);
    assert_eq!(segment.subsegments()[0].duration(), 5.);
}

#[test]
fn conversion_is_deterministic() {
    let track = TrackBytes::new()
        .name(0, "Lead")
        .tempo(0, 461_538)
        .note_on(0, 60, 100)
        .note_on(12, 62, 100)
        .note_off(12, 60)
        .end(36);
    let bytes = file(&[track]);

    let mut first_warnings = Vec::new();
    let first = load_song(&bytes, &mut first_warnings).unwrap();
    let mut second_warnings = Vec::new();
    let second = load_song(&bytes, &mut second_warnings).unwrap();

    assert_eq!(first, second);
    assert_eq!(first_warnings, second_warnings);
}
