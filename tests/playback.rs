mod common;

use common::{TrackBytes, file};
use pretty_assertions::assert_eq;
use smf_song::{
    playback::{Action, timeline},
    prelude::*,
};

#[derive(Debug, PartialEq)]
enum Call {
    Tempo(u32),
    Load { time: u64, channel: u8, patch: u8 },
    Note { time: u64, channel: u8, pitch: u8, duration: u64 },
}

#[derive(Default)]
struct Recorder(Vec<Call>);

impl Player for Recorder {
    fn play_note(&mut self, time: u64, channel: Channel, pitch: u8, _velocity: u8, duration: u64) {
        self.0.push(Call::Note {
            time,
            channel: channel.index(),
            pitch,
            duration,
        });
    }

    fn load_instrument(&mut self, time: u64, channel: Channel, instrument: &InstrumentSettings) {
        self.0.push(Call::Load {
            time,
            channel: channel.index(),
            patch: instrument.patch,
        });
    }

    fn set_tempo(&mut self, bpm: u32) {
        self.0.push(Call::Tempo(bpm));
    }
}

#[test]
fn loaded_song_plays_at_its_initial_tempo() {
    let lead = TrackBytes::new()
        .tempo(0, 1_000_000)
        .event(0, &[0xC0, 40])
        .note_on(96, 60, 100)
        .note_off(48, 60)
        .end(0);
    let bass = TrackBytes::new()
        .event(0, &[0xC1, 33])
        .event(0, &[0x91, 36, 90])
        .event(192, &[0x81, 36, 0])
        .end(0);
    let song = load_song(&file(&[lead, bass]), &mut IgnoreWarnings).unwrap();

    let mut recorder = Recorder::default();
    let mut warnings = Vec::new();
    schedule(&song, &mut recorder, &mut warnings);

    assert!(warnings.is_empty());
    assert_eq!(
        recorder.0,
        vec![
            Call::Tempo(60),
            Call::Load {
                time: 0,
                channel: 0,
                patch: 40
            },
            Call::Load {
                time: 0,
                channel: 1,
                patch: 33
            },
            Call::Note {
                time: 0,
                channel: 1,
                pitch: 36,
                duration: 2_000_000
            },
            Call::Note {
                time: 1_000_000,
                channel: 0,
                pitch: 60,
                duration: 500_000
            },
        ]
    );
}

#[test]
fn later_tempo_changes_are_reported() {
    let track = TrackBytes::new()
        .tempo(0, 500_000)
        .note_on(0, 60, 100)
        .tempo(96, 250_000)
        .note_off(96, 60)
        .end(0);
    let song = load_song(&file(&[track]), &mut IgnoreWarnings).unwrap();

    let mut warnings = Vec::new();
    let timeline = timeline(&song, &mut warnings);

    assert_eq!(timeline.bpm, 120);
    assert_eq!(
        warnings,
        vec![Warning::TempoChangeDuringPlayback { time: 1., bpm: 240 }]
    );
    assert_eq!(
        timeline.events.last().map(|e| e.action),
        Some(Action::PlayNote {
            pitch: 60,
            velocity: 100,
            duration: 1_000_000
        })
    );
}

#[test]
fn empty_song_schedules_nothing() {
    let mut recorder = Recorder::default();
    schedule(&Song::new(), &mut recorder, &mut IgnoreWarnings);
    assert_eq!(recorder.0, vec![Call::Tempo(120)]);
}
