#![doc = r#"
Hands a [`Song`] to a playback engine

The engine is only expected to queue notes and instrument loads at
absolute times and to accept one global tempo. [`timeline`] flattens the
first segment into that shape: subsegments are laid end to end, muted
tracks are dropped, and every audible track gets its own channel (track
index modulo 16).

Tempo interpolation is not performed during playback. The tempo in effect
at time zero is used for the whole song, and any other tempo command is
reported as [`Warning::TempoChangeDuringPlayback`].
"#]

use crate::{
    message::Channel,
    prelude::*,
    song::{CommandKind, InstrumentRef, InstrumentSettings, Song},
};
use alloc::vec::Vec;

/// A synthesizer-side sink for scheduled events. Times are microseconds from the start.
pub trait Player {
    /// Queue a note
    fn play_note(&mut self, time: u64, channel: Channel, pitch: u8, velocity: u8, duration: u64);
    /// Queue an instrument change
    fn load_instrument(&mut self, time: u64, channel: Channel, instrument: &InstrumentSettings);
    /// Set the global tempo
    fn set_tempo(&mut self, bpm: u32);
}

/// What happens at a [`ScheduledEvent`]'s time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Start a note
    PlayNote {
        /// MIDI key number
        pitch: u8,
        /// Strike velocity
        velocity: u8,
        /// Length in microseconds
        duration: u64,
    },
    /// Switch instrument
    LoadInstrument(InstrumentRef),
}

/// One entry of a flattened song.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledEvent {
    /// Microseconds from the start of the song
    pub time: u64,
    /// The channel assigned to the event's track
    pub channel: Channel,
    /// What to do
    pub action: Action,
}

/// A song flattened for playback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    /// The single tempo the song is played at
    pub bpm: u32,
    /// Events sorted by time. Events at the same time keep track order.
    pub events: Vec<ScheduledEvent>,
}

fn to_micros(quarter_notes: f64, bpm: u32) -> u64 {
    (quarter_notes * 60_000_000. / f64::from(bpm) + 0.5) as u64
}

/// Flatten the song's first segment.
pub fn timeline<W>(song: &Song, warnings: &mut W) -> Timeline
where
    W: WarningSink + ?Sized,
{
    let Some((_, segment)) = song.segments().next() else {
        return Timeline {
            bpm: crate::song::DEFAULT_BPM as u32,
            events: Vec::new(),
        };
    };
    let bpm = ((segment.tempo_at(0.) + 0.5) as u32).max(1);

    let mut events = Vec::new();
    let mut offset = 0.;
    for subsegment in segment.subsegments() {
        for (index, track) in subsegment.tracks().iter().enumerate() {
            if !subsegment.can_hear(index) {
                continue;
            }
            let channel = Channel::from_status((index % 16) as u8);
            for (time, command) in track.commands() {
                let time = offset + time;
                let action = match command.kind() {
                    CommandKind::Note(note) => Action::PlayNote {
                        pitch: note.pitch(),
                        velocity: note.velocity(),
                        duration: to_micros(note.duration(), bpm),
                    },
                    CommandKind::LoadInstrument(load) => Action::LoadInstrument(load.instrument),
                    CommandKind::SetTempo(tempo) => {
                        if tempo.bpm != bpm {
                            warnings.warn(Warning::TempoChangeDuringPlayback {
                                time,
                                bpm: tempo.bpm,
                            });
                        }
                        continue;
                    }
                };
                events.push(ScheduledEvent {
                    time: to_micros(time, bpm),
                    channel,
                    action,
                });
            }
        }
        offset += subsegment.duration();
    }
    events.sort_by_key(|event| event.time);

    Timeline { bpm, events }
}

/// Flatten `song` and feed it to `player`.
pub fn schedule<P, W>(song: &Song, player: &mut P, warnings: &mut W)
where
    P: Player + ?Sized,
    W: WarningSink + ?Sized,
{
    let timeline = timeline(song, warnings);
    player.set_tempo(timeline.bpm);
    for event in timeline.events {
        match event.action {
            Action::PlayNote {
                pitch,
                velocity,
                duration,
            } => player.play_note(event.time, event.channel, pitch, velocity, duration),
            Action::LoadInstrument(reference) => {
                if let Some(instrument) = song.resolve(reference) {
                    player.load_instrument(event.time, event.channel, instrument);
                }
            }
        }
    }
}

#[cfg(test)]
fn two_track_song() -> Song {
    use crate::song::{Command, TempoChange};

    let mut song = Song::new();
    let piano = song.add_instrument().id();
    let bass = song.add_instrument().id();
    let segment = song.add_segment().unwrap();
    segment.insert_tempo_change(TempoChange::new(0., 60.));
    let subsegment = segment.add_subsegment();

    let track = subsegment.add_track();
    track.insert_command(Command::load_instrument(0., piano));
    track.insert_command(Command::set_tempo(0., 60));
    track.insert_command(Command::note(1., 60, 100, 0.5));

    let track = subsegment.add_track();
    track.insert_command(Command::load_instrument(0., bass));
    track.insert_command(Command::note(0., 36, 90, 2.));
    track.insert_command(Command::set_tempo(2., 90));
    song
}

#[test]
fn flatten_sorted_by_time() {
    use pretty_assertions::assert_eq;

    let song = two_track_song();
    let mut warnings = Vec::new();
    let timeline = timeline(&song, &mut warnings);

    assert_eq!(timeline.bpm, 60);
    let summary: Vec<(u64, u8)> = timeline
        .events
        .iter()
        .map(|e| (e.time, e.channel.index()))
        .collect();
    assert_eq!(summary, alloc::vec![(0, 0), (0, 1), (0, 1), (1_000_000, 0)]);
    assert_eq!(
        timeline.events[3].action,
        Action::PlayNote {
            pitch: 60,
            velocity: 100,
            duration: 500_000
        }
    );
    assert_eq!(
        warnings,
        alloc::vec![Warning::TempoChangeDuringPlayback { time: 2., bpm: 90 }]
    );
}

#[test]
fn muted_tracks_are_skipped() {
    use crate::song::MuteState;

    let mut song = two_track_song();
    let subsegment = &mut song.segment_mut(0).unwrap().subsegments_mut()[0];
    subsegment.tracks_mut()[1].mute_state = MuteState::Mute;

    let timeline = timeline(&song, &mut IgnoreWarnings);
    assert!(timeline.events.iter().all(|e| e.channel == Channel::One));
}

#[test]
fn schedule_calls_the_player() {
    use alloc::{string::String, vec};
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct Log(Vec<String>);
    impl Player for Log {
        fn play_note(&mut self, time: u64, channel: Channel, pitch: u8, _: u8, duration: u64) {
            self.0
                .push(alloc::format!("note {time} {} {pitch} {duration}", channel.index()));
        }
        fn load_instrument(&mut self, time: u64, channel: Channel, instrument: &InstrumentSettings) {
            self.0.push(alloc::format!(
                "load {time} {} {}",
                channel.index(),
                instrument.volume
            ));
        }
        fn set_tempo(&mut self, bpm: u32) {
            self.0.push(alloc::format!("tempo {bpm}"));
        }
    }

    let mut log = Log::default();
    schedule(&two_track_song(), &mut log, &mut IgnoreWarnings);
    assert_eq!(
        log.0,
        vec![
            "tempo 60",
            "load 0 0 100",
            "load 0 1 100",
            "note 0 1 36 2000000",
            "note 1000000 0 60 500000",
        ]
    );
}
