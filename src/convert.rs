#![doc = r#"
Replays a decoded [`MidiFile`] into a [`Song`]

The conversion effectively performs the file in memory: a running clock
(in quarter notes) advances by each event's delta time, notes are held
open from note-on until the matching note-off so their lengths are known,
and instrument setup at time zero is folded into the track's instrument.

Every MIDI track becomes one [`SongTrack`] in the first subsegment of the
first segment, with exactly one [`Instrument`] of its own. Files that
reuse one channel for several instruments, or spread one instrument
across tracks, are converted on a best-effort basis only.

# Example
```rust
# use smf_song::prelude::*;
let bytes = [
    b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 0, 0, 1, 0, 96,
    b'M', b'T', b'r', b'k', 0, 0, 0, 12,
    0x00, 0x90, 60, 100, // note on
    0x60, 0x80, 60, 0, // note off a quarter note later
    0x00, 0xFF, 0x2F, 0x00,
];
let file = MidiFile::parse(&bytes, &mut IgnoreWarnings).unwrap();
let song = convert(&file, &mut IgnoreWarnings).unwrap();

let track = &song.segment(0).unwrap().subsegments()[0].tracks()[0];
assert_eq!(track.commands().count(), 2);
assert_eq!(track.duration(), 1.);
```
"#]

use crate::{
    ConvertError, UnsupportedFeature,
    events::{MetaMessage, TrackEvent, TrackMessage},
    file::{FormatType, MidiFile, Timing},
    message::{Channel, VoiceEvent},
    prelude::*,
    song::{
        Command, CommandKind, Instrument, SetTempoCmd, Song, TempoChange, Track as SongTrack,
    },
};
use alloc::{string::String, vec::Vec};
use num_enum::TryFromPrimitive;

/// What to do when a track changes its instrument after time zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InstrumentChangePolicy {
    /// Fail with [`UnsupportedFeature::TimedControlChange`] or
    /// [`UnsupportedFeature::TimedProgramChange`]
    #[default]
    Reject,
    /// Ignore the change and report a [`Warning`]
    Warn,
}

/// Settings for [`convert_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConvertOptions {
    /// Handling of control and program changes after time zero
    pub timed_instrument_changes: InstrumentChangePolicy,
}

impl ConvertOptions {
    /// Set the policy for instrument changes after time zero
    pub const fn timed_instrument_changes(mut self, policy: InstrumentChangePolicy) -> Self {
        self.timed_instrument_changes = policy;
        self
    }
}

/// Controllers that set up a track's instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
enum InstrumentController {
    BankSelectMsb = 0x00,
    Volume = 0x07,
    Pan = 0x0A,
    BankSelectLsb = 0x20,
    Reverb = 0x5B,
}

impl InstrumentController {
    fn apply(self, instrument: &mut Instrument, value: u8) {
        match self {
            Self::BankSelectMsb => instrument.set_bank_msb(value),
            Self::BankSelectLsb => instrument.set_bank_lsb(value),
            Self::Volume => instrument.volume = value,
            Self::Pan => instrument.pan = value,
            Self::Reverb => instrument.reverb = value,
        }
    }
}

/// Convert with the default [`ConvertOptions`].
pub fn convert<W>(file: &MidiFile, warnings: &mut W) -> Result<Song, ConvertError>
where
    W: WarningSink + ?Sized,
{
    convert_with(file, ConvertOptions::default(), warnings)
}

/// Convert a decoded file into a fresh [`Song`].
///
/// # Errors
/// - [`UnsupportedFeature::MultiSequence`] for format 2 files, before any track is read
/// - [`UnsupportedFeature::TimedControlChange`] / [`UnsupportedFeature::TimedProgramChange`]
///   under [`InstrumentChangePolicy::Reject`]
pub fn convert_with<W>(
    file: &MidiFile,
    options: ConvertOptions,
    warnings: &mut W,
) -> Result<Song, ConvertError>
where
    W: WarningSink + ?Sized,
{
    if file.format_type() == FormatType::SequentiallyIndependent {
        return Err(ConvertError::unsupported(
            None,
            UnsupportedFeature::MultiSequence,
        ));
    }

    let mut song = Song::new();
    song.name = file.tracks().first().and_then(|t| t.name()).map(String::from);

    let mut tracks = Vec::with_capacity(file.tracks().len());
    let mut tempo_changes = Vec::new();
    for (index, midi_track) in file.tracks().iter().enumerate() {
        // One instrument per track. This won't suit files that squeeze more
        // than 16 instruments into 16 channels, but keeps track-level control
        // events simple to translate.
        // TODO: map tracks playing on channel 10 to a `Drum`
        let instrument = song.add_instrument();
        let converter = TrackConverter {
            index,
            timing: *file.timing(),
            options,
            instrument,
            tempo_changes: &mut tempo_changes,
        };
        tracks.push(converter.run(midi_track.events(), warnings)?);
    }

    let segment = song.add_segment()?;
    for change in tempo_changes {
        segment.insert_tempo_change(change);
    }
    let subsegment = segment.add_subsegment();
    for track in tracks {
        subsegment.push_track(track);
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        tracks = subsegment.tracks().len(),
        duration = subsegment.duration(),
        "converted midi file"
    );

    Ok(song)
}

struct OpenNote {
    channel: Channel,
    pitch: u8,
    velocity: u8,
    start: f64,
}

struct TrackConverter<'a> {
    index: usize,
    timing: Timing,
    options: ConvertOptions,
    instrument: &'a mut Instrument,
    tempo_changes: &'a mut Vec<TempoChange>,
}

impl TrackConverter<'_> {
    fn run<W>(mut self, events: &[TrackEvent], warnings: &mut W) -> Result<SongTrack, ConvertError>
    where
        W: WarningSink + ?Sized,
    {
        let mut track = SongTrack::new();
        let instrument = self.instrument.id();
        track.add_section(0., Some(instrument.into()));
        track.insert_command(Command::load_instrument(0., instrument));

        let mut ticks: u64 = 0;
        let mut time = 0.;
        let mut open_notes: Vec<OpenNote> = Vec::new();

        for event in events {
            ticks += u64::from(event.delta_ticks());
            time = self.timing.ticks_to_quarter_notes(ticks);

            match event.message() {
                TrackMessage::ChannelVoice(message) => {
                    let channel = message.channel();
                    match *message.event() {
                        VoiceEvent::NoteOff { note, .. } | VoiceEvent::NoteOn { note, velocity: 0 } => {
                            let found = open_notes
                                .iter()
                                .position(|open| open.channel == channel && open.pitch == note);
                            if let Some(found) = found {
                                let open = open_notes.remove(found);
                                track.insert_command(Command::note(
                                    open.start,
                                    open.pitch,
                                    open.velocity,
                                    time - open.start,
                                ));
                            }
                        }
                        VoiceEvent::NoteOn { note, velocity } => open_notes.push(OpenNote {
                            channel,
                            pitch: note,
                            velocity,
                            start: time,
                        }),
                        VoiceEvent::ControlChange { controller, value } => {
                            let Ok(setting) = InstrumentController::try_from(controller) else {
                                continue;
                            };
                            if ticks == 0 {
                                setting.apply(self.instrument, value);
                            } else {
                                self.timed_change(
                                    UnsupportedFeature::TimedControlChange { controller, ticks },
                                    Warning::TimedControlChange {
                                        track: self.index,
                                        controller,
                                        time,
                                    },
                                    warnings,
                                )?;
                            }
                        }
                        VoiceEvent::ProgramChange { program } => {
                            if ticks == 0 {
                                self.instrument.patch = program;
                            } else {
                                self.timed_change(
                                    UnsupportedFeature::TimedProgramChange { program, ticks },
                                    Warning::TimedProgramChange {
                                        track: self.index,
                                        program,
                                        time,
                                    },
                                    warnings,
                                )?;
                            }
                        }
                        VoiceEvent::KeyPressure { .. }
                        | VoiceEvent::ChannelPressure { .. }
                        | VoiceEvent::PitchWheelChange { .. } => {}
                    }
                }
                TrackMessage::Meta(MetaMessage::TrackName(name)) => {
                    if ticks == 0 {
                        self.instrument.name = Some(name.clone());
                    }
                }
                TrackMessage::Meta(MetaMessage::SetTempo(micros)) => {
                    match SetTempoCmd::from_micros_per_quarter_note(*micros) {
                        Some(tempo) => {
                            track.insert_command(Command::new(time, CommandKind::SetTempo(tempo)));
                            self.tempo_changes
                                .push(TempoChange::new(time, f64::from(tempo.bpm)));
                        }
                        None => warnings.warn(Warning::ZeroTempo { track: self.index }),
                    }
                }
                TrackMessage::Meta(MetaMessage::EndOfTrack) => track.mark_end(time),
                TrackMessage::Meta(MetaMessage::Other { .. })
                | TrackMessage::SystemExclusive(_)
                | TrackMessage::Unknown { .. } => {}
            }
        }

        // Notes that never end are closed at the last event rather than dropped.
        for open in open_notes {
            track.insert_command(Command::note(
                open.start,
                open.pitch,
                open.velocity,
                time - open.start,
            ));
        }

        Ok(track)
    }

    fn timed_change<W>(
        &self,
        feature: UnsupportedFeature,
        warning: Warning,
        warnings: &mut W,
    ) -> Result<(), ConvertError>
    where
        W: WarningSink + ?Sized,
    {
        match self.options.timed_instrument_changes {
            InstrumentChangePolicy::Reject => {
                Err(ConvertError::unsupported(Some(self.index), feature))
            }
            InstrumentChangePolicy::Warn => {
                warnings.warn(warning);
                Ok(())
            }
        }
    }
}
