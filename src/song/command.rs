#![doc = r#"
Timed commands held by a [`TrackSection`](super::TrackSection)

A [`Command`]'s time is measured in quarter notes relative to the start of
its section, and can only be set when the command is created: moving a
command means removing it and inserting it again so the owning list stays
sorted.
"#]

use super::InstrumentRef;

/// A timed entry in a section's command list.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Command {
    time: f64,
    kind: CommandKind,
}

/// What a [`Command`] does.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommandKind {
    /// Play a note
    Note(NoteCmd),
    /// Switch the track's instrument
    LoadInstrument(LoadInstrumentCmd),
    /// Change the tempo
    SetTempo(SetTempoCmd),
}

/// Play a note for a number of quarter notes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NoteCmd {
    pitch: u8,
    velocity: u8,
    duration: f64,
}

impl NoteCmd {
    /// Pitch and velocity are masked to 7 bits; a negative duration becomes zero.
    pub fn new(pitch: u8, velocity: u8, duration: f64) -> Self {
        Self {
            pitch: pitch & 0x7F,
            velocity: velocity & 0x7F,
            duration: duration.max(0.),
        }
    }

    /// MIDI key number, 0-127
    pub const fn pitch(&self) -> u8 {
        self.pitch
    }

    /// Strike velocity, 0-127
    pub const fn velocity(&self) -> u8 {
        self.velocity
    }

    /// Length in quarter notes
    pub const fn duration(&self) -> f64 {
        self.duration
    }
}

/// Switch to another instrument of the song.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoadInstrumentCmd {
    /// The instrument to load
    pub instrument: InstrumentRef,
}

/// Set the tempo in beats per minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SetTempoCmd {
    /// Beats (quarter notes) per minute
    pub bpm: u32,
}

impl SetTempoCmd {
    /// Convert a MIDI tempo, rounding to the nearest whole bpm.
    ///
    /// Returns `None` for a tempo of zero microseconds.
    pub const fn from_micros_per_quarter_note(micros: u32) -> Option<Self> {
        if micros == 0 {
            return None;
        }
        let micros = micros as u64;
        let bpm = (60_000_000 + micros / 2) / micros;
        Some(Self { bpm: bpm as u32 })
    }
}

impl Command {
    /// Negative (or NaN) times are clamped to zero.
    pub fn new(time: f64, kind: CommandKind) -> Self {
        Self {
            time: time.max(0.),
            kind,
        }
    }

    /// A [`NoteCmd`] at `time`
    pub fn note(time: f64, pitch: u8, velocity: u8, duration: f64) -> Self {
        Self::new(time, CommandKind::Note(NoteCmd::new(pitch, velocity, duration)))
    }

    /// A [`LoadInstrumentCmd`] at `time`
    pub fn load_instrument(time: f64, instrument: impl Into<InstrumentRef>) -> Self {
        Self::new(
            time,
            CommandKind::LoadInstrument(LoadInstrumentCmd {
                instrument: instrument.into(),
            }),
        )
    }

    /// A [`SetTempoCmd`] at `time`
    pub fn set_tempo(time: f64, bpm: u32) -> Self {
        Self::new(time, CommandKind::SetTempo(SetTempoCmd { bpm }))
    }

    /// Quarter notes since the start of the owning section
    pub const fn time(&self) -> f64 {
        self.time
    }

    /// The command payload
    pub const fn kind(&self) -> &CommandKind {
        &self.kind
    }

    /// The command payload. The time cannot be changed through this.
    pub fn kind_mut(&mut self) -> &mut CommandKind {
        &mut self.kind
    }

    /// True for [`CommandKind::Note`]
    pub const fn is_note(&self) -> bool {
        matches!(self.kind, CommandKind::Note(_))
    }

    /// The time at which this command stops having an effect
    pub fn end_time(&self) -> f64 {
        match &self.kind {
            CommandKind::Note(note) => self.time + note.duration,
            CommandKind::LoadInstrument(_) | CommandKind::SetTempo(_) => self.time,
        }
    }

    pub(crate) fn shifted(mut self, offset: f64) -> Self {
        self.time = (self.time + offset).max(0.);
        self
    }
}

/// Where `command` goes in the sorted list `commands`.
///
/// At equal times a note goes after everything already there, so that
/// instrument and tempo changes take effect before it plays. Other commands
/// go after the existing non-note commands at that time and before its
/// notes; among themselves they keep insertion order.
pub(crate) fn insertion_index(commands: &[Command], command: &Command) -> usize {
    let time = command.time;
    let is_note = command.is_note();
    let goes_after = |existing: &Command| {
        if is_note {
            existing.time <= time
        } else {
            existing.time < time || (existing.time == time && !existing.is_note())
        }
    };

    // appending is the common case
    match commands.last() {
        None => return 0,
        Some(last) if goes_after(last) => return commands.len(),
        Some(_) => {}
    }
    commands.partition_point(goes_after)
}

#[test]
fn tempo_rounding() {
    use pretty_assertions::assert_eq;
    let bpm = |us| SetTempoCmd::from_micros_per_quarter_note(us).map(|c| c.bpm);
    assert_eq!(bpm(500_000), Some(120));
    assert_eq!(bpm(600_000), Some(100));
    // 60_000_000 / 461_538 = 130.0000...
    assert_eq!(bpm(461_538), Some(130));
    // 60_000_000 / 700_000 = 85.71
    assert_eq!(bpm(700_000), Some(86));
    assert_eq!(bpm(0), None);
}

#[test]
fn note_values_are_clamped() {
    let note = NoteCmd::new(0xBC, 0xFF, -1.);
    assert_eq!(note.pitch(), 0x3C);
    assert_eq!(note.velocity(), 0x7F);
    assert_eq!(note.duration(), 0.);
}

#[test]
fn notes_sort_after_other_commands_at_equal_time() {
    use super::InstrumentId;
    use alloc::vec::Vec;

    let mut commands: Vec<Command> = Vec::new();
    let mut insert = |command: Command| {
        let index = insertion_index(&commands, &command);
        commands.insert(index, command);
    };
    insert(Command::note(1., 60, 100, 1.));
    insert(Command::note(0., 62, 100, 1.));
    insert(Command::set_tempo(1., 90));
    insert(Command::load_instrument(1., InstrumentId(0)));
    insert(Command::note(1., 64, 100, 1.));
    insert(Command::set_tempo(0.5, 100));

    let summary: Vec<(f64, &str)> = commands
        .iter()
        .map(|c| {
            let name = match c.kind() {
                CommandKind::Note(_) => "note",
                CommandKind::LoadInstrument(_) => "load",
                CommandKind::SetTempo(_) => "tempo",
            };
            (c.time(), name)
        })
        .collect();
    assert_eq!(
        summary,
        alloc::vec![
            (0., "note"),
            (0.5, "tempo"),
            (1., "tempo"),
            (1., "load"),
            (1., "note"),
            (1., "note"),
        ]
    );
    let CommandKind::Note(last) = commands[5].kind() else {
        panic!("expected a note");
    };
    assert_eq!(last.pitch(), 64);
}
