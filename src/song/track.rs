use super::{Command, InstrumentRef, command::insertion_index};
use alloc::vec::Vec;

/// Whether a track is heard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MuteState {
    /// The default state. Unless other tracks are Solo, this is heard.
    #[default]
    Play,
    /// Explicitly muted. Never heard.
    Mute,
    /// If any tracks are Solo, only Solo tracks are heard.
    Solo,
}

#[doc = r#"
A time-contiguous stretch of a [`Track`] sharing one instrument.

Command times are relative to the section's `start`. The section's
duration is the latest command time or the explicit end marker, whichever
is larger.
"#]
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackSection {
    start: f64,
    duration: f64,
    /// The instrument for this section; `None` keeps the one active before it
    pub instrument: Option<InstrumentRef>,
    commands: Vec<Command>,
}

impl TrackSection {
    /// Create an empty section
    pub fn new(start: f64, instrument: Option<InstrumentRef>) -> Self {
        Self {
            start: start.max(0.),
            duration: 0.,
            instrument,
            commands: Vec::new(),
        }
    }

    /// Start time within the subsegment, in quarter notes
    pub const fn start(&self) -> f64 {
        self.start
    }

    /// Length in quarter notes
    pub const fn duration(&self) -> f64 {
        self.duration
    }

    /// The section's end within the subsegment
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    /// The commands, sorted by time
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Inserts the given command into the list, appropriate to its time.
    pub fn insert_command(&mut self, command: Command) {
        let index = insertion_index(&self.commands, &command);
        if command.time() > self.duration {
            self.duration = command.time();
        }
        self.commands.insert(index, command);
    }

    /// Raise the end marker to `time` (relative to the section start)
    pub fn mark_end(&mut self, time: f64) {
        if time > self.duration {
            self.duration = time;
        }
    }

    /// Remove and return the command at `index`
    pub fn remove_command(&mut self, index: usize) -> Option<Command> {
        (index < self.commands.len()).then(|| self.commands.remove(index))
    }
}

#[doc = r#"
One voice of a [`Subsegment`](super::Subsegment): an ordered list of
[`TrackSection`]s.
"#]
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Track {
    /// Whether this track is heard
    pub mute_state: MuteState,
    sections: Vec<TrackSection>,
}

impl Track {
    /// Create an empty track
    pub fn new() -> Self {
        Self::default()
    }

    /// The sections, ordered by start time
    pub fn sections(&self) -> &[TrackSection] {
        &self.sections
    }

    /// The sections, ordered by start time
    pub fn sections_mut(&mut self) -> &mut [TrackSection] {
        &mut self.sections
    }

    /// Start a new section at `start`, returning it.
    ///
    /// If a section already starts at that time it is returned instead, with
    /// its instrument set to `instrument`. Its commands and end marker are kept.
    pub fn add_section(&mut self, start: f64, instrument: Option<InstrumentRef>) -> &mut TrackSection {
        let section = TrackSection::new(start, instrument);
        let index = self.sections.partition_point(|s| s.start < section.start);
        let exists = self
            .sections
            .get(index)
            .is_some_and(|existing| existing.start == section.start);
        if exists {
            self.sections[index].instrument = instrument;
        } else {
            self.sections.insert(index, section);
        }
        &mut self.sections[index]
    }

    /// Insert a command at an absolute time.
    ///
    /// The command goes to the latest section starting at or before its
    /// time; a section at time zero is created if there is none.
    pub fn insert_command(&mut self, command: Command) {
        let section = self.section_at_mut(command.time());
        let start = section.start;
        section.insert_command(command.shifted(-start));
    }

    /// Raise the end of the track to an absolute time.
    ///
    /// Negative (or NaN) times are clamped to zero.
    pub fn mark_end(&mut self, time: f64) {
        let time = time.max(0.);
        let section = self.section_at_mut(time);
        let start = section.start;
        section.mark_end(time - start);
    }

    fn section_at_mut(&mut self, time: f64) -> &mut TrackSection {
        let time = time.max(0.);
        let index = self.sections.partition_point(|s| s.start <= time);
        if index == 0 {
            // every section starts after `time`, so none starts at zero
            self.sections.insert(0, TrackSection::new(0., None));
            return &mut self.sections[0];
        }
        &mut self.sections[index - 1]
    }

    /// Every command with its absolute time, in time order
    pub fn commands(&self) -> impl Iterator<Item = (f64, &Command)> + '_ {
        self.sections.iter().flat_map(|section| {
            section
                .commands
                .iter()
                .map(move |command| (section.start + command.time(), command))
        })
    }

    /// The end of the last section
    pub fn duration(&self) -> f64 {
        self.sections.iter().map(TrackSection::end).fold(0., f64::max)
    }

    /// Whether this track is heard alongside `siblings` (which may include itself).
    pub fn can_hear(&self, siblings: &[Track]) -> bool {
        let has_solo_tracks = siblings.iter().any(|t| t.mute_state == MuteState::Solo);

        if has_solo_tracks {
            self.mute_state == MuteState::Solo
        } else {
            self.mute_state == MuteState::Play
        }
    }
}

#[test]
fn section_duration_follows_commands_and_end_marker() {
    let mut section = TrackSection::new(0., None);
    section.insert_command(Command::note(3., 60, 100, 2.));
    assert_eq!(section.duration(), 3.);
    section.mark_end(2.);
    assert_eq!(section.duration(), 3.);
    section.mark_end(8.);
    assert_eq!(section.duration(), 8.);
    section.insert_command(Command::set_tempo(4., 90));
    assert_eq!(section.duration(), 8.);
}

#[test]
fn bad_end_marker_keeps_the_track() {
    use super::InstrumentId;
    use pretty_assertions::assert_eq;

    let mut track = Track::new();
    track.add_section(0., Some(InstrumentId(3).into()));
    track.insert_command(Command::note(1., 60, 100, 1.));
    track.insert_command(Command::note(2., 62, 100, 1.));

    track.mark_end(-0.5);
    track.mark_end(f64::NAN);

    assert_eq!(track.commands().count(), 2);
    assert_eq!(track.sections().len(), 1);
    assert_eq!(track.sections()[0].instrument, Some(InstrumentId(3).into()));
    assert_eq!(track.duration(), 2.);
}

#[test]
fn adding_a_section_at_an_existing_start_keeps_its_commands() {
    use super::InstrumentId;
    use pretty_assertions::assert_eq;

    let mut track = Track::new();
    track.add_section(4., None);
    track.insert_command(Command::note(5., 60, 100, 1.));
    track.mark_end(7.);

    let section = track.add_section(4., Some(InstrumentId(1).into()));
    assert_eq!(section.instrument, Some(InstrumentId(1).into()));
    assert_eq!(section.commands().len(), 1);
    assert_eq!(section.duration(), 3.);
    assert_eq!(track.sections().len(), 1);

    // a section at zero is created in front of later sections
    track.insert_command(Command::set_tempo(1., 90));
    assert_eq!(track.sections().len(), 2);
    assert_eq!(track.sections()[0].start(), 0.);
    assert_eq!(track.commands().map(|(t, _)| t).collect::<Vec<_>>(), alloc::vec![1., 5.]);
}

#[test]
fn commands_route_to_sections() {
    use pretty_assertions::assert_eq;

    let mut track = Track::new();
    track.insert_command(Command::note(1., 60, 100, 1.));
    track.add_section(4., None);
    track.insert_command(Command::note(5., 62, 100, 1.));
    track.insert_command(Command::note(2., 64, 100, 1.));

    assert_eq!(track.sections().len(), 2);
    assert_eq!(track.sections()[0].commands().len(), 2);
    assert_eq!(track.sections()[1].commands()[0].time(), 1.);

    let times: Vec<f64> = track.commands().map(|(t, _)| t).collect();
    assert_eq!(times, alloc::vec![1., 2., 5.]);
    assert_eq!(track.duration(), 5.);
}

#[test]
fn audibility() {
    let mut tracks = alloc::vec![Track::new(), Track::new(), Track::new()];
    assert!(tracks.iter().all(|t| t.can_hear(&tracks)));

    tracks[1].mute_state = MuteState::Mute;
    assert!(tracks[0].can_hear(&tracks));
    assert!(!tracks[1].can_hear(&tracks));

    tracks[2].mute_state = MuteState::Solo;
    assert!(!tracks[0].can_hear(&tracks));
    assert!(!tracks[1].can_hear(&tracks));
    assert!(tracks[2].can_hear(&tracks));
}
