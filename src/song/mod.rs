#![doc = r#"
The in-memory song model

```text
Song
 ├─ Segment (up to 4)
 │   ├─ tempo changes
 │   └─ Subsegment
 │       └─ Track
 │           └─ TrackSection
 │               └─ Command
 ├─ Instrument
 └─ Drum
```

Ownership is a tree. The only cross links are [`InstrumentRef`]s, plain
indices into the song's instrument and drum lists, so the whole model is
`Clone` and (with the `serde` feature) serializable.
"#]

mod command;
pub use command::*;

mod instrument;
pub use instrument::*;

mod segment;
pub use segment::*;

mod subsegment;
pub use subsegment::*;

mod track;
pub use track::*;

use crate::ModelError;
use alloc::{string::String, vec::Vec};

/// The number of segment slots in a [`Song`].
pub const MAX_SEGMENTS: usize = 4;

/// A complete piece of music.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Song {
    /// Display name
    pub name: Option<String>,
    segments: [Option<Segment>; MAX_SEGMENTS],
    instruments: Vec<Instrument>,
    drums: Vec<Drum>,
}

impl Song {
    /// Create an empty song
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill the first free segment slot.
    ///
    /// # Errors
    /// [`ModelError::SegmentSlotsFull`] if all [`MAX_SEGMENTS`] slots are taken.
    pub fn add_segment(&mut self) -> Result<&mut Segment, ModelError> {
        self.segments
            .iter_mut()
            .find(|slot| slot.is_none())
            .map(|slot| slot.insert(Segment::default()))
            .ok_or(ModelError::SegmentSlotsFull)
    }

    /// The segment in slot `index`
    pub fn segment(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)?.as_ref()
    }

    /// The segment in slot `index`
    pub fn segment_mut(&mut self, index: usize) -> Option<&mut Segment> {
        self.segments.get_mut(index)?.as_mut()
    }

    /// The filled segment slots with their index
    pub fn segments(&self) -> impl Iterator<Item = (usize, &Segment)> + '_ {
        self.segments
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|s| (i, s)))
    }

    /// Add an instrument with default settings
    pub fn add_instrument(&mut self) -> &mut Instrument {
        let id = InstrumentId(self.instruments.len());
        self.instruments.push(Instrument::new(id));
        &mut self.instruments[id.0]
    }

    /// Add a drum kit with default settings
    pub fn add_drum(&mut self) -> &mut Drum {
        let id = DrumId(self.drums.len());
        self.drums.push(Drum::new(id));
        &mut self.drums[id.0]
    }

    /// Look up an instrument
    pub fn instrument(&self, id: InstrumentId) -> Option<&Instrument> {
        self.instruments.get(id.0)
    }

    /// Look up an instrument
    pub fn instrument_mut(&mut self, id: InstrumentId) -> Option<&mut Instrument> {
        self.instruments.get_mut(id.0)
    }

    /// Look up a drum
    pub fn drum(&self, id: DrumId) -> Option<&Drum> {
        self.drums.get(id.0)
    }

    /// Look up a drum
    pub fn drum_mut(&mut self, id: DrumId) -> Option<&mut Drum> {
        self.drums.get_mut(id.0)
    }

    /// The settings behind an instrument reference
    pub fn resolve(&self, reference: InstrumentRef) -> Option<&InstrumentSettings> {
        match reference {
            InstrumentRef::Instrument(id) => self.instrument(id).map(|i| &**i),
            InstrumentRef::Drum(id) => self.drum(id).map(|d| &**d),
        }
    }

    /// Every instrument, indexed by [`InstrumentId::index`]
    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    /// Every drum, indexed by [`DrumId::index`]
    pub fn drums(&self) -> &[Drum] {
        &self.drums
    }
}

#[test]
fn at_most_four_segments() {
    use pretty_assertions::assert_eq;

    let mut song = Song::new();
    for _ in 0..MAX_SEGMENTS {
        song.add_segment().unwrap();
    }
    assert_eq!(song.add_segment().unwrap_err(), ModelError::SegmentSlotsFull);
    assert_eq!(song.segments().count(), MAX_SEGMENTS);
}

#[test]
fn instruments_keep_their_index() {
    use pretty_assertions::assert_eq;

    let mut song = Song::new();
    let first = song.add_instrument().id();
    let second = song.add_instrument().id();
    let drum = song.add_drum().id();
    assert_eq!(first.index(), 0);
    assert_eq!(second.index(), 1);
    assert_eq!(drum.index(), 0);

    song.instrument_mut(second).unwrap().patch = 24;
    assert_eq!(song.resolve(second.into()).unwrap().patch, 24);
    assert_eq!(song.resolve(InstrumentRef::Drum(drum)).unwrap().volume, 100);
    assert!(song.instrument(InstrumentId(7)).is_none());
}
