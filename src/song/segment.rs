use super::Subsegment;
use alloc::{string::String, vec::Vec};

/// The tempo in effect before any tempo change.
pub const DEFAULT_BPM: f64 = 120.;

/// How the tempo moves from one change to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TempoRamp {
    /// Jump to the new tempo and hold it
    #[default]
    Instant,
    /// Move linearly toward the next change's tempo
    Linear,
}

/// A tempo change within a [`Segment`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TempoChange {
    /// Time in quarter notes from the start of the segment
    pub time: f64,
    /// Beats per minute at `time`
    pub bpm: f64,
    /// How to reach the following change
    pub ramp: TempoRamp,
}

impl TempoChange {
    /// An instant tempo change
    pub const fn new(time: f64, bpm: f64) -> Self {
        Self {
            time,
            bpm,
            ramp: TempoRamp::Instant,
        }
    }

    /// A tempo change with a ramp toward the next change
    pub const fn with_ramp(time: f64, bpm: f64, ramp: TempoRamp) -> Self {
        Self { time, bpm, ramp }
    }

    /// The tempo at `time`, given the change that follows this one
    pub fn interpolate(&self, next: Option<&TempoChange>, time: f64) -> f64 {
        match (self.ramp, next) {
            (TempoRamp::Linear, Some(next)) if time < next.time && next.time > self.time => {
                let t = (time - self.time) / (next.time - self.time);
                self.bpm + (next.bpm - self.bpm) * t
            }
            _ => self.bpm,
        }
    }
}

#[doc = r#"
One of a song's alternate versions: a list of [`Subsegment`]s and the
tempo changes that apply to them.

Tempo changes are kept sorted by time, with at most one change per time.

# Example
```rust
# use smf_song::song::{Segment, TempoChange};
let mut segment = Segment::default();
segment.insert_tempo_change(TempoChange::new(0., 120.));
segment.insert_tempo_change(TempoChange::new(4., 90.));

assert_eq!(segment.tempo_at(2.), 120.);
assert_eq!(segment.tempo_at(4.), 90.);
assert_eq!(segment.tempo_at(10.), 90.);
```
"#]
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment {
    /// Display name
    pub name: Option<String>,
    subsegments: Vec<Subsegment>,
    tempo_changes: Vec<TempoChange>,
}

impl Segment {
    /// Append an empty subsegment
    pub fn add_subsegment(&mut self) -> &mut Subsegment {
        self.subsegments.push(Subsegment::default());
        let last = self.subsegments.len() - 1;
        &mut self.subsegments[last]
    }

    /// The subsegments in play order
    pub fn subsegments(&self) -> &[Subsegment] {
        &self.subsegments
    }

    /// The subsegments in play order
    pub fn subsegments_mut(&mut self) -> &mut [Subsegment] {
        &mut self.subsegments
    }

    /// The tempo changes, sorted by time
    pub fn tempo_changes(&self) -> &[TempoChange] {
        &self.tempo_changes
    }

    /// Insert a tempo change, replacing any change at exactly the same time.
    pub fn insert_tempo_change(&mut self, change: TempoChange) {
        let index = self
            .tempo_changes
            .partition_point(|existing| existing.time < change.time);
        let replaces = self
            .tempo_changes
            .get(index)
            .is_some_and(|existing| existing.time == change.time);
        if replaces {
            self.tempo_changes[index] = change;
        } else {
            self.tempo_changes.insert(index, change);
        }
    }

    /// The tempo in effect at `time`.
    ///
    /// This is the latest change at or before `time`, following its ramp, or
    /// [`DEFAULT_BPM`] when no change precedes `time`.
    pub fn tempo_at(&self, time: f64) -> f64 {
        let index = self.tempo_changes.partition_point(|c| c.time <= time);
        match index.checked_sub(1) {
            Some(current) => self.tempo_changes[current]
                .interpolate(self.tempo_changes.get(index), time),
            None => DEFAULT_BPM,
        }
    }
}

#[test]
fn tempo_changes_stay_sorted_and_unique() {
    use pretty_assertions::assert_eq;

    let mut segment = Segment::default();
    segment.insert_tempo_change(TempoChange::new(4., 90.));
    segment.insert_tempo_change(TempoChange::new(0., 120.));
    segment.insert_tempo_change(TempoChange::new(2., 100.));
    segment.insert_tempo_change(TempoChange::new(4., 80.));

    let changes: Vec<(f64, f64)> = segment
        .tempo_changes()
        .iter()
        .map(|c| (c.time, c.bpm))
        .collect();
    assert_eq!(changes, alloc::vec![(0., 120.), (2., 100.), (4., 80.)]);
}

#[test]
fn tempo_defaults_before_first_change() {
    let mut segment = Segment::default();
    assert_eq!(segment.tempo_at(0.), DEFAULT_BPM);

    segment.insert_tempo_change(TempoChange::new(1., 60.));
    assert_eq!(segment.tempo_at(0.5), DEFAULT_BPM);
    assert_eq!(segment.tempo_at(1.), 60.);
    // idempotent
    assert_eq!(segment.tempo_at(1.), segment.tempo_at(1.));
}

#[test]
fn linear_ramp_interpolates_toward_next_change() {
    let mut segment = Segment::default();
    segment.insert_tempo_change(TempoChange::with_ramp(0., 100., TempoRamp::Linear));
    segment.insert_tempo_change(TempoChange::with_ramp(4., 140., TempoRamp::Linear));

    assert_eq!(segment.tempo_at(0.), 100.);
    assert_eq!(segment.tempo_at(1.), 110.);
    assert_eq!(segment.tempo_at(3.), 130.);
    assert_eq!(segment.tempo_at(4.), 140.);
    // the last linear change has nothing to ramp toward
    assert_eq!(segment.tempo_at(8.), 140.);
}
