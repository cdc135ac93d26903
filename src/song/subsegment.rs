use super::Track;
use alloc::{string::String, vec::Vec};

/// A part of a [`Segment`](super::Segment) (an intro, a loop...) made of parallel [`Track`]s.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Subsegment {
    /// Display name
    pub name: Option<String>,
    /// Opaque flags
    pub flags: u32,
    tracks: Vec<Track>,
}

impl Subsegment {
    /// Append an empty track
    pub fn add_track(&mut self) -> &mut Track {
        self.tracks.push(Track::default());
        let last = self.tracks.len() - 1;
        &mut self.tracks[last]
    }

    /// Append an already built track
    pub fn push_track(&mut self, track: Track) {
        self.tracks.push(track);
    }

    /// The tracks
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// The tracks
    pub fn tracks_mut(&mut self) -> &mut [Track] {
        &mut self.tracks
    }

    /// Whether the track at `index` is heard. `false` for a missing track.
    pub fn can_hear(&self, index: usize) -> bool {
        self.tracks
            .get(index)
            .is_some_and(|track| track.can_hear(&self.tracks))
    }

    /// The end of the longest track
    pub fn duration(&self) -> f64 {
        self.tracks.iter().map(Track::duration).fold(0., f64::max)
    }
}
