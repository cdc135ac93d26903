#![doc = r#"
Error types shared by the decoder, the song model and the converter

Decoding failures carry the byte position they happened at (see
[`ReaderError`]); conversion failures name the track that triggered them.
[`LoadError`] wraps both for the one-shot [`load_song`](crate::load_song).
"#]

use crate::reader::ReaderError;
use thiserror::Error;

/// Structural problems that make a buffer impossible to read as a MIDI file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedError {
    /// The buffer holds no chunks at all
    #[error("Missing header chunk")]
    MissingHeader,
    /// The first chunk is something other than `MThd`
    #[error("First chunk must be the header, found {tag:?}")]
    HeaderNotFirst {
        /// The tag of the chunk found in its place
        tag: [u8; 4],
    },
    /// A second `MThd` chunk
    #[error("Multiple header chunks")]
    DuplicateHeader,
    /// The time division declares zero ticks per quarter note
    #[error("Time division of zero ticks per quarter note")]
    ZeroTicksPerQuarterNote,
    /// A variable-length quantity longer than four bytes
    #[error("Variable-length quantity longer than 4 bytes")]
    VlqOverflow,
}

/// Valid MIDI data that this crate deliberately does not implement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnsupportedFeature {
    /// The header's time division uses SMPTE timecode
    #[error("SMPTE timecode divisions ({frames_per_second} fps, {ticks_per_frame} ticks/frame)")]
    SmpteTimecode {
        /// The (negated) frame rate stored in the division's high byte
        frames_per_second: i8,
        /// The division's low byte
        ticks_per_frame: u8,
    },
    /// Format 2 files hold independent sequences
    #[error("MIDI format 2 (multi-sequence)")]
    MultiSequence,
    /// An instrument controller changed after the start of a track
    #[error("control change {controller:#04x} at tick {ticks}")]
    TimedControlChange {
        /// The controller number
        controller: u8,
        /// Absolute ticks since the start of the track
        ticks: u64,
    },
    /// A program change after the start of a track
    #[error("program change to {program} at tick {ticks}")]
    TimedProgramChange {
        /// The program number
        program: u8,
        /// Absolute ticks since the start of the track
        ticks: u64,
    },
}

/// Violations of the song model's structural limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ModelError {
    /// A song already holds the maximum number of segments
    #[error("A song can have a maximum of {} segments", crate::song::MAX_SEGMENTS)]
    SegmentSlotsFull,
}

/// Errors raised while replaying a decoded file into a [`Song`](crate::song::Song).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    /// The file uses a feature the converter cannot express
    #[error("Unsupported feature in {}: {feature}", TrackLabel(.track))]
    Unsupported {
        /// Index of the offending track, if the problem is track-specific
        track: Option<usize>,
        /// What was unsupported
        feature: UnsupportedFeature,
    },
    /// Building the song model failed
    #[error("Song model: {0}")]
    Model(#[from] ModelError),
}

struct TrackLabel<'a>(&'a Option<usize>);

impl core::fmt::Display for TrackLabel<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match *self.0 {
            Some(index) => write!(f, "track {index}"),
            None => f.write_str("file"),
        }
    }
}

impl ConvertError {
    /// Create an unsupported error for a given track
    pub const fn unsupported(track: Option<usize>, feature: UnsupportedFeature) -> Self {
        Self::Unsupported { track, feature }
    }
}

/// Anything that can go wrong turning bytes into a [`Song`](crate::song::Song).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// Decoding the byte stream failed
    #[error(transparent)]
    Read(#[from] ReaderError),
    /// Converting the decoded file failed
    #[error(transparent)]
    Convert(#[from] ConvertError),
}

impl LoadError {
    /// True if the input is not a structurally valid MIDI file
    pub const fn is_malformed(&self) -> bool {
        matches!(self, Self::Read(e) if e.is_malformed())
    }

    /// True if the input uses a feature that is not implemented
    pub const fn is_unsupported(&self) -> bool {
        match self {
            Self::Read(e) => e.is_unsupported(),
            Self::Convert(ConvertError::Unsupported { .. }) => true,
            Self::Convert(ConvertError::Model(_)) => false,
        }
    }

    /// True if the input ended before a read completed
    pub const fn is_truncated(&self) -> bool {
        matches!(self, Self::Read(e) if e.is_truncated())
    }
}
