#![doc = r#"
Events decoded from an `MTrk` chunk

Every event in a track is preceded by a variable-length delta time in
ticks. The event itself is one of:

- a meta event (`FF type len data`)
- a system exclusive event (`F0 len data` or `F7 len data`)
- a channel voice message, possibly using running status
- an unclassifiable status byte, kept as [`TrackMessage::Unknown`]
"#]

use crate::message::ChannelVoiceMessage;
use alloc::{string::String, vec::Vec};
use num_enum::{FromPrimitive, IntoPrimitive};

/// A decoded event and the ticks elapsed since the previous event in its track.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackEvent {
    delta_ticks: u32,
    message: TrackMessage,
}

impl TrackEvent {
    /// Create a new track event
    pub const fn new(delta_ticks: u32, message: TrackMessage) -> Self {
        Self {
            delta_ticks,
            message,
        }
    }

    /// Ticks since the previous event
    pub const fn delta_ticks(&self) -> u32 {
        self.delta_ticks
    }

    /// The event payload
    pub const fn message(&self) -> &TrackMessage {
        &self.message
    }
}

/// The payload of a [`TrackEvent`]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrackMessage {
    /// A message addressed to a channel
    ChannelVoice(ChannelVoiceMessage),
    /// A meta event
    Meta(MetaMessage),
    /// System exclusive bytes, starting with the `F0`/`F7` type byte
    SystemExclusive(Vec<u8>),
    /// A status byte that is not a channel voice status
    Unknown {
        /// The raw status byte
        status: u8,
    },
}

#[doc = r#"
Meta event type bytes.

Only [`MetaType::TrackName`], [`MetaType::SetTempo`] and
[`MetaType::EndOfTrack`] are interpreted; everything else is kept as raw
bytes in a [`MetaMessage::Other`].
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum MetaType {
    /// `FF 00`
    SequenceNumber = 0x00,
    /// `FF 01`
    Text = 0x01,
    /// `FF 02`
    Copyright = 0x02,
    /// `FF 03`
    TrackName = 0x03,
    /// `FF 04`
    InstrumentName = 0x04,
    /// `FF 05`
    Lyric = 0x05,
    /// `FF 06`
    Marker = 0x06,
    /// `FF 07`
    CuePoint = 0x07,
    /// `FF 20`
    ChannelPrefix = 0x20,
    /// `FF 2F`
    EndOfTrack = 0x2F,
    /// `FF 51`
    SetTempo = 0x51,
    /// `FF 54`
    SmpteOffset = 0x54,
    /// `FF 58`
    TimeSignature = 0x58,
    /// `FF 59`
    KeySignature = 0x59,
    /// `FF 7F`
    SequencerSpecific = 0x7F,
    /// Anything else
    #[num_enum(catch_all)]
    Unrecognized(u8),
}

/// A decoded meta event
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MetaMessage {
    /// The name of the track (or, in the first track, the sequence)
    TrackName(String),
    /// Microseconds per quarter note
    SetTempo(u32),
    /// The nominal end of the track
    EndOfTrack,
    /// Any other meta event, kept verbatim
    Other {
        /// The meta type
        kind: MetaType,
        /// The payload bytes
        data: Vec<u8>,
    },
}

impl MetaMessage {
    /// The type byte this message was decoded from
    pub fn kind(&self) -> MetaType {
        match self {
            Self::TrackName(_) => MetaType::TrackName,
            Self::SetTempo(_) => MetaType::SetTempo,
            Self::EndOfTrack => MetaType::EndOfTrack,
            Self::Other { kind, .. } => *kind,
        }
    }
}

#[test]
fn meta_type_catch_all() {
    use pretty_assertions::assert_eq;
    assert_eq!(MetaType::from(0x51), MetaType::SetTempo);
    assert_eq!(MetaType::from(0x2F), MetaType::EndOfTrack);
    assert_eq!(MetaType::from(0x60), MetaType::Unrecognized(0x60));
    assert_eq!(u8::from(MetaType::KeySignature), 0x59);
}
