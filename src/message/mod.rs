#![doc = r#"
Contains the channel voice messages found in track chunks

# Status bytes
```text
  1sss nnnn
   |    |
   |    +-- channel (0-15)
   +------- message kind (0x8-0xE)
```
A byte with a clear top bit in status position is a data byte reusing the
previous status ("running status").
"#]

use num_enum::{IntoPrimitive, TryFromPrimitive};

#[doc = r#"
One of the sixteen MIDI channels.

The variant's discriminant is the low nibble of the status byte.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Channel {
    One = 0,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Eleven,
    Twelve,
    Thirteen,
    Fourteen,
    Fifteen,
    Sixteen,
}

impl Channel {
    /// The channel encoded in a status byte's low nibble
    pub const fn from_status(status: u8) -> Self {
        use Channel::*;
        match status & 0x0F {
            0 => One,
            1 => Two,
            2 => Three,
            3 => Four,
            4 => Five,
            5 => Six,
            6 => Seven,
            7 => Eight,
            8 => Nine,
            9 => Ten,
            10 => Eleven,
            11 => Twelve,
            12 => Thirteen,
            13 => Fourteen,
            14 => Fifteen,
            _ => Sixteen,
        }
    }

    /// The zero-based channel number
    pub fn index(self) -> u8 {
        self.into()
    }
}

/// The kind of channel voice message, taken from a status byte's high nibble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum VoiceKind {
    /// `0x8n`
    NoteOff = 0x8,
    /// `0x9n`
    NoteOn = 0x9,
    /// `0xAn`
    KeyPressure = 0xA,
    /// `0xBn`
    ControlChange = 0xB,
    /// `0xCn`
    ProgramChange = 0xC,
    /// `0xDn`
    ChannelPressure = 0xD,
    /// `0xEn`
    PitchWheelChange = 0xE,
}

impl VoiceKind {
    /// Classify a status byte. `None` for anything that is not a channel voice status.
    pub fn from_status(status: u8) -> Option<Self> {
        Self::try_from(status >> 4).ok()
    }

    /// How many data bytes follow the status
    pub const fn data_len(self) -> usize {
        match self {
            Self::ProgramChange | Self::ChannelPressure => 1,
            _ => 2,
        }
    }
}

/// The payload of a channel voice message. Data bytes are kept as read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VoiceEvent {
    /// A key was released. The velocity sometimes affects release time.
    NoteOff {
        /// Key number
        note: u8,
        /// Release velocity
        velocity: u8,
    },
    /// A key was pressed. Velocity zero is equivalent to [`VoiceEvent::NoteOff`].
    NoteOn {
        /// Key number
        note: u8,
        /// Strike velocity
        velocity: u8,
    },
    /// Aftertouch on a single key
    KeyPressure {
        /// Key number
        note: u8,
        /// Pressure amount
        pressure: u8,
    },
    /// A controller (pedal, lever, knob...) changed
    ControlChange {
        /// Controller number
        controller: u8,
        /// New value
        value: u8,
    },
    /// The channel's patch changed
    ProgramChange {
        /// New program number
        program: u8,
    },
    /// Aftertouch applied to every note on the channel
    ChannelPressure {
        /// Pressure amount
        pressure: u8,
    },
    /// The pitch wheel moved
    PitchWheelChange {
        /// Least significant seven bits
        fine: u8,
        /// Most significant seven bits
        coarse: u8,
    },
}

impl VoiceEvent {
    /// Build an event of `kind` from its data bytes.
    ///
    /// `data[1]` is ignored for one-byte messages.
    pub const fn from_data(kind: VoiceKind, data: [u8; 2]) -> Self {
        let [a, b] = data;
        match kind {
            VoiceKind::NoteOff => Self::NoteOff {
                note: a,
                velocity: b,
            },
            VoiceKind::NoteOn => Self::NoteOn {
                note: a,
                velocity: b,
            },
            VoiceKind::KeyPressure => Self::KeyPressure {
                note: a,
                pressure: b,
            },
            VoiceKind::ControlChange => Self::ControlChange {
                controller: a,
                value: b,
            },
            VoiceKind::ProgramChange => Self::ProgramChange { program: a },
            VoiceKind::ChannelPressure => Self::ChannelPressure { pressure: a },
            VoiceKind::PitchWheelChange => Self::PitchWheelChange { fine: a, coarse: b },
        }
    }

    /// True for a note-off, or a note-on with zero velocity
    pub const fn is_note_off(&self) -> bool {
        matches!(
            self,
            Self::NoteOff { .. } | Self::NoteOn { velocity: 0, .. }
        )
    }
}

#[doc = r#"
A channel voice message: an event addressed to one channel.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelVoiceMessage {
    channel: Channel,
    event: VoiceEvent,
}

impl ChannelVoiceMessage {
    /// Create a new channel voice message
    pub const fn new(channel: Channel, event: VoiceEvent) -> Self {
        Self { channel, event }
    }

    /// The channel this message is addressed to
    pub const fn channel(&self) -> Channel {
        self.channel
    }

    /// The message payload
    pub const fn event(&self) -> &VoiceEvent {
        &self.event
    }
}

#[test]
fn classify_status_bytes() {
    use pretty_assertions::assert_eq;
    assert_eq!(VoiceKind::from_status(0x80), Some(VoiceKind::NoteOff));
    assert_eq!(VoiceKind::from_status(0x9F), Some(VoiceKind::NoteOn));
    assert_eq!(VoiceKind::from_status(0xC3), Some(VoiceKind::ProgramChange));
    assert_eq!(VoiceKind::from_status(0xE0), Some(VoiceKind::PitchWheelChange));
    assert_eq!(VoiceKind::from_status(0xF8), None);
    assert_eq!(VoiceKind::from_status(0x40), None);

    assert_eq!(Channel::from_status(0x9F), Channel::Sixteen);
    assert_eq!(Channel::from_status(0x93).index(), 3);
}

#[test]
fn zero_velocity_note_on_is_a_note_off() {
    let off = VoiceEvent::from_data(VoiceKind::NoteOn, [60, 0]);
    assert!(off.is_note_off());
    let on = VoiceEvent::from_data(VoiceKind::NoteOn, [60, 1]);
    assert!(!on.is_note_off());
}
