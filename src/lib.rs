#![warn(missing_docs)]
#![warn(clippy::all)]
#![no_std]
#![doc = r#"
Decode Standard MIDI Files into a time-ordered song model

The crate works in three layers:

- [`reader`]: a bounds-checked cursor over big-endian bytes and
  variable-length quantities
- [`file`]: the chunk structure of a `.mid` file, decoded into a
  [`MidiFile`](file::MidiFile) of raw [`TrackEvent`](events::TrackEvent)s
- [`convert`]: replays those events into a [`Song`](song::Song), where
  notes have durations, times are in quarter notes and every track
  carries its own instrument

The resulting [`Song`](song::Song) can be handed to a synthesizer through
the [`playback`] module.

Nothing here panics on bad input. Fatal problems are returned as errors,
and recoverable oddities are reported to a caller-supplied
[`WarningSink`](warning::WarningSink).

# Example
```rust
use smf_song::prelude::*;

let bytes = [
    b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 0, 0, 1, 0, 96,
    b'M', b'T', b'r', b'k', 0, 0, 0, 19,
    0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20, // 120 bpm
    0x00, 0x90, 60, 100,
    0x60, 0x80, 60, 0,
    0x00, 0xFF, 0x2F, 0x00,
];
let mut warnings = Vec::new();
let song = load_song(&bytes, &mut warnings).unwrap();

assert!(warnings.is_empty());
let segment = song.segment(0).unwrap();
assert_eq!(segment.tempo_at(0.), 120.);
assert_eq!(segment.subsegments()[0].tracks()[0].commands().count(), 3);
```
"#]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod convert;
pub mod events;
pub mod file;
pub mod message;
pub mod playback;
pub mod reader;
pub mod song;
pub mod warning;

mod error;
pub use error::*;

/// Decode `bytes` and convert them into a [`Song`](song::Song) with the default options.
///
/// # Errors
/// Anything [`MidiFile::parse`](file::MidiFile::parse) or
/// [`convert`](convert::convert) reject.
pub fn load_song<W>(bytes: &[u8], warnings: &mut W) -> Result<song::Song, LoadError>
where
    W: warning::WarningSink + ?Sized,
{
    let file = file::MidiFile::parse(bytes, warnings)?;
    Ok(convert::convert(&file, warnings)?)
}

#[doc = r#"
Common re-exports for decoding and converting files
"#]
pub mod prelude {
    pub use crate::{
        ConvertError, LoadError, MalformedError, ModelError, UnsupportedFeature,
        convert::{ConvertOptions, InstrumentChangePolicy, convert, convert_with},
        events::{MetaMessage, MetaType, TrackEvent, TrackMessage},
        file::{FormatType, Header, MidiFile, Timing},
        load_song,
        message::{Channel, ChannelVoiceMessage, VoiceEvent},
        playback::{Player, schedule},
        reader::{ReadResult, Reader, ReaderError, ReaderErrorKind},
        song::{
            Command, CommandKind, InstrumentRef, InstrumentSettings, MuteState, Segment, Song,
            Subsegment, TempoChange,
        },
        warning::{FnSink, IgnoreWarnings, Warning, WarningSink},
    };

    #[cfg(feature = "tracing")]
    pub use crate::warning::TracingSink;

    pub use alloc::{string::String, vec::Vec};
}
