#![doc = r#"
Decoding of Standard MIDI Files into a [`MidiFile`]

The decoder is a faithful, low-level view of the byte stream: the header
fields, one event list per `MTrk` chunk and every unrecognized chunk kept
verbatim. Turning it into something playable is the job of the
[`convert`](crate::convert) module.

# Tolerated anomalies
The following are reported through the [`WarningSink`] and decoding
carries on:
- a header length other than 6
- an unknown format code
- chunks other than `MThd`/`MTrk`
- a data byte in status position with no running status to reuse

# Example
```rust
# use smf_song::prelude::*;
let bytes = [
    b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 0, 0, 1, 0, 96, // header
    b'M', b'T', b'r', b'k', 0, 0, 0, 4, 0, 0xFF, 0x2F, 0, // empty track
];
let file = MidiFile::parse(&bytes, &mut IgnoreWarnings).unwrap();

assert_eq!(file.format_type(), FormatType::SingleMultiChannel);
assert_eq!(file.timing().ticks_per_quarter_note(), 96);
assert_eq!(file.tracks().len(), 1);
```
"#]

pub mod chunk;

mod format;
pub use format::*;

mod header;
pub use header::*;

mod timing;
pub use timing::*;

mod track;
pub use track::*;

use crate::{
    MalformedError,
    prelude::*,
    reader::{ReadResult, Reader, ReaderError},
};
use alloc::vec::Vec;
use chunk::{HEADER_TAG, RawChunk, TRACK_TAG, UnknownChunk};

#[doc = r#"
A decoded MIDI file.
"#]
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MidiFile {
    header: Header,
    tracks: Vec<Track>,
    unknown_chunks: Vec<UnknownChunk>,
}

impl MidiFile {
    /// Create a file from already decoded parts
    pub fn new(header: Header, tracks: Vec<Track>, unknown_chunks: Vec<UnknownChunk>) -> Self {
        Self {
            header,
            tracks,
            unknown_chunks,
        }
    }

    /// Parse a set of bytes into a file struct
    pub fn parse<W>(bytes: &[u8], warnings: &mut W) -> ReadResult<Self>
    where
        W: WarningSink + ?Sized,
    {
        let mut reader = Reader::new(bytes);

        if reader.eof() {
            return Err(ReaderError::malformed(0, MalformedError::MissingHeader));
        }
        let tag = RawChunk::peek_tag(&reader)?;
        if tag != HEADER_TAG {
            return Err(ReaderError::malformed(
                0,
                MalformedError::HeaderNotFirst { tag },
            ));
        }
        let header_chunk = RawChunk::read(&mut reader)?;

        // The fixed layout is read from the file itself so a short header
        // chunk still yields its 6 bytes (or a truncation error).
        let mut header_reader = Reader::new(bytes);
        header_reader.seek(header_chunk.offset())?;
        let header = Header::read(&mut header_reader, header_chunk.length(), warnings)?;

        let mut tracks = Vec::new();
        let mut unknown_chunks = Vec::new();
        while !reader.eof() {
            let start = reader.position();
            let chunk = RawChunk::read(&mut reader)?;
            match chunk.tag() {
                HEADER_TAG => {
                    return Err(ReaderError::malformed(
                        start,
                        MalformedError::DuplicateHeader,
                    ));
                }
                TRACK_TAG => tracks.push(Track::read(&chunk, warnings)?),
                tag => {
                    warnings.warn(Warning::UnknownChunk { tag });
                    unknown_chunks.push(UnknownChunk::from(chunk));
                }
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            format = ?header.format(),
            tracks = tracks.len(),
            unknown_chunks = unknown_chunks.len(),
            "decoded midi file"
        );

        Ok(Self {
            header,
            tracks,
            unknown_chunks,
        })
    }

    /// Returns header info
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Returns the format type for the file.
    pub fn format_type(&self) -> FormatType {
        self.header.format()
    }

    /// Returns the file's time division
    pub fn timing(&self) -> &Timing {
        self.header.timing()
    }

    /// Returns a track list
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Chunks that were neither header nor track, in file order
    pub fn unknown_chunks(&self) -> &[UnknownChunk] {
        &self.unknown_chunks
    }
}
