#![doc = r#"
Top-level chunks

A MIDI file is a flat sequence of chunks, each a 4-character ASCII tag,
a 32-bit big-endian length and that many payload bytes:

```text
[Header Chunk: "MThd"]
[Track Chunk 1: "MTrk"]
...
[Track Chunk N: "MTrk"]
[Optional Unknown Chunks]
```

Chunks with any other tag are kept as [`UnknownChunk`]s so they are not
lost, but nothing in this crate interprets them.
"#]

use crate::reader::{ReadResult, Reader};
use alloc::vec::Vec;

/// `MThd`
pub const HEADER_TAG: [u8; 4] = *b"MThd";
/// `MTrk`
pub const TRACK_TAG: [u8; 4] = *b"MTrk";

/// The framing of one chunk, borrowing its payload from the input buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawChunk<'slc> {
    tag: [u8; 4],
    offset: usize,
    data: &'slc [u8],
}

impl<'slc> RawChunk<'slc> {
    /// Read a chunk's tag and length and skip over its payload.
    pub fn read(reader: &mut Reader<'slc>) -> ReadResult<Self> {
        let mut tag = [0; 4];
        tag.copy_from_slice(reader.read_bytes(4)?);
        let length = reader.read_u32()? as usize;
        let offset = reader.position();
        let data = reader.read_bytes(length)?;
        Ok(Self { tag, offset, data })
    }

    /// Look at the tag of the chunk under the cursor without consuming it
    pub fn peek_tag(reader: &Reader<'slc>) -> ReadResult<[u8; 4]> {
        reader.peek_u32().map(u32::to_be_bytes)
    }

    /// The 4 byte type identifier
    pub const fn tag(&self) -> [u8; 4] {
        self.tag
    }

    /// The declared payload length
    pub const fn length(&self) -> u32 {
        self.data.len() as u32
    }

    /// Position of the payload's first byte in the whole file
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// The payload
    pub const fn data(&self) -> &'slc [u8] {
        self.data
    }
}

/// A chunk whose tag is neither `MThd` nor `MTrk`, kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnknownChunk {
    tag: [u8; 4],
    data: Vec<u8>,
}

impl UnknownChunk {
    /// Create a new unknown chunk
    pub fn new(tag: [u8; 4], data: Vec<u8>) -> Self {
        Self { tag, data }
    }

    /// The chunk's tag
    pub const fn tag(&self) -> [u8; 4] {
        self.tag
    }

    /// The chunk's payload
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl From<RawChunk<'_>> for UnknownChunk {
    fn from(chunk: RawChunk<'_>) -> Self {
        Self::new(chunk.tag, chunk.data.to_vec())
    }
}

#[test]
fn read_raw_chunk() {
    use pretty_assertions::assert_eq;
    let bytes = [b'X', b'Y', b'Z', b'W', 0, 0, 0, 2, 0xAA, 0xBB, 0xCC];
    let mut reader = Reader::new(&bytes);
    let chunk = RawChunk::read(&mut reader).unwrap();
    assert_eq!(&chunk.tag(), b"XYZW");
    assert_eq!(chunk.offset(), 8);
    assert_eq!(chunk.data(), &[0xAA, 0xBB]);
    assert_eq!(reader.position(), 10);

    let err = RawChunk::read(&mut reader).unwrap_err();
    assert!(err.is_truncated());
}

#[test]
fn declared_length_past_the_end() {
    let bytes = [b'M', b'T', b'r', b'k', 0, 0, 0, 9, 0x00, 0xFF];
    let err = RawChunk::read(&mut Reader::new(&bytes)).unwrap_err();
    assert!(err.is_truncated());
}
