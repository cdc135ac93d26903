#![doc = r#"
A cursor over an in-memory MIDI byte buffer

[`Reader`] knows nothing about MIDI semantics beyond the big-endian integer
layout and the variable-length quantity (VLQ) encoding used for delta
times and meta/sysex lengths. Every read is bounds-checked: running off the
end of the buffer is a [`ReaderErrorKind::Truncated`] error, never a silent
zero.

# Example
```rust
# use smf_song::reader::Reader;
let mut reader = Reader::new(&[0x81, 0x48, 0x4D, 0x54]);

assert_eq!(reader.read_vlq().unwrap(), 200);
assert_eq!(reader.read_fixed_ascii(2).unwrap(), "MT");
assert!(reader.eof());
```
"#]

mod error;
pub use error::*;

mod vlq;
pub use vlq::*;

use crate::MalformedError;
use alloc::string::String;

/// A sequential reader over a borrowed byte slice.
#[derive(Debug, Clone)]
pub struct Reader<'slc> {
    data: &'slc [u8],
    position: usize,
}

impl<'slc> Reader<'slc> {
    /// Create a reader positioned at the start of `data`
    pub const fn new(data: &'slc [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// The current offset into the buffer
    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// The full underlying buffer
    #[inline]
    pub const fn buffer(&self) -> &'slc [u8] {
        self.data
    }

    /// Bytes left between the cursor and the end of the buffer
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// True once the cursor has reached the end of the buffer
    #[inline]
    pub const fn eof(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Move the cursor to an absolute position.
    ///
    /// Seeking exactly to the end of the buffer is allowed.
    pub fn seek(&mut self, position: usize) -> ReadResult<()> {
        if position > self.data.len() {
            return Err(ReaderError::truncated(
                self.position,
                position.saturating_sub(self.position),
                self.remaining(),
            ));
        }
        self.position = position;
        Ok(())
    }

    /// Skip `n` bytes
    pub fn advance(&mut self, n: usize) -> ReadResult<()> {
        self.check(n)?;
        self.position += n;
        Ok(())
    }

    fn check(&self, needed: usize) -> ReadResult<()> {
        if self.remaining() < needed {
            Err(ReaderError::truncated(
                self.position,
                needed,
                self.remaining(),
            ))
        } else {
            Ok(())
        }
    }

    fn peek_array<const N: usize>(&self) -> ReadResult<[u8; N]> {
        self.check(N)?;
        let mut out = [0; N];
        out.copy_from_slice(&self.data[self.position..self.position + N]);
        Ok(out)
    }

    fn read_array<const N: usize>(&mut self) -> ReadResult<[u8; N]> {
        let out = self.peek_array::<N>()?;
        self.position += N;
        Ok(out)
    }

    /// Look at the next byte without consuming it
    pub fn peek_u8(&self) -> ReadResult<u8> {
        self.peek_array::<1>().map(|[b]| b)
    }

    /// Consume the next byte
    pub fn read_u8(&mut self) -> ReadResult<u8> {
        self.read_array::<1>().map(|[b]| b)
    }

    /// Look at the next big-endian `u16`
    pub fn peek_u16(&self) -> ReadResult<u16> {
        self.peek_array().map(u16::from_be_bytes)
    }

    /// Consume a big-endian `u16`
    pub fn read_u16(&mut self) -> ReadResult<u16> {
        self.read_array().map(u16::from_be_bytes)
    }

    /// Look at the next big-endian 24-bit integer
    pub fn peek_u24(&self) -> ReadResult<u32> {
        self.peek_array::<3>()
            .map(|[a, b, c]| u32::from_be_bytes([0, a, b, c]))
    }

    /// Consume a big-endian 24-bit integer
    pub fn read_u24(&mut self) -> ReadResult<u32> {
        self.read_array::<3>()
            .map(|[a, b, c]| u32::from_be_bytes([0, a, b, c]))
    }

    /// Look at the next big-endian `u32`
    pub fn peek_u32(&self) -> ReadResult<u32> {
        self.peek_array().map(u32::from_be_bytes)
    }

    /// Consume a big-endian `u32`
    pub fn read_u32(&mut self) -> ReadResult<u32> {
        self.read_array().map(u32::from_be_bytes)
    }

    /// Look at the next big-endian `u64`
    pub fn peek_u64(&self) -> ReadResult<u64> {
        self.peek_array().map(u64::from_be_bytes)
    }

    /// Consume a big-endian `u64`
    pub fn read_u64(&mut self) -> ReadResult<u64> {
        self.read_array().map(u64::from_be_bytes)
    }

    /// Borrow the next `len` bytes and move past them
    pub fn read_bytes(&mut self, len: usize) -> ReadResult<&'slc [u8]> {
        self.check(len)?;
        let start = self.position;
        self.position += len;
        Ok(&self.data[start..self.position])
    }

    /// Read exactly `len` bytes as ASCII text.
    ///
    /// Each byte maps to the character with the same code point, so
    /// non-ASCII bytes are kept rather than rejected.
    pub fn read_fixed_ascii(&mut self, len: usize) -> ReadResult<String> {
        self.read_bytes(len).map(ascii_to_string)
    }

    /// Read ASCII text up to a `0` byte (consumed, not returned) or the end of the buffer
    pub fn read_zero_terminated_ascii(&mut self) -> String {
        let rest = &self.data[self.position.min(self.data.len())..];
        let len = rest.iter().position(|&b| b == 0).unwrap_or(rest.len());
        self.position += len;
        if !self.eof() {
            // the terminator
            self.position += 1;
        }
        ascii_to_string(&rest[..len])
    }

    /// Read a variable-length quantity.
    ///
    /// Each byte contributes its low seven bits, most significant group
    /// first; a set top bit means another byte follows. At most four bytes
    /// are accepted, giving a maximum of `0x0FFF_FFFF`.
    pub fn read_vlq(&mut self) -> ReadResult<u32> {
        let start = self.position;
        let mut value: u32 = 0;
        for _ in 0..MAX_VLQ_LEN {
            let byte = self.read_u8()?;
            value = (value << 7) | (byte & 0x7F) as u32;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(ReaderError::malformed(start, MalformedError::VlqOverflow))
    }
}

pub(crate) fn ascii_to_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

#[test]
fn read_integers_big_endian() {
    use pretty_assertions::assert_eq;
    let bytes = [
        0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F,
        0x10, 0x11, 0x12,
    ];
    let mut reader = Reader::new(&bytes);
    assert_eq!(reader.peek_u8().unwrap(), 0x01);
    assert_eq!(reader.read_u8().unwrap(), 0x01);
    assert_eq!(reader.peek_u16().unwrap(), 0x0203);
    assert_eq!(reader.read_u16().unwrap(), 0x0203);
    assert_eq!(reader.read_u24().unwrap(), 0x04_0506);
    assert_eq!(reader.read_u32().unwrap(), 0x0708_090A);
    assert_eq!(reader.peek_u64().unwrap(), 0x0B0C_0D0E_0F10_1112);
    assert_eq!(reader.read_u64().unwrap(), 0x0B0C_0D0E_0F10_1112);
    assert!(reader.eof());
}

#[test]
fn reading_past_the_end_is_truncated() {
    let mut reader = Reader::new(&[0x00, 0x01, 0x02]);
    let err = reader.read_u32().unwrap_err();
    assert!(err.is_truncated());
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::Truncated {
            needed: 4,
            remaining: 3
        }
    );
    // a failed read leaves the cursor where it was
    assert_eq!(reader.position(), 0);

    assert!(reader.advance(4).unwrap_err().is_truncated());
    assert!(reader.seek(4).unwrap_err().is_truncated());
    reader.seek(3).unwrap();
    assert!(reader.eof());
    assert!(reader.read_u8().unwrap_err().is_truncated());
}

#[test]
fn read_ascii() {
    use pretty_assertions::assert_eq;
    let mut reader = Reader::new(b"MThdpiano\0rest");
    assert_eq!(reader.read_fixed_ascii(4).unwrap(), "MThd");
    assert_eq!(reader.read_zero_terminated_ascii(), "piano");
    assert_eq!(reader.read_zero_terminated_ascii(), "rest");
    assert!(reader.eof());
    assert_eq!(reader.read_zero_terminated_ascii(), "");
}

#[test]
fn read_bytes_borrows() {
    let data = [1, 2, 3, 4];
    let mut reader = Reader::new(&data);
    reader.advance(1).unwrap();
    assert_eq!(reader.read_bytes(2).unwrap(), &[2, 3]);
    assert_eq!(reader.remaining(), 1);
}
