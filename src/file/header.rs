use crate::{
    prelude::*,
    reader::{ReadResult, Reader},
};

/// The length the `MThd` payload is supposed to have.
pub const HEADER_LENGTH: u32 = 6;

#[doc = r#"
The fields of the `MThd` chunk:

```text
MThd <length> <format: u16> <ntrks: u16> <division: u16>
```
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Header {
    format: FormatType,
    declared_tracks: u16,
    timing: Timing,
}

impl Header {
    /// Create a new header
    pub const fn new(format: FormatType, declared_tracks: u16, timing: Timing) -> Self {
        Self {
            format,
            declared_tracks,
            timing,
        }
    }

    /// Read the fixed 6 byte layout, whatever length the chunk declared.
    pub(crate) fn read<W>(
        reader: &mut Reader<'_>,
        length: u32,
        warnings: &mut W,
    ) -> ReadResult<Self>
    where
        W: WarningSink + ?Sized,
    {
        if length != HEADER_LENGTH {
            warnings.warn(Warning::HeaderLength { length });
        }

        let format = FormatType::from(reader.read_u16()?);
        if let FormatType::Unknown(code) = format {
            warnings.warn(Warning::UnknownFormat(code));
        }

        let declared_tracks = reader.read_u16()?;
        let timing = Timing::read(reader)?;

        Ok(Self {
            format,
            declared_tracks,
            timing,
        })
    }

    /// The file's format code
    pub const fn format(&self) -> FormatType {
        self.format
    }

    /// The number of tracks the header claims
    pub const fn declared_tracks(&self) -> u16 {
        self.declared_tracks
    }

    /// Get the timing props
    pub const fn timing(&self) -> &Timing {
        &self.timing
    }
}
