use crate::{
    MalformedError, UnsupportedFeature,
    reader::{ReadResult, Reader, ReaderError},
};

/// The header's time division.
///
/// When the division's top bit is clear, the remaining 15 bits are the
/// number of delta-time ticks in a quarter note. A set top bit denotes SMPTE
/// timecode (negative frames per second in the high byte, ticks per frame in
/// the low byte), which is rejected when the header is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timing {
    ticks_per_quarter_note: u16,
}

impl Timing {
    /// The tickrate per quarter note defines what a "quarter note" means.
    ///
    /// The leading bit of the u16 is disregarded, so 1-32767
    pub const fn new_ticks_per_quarter_note(tpqn: u16) -> Self {
        Self {
            ticks_per_quarter_note: tpqn & 0x7FFF,
        }
    }

    pub(crate) fn read(reader: &mut Reader<'_>) -> ReadResult<Self> {
        let position = reader.position();
        let division = reader.read_u16()?;
        let [hi, lo] = division.to_be_bytes();
        if hi >> 7 == 1 {
            return Err(ReaderError::unsupported(
                position,
                UnsupportedFeature::SmpteTimecode {
                    frames_per_second: hi as i8,
                    ticks_per_frame: lo,
                },
            ));
        }
        if division == 0 {
            return Err(ReaderError::malformed(
                position,
                MalformedError::ZeroTicksPerQuarterNote,
            ));
        }
        Ok(Self::new_ticks_per_quarter_note(division))
    }

    /// Returns the ticks per quarter note for the file.
    pub const fn ticks_per_quarter_note(&self) -> u16 {
        self.ticks_per_quarter_note
    }

    /// Convert a tick count into quarter notes
    pub fn ticks_to_quarter_notes(&self, ticks: u64) -> f64 {
        ticks as f64 / self.ticks_per_quarter_note as f64
    }
}

#[test]
fn read_division() {
    use pretty_assertions::assert_eq;

    let timing = Timing::read(&mut Reader::new(&[0x01, 0xE0])).unwrap();
    assert_eq!(timing.ticks_per_quarter_note(), 480);
    assert_eq!(timing.ticks_to_quarter_notes(720), 1.5);

    // -25 fps, 40 ticks per frame
    let err = Timing::read(&mut Reader::new(&[0xE7, 0x28])).unwrap_err();
    assert!(err.is_unsupported());
    assert_eq!(
        err.error_kind(),
        &crate::reader::ReaderErrorKind::Unsupported(UnsupportedFeature::SmpteTimecode {
            frames_per_second: -25,
            ticks_per_frame: 40,
        })
    );

    assert!(
        Timing::read(&mut Reader::new(&[0x00, 0x00]))
            .unwrap_err()
            .is_malformed()
    );
}
