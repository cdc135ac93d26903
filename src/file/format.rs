use num_enum::{FromPrimitive, IntoPrimitive};

#[doc = r#"
The format code stored in the header chunk.

- Format 0: a single track holding every channel
- Format 1: several tracks played simultaneously
- Format 2: several independent sequences

Other codes are tolerated by the decoder and kept as [`FormatType::Unknown`].
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum FormatType {
    /// Format 0
    SingleMultiChannel = 0,
    /// Format 1
    Simultaneous = 1,
    /// Format 2
    SequentiallyIndependent = 2,
    /// Any other code
    #[num_enum(catch_all)]
    Unknown(u16),
}

impl FormatType {
    /// True for the codes defined by the Standard MIDI File format
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

#[test]
fn format_codes() {
    use pretty_assertions::assert_eq;
    assert_eq!(FormatType::from(0), FormatType::SingleMultiChannel);
    assert_eq!(FormatType::from(2), FormatType::SequentiallyIndependent);
    assert_eq!(FormatType::from(9), FormatType::Unknown(9));
    assert!(!FormatType::from(9).is_known());
    assert_eq!(u16::from(FormatType::Simultaneous), 1);
}
