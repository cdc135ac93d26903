use alloc::vec::Vec;

/// The longest variable-length quantity a MIDI file may contain.
pub const MAX_VLQ_LEN: usize = 4;

/// The largest value a four byte variable-length quantity can hold.
pub const MAX_VLQ_VALUE: u32 = 0x0FFF_FFFF;

/// Encode `value` as a variable-length quantity, the inverse of
/// [`Reader::read_vlq`](super::Reader::read_vlq).
///
/// Values above [`MAX_VLQ_VALUE`] are truncated to their low 28 bits.
pub fn encode_vlq(value: u32) -> Vec<u8> {
    let value = value & MAX_VLQ_VALUE;
    let mut out = Vec::with_capacity(MAX_VLQ_LEN);
    let mut shift = 21;
    while shift > 0 && value >> shift == 0 {
        shift -= 7;
    }
    while shift > 0 {
        out.push(((value >> shift) & 0x7F) as u8 | 0x80);
        shift -= 7;
    }
    out.push((value & 0x7F) as u8);
    out
}

#[test]
fn known_vlq_values() {
    use super::Reader;
    use pretty_assertions::assert_eq;

    assert_eq!(Reader::new(&[0x81, 0x48]).read_vlq().unwrap(), 200);
    assert_eq!(Reader::new(&[0x40]).read_vlq().unwrap(), 64);
    assert_eq!(Reader::new(&[0x00]).read_vlq().unwrap(), 0);
    assert_eq!(
        Reader::new(&[0xFF, 0xFF, 0xFF, 0x7F]).read_vlq().unwrap(),
        MAX_VLQ_VALUE
    );

    assert_eq!(encode_vlq(200), alloc::vec![0x81, 0x48]);
    assert_eq!(encode_vlq(64), alloc::vec![0x40]);
    assert_eq!(encode_vlq(0x80), alloc::vec![0x81, 0x00]);
    assert_eq!(encode_vlq(MAX_VLQ_VALUE), alloc::vec![0xFF, 0xFF, 0xFF, 0x7F]);
}

#[test]
fn vlq_round_trip_at_group_boundaries() {
    use super::Reader;
    use pretty_assertions::assert_eq;

    for value in [
        0,
        0x7F,
        0x80,
        0x3FFF,
        0x4000,
        0x1F_FFFF,
        0x20_0000,
        0x0800_0000,
        MAX_VLQ_VALUE,
    ]
    .into_iter()
    .chain((0..=MAX_VLQ_VALUE).step_by(4093))
    {
        let bytes = encode_vlq(value);
        let mut reader = Reader::new(&bytes);
        assert_eq!(reader.read_vlq().unwrap(), value);
        assert!(reader.eof());
    }
}

#[test]
fn vlq_errors() {
    use super::Reader;

    // the continuation bit promises a byte that never comes
    assert!(Reader::new(&[0x81]).read_vlq().unwrap_err().is_truncated());
    // five bytes cannot fit the format
    assert!(
        Reader::new(&[0x81, 0x80, 0x80, 0x80, 0x00])
            .read_vlq()
            .unwrap_err()
            .is_malformed()
    );
}
