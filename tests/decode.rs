mod common;

use common::{TrackBytes, chunk, file, header};
use pretty_assertions::assert_eq;
use smf_song::{
    events::{MetaMessage, MetaType},
    prelude::*,
};

#[test]
fn first_chunk_must_be_the_header() {
    let mut bytes = TrackBytes::new().end(0).chunk();
    bytes.extend(header(0, 1, 96));

    let err = MidiFile::parse(&bytes, &mut IgnoreWarnings).unwrap_err();
    assert!(err.is_malformed());
    assert_eq!(err.position(), 0);
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::Malformed(MalformedError::HeaderNotFirst { tag: *b"MTrk" })
    );
}

#[test]
fn empty_input_has_no_header() {
    let err = MidiFile::parse(&[], &mut IgnoreWarnings).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::Malformed(MalformedError::MissingHeader)
    );
}

#[test]
fn second_header_is_malformed() {
    let mut bytes = header(1, 1, 96);
    bytes.extend(TrackBytes::new().end(0).chunk());
    let second_header = bytes.len();
    bytes.extend(header(1, 1, 96));

    let err = MidiFile::parse(&bytes, &mut IgnoreWarnings).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::Malformed(MalformedError::DuplicateHeader)
    );
    // 14 header bytes, then a 12 byte track chunk
    assert_eq!(second_header, 26);
    assert_eq!(err.position(), second_header);
}

#[test]
fn smpte_division_is_unsupported() {
    // -25 fps, 40 ticks per frame
    let bytes = header(0, 0, 0xE728);
    let err = MidiFile::parse(&bytes, &mut IgnoreWarnings).unwrap_err();
    assert!(err.is_unsupported());
    assert_eq!(
        err.error_kind(),
        &ReaderErrorKind::Unsupported(UnsupportedFeature::SmpteTimecode {
            frames_per_second: -25,
            ticks_per_frame: 40,
        })
    );
}

#[test]
fn zero_ticks_per_quarter_note_is_malformed() {
    let bytes = header(0, 0, 0);
    let err = MidiFile::parse(&bytes, &mut IgnoreWarnings).unwrap_err();
    assert!(err.is_malformed());
}

#[test]
fn chunk_longer_than_the_file_is_truncated() {
    let mut bytes = header(0, 1, 96);
    bytes.extend_from_slice(b"MTrk");
    bytes.extend_from_slice(&100u32.to_be_bytes());
    bytes.extend_from_slice(&[0x00, 0xFF, 0x2F, 0x00]);

    let err = MidiFile::parse(&bytes, &mut IgnoreWarnings).unwrap_err();
    assert!(err.is_truncated());
}

#[test]
fn event_running_past_its_chunk_is_truncated() {
    // the note-on's second data byte lies outside the chunk
    let mut bytes = header(0, 1, 96);
    bytes.extend(chunk(b"MTrk", &[0x00, 0x90, 60]));
    bytes.extend(TrackBytes::new().end(0).chunk());

    let err = MidiFile::parse(&bytes, &mut IgnoreWarnings).unwrap_err();
    assert!(err.is_truncated());
    // 14 header bytes, 8 bytes of chunk framing, then the delta, status and pitch
    assert_eq!(err.position(), 25);
}

#[test]
fn unknown_chunks_are_kept() {
    let mut bytes = header(1, 1, 96);
    bytes.extend(chunk(b"XFIH", &[1, 2, 3]));
    bytes.extend(TrackBytes::new().end(0).chunk());

    let mut warnings = Vec::new();
    let file = MidiFile::parse(&bytes, &mut warnings).unwrap();

    assert_eq!(warnings, vec![Warning::UnknownChunk { tag: *b"XFIH" }]);
    assert_eq!(file.tracks().len(), 1);
    assert_eq!(file.unknown_chunks().len(), 1);
    assert_eq!(file.unknown_chunks()[0].tag(), *b"XFIH");
    assert_eq!(file.unknown_chunks()[0].data(), &[1, 2, 3]);
}

#[test]
fn header_anomalies_are_warnings() {
    // a header declaring 8 bytes, with two trailing bytes nobody reads
    let mut bytes = chunk(b"MThd", &[0, 1, 0, 3, 0, 96, 0xAB, 0xCD]);
    bytes.extend(TrackBytes::new().end(0).chunk());

    let mut warnings = Vec::new();
    let file = MidiFile::parse(&bytes, &mut warnings).unwrap();

    assert_eq!(file.format_type(), FormatType::Simultaneous);
    assert_eq!(file.timing().ticks_per_quarter_note(), 96);
    // the declared track count is taken as is
    assert_eq!(file.header().declared_tracks(), 3);
    assert_eq!(warnings, vec![Warning::HeaderLength { length: 8 }]);
}

#[test]
fn running_status_and_meta_events() {
    let track = TrackBytes::new()
        .name(0, "Piano")
        .note_on(0, 60, 100)
        // running status: a second note-on without its status byte
        .event(10, &[64, 90])
        .tempo(0, 500_000)
        .event(5, &[0xFF, 0x58, 0x04, 4, 2, 24, 8])
        .end(0);
    let bytes = file(&[track]);

    let mut warnings = Vec::new();
    let file = MidiFile::parse(&bytes, &mut warnings).unwrap();
    assert!(warnings.is_empty());

    let track = &file.tracks()[0];
    assert_eq!(track.name(), Some("Piano"));

    let deltas: Vec<u32> = track.events().iter().map(TrackEvent::delta_ticks).collect();
    assert_eq!(deltas, vec![0, 0, 10, 0, 5, 0]);

    let TrackMessage::ChannelVoice(second) = track.events()[2].message() else {
        panic!("expected a channel voice message");
    };
    assert_eq!(second.channel(), Channel::One);
    assert_eq!(
        second.event(),
        &VoiceEvent::NoteOn {
            note: 64,
            velocity: 90
        }
    );
    assert_eq!(
        track.events()[3].message(),
        &TrackMessage::Meta(MetaMessage::SetTempo(500_000))
    );
    assert_eq!(
        track.events()[4].message(),
        &TrackMessage::Meta(MetaMessage::Other {
            kind: MetaType::TimeSignature,
            data: vec![4, 2, 24, 8],
        })
    );
}

#[test]
fn data_byte_without_running_status_is_skipped() {
    let track = TrackBytes::new().event(3, &[0x40]).event(2, &[0x90, 60, 100]);
    let bytes = file(&[track]);

    let mut warnings = Vec::new();
    let file = MidiFile::parse(&bytes, &mut warnings).unwrap();

    // 14 header bytes, 8 bytes of chunk framing, then the delta
    assert_eq!(warnings, vec![Warning::RunningStatusUnset { position: 23 }]);
    let events = file.tracks()[0].events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].delta_ticks(), 5);
}

#[test]
fn decoding_is_deterministic() {
    let track = TrackBytes::new()
        .event(0, &[0x55])
        .note_on(0, 60, 100)
        .note_off(48, 60)
        .end(0);
    let mut bytes = file(&[track]);
    bytes.extend(chunk(b"junk", &[]));

    let mut first_warnings = Vec::new();
    let first = MidiFile::parse(&bytes, &mut first_warnings).unwrap();
    let mut second_warnings = Vec::new();
    let second = MidiFile::parse(&bytes, &mut second_warnings).unwrap();

    assert_eq!(first, second);
    assert_eq!(first_warnings, second_warnings);
    assert_eq!(first_warnings.len(), 2);
}
