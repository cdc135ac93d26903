use crate::{
    events::{MetaMessage, MetaType, TrackEvent, TrackMessage},
    message::{Channel, ChannelVoiceMessage, VoiceEvent, VoiceKind},
    prelude::*,
    reader::{ReadResult, Reader, ascii_to_string},
};
use alloc::vec::Vec;

use super::chunk::RawChunk;

#[doc = r#"
The events of one `MTrk` chunk, in file order.
"#]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Track {
    events: Vec<TrackEvent>,
}

impl Track {
    /// Create a new track
    pub fn new(events: Vec<TrackEvent>) -> Self {
        Self { events }
    }

    /// Decode a track chunk's payload.
    ///
    /// Events are read until the chunk's declared length is consumed; an
    /// event running past the end of the chunk is a truncation error.
    pub fn read<W>(chunk: &RawChunk<'_>, warnings: &mut W) -> ReadResult<Self>
    where
        W: WarningSink + ?Sized,
    {
        let mut reader = Reader::new(chunk.data());
        let mut decoder = TrackDecoder {
            offset: chunk.offset(),
            running_status: None,
        };
        let mut events = Vec::new();
        let mut pending_ticks = 0u32;

        while !reader.eof() {
            let delta_ticks = reader
                .read_vlq()
                .map_err(|e| e.offset_by(chunk.offset()))?
                .saturating_add(pending_ticks);
            match decoder
                .read_message(&mut reader, warnings)
                .map_err(|e| e.offset_by(chunk.offset()))?
            {
                Some(message) => {
                    pending_ticks = 0;
                    events.push(TrackEvent::new(delta_ticks, message));
                }
                // the skipped byte's delta carries over to the next event
                None => pending_ticks = delta_ticks,
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            offset = chunk.offset(),
            length = chunk.length(),
            events = events.len(),
            "decoded track chunk"
        );

        Ok(Self { events })
    }

    /// The decoded events
    pub fn events(&self) -> &[TrackEvent] {
        &self.events
    }

    /// The name given by the first track name meta event, if any
    pub fn name(&self) -> Option<&str> {
        self.events.iter().find_map(|e| match e.message() {
            TrackMessage::Meta(MetaMessage::TrackName(name)) => Some(name.as_str()),
            _ => None,
        })
    }
}

struct TrackDecoder {
    offset: usize,
    running_status: Option<u8>,
}

impl TrackDecoder {
    /// `None` when the byte in status position had to be skipped.
    fn read_message<W>(
        &mut self,
        reader: &mut Reader<'_>,
        warnings: &mut W,
    ) -> ReadResult<Option<TrackMessage>>
    where
        W: WarningSink + ?Sized,
    {
        let message = match reader.peek_u8()? {
            0xFF => {
                reader.advance(1)?;
                let kind = MetaType::from(reader.read_u8()?);
                let length = reader.read_vlq()?;
                let data = reader.read_bytes(length as usize)?;
                self.running_status = None;
                TrackMessage::Meta(decode_meta(kind, data, warnings))
            }
            sysex @ (0xF0 | 0xF7) => {
                reader.advance(1)?;
                let length = reader.read_vlq()?;
                let data = reader.read_bytes(length as usize)?;
                self.running_status = None;

                let mut bytes = Vec::with_capacity(data.len() + 1);
                bytes.push(sysex);
                bytes.extend_from_slice(data);
                TrackMessage::SystemExclusive(bytes)
            }
            byte => {
                let status = if byte & 0x80 != 0 {
                    reader.advance(1)?;
                    self.running_status = Some(byte);
                    byte
                } else if let Some(status) = self.running_status {
                    // `byte` is the first data byte of a message reusing the last status
                    status
                } else {
                    warnings.warn(Warning::RunningStatusUnset {
                        position: self.offset + reader.position(),
                    });
                    reader.advance(1)?;
                    return Ok(None);
                };

                match VoiceKind::from_status(status) {
                    Some(kind) => {
                        let mut data = [0; 2];
                        data[0] = reader.read_u8()?;
                        if kind.data_len() == 2 {
                            data[1] = reader.read_u8()?;
                        }
                        TrackMessage::ChannelVoice(ChannelVoiceMessage::new(
                            Channel::from_status(status),
                            VoiceEvent::from_data(kind, data),
                        ))
                    }
                    None => TrackMessage::Unknown { status },
                }
            }
        };
        Ok(Some(message))
    }
}

fn decode_meta<W>(kind: MetaType, data: &[u8], warnings: &mut W) -> MetaMessage
where
    W: WarningSink + ?Sized,
{
    match kind {
        MetaType::TrackName => MetaMessage::TrackName(ascii_to_string(data)),
        MetaType::EndOfTrack => MetaMessage::EndOfTrack,
        MetaType::SetTempo => match *data {
            [a, b, c] => MetaMessage::SetTempo(u32::from_be_bytes([0, a, b, c])),
            _ => {
                warnings.warn(Warning::TempoLength {
                    length: data.len() as u32,
                });
                MetaMessage::Other {
                    kind,
                    data: data.to_vec(),
                }
            }
        },
        _ => MetaMessage::Other {
            kind,
            data: data.to_vec(),
        },
    }
}

#[cfg(test)]
fn decode(payload: &[u8]) -> (ReadResult<Track>, Vec<Warning>) {
    let mut bytes = Vec::from(*b"MTrk");
    bytes.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    bytes.extend_from_slice(payload);
    let chunk = RawChunk::read(&mut Reader::new(&bytes)).unwrap();
    let mut warnings = Vec::new();
    (Track::read(&chunk, &mut warnings), warnings)
}

#[cfg(test)]
fn voice(delta_ticks: u32, channel: Channel, event: VoiceEvent) -> TrackEvent {
    TrackEvent::new(
        delta_ticks,
        TrackMessage::ChannelVoice(ChannelVoiceMessage::new(channel, event)),
    )
}

#[test]
fn running_status_reuses_previous_status() {
    use pretty_assertions::assert_eq;
    let (track, warnings) = decode(&[
        0x00, 0x91, 60, 100, // note on, channel 2
        0x10, 64, 90, // running status
        0x10, 60, 0, // running status, velocity 0
    ]);
    assert!(warnings.is_empty());
    assert_eq!(
        track.unwrap().events(),
        &[
            voice(0, Channel::Two, VoiceEvent::NoteOn { note: 60, velocity: 100 }),
            voice(0x10, Channel::Two, VoiceEvent::NoteOn { note: 64, velocity: 90 }),
            voice(0x10, Channel::Two, VoiceEvent::NoteOn { note: 60, velocity: 0 }),
        ]
    );
}

#[test]
fn running_status_without_status_is_skipped() {
    use pretty_assertions::assert_eq;
    let (track, warnings) = decode(&[
        0x05, 0x3C, // data byte with no status
        0x07, 0xC0, 0x05, // program change
    ]);
    assert_eq!(warnings, alloc::vec![Warning::RunningStatusUnset { position: 9 }]);
    assert_eq!(
        track.unwrap().events(),
        &[voice(12, Channel::One, VoiceEvent::ProgramChange { program: 5 })]
    );
}

#[test]
fn meta_and_sysex_events() {
    use pretty_assertions::assert_eq;
    let (track, warnings) = decode(&[
        0x00, 0xFF, 0x03, 0x04, b'L', b'e', b'a', b'd', // track name
        0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20, // tempo 500000
        0x00, 0xF0, 0x03, 0x43, 0x12, 0xF7, // sysex
        0x00, 0xFF, 0x58, 0x04, 0x04, 0x02, 0x18, 0x08, // time signature
        0x00, 0xFF, 0x2F, 0x00, // end of track
    ]);
    assert!(warnings.is_empty());
    let track = track.unwrap();
    assert_eq!(track.name(), Some("Lead"));
    assert_eq!(
        track.events(),
        &[
            TrackEvent::new(0, TrackMessage::Meta(MetaMessage::TrackName("Lead".into()))),
            TrackEvent::new(0, TrackMessage::Meta(MetaMessage::SetTempo(500_000))),
            TrackEvent::new(
                0,
                TrackMessage::SystemExclusive(alloc::vec![0xF0, 0x43, 0x12, 0xF7])
            ),
            TrackEvent::new(
                0,
                TrackMessage::Meta(MetaMessage::Other {
                    kind: MetaType::TimeSignature,
                    data: alloc::vec![0x04, 0x02, 0x18, 0x08],
                })
            ),
            TrackEvent::new(0, TrackMessage::Meta(MetaMessage::EndOfTrack)),
        ]
    );
}

#[test]
fn meta_event_cancels_running_status() {
    let (track, warnings) = decode(&[
        0x00, 0x90, 60, 100, //
        0x00, 0xFF, 0x2F, 0x00, //
        0x00, 60, // no status to reuse
    ]);
    assert_eq!(track.unwrap().events().len(), 2);
    assert_eq!(warnings.len(), 1);
}

#[test]
fn bad_tempo_length_is_kept_opaque() {
    use pretty_assertions::assert_eq;
    let (track, warnings) = decode(&[0x00, 0xFF, 0x51, 0x02, 0x07, 0xA1]);
    assert_eq!(warnings, alloc::vec![Warning::TempoLength { length: 2 }]);
    assert!(matches!(
        track.unwrap().events()[0].message(),
        TrackMessage::Meta(MetaMessage::Other {
            kind: MetaType::SetTempo,
            ..
        })
    ));
}

#[test]
fn unknown_status_does_not_abort() {
    use pretty_assertions::assert_eq;
    let (track, _) = decode(&[0x00, 0xF8, 0x00, 0x90, 60, 1]);
    let track = track.unwrap();
    assert_eq!(
        track.events()[0],
        TrackEvent::new(0, TrackMessage::Unknown { status: 0xF8 })
    );
    assert_eq!(track.events().len(), 2);
}

#[test]
fn event_past_chunk_end_is_truncated() {
    let (track, _) = decode(&[0x00, 0x90, 60]);
    let err = track.unwrap_err();
    assert!(err.is_truncated());
    // reported relative to the whole buffer
    assert_eq!(err.position(), 11);
}
