//! Builds small Standard MIDI Files for the integration tests.
#![allow(dead_code)]

use smf_song::reader::encode_vlq;

pub fn chunk(tag: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut bytes = tag.to_vec();
    bytes.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    bytes.extend_from_slice(payload);
    bytes
}

pub fn header(format: u16, tracks: u16, division: u16) -> Vec<u8> {
    let mut payload = Vec::new();
    payload.extend_from_slice(&format.to_be_bytes());
    payload.extend_from_slice(&tracks.to_be_bytes());
    payload.extend_from_slice(&division.to_be_bytes());
    chunk(b"MThd", &payload)
}

/// An `MTrk` payload under construction.
#[derive(Default)]
pub struct TrackBytes(Vec<u8>);

impl TrackBytes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn event(mut self, delta: u32, bytes: &[u8]) -> Self {
        self.0.extend(encode_vlq(delta));
        self.0.extend_from_slice(bytes);
        self
    }

    pub fn note_on(self, delta: u32, pitch: u8, velocity: u8) -> Self {
        self.event(delta, &[0x90, pitch, velocity])
    }

    pub fn note_off(self, delta: u32, pitch: u8) -> Self {
        self.event(delta, &[0x80, pitch, 0])
    }

    pub fn tempo(self, delta: u32, micros: u32) -> Self {
        let [_, a, b, c] = micros.to_be_bytes();
        self.event(delta, &[0xFF, 0x51, 0x03, a, b, c])
    }

    pub fn name(self, delta: u32, name: &str) -> Self {
        let mut bytes = vec![0xFF, 0x03, name.len() as u8];
        bytes.extend_from_slice(name.as_bytes());
        self.event(delta, &bytes)
    }

    pub fn end(self, delta: u32) -> Self {
        self.event(delta, &[0xFF, 0x2F, 0x00])
    }

    pub fn chunk(&self) -> Vec<u8> {
        chunk(b"MTrk", &self.0)
    }
}

/// A format 1 file at 96 ticks per quarter note
pub fn file(tracks: &[TrackBytes]) -> Vec<u8> {
    let mut bytes = header(1, tracks.len() as u16, 96);
    for track in tracks {
        bytes.extend(track.chunk());
    }
    bytes
}
