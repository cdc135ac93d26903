#![doc = r#"
Recoverable anomalies reported while decoding, converting or scheduling

Nothing in this crate writes to a global logger on its own. Every
operation that can notice something odd takes a [`WarningSink`] and keeps
going with a best-effort interpretation.

# Example
```rust
# use smf_song::prelude::*;
let mut warnings: Vec<Warning> = Vec::new();
// a header with an unknown format code
let bytes = [
    b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 7, 0, 0, 0, 96,
];
let file = MidiFile::parse(&bytes, &mut warnings).unwrap();

assert_eq!(file.tracks().len(), 0);
assert_eq!(warnings, vec![Warning::UnknownFormat(7)]);
```
"#]

use core::fmt;

/// A recoverable anomaly.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Warning {
    /// The header chunk's length is not 6. The 6 byte layout is still read.
    HeaderLength {
        /// The declared length
        length: u32,
    },
    /// The header's format code is not 0, 1 or 2
    UnknownFormat(u16),
    /// A chunk other than `MThd`/`MTrk`. It is kept as an opaque chunk.
    UnknownChunk {
        /// The chunk's tag
        tag: [u8; 4],
    },
    /// A data byte appeared in status position before any status was set.
    /// The byte is skipped.
    RunningStatusUnset {
        /// Absolute position of the skipped byte
        position: usize,
    },
    /// A set-tempo meta event whose payload is not 3 bytes. It is kept as an opaque meta event.
    TempoLength {
        /// Payload length
        length: u32,
    },
    /// A set-tempo of zero microseconds per quarter note. It is skipped.
    ZeroTempo {
        /// Index of the track
        track: usize,
    },
    /// An instrument controller changed after time zero and was ignored
    TimedControlChange {
        /// Index of the track
        track: usize,
        /// The controller number
        controller: u8,
        /// Time in quarter notes
        time: f64,
    },
    /// A program change after time zero was ignored
    TimedProgramChange {
        /// Index of the track
        track: usize,
        /// The program number
        program: u8,
        /// Time in quarter notes
        time: f64,
    },
    /// Playback uses a single tempo; this change will not be honored
    TempoChangeDuringPlayback {
        /// Time in quarter notes
        time: f64,
        /// The ignored tempo
        bpm: u32,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Warning::*;
        match self {
            HeaderLength { length } => {
                write!(f, "Header length should be 6, but it is {length}")
            }
            UnknownFormat(format) => write!(f, "Unknown format: {format}"),
            UnknownChunk { tag } => {
                write!(f, "Unknown chunk type: \"")?;
                for &b in tag {
                    write!(f, "{}", b as char)?;
                }
                write!(f, "\"")
            }
            RunningStatusUnset { position } => write!(
                f,
                "Running status used but none defined (byte {position} skipped)"
            ),
            TempoLength { length } => {
                write!(f, "Set tempo payload should be 3 bytes, but it is {length}")
            }
            ZeroTempo { track } => write!(f, "Track {track} sets a tempo of 0µs per quarter note"),
            TimedControlChange {
                track,
                controller,
                time,
            } => write!(
                f,
                "Track {track}: control change {controller:#04x} at time {time} ignored"
            ),
            TimedProgramChange {
                track,
                program,
                time,
            } => write!(
                f,
                "Track {track}: program change to {program} at time {time} ignored"
            ),
            TempoChangeDuringPlayback { time, bpm } => write!(
                f,
                "Tempo change to {bpm} bpm at time {time} is not supported during playback"
            ),
        }
    }
}

/// Somewhere to report [`Warning`]s.
pub trait WarningSink {
    /// Report a warning
    fn warn(&mut self, warning: Warning);
}

impl WarningSink for alloc::vec::Vec<Warning> {
    fn warn(&mut self, warning: Warning) {
        self.push(warning);
    }
}

impl<S: WarningSink + ?Sized> WarningSink for &mut S {
    fn warn(&mut self, warning: Warning) {
        (**self).warn(warning);
    }
}

/// Forwards warnings to a closure.
pub struct FnSink<F>(pub F);

impl<F: FnMut(Warning)> WarningSink for FnSink<F> {
    fn warn(&mut self, warning: Warning) {
        (self.0)(warning)
    }
}

/// Drops every warning.
#[derive(Debug, Default, Clone, Copy)]
pub struct IgnoreWarnings;

impl WarningSink for IgnoreWarnings {
    fn warn(&mut self, _warning: Warning) {}
}

/// Emits every warning as a `tracing` event at `WARN` level.
#[cfg(feature = "tracing")]
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

#[cfg(feature = "tracing")]
impl WarningSink for TracingSink {
    fn warn(&mut self, warning: Warning) {
        tracing::warn!(target: "smf_song", "{warning}");
    }
}

#[test]
fn sinks_collect_in_order() {
    use alloc::{string::ToString, vec, vec::Vec};
    use pretty_assertions::assert_eq;

    let mut collected: Vec<Warning> = Vec::new();
    let sink = &mut collected;
    sink.warn(Warning::UnknownFormat(3));
    sink.warn(Warning::UnknownChunk { tag: *b"XFIH" });
    assert_eq!(
        collected,
        vec![
            Warning::UnknownFormat(3),
            Warning::UnknownChunk { tag: *b"XFIH" }
        ]
    );
    assert_eq!(collected[1].to_string(), "Unknown chunk type: \"XFIH\"");

    let mut count = 0;
    FnSink(|_| count += 1).warn(Warning::ZeroTempo { track: 0 });
    assert_eq!(count, 1);
}
