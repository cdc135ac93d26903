use crate::{MalformedError, UnsupportedFeature};
use thiserror::Error;

#[doc = r#"
A set of errors that can occur while decoding bytes into a [`MidiFile`](crate::file::MidiFile)
"#]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Reading at Position {position}, {kind}")]
pub struct ReaderError {
    position: usize,
    pub(crate) kind: ReaderErrorKind,
}

/// A kind of error that a reader can produce
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReaderErrorKind {
    /// The bytes cannot be interpreted as a Standard MIDI File
    #[error("Malformed input: {0}")]
    Malformed(#[from] MalformedError),
    /// The bytes are valid but use something this crate does not implement
    #[error("Unsupported feature: {0}")]
    Unsupported(#[from] UnsupportedFeature),
    /// Reading out of bounds.
    #[error("Truncated input: needed {needed} byte(s), {remaining} remaining")]
    Truncated {
        /// Bytes the read required
        needed: usize,
        /// Bytes left in the buffer
        remaining: usize,
    },
}

impl ReaderError {
    /// Create a reader error from a position and kind
    pub const fn new(position: usize, kind: ReaderErrorKind) -> Self {
        Self { position, kind }
    }

    /// Create a new malformed input error
    pub const fn malformed(position: usize, error: MalformedError) -> Self {
        Self {
            position,
            kind: ReaderErrorKind::Malformed(error),
        }
    }

    /// Create a new unsupported feature error
    pub const fn unsupported(position: usize, feature: UnsupportedFeature) -> Self {
        Self {
            position,
            kind: ReaderErrorKind::Unsupported(feature),
        }
    }

    /// Create a new out of bounds error
    pub const fn truncated(position: usize, needed: usize, remaining: usize) -> Self {
        Self {
            position,
            kind: ReaderErrorKind::Truncated { needed, remaining },
        }
    }

    /// Shift the position by `offset`, for errors raised by a reader over a sub-slice.
    pub(crate) const fn offset_by(mut self, offset: usize) -> Self {
        self.position += offset;
        self
    }

    /// True if a read ran past the end of the buffer
    pub const fn is_truncated(&self) -> bool {
        matches!(self.kind, ReaderErrorKind::Truncated { .. })
    }

    /// True if the buffer is structurally not a MIDI file
    pub const fn is_malformed(&self) -> bool {
        matches!(self.kind, ReaderErrorKind::Malformed(_))
    }

    /// True if the file uses an unimplemented feature
    pub const fn is_unsupported(&self) -> bool {
        matches!(self.kind, ReaderErrorKind::Unsupported(_))
    }

    /// Returns the error kind of the reader.
    pub fn error_kind(&self) -> &ReaderErrorKind {
        &self.kind
    }

    /// Returns the position where the read error occurred.
    pub fn position(&self) -> usize {
        self.position
    }
}

/// The Read Result type (see [`ReaderError`])
pub type ReadResult<T> = Result<T, ReaderError>;
