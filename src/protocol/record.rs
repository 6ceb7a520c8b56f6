//! Records emitted by the parser

use std::fmt;

use bytes::Bytes;

use super::FrameFormat;
use super::format::decode_uint;

/// How a record was delimited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// Frame whose length field matched and which closed with the end marker
    Frame,
    /// Frame cut at the next end marker because its length field was wrong
    /// or unreachable
    Recovered,
    /// Fixed-length time record
    Time,
}

impl RecordKind {
    /// Whether this is a time record
    #[must_use]
    pub const fn is_time(self) -> bool {
        matches!(self, Self::Time)
    }

    /// Whether this is a frame, well-formed or recovered
    #[must_use]
    pub const fn is_frame(self) -> bool {
        !self.is_time()
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Frame => "Frame",
            Self::Recovered => "Recovered",
            Self::Time => "Time",
        };
        write!(f, "{name}")
    }
}

/// A contiguous run of bytes removed from the stream as one unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    kind: RecordKind,
    bytes: Bytes,
}

impl Record {
    /// Create a record
    pub fn new(kind: RecordKind, bytes: impl Into<Bytes>) -> Self {
        Self {
            kind,
            bytes: bytes.into(),
        }
    }

    /// Record classification
    #[must_use]
    pub const fn kind(&self) -> RecordKind {
        self.kind
    }

    /// Raw bytes, markers included
    #[must_use]
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// Consume into the raw bytes
    #[must_use]
    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }

    /// Record length in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check whether the record holds no bytes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Big-endian timestamp carried after the time marker.
    ///
    /// `None` for frames and for timestamps wider than 16 bytes.
    #[must_use]
    pub fn timestamp(&self, format: &FrameFormat) -> Option<u128> {
        if !self.kind.is_time() {
            return None;
        }
        let payload = self.bytes.get(format.time_marker().len()..)?;
        decode_uint(payload, true)
    }

    /// Lowercase hex rendering of the raw bytes
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }
}

impl AsRef<[u8]> for Record {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}
