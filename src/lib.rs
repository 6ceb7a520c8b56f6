//! framescan - recover frames and time records from corrupted binary logs
//!
//! Captures from serial devices and log taps interleave two record types with
//! no outer framing and no checksums:
//!
//! - delimited frames: start marker, length field, payload, end marker
//! - fixed-length time records: marker followed by a big-endian timestamp
//!
//! Length fields may lie and records may be truncated. [`FrameParser`]
//! consumes arbitrarily chunked input and recovers deterministically.
//!
//! # Quick Start
//!
//! ```rust
//! use framescan::{ChunkSource, FrameParser, FrameStream, RecordKind};
//!
//! let capture = vec![
//!     0x7E, 0x00, 0x02, b'h', b'i', 0x7E, // frame
//!     0xAA, 0xAA, 0x00, 0x00, 0x00, 0x00, 0x00, 0x2A, // time record
//! ];
//!
//! let stream = FrameStream::new(ChunkSource::from_bytes(capture), FrameParser::default());
//! let kinds = stream
//!     .map(|record| record.map(|r| r.kind()))
//!     .collect::<framescan::Result<Vec<_>>>()?;
//!
//! assert_eq!(kinds, [RecordKind::Frame, RecordKind::Time]);
//! # Ok::<(), framescan::Error>(())
//! ```
//!
//! # Recovery
//!
//! A frame whose length field does not land on an end marker is cut at the
//! next end marker after its length field and reported as
//! [`RecordKind::Recovered`]. Bytes outside any record are dropped silently.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod protocol;
pub mod render;
pub mod stream;

pub use protocol::{
    DEFAULT_CHUNK_SIZE, Error, FrameFormat, FrameFormatBuilder, FrameParser, ParserStats, Record,
    RecordKind, Result,
};
pub use render::{OutputFormat, RecordRenderer, decode_hex_input};
pub use stream::{ByteSource, ChunkSource, FrameStream, ReadSource};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
