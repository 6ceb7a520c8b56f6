//! framescan protocol core
//!
//! This module provides the wire layout, the record-extraction state machine
//! and the records it emits.

mod error;
mod format;
mod parser;
mod record;
mod stats;

pub use error::{Error, Result};
pub use format::{FrameFormat, FrameFormatBuilder, decode_uint};
pub use parser::FrameParser;
pub use record::{Record, RecordKind};
pub use stats::ParserStats;

/// Default frame start marker
pub const DEFAULT_FRAME_START: &[u8] = &[0x7E];

/// Default frame end marker
pub const DEFAULT_FRAME_END: &[u8] = &[0x7E];

/// Default offset of the length field within a frame
pub const DEFAULT_LENGTH_FIELD_OFFSET: usize = 1;

/// Default length field width (big-endian `u16`)
pub const DEFAULT_LENGTH_FIELD_SIZE: usize = 2;

/// Default time record marker
pub const DEFAULT_TIME_MARKER: &[u8] = &[0xAA, 0xAA];

/// Default time record length: marker plus a 6-byte timestamp
pub const DEFAULT_TIME_RECORD_LENGTH: usize = 8;

/// Widest length field the decoder accepts
pub const MAX_LENGTH_FIELD_SIZE: usize = 16;

/// Read size used when pulling from a byte source
pub const DEFAULT_CHUNK_SIZE: usize = 4096;
