//! Incremental frame extraction
//!
//! [`FrameParser`] buffers arbitrarily chunked input and hands back one
//! record at a time. Bytes leave the buffer exactly once: as part of an
//! emitted record, or as garbage that no marker can ever claim.

use bytes::{Buf, BytesMut};
use memchr::memmem::Finder;
use tracing::{debug, trace};

use super::{DEFAULT_CHUNK_SIZE, FrameFormat, ParserStats, Record, RecordKind};

/// Marker that opened the record currently at the head of the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Time,
    Frame,
}

/// Buffering frame/time-record state machine.
///
/// ```rust
/// use framescan::{FrameParser, RecordKind};
///
/// let mut parser = FrameParser::default();
/// parser.ingest(&[0x7E, 0x00, 0x05, b'H', b'e', b'l', b'l', b'o', 0x7E]);
///
/// let record = parser.take_next().unwrap();
/// assert_eq!(record.kind(), RecordKind::Frame);
/// assert!(parser.take_next().is_none());
/// assert_eq!(parser.stats().frames_found, 1);
/// ```
#[derive(Debug, Clone)]
pub struct FrameParser {
    format: FrameFormat,
    validate_length: bool,
    buffer: BytesMut,
    stats: ParserStats,
    frame_start: Finder<'static>,
    frame_end: Finder<'static>,
    time_marker: Finder<'static>,
}

impl FrameParser {
    /// Create a parser for `format` with length validation enabled
    #[must_use]
    pub fn new(format: FrameFormat) -> Self {
        let frame_start = Finder::new(format.frame_start()).into_owned();
        let frame_end = Finder::new(format.frame_end()).into_owned();
        let time_marker = Finder::new(format.time_marker()).into_owned();

        Self {
            format,
            validate_length: true,
            buffer: BytesMut::with_capacity(DEFAULT_CHUNK_SIZE),
            stats: ParserStats::default(),
            frame_start,
            frame_end,
            time_marker,
        }
    }

    /// Enable or disable length field validation.
    ///
    /// Without validation a frame always runs to the first end marker after
    /// its length field and counts as well-formed.
    #[must_use]
    pub fn with_length_validation(mut self, validate: bool) -> Self {
        self.validate_length = validate;
        self
    }

    /// Wire layout in use
    #[must_use]
    pub fn format(&self) -> &FrameFormat {
        &self.format
    }

    /// Snapshot of the counters
    #[must_use]
    pub fn stats(&self) -> ParserStats {
        self.stats
    }

    /// Bytes currently buffered and not yet classified
    #[must_use]
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Append input. Never emits.
    pub fn ingest(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
        self.stats.record_ingest(data.len());
    }

    /// Remove and return the next record, or `None` if the buffer does not
    /// yet hold one.
    pub fn take_next(&mut self) -> Option<Record> {
        let Some((marker, offset)) = self.locate_marker() else {
            self.discard_unmarked();
            return None;
        };

        if offset > 0 {
            debug!(bytes = offset, "dropping garbage before marker");
            self.buffer.advance(offset);
        }

        let record = match marker {
            Marker::Time => self.take_time_record(),
            Marker::Frame => self.take_frame(),
        }?;

        self.stats.record_emit(record.kind());
        trace!(kind = %record.kind(), len = record.len(), "record emitted");
        Some(record)
    }

    /// Drop whatever is still buffered at end of stream.
    ///
    /// Returns the number of bytes discarded. These bytes belong to records
    /// that never completed and are not reflected in [`ParserStats`].
    pub fn finish(&mut self) -> usize {
        let residue = self.buffer.len();
        if residue > 0 {
            debug!(bytes = residue, "discarding incomplete record at end of stream");
            self.buffer.clear();
        }
        residue
    }

    /// Earliest marker in the buffer; the time marker wins a tie.
    fn locate_marker(&self) -> Option<(Marker, usize)> {
        let time = self.time_marker.find(&self.buffer);
        let frame = self.frame_start.find(&self.buffer);

        match (time, frame) {
            (None, None) => None,
            (Some(t), None) => Some((Marker::Time, t)),
            (None, Some(f)) => Some((Marker::Frame, f)),
            (Some(t), Some(f)) if t <= f => Some((Marker::Time, t)),
            (Some(_), Some(f)) => Some((Marker::Frame, f)),
        }
    }

    /// Clear a buffer holding no marker, keeping a trailing partial marker.
    fn discard_unmarked(&mut self) {
        let keep = partial_marker_len(&self.buffer, self.format.time_marker())
            .max(partial_marker_len(&self.buffer, self.format.frame_start()));
        let drop = self.buffer.len() - keep;

        if drop > 0 {
            debug!(bytes = drop, kept = keep, "discarding unmarked bytes");
            self.buffer.advance(drop);
        }
    }

    fn take_time_record(&mut self) -> Option<Record> {
        let length = self.format.time_record_length();
        if self.buffer.len() < length {
            return None;
        }
        Some(self.split_record(RecordKind::Time, length))
    }

    fn take_frame(&mut self) -> Option<Record> {
        if self.buffer.len() < self.format.min_frame_size() {
            return None;
        }

        if !self.validate_length {
            return self.take_until_end_marker(RecordKind::Frame);
        }

        let field = &self.buffer[self.format.length_field_offset()..self.format.length_field_end()];
        let declared = self.format.decode_length(field);

        match self.format.expected_frame_size(declared) {
            Some(expected) if expected <= self.buffer.len() => {
                let end = self.format.frame_end();
                if &self.buffer[expected - end.len()..expected] == end {
                    return Some(self.split_record(RecordKind::Frame, expected));
                }
                debug!(declared, expected, "no end marker at declared length");
            }
            expected => {
                trace!(declared, ?expected, buffered = self.buffer.len(), "declared length not yet reachable");
            }
        }

        self.take_until_end_marker(RecordKind::Recovered)
    }

    /// Cut the frame at the first end marker past the length field.
    fn take_until_end_marker(&mut self, kind: RecordKind) -> Option<Record> {
        let from = self.format.length_field_end();
        let offset = self.frame_end.find(&self.buffer[from..])?;
        let length = from + offset + self.format.frame_end().len();

        if kind == RecordKind::Recovered {
            debug!(len = length, "recovered frame at next end marker");
        }
        Some(self.split_record(kind, length))
    }

    fn split_record(&mut self, kind: RecordKind, length: usize) -> Record {
        Record::new(kind, self.buffer.split_to(length).freeze())
    }
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new(FrameFormat::default())
    }
}

/// Length of the longest proper prefix of `marker` that ends `haystack`.
fn partial_marker_len(haystack: &[u8], marker: &[u8]) -> usize {
    let longest = marker.len().saturating_sub(1).min(haystack.len());
    (1..=longest)
        .rev()
        .find(|&n| haystack.ends_with(&marker[..n]))
        .unwrap_or(0)
}
