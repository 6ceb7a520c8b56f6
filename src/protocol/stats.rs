//! Per-parser counters

use serde::Serialize;

use super::RecordKind;

/// Counters accumulated over the lifetime of one parser.
///
/// Every counter only ever grows; a fresh parser starts from zero.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParserStats {
    /// Well-formed frames emitted
    pub frames_found: u64,
    /// Time records emitted
    pub time_frames_found: u64,
    /// Frames recovered by end-marker scan
    pub invalid_frames: u64,
    /// Bytes handed to the parser
    pub bytes_processed: u64,
}

impl ParserStats {
    #[inline]
    pub(crate) fn record_ingest(&mut self, len: usize) {
        self.bytes_processed += len as u64;
    }

    #[inline]
    pub(crate) fn record_emit(&mut self, kind: RecordKind) {
        match kind {
            RecordKind::Frame => self.frames_found += 1,
            RecordKind::Recovered => self.invalid_frames += 1,
            RecordKind::Time => self.time_frames_found += 1,
        }
    }

    /// Total records of any kind emitted so far.
    #[must_use]
    pub const fn records(&self) -> u64 {
        self.frames_found + self.time_frames_found + self.invalid_frames
    }

    /// Counter names and values in report order.
    #[must_use]
    pub fn entries(&self) -> [(&'static str, u64); 4] {
        [
            ("frames_found", self.frames_found),
            ("time_frames_found", self.time_frames_found),
            ("invalid_frames", self.invalid_frames),
            ("bytes_processed", self.bytes_processed),
        ]
    }
}
