//! Wire layout of frames and time records
//!
//! A [`FrameFormat`] is built once, validated, and then shared read-only by
//! every parser that uses it.

use super::{
    DEFAULT_FRAME_END, DEFAULT_FRAME_START, DEFAULT_LENGTH_FIELD_OFFSET,
    DEFAULT_LENGTH_FIELD_SIZE, DEFAULT_TIME_MARKER, DEFAULT_TIME_RECORD_LENGTH, Error,
    MAX_LENGTH_FIELD_SIZE, Result,
};

/// Byte layout of the two record types found in a capture.
///
/// # Wire Format
///
/// ```text
/// frame:        [START] .. [LENGTH (length_field_size)] [PAYLOAD (LENGTH)] [END]
///                       ^ length_field_offset
/// time record:  [TIME MARKER] [TIMESTAMP (time_record_length - marker)]
/// ```
///
/// The default layout is `7E | len:u16 BE | payload | 7E` for frames and
/// `AA AA | 6-byte BE timestamp` for time records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameFormat {
    frame_start: Vec<u8>,
    frame_end: Vec<u8>,
    length_field_offset: usize,
    length_field_size: usize,
    length_field_big_endian: bool,
    time_marker: Vec<u8>,
    time_record_length: usize,
}

impl FrameFormat {
    /// Start building a format from the default layout
    #[must_use]
    pub fn builder() -> FrameFormatBuilder {
        FrameFormatBuilder::default()
    }

    /// Marker that opens a frame
    #[must_use]
    pub fn frame_start(&self) -> &[u8] {
        &self.frame_start
    }

    /// Marker that closes a frame
    #[must_use]
    pub fn frame_end(&self) -> &[u8] {
        &self.frame_end
    }

    /// Offset of the length field from the start of the frame
    #[must_use]
    pub const fn length_field_offset(&self) -> usize {
        self.length_field_offset
    }

    /// Width of the length field in bytes
    #[must_use]
    pub const fn length_field_size(&self) -> usize {
        self.length_field_size
    }

    /// Whether the length field is big-endian
    #[must_use]
    pub const fn length_field_big_endian(&self) -> bool {
        self.length_field_big_endian
    }

    /// Marker that opens a time record
    #[must_use]
    pub fn time_marker(&self) -> &[u8] {
        &self.time_marker
    }

    /// Total length of a time record, marker included
    #[must_use]
    pub const fn time_record_length(&self) -> usize {
        self.time_record_length
    }

    /// Offset one past the last length field byte
    #[must_use]
    pub const fn length_field_end(&self) -> usize {
        self.length_field_offset + self.length_field_size
    }

    /// Smallest buffer that can hold a frame header and its end marker
    #[must_use]
    pub fn min_frame_size(&self) -> usize {
        self.length_field_end() + self.frame_end.len()
    }

    /// Bytes following the marker in a time record
    #[must_use]
    pub fn time_payload_size(&self) -> usize {
        self.time_record_length - self.time_marker.len()
    }

    /// Decode a length field.
    ///
    /// `field` must be exactly [`length_field_size`](Self::length_field_size)
    /// bytes long.
    #[must_use]
    pub fn decode_length(&self, field: &[u8]) -> u128 {
        debug_assert_eq!(
            field.len(),
            self.length_field_size,
            "length field slice has the wrong size"
        );
        // Width is capped at MAX_LENGTH_FIELD_SIZE during validation.
        decode_uint(field, self.length_field_big_endian).unwrap_or(u128::MAX)
    }

    /// Total frame size implied by a declared payload length, if addressable
    #[must_use]
    pub fn expected_frame_size(&self, declared: u128) -> Option<usize> {
        usize::try_from(declared)
            .ok()?
            .checked_add(self.min_frame_size())
    }

    /// Check the invariants every parser relies on
    pub fn validate(&self) -> Result<()> {
        if self.frame_start.is_empty() {
            return Err(Error::EmptyMarker {
                field: "frame_start",
            });
        }
        if self.frame_end.is_empty() {
            return Err(Error::EmptyMarker { field: "frame_end" });
        }
        if self.time_marker.is_empty() {
            return Err(Error::EmptyMarker {
                field: "time_marker",
            });
        }

        if self.length_field_size == 0 {
            return Err(Error::ZeroLengthField);
        }
        if self.length_field_size > MAX_LENGTH_FIELD_SIZE {
            return Err(Error::LengthFieldTooWide {
                size: self.length_field_size,
                max: MAX_LENGTH_FIELD_SIZE,
            });
        }
        if self.length_field_offset < self.frame_start.len() {
            return Err(Error::LengthFieldOverlapsStart {
                offset: self.length_field_offset,
                start_len: self.frame_start.len(),
            });
        }

        if self.time_record_length <= self.time_marker.len() {
            return Err(Error::TimeRecordTooShort {
                length: self.time_record_length,
                marker_len: self.time_marker.len(),
            });
        }

        Ok(())
    }
}

impl Default for FrameFormat {
    fn default() -> Self {
        Self {
            frame_start: DEFAULT_FRAME_START.to_vec(),
            frame_end: DEFAULT_FRAME_END.to_vec(),
            length_field_offset: DEFAULT_LENGTH_FIELD_OFFSET,
            length_field_size: DEFAULT_LENGTH_FIELD_SIZE,
            length_field_big_endian: true,
            time_marker: DEFAULT_TIME_MARKER.to_vec(),
            time_record_length: DEFAULT_TIME_RECORD_LENGTH,
        }
    }
}

/// Builder for [`FrameFormat`]; every field starts at the default layout.
#[derive(Debug, Clone, Default)]
pub struct FrameFormatBuilder {
    format: FrameFormat,
}

impl FrameFormatBuilder {
    /// Set the frame start marker
    #[must_use]
    pub fn frame_start(mut self, marker: impl Into<Vec<u8>>) -> Self {
        self.format.frame_start = marker.into();
        self
    }

    /// Set the frame end marker
    #[must_use]
    pub fn frame_end(mut self, marker: impl Into<Vec<u8>>) -> Self {
        self.format.frame_end = marker.into();
        self
    }

    /// Set the length field offset
    #[must_use]
    pub fn length_field_offset(mut self, offset: usize) -> Self {
        self.format.length_field_offset = offset;
        self
    }

    /// Set the length field width
    #[must_use]
    pub fn length_field_size(mut self, size: usize) -> Self {
        self.format.length_field_size = size;
        self
    }

    /// Choose big-endian (`true`) or little-endian length fields
    #[must_use]
    pub fn length_field_big_endian(mut self, big_endian: bool) -> Self {
        self.format.length_field_big_endian = big_endian;
        self
    }

    /// Set the time record marker
    #[must_use]
    pub fn time_marker(mut self, marker: impl Into<Vec<u8>>) -> Self {
        self.format.time_marker = marker.into();
        self
    }

    /// Set the total time record length
    #[must_use]
    pub fn time_record_length(mut self, length: usize) -> Self {
        self.format.time_record_length = length;
        self
    }

    /// Validate and produce the format
    pub fn build(self) -> Result<FrameFormat> {
        self.format.validate()?;
        Ok(self.format)
    }
}

/// Unsigned integer from up to 16 bytes, accumulated one byte at a time.
///
/// Returns `None` when `bytes` is wider than a `u128`.
#[must_use]
pub fn decode_uint(bytes: &[u8], big_endian: bool) -> Option<u128> {
    if bytes.len() > MAX_LENGTH_FIELD_SIZE {
        return None;
    }

    let accumulate = |acc: u128, &byte: &u8| (acc << 8) | u128::from(byte);
    let value = if big_endian {
        bytes.iter().fold(0, accumulate)
    } else {
        bytes.iter().rev().fold(0, accumulate)
    };
    Some(value)
}
