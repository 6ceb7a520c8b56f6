//! framescan error types

use thiserror::Error;

/// Errors raised while configuring a parser or moving bytes in and out of it.
///
/// Malformed stream data is never an error; it surfaces as
/// [`RecordKind::Recovered`](super::RecordKind::Recovered) records instead.
#[derive(Error, Debug)]
pub enum Error {
    /// A marker byte sequence was configured empty
    #[error("{field} must not be empty")]
    EmptyMarker {
        /// Name of the offending format field
        field: &'static str,
    },

    /// Length field size of zero
    #[error("length field size must be at least 1 byte")]
    ZeroLengthField,

    /// Length field wider than the decoder accumulates
    #[error("length field too wide: {size} bytes (max {max})")]
    LengthFieldTooWide {
        /// Configured size
        size: usize,
        /// Maximum supported
        max: usize,
    },

    /// Time record leaves no room for a timestamp after its marker
    #[error("time record length {length} must exceed time marker length {marker_len}")]
    TimeRecordTooShort {
        /// Configured record length
        length: usize,
        /// Length of the time marker
        marker_len: usize,
    },

    /// Length field starts inside the frame start marker
    #[error("length field offset {offset} overlaps the {start_len}-byte frame start marker")]
    LengthFieldOverlapsStart {
        /// Configured offset
        offset: usize,
        /// Length of the start marker
        start_len: usize,
    },

    /// Hex input could not be decoded
    #[error("Invalid hex string: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// Output format name not recognised
    #[error("unknown output format '{name}' (expected text, hex, raw or json)")]
    UnknownOutputFormat {
        /// Rejected name
        name: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON rendering error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
