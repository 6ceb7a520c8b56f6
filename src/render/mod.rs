//! Presentation of emitted records
//!
//! Four renderings are supported, all line-oriented except `raw`:
//!
//! ```text
//! raw   7e 00 05 48 65 6c 6c 6f 7e            (bytes, no separator)
//! hex   7e000548656c6c6f7e
//! text  FRAME: 7e000548656c6c6f7e
//!       TIME_FRAME: aaaa000000000001 (timestamp: 1)
//! json  {"type": "frame", "hex": "7e000548656c6c6f7e", "length": 9}
//! ```

mod input;

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use serde::Serialize;
use serde_json::ser::Formatter;

use crate::protocol::{Error, FrameFormat, Record, Result};

pub use input::decode_hex_input;

/// Output rendering selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// `FRAME: <hex>` / `TIME_FRAME: <hex>` lines
    #[default]
    Text,
    /// One lowercase hex string per line
    Hex,
    /// Record bytes written back to back
    Raw,
    /// One JSON object per line
    Json,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "text" => Ok(Self::Text),
            "hex" => Ok(Self::Hex),
            "raw" => Ok(Self::Raw),
            "json" => Ok(Self::Json),
            _ => Err(Error::UnknownOutputFormat {
                name: name.to_owned(),
            }),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Hex => "hex",
            Self::Raw => "raw",
            Self::Json => "json",
        };
        write!(f, "{name}")
    }
}

/// JSON line shape; field order is part of the output contract.
#[derive(Serialize)]
struct JsonRecord<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    hex: String,
    length: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<u128>,
}

/// Writes `", "` between members and `": "` after keys.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        writer.write_all(b": ")
    }
}

/// Renders records in one [`OutputFormat`].
#[derive(Debug, Clone)]
pub struct RecordRenderer {
    output: OutputFormat,
    parse_time: bool,
    format: FrameFormat,
}

impl RecordRenderer {
    /// Renderer for records produced with `format`
    #[must_use]
    pub fn new(output: OutputFormat, format: FrameFormat) -> Self {
        Self {
            output,
            parse_time: false,
            format,
        }
    }

    /// Decode and print time record timestamps (text and json only)
    #[must_use]
    pub fn with_parse_time(mut self, parse_time: bool) -> Self {
        self.parse_time = parse_time;
        self
    }

    /// Selected rendering
    #[must_use]
    pub const fn output(&self) -> OutputFormat {
        self.output
    }

    /// Write one record to `out`
    pub fn write_record<W: Write>(&self, out: &mut W, record: &Record) -> Result<()> {
        match self.output {
            OutputFormat::Raw => out.write_all(record.bytes())?,
            OutputFormat::Hex => writeln!(out, "{}", record.to_hex())?,
            OutputFormat::Text => self.write_text(out, record)?,
            OutputFormat::Json => self.write_json(out, record)?,
        }
        Ok(())
    }

    fn timestamp(&self, record: &Record) -> Option<u128> {
        if self.parse_time {
            record.timestamp(&self.format)
        } else {
            None
        }
    }

    fn write_text<W: Write>(&self, out: &mut W, record: &Record) -> io::Result<()> {
        if !record.kind().is_time() {
            return writeln!(out, "FRAME: {}", record.to_hex());
        }

        match self.timestamp(record) {
            Some(timestamp) => writeln!(
                out,
                "TIME_FRAME: {} (timestamp: {timestamp})",
                record.to_hex()
            ),
            None => writeln!(out, "TIME_FRAME: {}", record.to_hex()),
        }
    }

    fn write_json<W: Write>(&self, out: &mut W, record: &Record) -> Result<()> {
        let line = JsonRecord {
            kind: if record.kind().is_time() {
                "time_frame"
            } else {
                "frame"
            },
            hex: record.to_hex(),
            length: record.len(),
            timestamp: self.timestamp(record),
        };

        let mut serializer = serde_json::Serializer::with_formatter(&mut *out, SpacedFormatter);
        line.serialize(&mut serializer)?;
        out.write_all(b"\n")?;
        Ok(())
    }
}
