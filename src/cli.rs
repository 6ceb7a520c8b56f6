//! Command-line argument parsing for the `framescan` binary.

use std::path::PathBuf;
use std::str::FromStr;

use framescan::{DEFAULT_CHUNK_SIZE, FrameFormat, OutputFormat, decode_hex_input};
use thiserror::Error;

pub const USAGE: &str = "\
Usage: framescan [-f FILE | -x [HEX] | -s] [options]

Parse binary log frames interleaved with time records.

Input (mutually exclusive, default: binary stdin):
  -f, --file PATH         read a binary capture or serial device
  -x, --hex [HEX]         parse a hex string (read from stdin if omitted)
  -s, --stdin             read binary data from stdin

Output:
  -o, --output FORMAT     text, hex, raw or json (default: text)
      --parse-time        decode time record timestamps
  -v, --verbose           print statistics to stderr

Parsing:
      --no-validate       ignore length fields, cut frames at the end marker
      --frame-start HEX   frame start marker (default: 7e)
      --frame-end HEX     frame end marker (default: 7e)
      --length-offset N   length field offset from frame start (default: 1)
      --length-size N     length field width in bytes (default: 2)
      --little-endian     decode the length field little-endian
      --time-marker HEX   time record marker (default: aaaa)
      --time-length N     total time record length (default: 8)
      --chunk-size N      read size in bytes (default: 4096)

  -h, --help              show this help

Examples:
  framescan -f logfile.bin
  cat logfile.bin | framescan
  framescan -x \"7e000548656c6c6f7e\"
  echo \"7e000548656c6c6f7e\" | framescan -x";

/// Usage problems detected before any input is read.
#[derive(Debug, Error)]
pub enum ArgsError {
    #[error("unrecognized argument: {0}")]
    UnknownArgument(String),

    #[error("argument {0}: expected a value")]
    MissingValue(String),

    #[error("argument {flag}: invalid number '{value}'")]
    InvalidNumber { flag: String, value: String },

    #[error("argument {flag}: not allowed with argument {previous}")]
    ConflictingInputs { flag: String, previous: String },

    #[error("argument {flag}: {source}")]
    InvalidValue {
        flag: String,
        source: framescan::Error,
    },

    #[error(transparent)]
    Format(framescan::Error),
}

/// Where the capture comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Stdin,
    File(PathBuf),
    /// Hex text; `None` reads it from stdin.
    Hex(Option<String>),
}

#[derive(Debug, Clone)]
pub struct Args {
    pub input: Input,
    pub output: OutputFormat,
    pub parse_time: bool,
    pub validate_length: bool,
    pub verbose: bool,
    pub format: FrameFormat,
    pub chunk_size: usize,
}

#[derive(Debug, Clone)]
pub enum Command {
    Run(Args),
    Help,
}

/// Parse arguments, excluding the program name.
pub fn parse<I>(args: I) -> Result<Command, ArgsError>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter().peekable();
    let mut input: Option<(String, Input)> = None;
    let mut output = OutputFormat::default();
    let mut parse_time = false;
    let mut validate_length = true;
    let mut verbose = false;
    let mut chunk_size = DEFAULT_CHUNK_SIZE;
    let mut format = FrameFormat::builder();

    while let Some(arg) = args.next() {
        // `--name=value` carries its value inline.
        let (flag, mut inline) = match arg.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => (flag.to_owned(), Some(value.to_owned())),
            _ => (arg.clone(), None),
        };
        let mut value = |args: &mut std::iter::Peekable<I::IntoIter>| {
            inline
                .take()
                .or_else(|| args.next())
                .ok_or_else(|| ArgsError::MissingValue(flag.clone()))
        };

        let selected = match flag.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-f" | "--file" => Some(Input::File(PathBuf::from(value(&mut args)?))),
            "-x" | "--hex" => {
                let hex = inline
                    .take()
                    .or_else(|| args.next_if(|next| !next.starts_with('-')));
                Some(Input::Hex(hex))
            }
            "-s" | "--stdin" => Some(Input::Stdin),
            "-o" | "--output" => {
                let name = value(&mut args)?;
                output = name.parse().map_err(|source| ArgsError::InvalidValue {
                    flag: flag.clone(),
                    source,
                })?;
                None
            }
            "--parse-time" => {
                parse_time = true;
                None
            }
            "--no-validate" => {
                validate_length = false;
                None
            }
            "-v" | "--verbose" => {
                verbose = true;
                None
            }
            "--frame-start" => {
                format = format.frame_start(parse_hex(&flag, &value(&mut args)?)?);
                None
            }
            "--frame-end" => {
                format = format.frame_end(parse_hex(&flag, &value(&mut args)?)?);
                None
            }
            "--time-marker" => {
                format = format.time_marker(parse_hex(&flag, &value(&mut args)?)?);
                None
            }
            "--length-offset" => {
                format = format.length_field_offset(parse_number(&flag, &value(&mut args)?)?);
                None
            }
            "--length-size" => {
                format = format.length_field_size(parse_number(&flag, &value(&mut args)?)?);
                None
            }
            "--time-length" => {
                format = format.time_record_length(parse_number(&flag, &value(&mut args)?)?);
                None
            }
            "--little-endian" => {
                format = format.length_field_big_endian(false);
                None
            }
            "--chunk-size" => {
                chunk_size = parse_number(&flag, &value(&mut args)?)?;
                None
            }
            _ => return Err(ArgsError::UnknownArgument(arg)),
        };

        if let Some(selected) = selected {
            if let Some((previous, _)) = &input {
                return Err(ArgsError::ConflictingInputs {
                    flag,
                    previous: previous.clone(),
                });
            }
            input = Some((flag, selected));
        }
    }

    Ok(Command::Run(Args {
        input: input.map_or(Input::Stdin, |(_, input)| input),
        output,
        parse_time,
        validate_length,
        verbose,
        format: format.build().map_err(ArgsError::Format)?,
        chunk_size,
    }))
}

fn parse_hex(flag: &str, value: &str) -> Result<Vec<u8>, ArgsError> {
    decode_hex_input(value).map_err(|source| ArgsError::InvalidValue {
        flag: flag.to_owned(),
        source,
    })
}

fn parse_number<T: FromStr>(flag: &str, value: &str) -> Result<T, ArgsError> {
    value.parse().map_err(|_| ArgsError::InvalidNumber {
        flag: flag.to_owned(),
        value: value.to_owned(),
    })
}
