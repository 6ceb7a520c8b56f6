//! `framescan` - print the frames and time records found in a binary capture.

mod cli;

use std::fs::File;
use std::io::{self, BufWriter, IsTerminal, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use framescan::{
    ByteSource, ChunkSource, FrameParser, FrameStream, ParserStats, ReadSource, RecordRenderer,
    decode_hex_input,
};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{Args, Command, Input};

#[derive(Debug, Error)]
enum RunError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error(transparent)]
    Scan(#[from] framescan::Error),
}

impl From<io::Error> for RunError {
    fn from(err: io::Error) -> Self {
        Self::Scan(err.into())
    }
}

fn main() -> ExitCode {
    let args = match cli::parse(std::env::args().skip(1)) {
        Ok(Command::Run(args)) => args,
        Ok(Command::Help) => {
            println!("{}", cli::USAGE);
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprintln!("Error: {err}");
            eprintln!("Try 'framescan --help' for more information.");
            return ExitCode::from(2);
        }
    };

    init_logging(args.verbose);

    match run(&args) {
        Ok(stats) => {
            if args.verbose {
                eprintln!("\nStatistics:");
                for (name, value) in stats.entries() {
                    eprintln!("  {name}: {value}");
                }
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` takes precedence; otherwise `warn`, or `info` with `-v`.
fn init_logging(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(args: &Args) -> Result<ParserStats, RunError> {
    let parser =
        FrameParser::new(args.format.clone()).with_length_validation(args.validate_length);
    let renderer = RecordRenderer::new(args.output, args.format.clone())
        .with_parse_time(args.parse_time);

    match &args.input {
        Input::File(path) => {
            let file = File::open(path).map_err(|err| match err.kind() {
                io::ErrorKind::NotFound => RunError::FileNotFound(path.clone()),
                _ => err.into(),
            })?;
            info!(path = %path.display(), "reading capture");
            scan(ReadSource::new(file), parser, &renderer, args.chunk_size)
        }
        Input::Hex(text) => {
            let text = match text {
                Some(text) => text.clone(),
                None => {
                    let mut text = String::new();
                    io::stdin().read_to_string(&mut text)?;
                    text
                }
            };
            let bytes = decode_hex_input(&text)?;
            info!(len = bytes.len(), "decoded hex input");
            scan(ChunkSource::from_bytes(bytes), parser, &renderer, args.chunk_size)
        }
        Input::Stdin => {
            let stdin = io::stdin();
            if stdin.is_terminal() {
                eprintln!("Reading from stdin (binary)...");
            }
            scan(ReadSource::new(stdin.lock()), parser, &renderer, args.chunk_size)
        }
    }
}

fn scan<S: ByteSource>(
    source: S,
    parser: FrameParser,
    renderer: &RecordRenderer,
    chunk_size: usize,
) -> Result<ParserStats, RunError> {
    let stdout = io::stdout();
    let interactive = stdout.is_terminal();
    let mut out = BufWriter::new(stdout.lock());
    let mut stream = FrameStream::new(source, parser).with_chunk_size(chunk_size);

    while let Some(record) = stream.next() {
        let record = record?;
        let written = renderer
            .write_record(&mut out, &record)
            .and_then(|()| if interactive { Ok(out.flush()?) } else { Ok(()) });

        match written {
            Ok(()) => {}
            Err(err) if is_broken_pipe(&err) => return Ok(stream.stats()),
            Err(err) => return Err(err.into()),
        }
    }

    if let Err(err) = out.flush() {
        if err.kind() != io::ErrorKind::BrokenPipe {
            return Err(err.into());
        }
    }

    let stats = stream.stats();
    info!(
        frames = stats.frames_found,
        time_records = stats.time_frames_found,
        invalid = stats.invalid_frames,
        discarded_at_end = stream.discarded_at_end(),
        "capture parsed"
    );
    Ok(stats)
}

fn is_broken_pipe(err: &framescan::Error) -> bool {
    matches!(err, framescan::Error::Io(inner) if inner.kind() == io::ErrorKind::BrokenPipe)
}
