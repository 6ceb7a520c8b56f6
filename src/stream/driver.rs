//! Pull loop connecting a byte source to a parser.

use tracing::{debug, instrument, trace};

use super::ByteSource;
use crate::protocol::{DEFAULT_CHUNK_SIZE, FrameParser, ParserStats, Record, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Source may still produce data
    Reading,
    /// Source exhausted; yielding what the buffer still holds
    Draining,
    /// Nothing more will be yielded
    Done,
}

/// Lazy, forward-only sequence of records read from a [`ByteSource`].
///
/// Each refill reads one chunk, feeds it to the parser and then yields every
/// record the parser can produce before reading again. Once the source is
/// exhausted the residue is drained, discarded, and the stream ends.
#[derive(Debug)]
pub struct FrameStream<S> {
    source: S,
    parser: FrameParser,
    chunk_size: usize,
    state: State,
    discarded_at_end: usize,
}

impl<S: ByteSource> FrameStream<S> {
    /// Stream `source` through `parser`
    pub fn new(source: S, parser: FrameParser) -> Self {
        Self {
            source,
            parser,
            chunk_size: DEFAULT_CHUNK_SIZE,
            state: State::Reading,
            discarded_at_end: 0,
        }
    }

    /// Change the read size; zero is treated as one byte
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Counters of the underlying parser
    #[must_use]
    pub fn stats(&self) -> ParserStats {
        self.parser.stats()
    }

    /// Bytes of incomplete records dropped when the source ran dry
    #[must_use]
    pub fn discarded_at_end(&self) -> usize {
        self.discarded_at_end
    }

    /// Underlying parser
    #[must_use]
    pub fn parser(&self) -> &FrameParser {
        &self.parser
    }

    /// Consume the stream, returning its parser
    #[must_use]
    pub fn into_parser(self) -> FrameParser {
        self.parser
    }

    /// Read and ingest one chunk. Returns `false` once the source is empty.
    #[instrument(level = "trace", skip(self), fields(chunk_size = self.chunk_size))]
    fn refill(&mut self) -> Result<bool> {
        let chunk = self.source.read_chunk(self.chunk_size)?;
        if chunk.is_empty() {
            return Ok(false);
        }

        trace!(len = chunk.len(), "ingesting chunk");
        self.parser.ingest(&chunk);
        Ok(true)
    }

    fn end(&mut self) -> Option<Record> {
        // Final drain for records completed by the last chunk.
        if let Some(record) = self.parser.take_next() {
            return Some(record);
        }

        self.state = State::Done;
        self.discarded_at_end = self.parser.finish();
        debug!(
            stats = ?self.parser.stats(),
            discarded = self.discarded_at_end,
            "stream exhausted"
        );
        None
    }
}

impl<S: ByteSource> Iterator for FrameStream<S> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.state {
                State::Reading => {
                    if let Some(record) = self.parser.take_next() {
                        return Some(Ok(record));
                    }

                    match self.refill() {
                        Ok(true) => {}
                        Ok(false) => self.state = State::Draining,
                        Err(err) => {
                            debug!(error = %err, "byte source failed");
                            self.state = State::Done;
                            return Some(Err(err));
                        }
                    }
                }
                State::Draining => return self.end().map(Ok),
                State::Done => return None,
            }
        }
    }
}

impl<S: ByteSource> std::iter::FusedIterator for FrameStream<S> {}
